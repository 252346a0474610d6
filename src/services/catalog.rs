//! Catalog (books) service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookStats, CatalogStats, CreateBook, GenreCount, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    pub async fn suggest_titles(&self, fragment: &str) -> AppResult<Vec<String>> {
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.books.suggest_titles(fragment).await
    }

    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        if book.nb_copies < 1 {
            return Err(AppError::Validation(
                "A book needs at least one copy".to_string(),
            ));
        }
        self.repository.books.create(&book).await
    }

    pub async fn update(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        if book.nb_available < 0 || book.nb_available > book.nb_copies {
            return Err(AppError::Validation(format!(
                "nb_available must be within [0, {}]",
                book.nb_copies
            )));
        }
        self.repository.books.update(id, &book).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    pub async fn genres(&self) -> AppResult<Vec<GenreCount>> {
        self.repository.books.genres().await
    }

    pub async fn rename_genre(&self, old: &str, new: &str) -> AppResult<u64> {
        let renamed = self.repository.books.rename_genre(old, new).await?;
        tracing::info!(old, new, renamed, "genre renamed");
        Ok(renamed)
    }

    pub async fn featured(&self) -> AppResult<Option<Book>> {
        self.repository.books.featured().await
    }

    /// Related books; viewing a book's neighborhood counts as a view
    pub async fn related(&self, id: i32) -> AppResult<(Book, Vec<Book>)> {
        let book = self.repository.books.get_by_id(id).await?;
        self.repository.books.record_view(id).await?;
        let related = self.repository.books.related(&book).await?;
        Ok((book, related))
    }

    /// Record a download; returns the new counter
    pub async fn record_download(&self, id: i32) -> AppResult<i32> {
        self.repository.books.record_download(id).await
    }

    /// Catalog-wide statistics
    pub async fn overview(&self) -> AppResult<CatalogStats> {
        let (nb_books, total_views, total_downloads) = self.repository.books.totals().await?;
        let most_viewed = self.repository.books.most_viewed(5).await?;

        Ok(CatalogStats {
            nb_books,
            total_views,
            total_downloads,
            most_viewed,
        })
    }

    /// Per-book statistics
    pub async fn book_stats(&self, id: i32) -> AppResult<BookStats> {
        self.repository.books.stats(id).await
    }
}
