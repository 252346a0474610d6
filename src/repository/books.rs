//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookQuery, BookStats, CreateBook, GenreCount, MonthlyCount, RatingBucket,
        UpdateBook,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books, optionally filtered by title/author/genre substring
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR genre ILIKE '%' || $3 || '%')
            ORDER BY title
            "#,
        )
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.genre)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Title suggestions for the search box
    pub async fn suggest_titles(&self, fragment: &str) -> AppResult<Vec<String>> {
        let titles = sqlx::query_scalar::<_, String>(
            "SELECT title FROM books WHERE title ILIKE '%' || $1 || '%' ORDER BY title LIMIT 10",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        Ok(titles)
    }

    /// Create a new book; all copies start on the shelf
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, author, genre, publication_year, classification,
                shelf_location, series, publisher, notes,
                nb_copies, nb_available, featured, periodical, nb_views, nb_downloads
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11, $12, 0, 0)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.publication_year)
        .bind(&book.classification)
        .bind(&book.shelf_location)
        .bind(&book.series)
        .bind(&book.publisher)
        .bind(&book.notes)
        .bind(book.nb_copies)
        .bind(book.featured.unwrap_or(false))
        .bind(book.periodical.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $1, author = $2, genre = $3, publication_year = $4,
                classification = $5, shelf_location = $6, series = $7,
                publisher = $8, notes = $9, nb_copies = $10, nb_available = $11,
                featured = $12, periodical = $13
            WHERE id = $14
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.publication_year)
        .bind(&book.classification)
        .bind(&book.shelf_location)
        .bind(&book.series)
        .bind(&book.publisher)
        .bind(&book.notes)
        .bind(book.nb_copies)
        .bind(book.nb_available)
        .bind(book.featured)
        .bind(book.periodical)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Genres with per-genre book counts
    pub async fn genres(&self) -> AppResult<Vec<GenreCount>> {
        let genres = sqlx::query_as::<_, GenreCount>(
            "SELECT genre, COUNT(*) as nb_books FROM books GROUP BY genre ORDER BY genre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    /// Rename a genre across the catalog; returns affected rows
    pub async fn rename_genre(&self, old: &str, new: &str) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE books SET genre = $1 WHERE genre ILIKE '%' || $2 || '%'")
                .bind(new)
                .bind(old)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Book of the month, if one is flagged
    pub async fn featured(&self) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE featured LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Books sharing the genre or the author, excluding the book itself
    pub async fn related(&self, book: &Book) -> AppResult<Vec<Book>> {
        let by_genre = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE genre = $1 AND id != $2 LIMIT 5",
        )
        .bind(&book.genre)
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        let by_author = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE author = $1 AND id != $2 LIMIT 5",
        )
        .bind(&book.author)
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        // De-duplicate while keeping genre matches first
        let mut result: Vec<Book> = Vec::new();
        for candidate in by_genre.into_iter().chain(by_author) {
            if !result.iter().any(|b| b.id == candidate.id) {
                result.push(candidate);
            }
        }
        Ok(result)
    }

    /// Record a view; returns the new counter
    pub async fn record_view(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE books SET nb_views = nb_views + 1 WHERE id = $1 RETURNING nb_views",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Record a download; returns the new counter
    pub async fn record_download(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE books SET nb_downloads = nb_downloads + 1 WHERE id = $1 RETURNING nb_downloads",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Catalog totals: book count, view and download sums
    pub async fn totals(&self) -> AppResult<(i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as nb_books,
                   COALESCE(SUM(nb_views), 0)::bigint as total_views,
                   COALESCE(SUM(nb_downloads), 0)::bigint as total_downloads
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((
            row.get("nb_books"),
            row.get("total_views"),
            row.get("total_downloads"),
        ))
    }

    /// Most viewed books
    pub async fn most_viewed(&self, limit: i64) -> AppResult<Vec<Book>> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY nb_views DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(books)
    }

    /// Per-book statistics: loan count, review aggregates, loans by month
    pub async fn stats(&self, id: i32) -> AppResult<BookStats> {
        // Existence check first so a bad id reports 404
        self.get_by_id(id).await?;

        let total_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        let average_rating: f64 = sqlx::query_scalar(
            "SELECT COALESCE(AVG(rating), 0)::float8 FROM reviews WHERE book_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let buckets = sqlx::query_as::<_, RatingBucket>(
            r#"
            SELECT r.rating::int as rating, COUNT(reviews.id) as nb_reviews
            FROM generate_series(1, 5) AS r(rating)
            LEFT JOIN reviews ON reviews.rating = r.rating AND reviews.book_id = $1
            GROUP BY r.rating
            ORDER BY r.rating
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let monthly = sqlx::query_as::<_, MonthlyCount>(
            r#"
            SELECT to_char(checkout_date, 'YYYY-MM') as month, COUNT(*) as nb_loans
            FROM loans
            WHERE book_id = $1
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BookStats {
            book_id: id,
            total_loans,
            average_rating,
            rating_distribution: buckets,
            monthly_loans: monthly,
        })
    }
}
