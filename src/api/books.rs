//! Catalog (books) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, BookStats, CreateBook, GenreCount, UpdateBook},
};

use super::AuthenticatedMember;

/// Title suggestion query
#[derive(Deserialize, IntoParams)]
pub struct SuggestQuery {
    /// Title fragment
    #[serde(default)]
    pub query: String,
}

/// Genre rename request
#[derive(Deserialize, ToSchema)]
pub struct RenameGenreRequest {
    pub old_genre: String,
    pub new_genre: String,
}

/// Genre rename response
#[derive(Serialize, ToSchema)]
pub struct RenameGenreResponse {
    pub renamed: u64,
}

/// A book and its related titles
#[derive(Serialize, ToSchema)]
pub struct RelatedResponse {
    pub book: Book,
    pub related: Vec<Book>,
}

/// Download counter response
#[derive(Serialize, ToSchema)]
pub struct DownloadResponse {
    pub nb_downloads: i32,
}

/// List books, filtered by title/author/genre substring
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list(&query).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_by_id(id).await?;
    Ok(Json(book))
}

/// Title suggestions for the search box
#[utoipa::path(
    get,
    path = "/books/suggest",
    tag = "books",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Matching titles", body = Vec<String>)
    )
)]
pub async fn suggest_titles(
    State(state): State<crate::AppState>,
    Query(query): Query<SuggestQuery>,
) -> AppResult<Json<Vec<String>>> {
    let titles = state.services.catalog.suggest_titles(&query.query).await?;
    Ok(Json(titles))
}

/// Book of the month
#[utoipa::path(
    get,
    path = "/books/featured",
    tag = "books",
    responses(
        (status = 200, description = "Featured book, if any", body = Option<Book>)
    )
)]
pub async fn featured_book(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Option<Book>>> {
    let book = state.services.catalog.featured().await?;
    Ok(Json(book))
}

/// Genres with per-genre counts
#[utoipa::path(
    get,
    path = "/books/genres",
    tag = "books",
    responses(
        (status = 200, description = "Genres", body = Vec<GenreCount>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<GenreCount>>> {
    let genres = state.services.catalog.genres().await?;
    Ok(Json(genres))
}

/// Rename a genre across the catalog
#[utoipa::path(
    put,
    path = "/books/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = RenameGenreRequest,
    responses(
        (status = 200, description = "Genre renamed", body = RenameGenreResponse),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn rename_genre(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<RenameGenreRequest>,
) -> AppResult<Json<RenameGenreResponse>> {
    claims.require_manage_catalog()?;

    let renamed = state
        .services
        .catalog
        .rename_genre(&request.old_genre, &request.new_genre)
        .await?;

    Ok(Json(RenameGenreResponse { renamed }))
}

/// Related books by genre and author; records a view
#[utoipa::path(
    get,
    path = "/books/{id}/related",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book and related titles", body = RelatedResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn related_books(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RelatedResponse>> {
    let (book, related) = state.services.catalog.related(id).await?;
    Ok(Json(RelatedResponse { book, related }))
}

/// Record a download of the book's document
#[utoipa::path(
    post,
    path = "/books/{id}/download",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Download recorded", body = DownloadResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn record_download(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<Json<DownloadResponse>> {
    let nb_downloads = state.services.catalog.record_download(id).await?;
    Ok(Json(DownloadResponse { nb_downloads }))
}

/// Per-book statistics
#[utoipa::path(
    get,
    path = "/books/{id}/stats",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book statistics", body = BookStats),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_stats(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<Json<BookStats>> {
    let stats = state.services.catalog.book_stats(id).await?;
    Ok(Json(stats))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_manage_catalog()?;

    let created = state.services.catalog.create(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_manage_catalog()?;

    let updated = state.services.catalog.update(id, book).await?;
    Ok(Json(updated))
}

/// Remove a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_manage_catalog()?;

    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
