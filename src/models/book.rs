//! Book (catalog item) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: String,
    pub classification: String,
    pub shelf_location: String,
    pub series: Option<String>,
    pub publisher: String,
    pub notes: Option<String>,
    /// Total copies owned by the library
    pub nb_copies: i32,
    /// Copies currently on the shelf; kept within [0, nb_copies]
    pub nb_available: i32,
    /// Book of the month
    pub featured: bool,
    /// Periodicals get the short loan period
    pub periodical: bool,
    pub nb_views: i32,
    pub nb_downloads: i32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.nb_available > 0
    }
}

/// Create book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: String,
    pub classification: String,
    pub shelf_location: String,
    pub series: Option<String>,
    pub publisher: String,
    pub notes: Option<String>,
    pub nb_copies: i32,
    pub featured: Option<bool>,
    pub periodical: Option<bool>,
}

/// Update book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: String,
    pub classification: String,
    pub shelf_location: String,
    pub series: Option<String>,
    pub publisher: String,
    pub notes: Option<String>,
    pub nb_copies: i32,
    pub nb_available: i32,
    pub featured: bool,
    pub periodical: bool,
}

/// Search filters for the book list
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Title substring
    pub title: Option<String>,
    /// Author substring
    pub author: Option<String>,
    /// Genre substring
    pub genre: Option<String>,
}

/// Genre with book count
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct GenreCount {
    pub genre: String,
    pub nb_books: i64,
}

/// Catalog-wide statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogStats {
    pub nb_books: i64,
    pub total_views: i64,
    pub total_downloads: i64,
    pub most_viewed: Vec<Book>,
}

/// Per-book statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct BookStats {
    pub book_id: i32,
    pub total_loans: i64,
    pub average_rating: f64,
    /// Number of reviews per rating value 1..=5
    pub rating_distribution: Vec<RatingBucket>,
    /// Loans grouped by checkout month (YYYY-MM)
    pub monthly_loans: Vec<MonthlyCount>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RatingBucket {
    pub rating: i32,
    pub nb_reviews: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MonthlyCount {
    pub month: String,
    pub nb_loans: i64,
}
