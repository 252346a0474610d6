//! Repository layer for database operations

pub mod bookings;
pub mod books;
pub mod courses;
pub mod feedback;
pub mod loans;
pub mod members;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub courses: courses::CoursesRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
    pub bookings: bookings::BookingsRepository,
    pub feedback: feedback::FeedbackRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            courses: courses::CoursesRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            feedback: feedback::FeedbackRepository::new(pool.clone()),
            pool,
        }
    }
}
