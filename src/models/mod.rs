//! Data models for Biblioteca

pub mod book;
pub mod booking;
pub mod course;
pub mod feedback;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::Book;
pub use booking::{Booking, BookingStatus};
pub use course::Course;
pub use feedback::{CourseRating, Review};
pub use loan::{Loan, LoanDetails};
pub use member::{Member, Role};
