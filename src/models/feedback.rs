//! Feedback models: book reviews and course ratings

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book review from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub rating: i32,
    pub comment: String,
}

/// Course rating from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseRating {
    pub id: i32,
    pub course_id: i32,
    pub member_id: i32,
    pub rating: i32,
    pub comment: String,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub book_id: i32,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: String,
}

/// Update review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: String,
}

/// Create course rating request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRating {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: String,
}
