//! Feedback repository: book reviews and course ratings

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::feedback::{CourseRating, Review},
};

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: Pool<Postgres>,
}

impl FeedbackRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get review by ID
    pub async fn get_review(&self, id: i32) -> AppResult<Review> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review with id {} not found", id)))
    }

    /// Reviews for a book
    pub async fn reviews_for_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let reviews =
            sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE book_id = $1 ORDER BY id")
                .bind(book_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(reviews)
    }

    /// IDs of books a member has already reviewed
    pub async fn reviewed_book_ids(&self, member_id: i32) -> AppResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            "SELECT book_id FROM reviews WHERE member_id = $1 ORDER BY book_id",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Create a book review
    pub async fn create_review(
        &self,
        book_id: i32,
        member_id: i32,
        rating: i32,
        comment: &str,
    ) -> AppResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (book_id, member_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(member_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Update a review's rating and comment
    pub async fn update_review(&self, id: i32, rating: i32, comment: &str) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET rating = $1, comment = $2 WHERE id = $3 RETURNING *",
        )
        .bind(rating)
        .bind(comment)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review with id {} not found", id)))
    }

    /// Ratings for a course
    pub async fn ratings_for_course(&self, course_id: i32) -> AppResult<Vec<CourseRating>> {
        let ratings = sqlx::query_as::<_, CourseRating>(
            "SELECT * FROM course_ratings WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    /// Create a course rating
    pub async fn create_rating(
        &self,
        course_id: i32,
        member_id: i32,
        rating: i32,
        comment: &str,
    ) -> AppResult<CourseRating> {
        let created = sqlx::query_as::<_, CourseRating>(
            r#"
            INSERT INTO course_ratings (course_id, member_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(member_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
