//! Feedback service: book reviews and course ratings

use crate::{
    error::AppResult,
    models::feedback::{CourseRating, CreateCourseRating, CreateReview, Review, UpdateReview},
    repository::Repository,
};

#[derive(Clone)]
pub struct FeedbackService {
    repository: Repository,
}

impl FeedbackService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Leave a review on a book
    pub async fn create_review(&self, review: CreateReview, member_id: i32) -> AppResult<Review> {
        // Verify both sides of the relation exist
        self.repository.members.get_by_id(member_id).await?;
        self.repository.books.get_by_id(review.book_id).await?;

        self.repository
            .feedback
            .create_review(review.book_id, member_id, review.rating, &review.comment)
            .await
    }

    /// Edit a review's rating and comment
    pub async fn update_review(&self, id: i32, review: UpdateReview) -> AppResult<Review> {
        self.repository
            .feedback
            .update_review(id, review.rating, &review.comment)
            .await
    }

    /// Reviews left on a book
    pub async fn reviews_for_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.feedback.reviews_for_book(book_id).await
    }

    /// Books a member has already reviewed
    pub async fn reviewed_book_ids(&self, member_id: i32) -> AppResult<Vec<i32>> {
        self.repository.feedback.reviewed_book_ids(member_id).await
    }

    /// Leave a rating on a course
    pub async fn create_rating(
        &self,
        course_id: i32,
        rating: CreateCourseRating,
        member_id: i32,
    ) -> AppResult<CourseRating> {
        self.repository.members.get_by_id(member_id).await?;
        self.repository.courses.get_by_id(course_id).await?;

        self.repository
            .feedback
            .create_rating(course_id, member_id, rating.rating, &rating.comment)
            .await
    }

    /// Ratings left on a course
    pub async fn ratings_for_course(&self, course_id: i32) -> AppResult<Vec<CourseRating>> {
        self.repository.courses.get_by_id(course_id).await?;
        self.repository.feedback.ratings_for_course(course_id).await
    }
}
