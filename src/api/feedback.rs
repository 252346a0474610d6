//! Feedback endpoints: book reviews and course ratings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::feedback::{CourseRating, CreateCourseRating, CreateReview, Review, UpdateReview},
};

use super::AuthenticatedMember;

/// Leave a review on a book
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "feedback",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Rating outside 1..5"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(review): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    review
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .feedback
        .create_review(review, claims.member_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit a review
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "feedback",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    Path(id): Path<i32>,
    Json(review): Json<UpdateReview>,
) -> AppResult<Json<Review>> {
    review
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.feedback.update_review(id, review).await?;
    Ok(Json(updated))
}

/// Reviews left on a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "feedback",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book reviews", body = Vec<Review>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_reviews(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.services.feedback.reviews_for_book(book_id).await?;
    Ok(Json(reviews))
}

/// Leave a rating on a course
#[utoipa::path(
    post,
    path = "/courses/{id}/ratings",
    tag = "feedback",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateCourseRating,
    responses(
        (status = 201, description = "Rating created", body = CourseRating),
        (status = 400, description = "Rating outside 1..5"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn create_course_rating(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(course_id): Path<i32>,
    Json(rating): Json<CreateCourseRating>,
) -> AppResult<(StatusCode, Json<CourseRating>)> {
    rating
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .feedback
        .create_rating(course_id, rating, claims.member_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Ratings left on a course
#[utoipa::path(
    get,
    path = "/courses/{id}/ratings",
    tag = "feedback",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course ratings", body = Vec<CourseRating>),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_ratings(
    State(state): State<crate::AppState>,
    Path(course_id): Path<i32>,
) -> AppResult<Json<Vec<CourseRating>>> {
    let ratings = state.services.feedback.ratings_for_course(course_id).await?;
    Ok(Json(ratings))
}
