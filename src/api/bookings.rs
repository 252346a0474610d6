//! Booking lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::booking::{Booking, BookingDetails, CreateBooking},
};

use super::AuthenticatedMember;

/// Book a place on a course for the current member
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created as pending", body = Booking),
        (status = 404, description = "Course not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state
        .services
        .bookings
        .create(request.course_id, claims.member_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Confirm a pending booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 404, description = "Booking or course not found"),
        (status = 409, description = "Booking is not pending")
    )
)]
pub async fn confirm_booking(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_manage_bookings()?;

    let booking = state.services.bookings.confirm(booking_id).await?;
    Ok(Json(booking))
}

/// Reject a pending booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/reject",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking rejected", body = Booking),
        (status = 404, description = "Booking or course not found"),
        (status = 409, description = "Booking is not pending")
    )
)]
pub async fn reject_booking(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(booking_id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_manage_bookings()?;

    let booking = state.services.bookings.reject(booking_id).await?;
    Ok(Json(booking))
}

/// All bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings", body = Vec<BookingDetails>),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<BookingDetails>>> {
    claims.require_manage_bookings()?;

    let bookings = state.services.bookings.list().await?;
    Ok(Json(bookings))
}

/// Bookings for a course
#[utoipa::path(
    get,
    path = "/courses/{id}/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course bookings", body = Vec<BookingDetails>),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(course_id): Path<i32>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    claims.require_manage_bookings()?;

    let bookings = state.services.bookings.for_course(course_id).await?;
    Ok(Json(bookings))
}

/// Bookings made by a member
#[utoipa::path(
    get,
    path = "/members/{id}/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member's bookings", body = Vec<BookingDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn member_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    claims.require_self_or_staff(member_id)?;

    let bookings = state.services.bookings.for_member(member_id).await?;
    Ok(Json(bookings))
}
