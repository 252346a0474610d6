//! Course endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::course::{Course, CourseFillRate, CourseSummary, CreateCourse, UpdateCourse},
};

use super::AuthenticatedMember;

/// View counter response
#[derive(Serialize, ToSchema)]
pub struct ViewResponse {
    pub nb_views: i32,
}

/// List courses with remaining places
#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    responses(
        (status = 200, description = "List of courses", body = Vec<CourseSummary>)
    )
)]
pub async fn list_courses(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<CourseSummary>>> {
    let courses = state.services.courses.list().await?;
    Ok(Json(courses))
}

/// Get course details by ID
#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Course>> {
    let course = state.services.courses.get_by_id(id).await?;
    Ok(Json(course))
}

/// Fill rate of every course
#[utoipa::path(
    get,
    path = "/courses/fill-rates",
    tag = "courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fill rates", body = Vec<CourseFillRate>),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn fill_rates(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<CourseFillRate>>> {
    claims.require_manage_bookings()?;

    let report = state.services.bookings.fill_rate_report().await?;
    Ok(Json(report))
}

/// Record a view on a course
#[utoipa::path(
    post,
    path = "/courses/{id}/views",
    tag = "courses",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "View recorded", body = ViewResponse),
        (status = 404, description = "Course not found")
    )
)]
pub async fn record_view(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ViewResponse>> {
    let nb_views = state.services.courses.record_view(id).await?;
    Ok(Json(ViewResponse { nb_views }))
}

/// Add a course
#[utoipa::path(
    post,
    path = "/courses",
    tag = "courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourse,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 409, description = "Course name already exists")
    )
)]
pub async fn create_course(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(course): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<Course>)> {
    claims.require_manage_catalog()?;

    let created = state.services.courses.create(course).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a course
#[utoipa::path(
    put,
    path = "/courses/{id}",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourse,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Course name already exists")
    )
)]
pub async fn update_course(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
    Json(course): Json<UpdateCourse>,
) -> AppResult<Json<Course>> {
    claims.require_manage_catalog()?;

    let updated = state.services.courses.update(id, course).await?;
    Ok(Json(updated))
}

/// Remove a course
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_manage_catalog()?;

    state.services.courses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
