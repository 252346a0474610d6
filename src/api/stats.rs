//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::CatalogStats,
        course::{Course, CourseFillRate},
        loan::LoanStats,
    },
};

use super::AuthenticatedMember;

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Catalog statistics
    pub catalog: CatalogStats,
    /// Course statistics
    pub courses: CourseStatsOverview,
    /// Loan statistics
    pub loans: LoanStats,
    /// Registered members holding the plain member role
    pub nb_members: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CourseStatsOverview {
    /// Total course views
    pub total_views: i64,
    /// Most viewed courses
    pub most_viewed: Vec<Course>,
    /// Fill rate per course
    pub fill_rates: Vec<CourseFillRate>,
}

/// Library-wide statistics overview
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics overview", body = StatsResponse),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<StatsResponse>> {
    claims.require_manage_loans()?;

    let stats = state.services.stats.overview().await?;
    Ok(Json(stats))
}
