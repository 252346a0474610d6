//! Member management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::LoanDetails,
        member::{MemberSummary, UpdateMember},
    },
};

use super::{auth::MemberInfo, AuthenticatedMember};

/// Member profile: the member, their open loans and reviewed books
#[derive(Serialize, ToSchema)]
pub struct MemberProfile {
    pub member: MemberInfo,
    pub loans: Vec<LoanDetails>,
    pub reviewed_book_ids: Vec<i32>,
}

/// List members with their loan counts
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of members", body = Vec<MemberSummary>),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<MemberSummary>>> {
    claims.require_manage_members()?;

    let members = state.services.members.list().await?;
    Ok(Json(members))
}

/// Member profile with open loans and reviewed book ids
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member profile", body = MemberProfile),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<Json<MemberProfile>> {
    claims.require_self_or_staff(id)?;

    let member = state.services.members.get_by_id(id).await?;
    let loans = state.services.loans.open_for_member(id).await?;
    let reviewed_book_ids = state.services.feedback.reviewed_book_ids(id).await?;

    Ok(Json(MemberProfile {
        member: member.into(),
        loans,
        reviewed_book_ids,
    }))
}

/// Update a member's contact fields and role
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = MemberInfo),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
    Json(update): Json<UpdateMember>,
) -> AppResult<Json<MemberInfo>> {
    claims.require_manage_members()?;

    update
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = state.services.members.update(id, update).await?;
    Ok(Json(member.into()))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_manage_members()?;

    state.services.members.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
