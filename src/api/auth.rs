//! Authentication and profile self-service endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, Role},
};

use super::AuthenticatedMember;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub member: MemberInfo,
}

/// Public view of a member
#[derive(Serialize, ToSchema)]
pub struct MemberInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl From<Member> for MemberInfo {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            role: m.role,
        }
    }
}

/// Password change request
#[derive(Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// Email change request
#[derive(Deserialize, Validate, ToSchema)]
pub struct ChangeEmailRequest {
    pub old_email: String,
    #[validate(email)]
    pub new_email: String,
}

/// Phone change request
#[derive(Deserialize, ToSchema)]
pub struct ChangePhoneRequest {
    pub phone: Option<String>,
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member registered", body = MemberInfo),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<MemberInfo>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = state.services.members.register(request).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, member) = state
        .services
        .members
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        member: member.into(),
    }))
}

/// Current member profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current member", body = MemberInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<MemberInfo>> {
    let member = state.services.members.get_by_id(claims.member_id).await?;
    Ok(Json(member.into()))
}

/// Change the current member's password
#[utoipa::path(
    put,
    path = "/auth/password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 403, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .services
        .members
        .change_password(claims.member_id, &request.old_password, &request.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the current member's email
#[utoipa::path(
    put,
    path = "/auth/email",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangeEmailRequest,
    responses(
        (status = 204, description = "Email changed"),
        (status = 403, description = "Current email does not match"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn change_email(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<ChangeEmailRequest>,
) -> AppResult<StatusCode> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .services
        .members
        .change_email(claims.member_id, &request.old_email, &request.new_email)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the current member's phone number
#[utoipa::path(
    put,
    path = "/auth/phone",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePhoneRequest,
    responses(
        (status = 204, description = "Phone changed")
    )
)]
pub async fn change_phone(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<ChangePhoneRequest>,
) -> AppResult<StatusCode> {
    state
        .services
        .members
        .change_phone(claims.member_id, request.phone.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
