//! Loan lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanAlerts, LoanDetails, LoanStats, LoanWithRemaining},
};

use super::AuthenticatedMember;

/// Checkout response
#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub id: i32,
    pub book_id: i32,
    /// Due date computed from the checkout date and the book's loan period
    pub due_date: NaiveDate,
}

/// Check out a book by title for the current member
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = CheckoutResponse),
        (status = 404, description = "Title does not match exactly one book"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let loan = state
        .services
        .loans
        .checkout(request, claims.member_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            id: loan.id,
            book_id: loan.book_id,
            due_date: loan.due_date,
        }),
    ))
}

/// Extend a loan by 15 days; a loan can only be extended once
#[utoipa::path(
    post,
    path = "/loans/{id}/extend",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan extended", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already extended")
    )
)]
pub async fn extend_loan(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.extend(loan_id).await?;
    Ok(Json(loan))
}

/// Terminate a loan: the copy goes back on the shelf
#[utoipa::path(
    post,
    path = "/loans/{id}/terminate",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan terminated", body = Loan),
        (status = 404, description = "Loan or book not found"),
        (status = 409, description = "Already terminated")
    )
)]
pub async fn terminate_loan(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    claims.require_manage_loans()?;

    let loan = state.services.loans.terminate(loan_id).await?;
    Ok(Json(loan))
}

/// Delete a loan record, restoring the copy if still open
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan or book not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(loan_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_manage_loans()?;

    state.services.loans.delete(loan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All loans with days remaining for open ones
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<LoanWithRemaining>),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<LoanWithRemaining>>> {
    claims.require_manage_loans()?;

    let loans = state.services.loans.all_with_remaining().await?;
    Ok(Json(loans))
}

/// Loans past their due date and not yet returned
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue loans", body = Vec<LoanDetails>)
    )
)]
pub async fn overdue_loans(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_manage_loans()?;

    let loans = state.services.loans.overdue().await?;
    Ok(Json(loans))
}

/// Loans due within the next week, today included
#[utoipa::path(
    get,
    path = "/loans/expiring",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expiring loans", body = Vec<LoanDetails>)
    )
)]
pub async fn expiring_loans(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_manage_loans()?;

    let loans = state.services.loans.expiring().await?;
    Ok(Json(loans))
}

/// Aggregate loan statistics
#[utoipa::path(
    get,
    path = "/loans/stats",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loan statistics", body = LoanStats)
    )
)]
pub async fn loan_stats(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<LoanStats>> {
    claims.require_manage_loans()?;

    let stats = state.services.loans.stats().await?;
    Ok(Json(stats))
}

/// Loans needing attention
#[utoipa::path(
    get,
    path = "/loans/alerts",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loan alerts", body = LoanAlerts)
    )
)]
pub async fn loan_alerts(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
) -> AppResult<Json<LoanAlerts>> {
    claims.require_manage_loans()?;

    let alerts = state.services.loans.alerts().await?;
    Ok(Json(alerts))
}

/// Open loans for a member
#[utoipa::path(
    get,
    path = "/members/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member's open loans", body = Vec<LoanDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn member_loans(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_self_or_staff(member_id)?;

    let loans = state.services.loans.open_for_member(member_id).await?;
    Ok(Json(loans))
}

/// Full loan history for a member
#[utoipa::path(
    get,
    path = "/members/{id}/loans/history",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member's loan history", body = Vec<LoanDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn member_loan_history(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_self_or_staff(member_id)?;

    let loans = state.services.loans.member_history(member_id).await?;
    Ok(Json(loans))
}

/// Full loan history for a book
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book's loan history", body = Vec<LoanDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_loan_history(
    State(state): State<crate::AppState>,
    AuthenticatedMember(claims): AuthenticatedMember,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_manage_loans()?;

    let loans = state.services.loans.book_history(book_id).await?;
    Ok(Json(loans))
}
