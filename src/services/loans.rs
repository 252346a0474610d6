//! Loan lifecycle service

use chrono::{NaiveDate, Utc};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanAlerts, LoanDetails, LoanStats, LoanWithRemaining},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Check out a book for a member
    pub async fn checkout(&self, loan: CreateLoan, member_id: i32) -> AppResult<Loan> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;

        let created = self
            .repository
            .loans
            .checkout(&loan.title, member_id, loan.checkout_date)
            .await?;

        tracing::info!(
            loan_id = created.id,
            book_id = created.book_id,
            member_id,
            due_date = %created.due_date,
            "book checked out"
        );

        Ok(created)
    }

    /// Extend a loan by 15 days, once
    pub async fn extend(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.extend(loan_id).await
    }

    /// Terminate a loan and return the copy to the shelf
    pub async fn terminate(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.terminate(loan_id, Self::today()).await
    }

    /// Delete a loan record, restoring the copy if the loan was still open
    pub async fn delete(&self, loan_id: i32) -> AppResult<()> {
        self.repository.loans.delete(loan_id).await
    }

    /// Open loans for a member
    pub async fn open_for_member(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.open_for_member(member_id).await
    }

    /// Full loan history for a member
    pub async fn member_history(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.member_history(member_id).await
    }

    /// Full loan history for a book
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.loans.book_history(book_id).await
    }

    /// All loans with days remaining until the due date for open ones
    pub async fn all_with_remaining(&self) -> AppResult<Vec<LoanWithRemaining>> {
        let today = Self::today();
        let loans = self.repository.loans.all().await?;

        Ok(loans
            .into_iter()
            .map(|loan| {
                let days_remaining = if loan.closed {
                    None
                } else {
                    Some((loan.due_date - today).num_days())
                };
                LoanWithRemaining {
                    loan,
                    days_remaining,
                }
            })
            .collect())
    }

    /// Loans past due and not yet returned
    pub async fn overdue(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.overdue(Self::today()).await
    }

    /// Loans due within the next week
    pub async fn expiring(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.expiring(Self::today()).await
    }

    /// Aggregate loan statistics
    pub async fn stats(&self) -> AppResult<LoanStats> {
        self.repository.loans.stats(Self::today()).await
    }

    /// Unusually long and overdue loans
    pub async fn alerts(&self) -> AppResult<LoanAlerts> {
        self.repository.loans.alerts(Self::today()).await
    }
}
