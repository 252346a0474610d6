//! Loans repository: the loan lifecycle engine
//!
//! Checkout, terminate and delete mutate the book's available-copy counter
//! together with the loan row, so they all run inside a transaction with the
//! book row locked (`SELECT ... FOR UPDATE`). Two concurrent checkouts of the
//! last copy serialize on that lock; the loser sees nb_available == 0.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{self, Loan, LoanAlerts, LoanDetails, LoanStats},
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, b.title as book_title,
           l.member_id, m.name as member_name,
           l.checkout_date, l.due_date, l.closed, l.returned, l.extended
    FROM loans l
    JOIN books b ON l.book_id = b.id
    JOIN members m ON l.member_id = m.id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Check out one copy of a book resolved by title substring.
    ///
    /// The title must match exactly one book. The available-copy decrement
    /// and the loan insert commit together or not at all.
    pub async fn checkout(
        &self,
        title: &str,
        member_id: i32,
        checkout_date: NaiveDate,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let matches = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE title ILIKE '%' || $1 || '%' FOR UPDATE",
        )
        .bind(title)
        .fetch_all(&mut *tx)
        .await?;

        let book = match matches.len() {
            1 => &matches[0],
            0 => {
                return Err(AppError::NotFound(format!(
                    "No book matching title '{}'",
                    title
                )))
            }
            n => {
                return Err(AppError::NotFound(format!(
                    "Title '{}' matches {} books, expected exactly one",
                    title, n
                )))
            }
        };

        if book.nb_available == 0 {
            return Err(AppError::OutOfStock(format!(
                "No copies of '{}' available",
                book.title
            )));
        }

        let due_date = loan::due_date(checkout_date, book.periodical);

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, member_id, checkout_date, due_date, closed, returned, extended)
            VALUES ($1, $2, $3, $4, false, false, false)
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(member_id)
        .bind(checkout_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET nb_available = nb_available - 1 WHERE id = $1")
            .bind(book.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Extend a loan once: pushes the due date by 15 days and reopens it.
    pub async fn extend(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if current.extended {
            return Err(AppError::Conflict(format!(
                "Loan {} has already been extended",
                loan_id
            )));
        }

        let new_due = loan::extended_due_date(current.due_date);

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET due_date = $1, closed = false, extended = true
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(new_due)
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Terminate a loan: closes it and puts the copy back on the shelf.
    /// A closed loan stays closed; terminating it again would restore a
    /// copy that was never out.
    pub async fn terminate(&self, loan_id: i32, today: NaiveDate) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if current.closed {
            return Err(AppError::Conflict(format!(
                "Loan {} is already terminated",
                loan_id
            )));
        }

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET closed = true, returned = true, due_date = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(today)
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::restore_copy(&mut tx, current.book_id).await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a loan record. An open loan restores its copy first; a closed
    /// loan already gave it back at termination.
    pub async fn delete(&self, loan_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if !current.closed {
            Self::restore_copy(&mut tx, current.book_id).await?;
        } else {
            // Still verify the book reference so a dangling loan reports 404
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(current.book_id)
                .fetch_one(&mut *tx)
                .await?;
            if !exists {
                return Err(AppError::NotFound(format!(
                    "Book with id {} not found",
                    current.book_id
                )));
            }
        }

        sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Increment nb_available, clamped to nb_copies.
    async fn restore_copy(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE books SET nb_available = LEAST(nb_available + 1, nb_copies) WHERE id = $1",
        )
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Open loans for a member
    pub async fn open_for_member(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.member_id = $1 AND NOT l.closed ORDER BY l.due_date",
            DETAILS_SELECT
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Full loan history for a member
    pub async fn member_history(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.member_id = $1 ORDER BY l.checkout_date DESC",
            DETAILS_SELECT
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Full loan history for a book
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.book_id = $1 ORDER BY l.checkout_date DESC",
            DETAILS_SELECT
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// All loans
    pub async fn all(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} ORDER BY l.due_date",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Loans past their due date and not yet returned. Due today is on time.
    pub async fn overdue(&self, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.due_date < $1 AND NOT l.returned ORDER BY l.due_date",
            DETAILS_SELECT
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Loans due within the next week, today included
    pub async fn expiring(&self, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.due_date >= $1 AND l.due_date <= $1 + $2 ORDER BY l.due_date",
            DETAILS_SELECT
        ))
        .bind(today)
        .bind(loan::EXPIRING_WINDOW_DAYS as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Aggregate loan statistics
    pub async fn stats(&self, today: NaiveDate) -> AppResult<LoanStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as total,
                   COALESCE(AVG(due_date - checkout_date), 0)::float8 as average_duration,
                   COUNT(*) FILTER (WHERE due_date < $1 AND NOT returned) as overdue,
                   COUNT(*) FILTER (WHERE due_date >= $1) as current
            FROM loans
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(LoanStats {
            total: row.get("total"),
            average_duration_days: row.get("average_duration"),
            overdue: row.get("overdue"),
            current: row.get("current"),
        })
    }

    /// Loans needing attention: unusually long periods and overdue returns
    pub async fn alerts(&self, today: NaiveDate) -> AppResult<LoanAlerts> {
        let unusual = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.due_date - l.checkout_date > $1 ORDER BY l.checkout_date",
            DETAILS_SELECT
        ))
        .bind(loan::UNUSUAL_DURATION_DAYS as i32)
        .fetch_all(&self.pool)
        .await?;

        let overdue = self.overdue(today).await?;

        Ok(LoanAlerts {
            unusual_duration: unusual,
            overdue,
        })
    }

    /// Count all loans ever made by a member
    pub async fn count_for_member(&self, member_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE member_id = $1")
            .bind(member_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
