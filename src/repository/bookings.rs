//! Bookings repository: the booking lifecycle engine
//!
//! Pending/confirmed counters live on the course row and move together with
//! the booking's status change, inside a transaction with the course row
//! locked.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingStatus},
        course::Course,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT bk.id, bk.course_id, c.name as course_name,
           bk.member_id, m.name as member_name,
           bk.status, bk.booking_date
    FROM bookings bk
    JOIN courses c ON bk.course_id = c.id
    JOIN members m ON bk.member_id = m.id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Create a pending booking and bump the course's pending counter.
    ///
    /// Capacity is not enforced here; an over-capacity state only logs a
    /// warning until the business rule is confirmed.
    pub async fn create(
        &self,
        course_id: i32,
        member_id: i32,
        booking_date: NaiveDate,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id {} not found", course_id)))?;

        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (course_id, member_id, status, booking_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(member_id)
        .bind(BookingStatus::Pending)
        .bind(booking_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE courses SET nb_pending = nb_pending + 1 WHERE id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if course.nb_pending + 1 + course.nb_confirmed > course.capacity {
            tracing::warn!(
                course_id = course.id,
                capacity = course.capacity,
                "course booked beyond capacity"
            );
        }

        Ok(created)
    }

    /// Confirm a pending booking: one unit moves from pending to confirmed.
    pub async fn confirm(&self, booking_id: i32) -> AppResult<Booking> {
        self.transition(
            booking_id,
            BookingStatus::Confirmed,
            "UPDATE courses SET nb_pending = GREATEST(nb_pending - 1, 0), nb_confirmed = nb_confirmed + 1 WHERE id = $1",
        )
        .await
    }

    /// Reject a pending booking: the pending unit is released.
    pub async fn reject(&self, booking_id: i32) -> AppResult<Booking> {
        self.transition(
            booking_id,
            BookingStatus::Rejected,
            "UPDATE courses SET nb_pending = GREATEST(nb_pending - 1, 0) WHERE id = $1",
        )
        .await
    }

    async fn transition(
        &self,
        booking_id: i32,
        to: BookingStatus,
        course_update: &str,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let current =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(booking_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Booking with id {} not found", booking_id))
                })?;

        if current.status != BookingStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Booking {} is already {}",
                booking_id, current.status
            )));
        }

        // Lock the course row before touching its counters
        let course_exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
                .bind(current.course_id)
                .fetch_optional(&mut *tx)
                .await?;

        if course_exists.is_none() {
            return Err(AppError::NotFound(format!(
                "Course with id {} not found",
                current.course_id
            )));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(to)
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(course_update)
            .bind(current.course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// All bookings with course and member context
    pub async fn all(&self) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            "{} ORDER BY bk.booking_date DESC",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Bookings for a course
    pub async fn for_course(&self, course_id: i32) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            "{} WHERE bk.course_id = $1 ORDER BY bk.booking_date DESC",
            DETAILS_SELECT
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Bookings made by a member
    pub async fn for_member(&self, member_id: i32) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            "{} WHERE bk.member_id = $1 ORDER BY bk.booking_date DESC",
            DETAILS_SELECT
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// (course_id, name, capacity, nb_confirmed) rows for the fill-rate report
    pub async fn fill_rate_rows(&self) -> AppResult<Vec<(i32, String, i32, i32)>> {
        let rows = sqlx::query(
            "SELECT id, name, capacity, nb_confirmed FROM courses ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.get("id"),
                    r.get("name"),
                    r.get("capacity"),
                    r.get("nb_confirmed"),
                )
            })
            .collect())
    }
}
