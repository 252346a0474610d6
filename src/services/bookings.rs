//! Booking lifecycle service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingDetails},
        course::CourseFillRate,
    },
    repository::Repository,
};

/// Percentage of capacity taken by confirmed enrollments, rounded to two
/// decimals. A course with no capacity reports 0 rather than dividing by it.
pub fn fill_rate(nb_confirmed: i32, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    (nb_confirmed as f64 / capacity as f64 * 10000.0).round() / 100.0
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a pending booking for a member
    pub async fn create(&self, course_id: i32, member_id: i32) -> AppResult<Booking> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;

        let booking = self
            .repository
            .bookings
            .create(course_id, member_id, Utc::now().date_naive())
            .await?;

        tracing::info!(
            booking_id = booking.id,
            course_id,
            member_id,
            "booking created"
        );

        Ok(booking)
    }

    /// Confirm a pending booking
    pub async fn confirm(&self, booking_id: i32) -> AppResult<Booking> {
        self.repository.bookings.confirm(booking_id).await
    }

    /// Reject a pending booking
    pub async fn reject(&self, booking_id: i32) -> AppResult<Booking> {
        self.repository.bookings.reject(booking_id).await
    }

    /// All bookings
    pub async fn list(&self) -> AppResult<Vec<BookingDetails>> {
        self.repository.bookings.all().await
    }

    /// Bookings for a course
    pub async fn for_course(&self, course_id: i32) -> AppResult<Vec<BookingDetails>> {
        self.repository.courses.get_by_id(course_id).await?;
        self.repository.bookings.for_course(course_id).await
    }

    /// Bookings made by a member
    pub async fn for_member(&self, member_id: i32) -> AppResult<Vec<BookingDetails>> {
        self.repository.members.get_by_id(member_id).await?;
        self.repository.bookings.for_member(member_id).await
    }

    /// Fill rate of every course
    pub async fn fill_rate_report(&self) -> AppResult<Vec<CourseFillRate>> {
        let rows = self.repository.bookings.fill_rate_rows().await?;

        Ok(rows
            .into_iter()
            .map(|(course_id, name, capacity, nb_confirmed)| CourseFillRate {
                course_id,
                name,
                capacity,
                nb_confirmed,
                fill_rate: fill_rate(nb_confirmed, capacity),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rate() {
        assert_eq!(fill_rate(5, 20), 25.00);
        assert_eq!(fill_rate(0, 20), 0.0);
        assert_eq!(fill_rate(20, 20), 100.0);
    }

    #[test]
    fn test_fill_rate_rounds_to_two_decimals() {
        assert_eq!(fill_rate(1, 3), 33.33);
        assert_eq!(fill_rate(2, 3), 66.67);
    }

    #[test]
    fn test_fill_rate_zero_capacity() {
        assert_eq!(fill_rate(5, 0), 0.0);
        assert_eq!(fill_rate(0, 0), 0.0);
    }
}
