//! Course model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Course record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub program: String,
    pub teacher: String,
    pub weekday: String,
    pub nb_lessons: i32,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub min_enrollment: i32,
    /// Maximum enrollable members
    pub capacity: i32,
    pub price: Decimal,
    pub membership_fee: Decimal,
    /// Bookings awaiting approval
    pub nb_pending: i32,
    /// Approved enrollments
    pub nb_confirmed: i32,
    pub nb_views: i32,
}

impl Course {
    /// Places not yet taken by a pending reservation.
    pub fn remaining_places(&self) -> i32 {
        self.capacity - self.nb_pending
    }
}

/// Create course request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourse {
    pub name: String,
    pub program: String,
    pub teacher: String,
    pub weekday: String,
    pub nb_lessons: i32,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub min_enrollment: i32,
    pub capacity: i32,
    pub price: Decimal,
    pub membership_fee: Decimal,
}

/// Update course request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourse {
    pub name: String,
    pub program: String,
    pub teacher: String,
    pub weekday: String,
    pub nb_lessons: i32,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub min_enrollment: i32,
    pub capacity: i32,
    pub price: Decimal,
    pub membership_fee: Decimal,
}

/// Course list entry with remaining places
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub remaining_places: i32,
}

/// Fill rate report entry for a course
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseFillRate {
    pub course_id: i32,
    pub name: String,
    pub capacity: i32,
    pub nb_confirmed: i32,
    /// confirmed / capacity * 100, rounded to 2 decimals
    pub fill_rate: f64,
}
