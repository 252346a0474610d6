//! Courses repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::course::{Course, CreateCourse, UpdateCourse},
};

#[derive(Clone)]
pub struct CoursesRepository {
    pool: Pool<Postgres>,
}

impl CoursesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get course by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Course> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id {} not found", id)))
    }

    /// List all courses
    pub async fn list(&self) -> AppResult<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(courses)
    }

    /// Create a course. The name is unique.
    pub async fn create(&self, course: &CreateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (
                name, program, teacher, weekday, nb_lessons, notes, start_date,
                min_enrollment, capacity, price, membership_fee,
                nb_pending, nb_confirmed, nb_views
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, 0, 0)
            RETURNING *
            "#,
        )
        .bind(&course.name)
        .bind(&course.program)
        .bind(&course.teacher)
        .bind(&course.weekday)
        .bind(course.nb_lessons)
        .bind(&course.notes)
        .bind(course.start_date)
        .bind(course.min_enrollment)
        .bind(course.capacity)
        .bind(course.price)
        .bind(course.membership_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, &format!("Course '{}' already exists", course.name))
        })
    }

    /// Update a course
    pub async fn update(&self, id: i32, course: &UpdateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET
                name = $1, program = $2, teacher = $3, weekday = $4,
                nb_lessons = $5, notes = $6, start_date = $7,
                min_enrollment = $8, capacity = $9, price = $10, membership_fee = $11
            WHERE id = $12
            RETURNING *
            "#,
        )
        .bind(&course.name)
        .bind(&course.program)
        .bind(&course.teacher)
        .bind(&course.weekday)
        .bind(course.nb_lessons)
        .bind(&course.notes)
        .bind(course.start_date)
        .bind(course.min_enrollment)
        .bind(course.capacity)
        .bind(course.price)
        .bind(course.membership_fee)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, &format!("Course '{}' already exists", course.name))
        })?
        .ok_or_else(|| AppError::NotFound(format!("Course with id {} not found", id)))
    }

    /// Delete a course
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Record a view; returns the new counter
    pub async fn record_view(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE courses SET nb_views = nb_views + 1 WHERE id = $1 RETURNING nb_views",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course with id {} not found", id)))
    }

    /// Total course views
    pub async fn total_views(&self) -> AppResult<i64> {
        let total: i64 =
            sqlx::query("SELECT COALESCE(SUM(nb_views), 0)::bigint as total FROM courses")
                .fetch_one(&self.pool)
                .await?
                .get("total");
        Ok(total)
    }

    /// Most viewed courses
    pub async fn most_viewed(&self, limit: i64) -> AppResult<Vec<Course>> {
        let courses =
            sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY nb_views DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(courses)
    }
}
