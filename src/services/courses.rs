//! Courses service

use crate::{
    error::{AppError, AppResult},
    models::course::{Course, CourseSummary, CreateCourse, UpdateCourse},
    repository::Repository,
};

#[derive(Clone)]
pub struct CoursesService {
    repository: Repository,
}

impl CoursesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Course> {
        self.repository.courses.get_by_id(id).await
    }

    /// All courses with their remaining places
    pub async fn list(&self) -> AppResult<Vec<CourseSummary>> {
        let courses = self.repository.courses.list().await?;

        Ok(courses
            .into_iter()
            .map(|course| {
                let remaining_places = course.remaining_places();
                CourseSummary {
                    course,
                    remaining_places,
                }
            })
            .collect())
    }

    pub async fn create(&self, course: CreateCourse) -> AppResult<Course> {
        if course.capacity < 0 {
            return Err(AppError::Validation(
                "Capacity cannot be negative".to_string(),
            ));
        }
        self.repository.courses.create(&course).await
    }

    pub async fn update(&self, id: i32, course: UpdateCourse) -> AppResult<Course> {
        if course.capacity < 0 {
            return Err(AppError::Validation(
                "Capacity cannot be negative".to_string(),
            ));
        }
        self.repository.courses.update(id, &course).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.courses.delete(id).await
    }

    /// Record a view; returns the new counter
    pub async fn record_view(&self, id: i32) -> AppResult<i32> {
        self.repository.courses.record_view(id).await
    }

    pub async fn total_views(&self) -> AppResult<i64> {
        self.repository.courses.total_views().await
    }

    pub async fn most_viewed(&self, limit: i64) -> AppResult<Vec<Course>> {
        self.repository.courses.most_viewed(limit).await
    }
}
