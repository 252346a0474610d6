//! Cross-store statistics service

use crate::{
    api::stats::{CourseStatsOverview, StatsResponse},
    error::AppResult,
    models::member::Role,
    repository::Repository,
    services::{bookings::BookingsService, catalog::CatalogService, courses::CoursesService},
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One overview across catalog, courses, loans and membership
    pub async fn overview(&self) -> AppResult<StatsResponse> {
        let catalog = CatalogService::new(self.repository.clone()).overview().await?;

        let courses_service = CoursesService::new(self.repository.clone());
        let courses = CourseStatsOverview {
            total_views: courses_service.total_views().await?,
            most_viewed: courses_service.most_viewed(3).await?,
            fill_rates: BookingsService::new(self.repository.clone())
                .fill_rate_report()
                .await?,
        };

        let today = chrono::Utc::now().date_naive();
        let loans = self.repository.loans.stats(today).await?;

        let nb_members = self.repository.members.count_by_role(Role::Member).await?;

        Ok(StatsResponse {
            catalog,
            courses,
            loans,
            nb_members,
        })
    }
}
