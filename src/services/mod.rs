//! Business logic services

pub mod bookings;
pub mod catalog;
pub mod courses;
pub mod feedback;
pub mod loans;
pub mod members;
pub mod stats;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub members: members::MembersService,
    pub catalog: catalog::CatalogService,
    pub courses: courses::CoursesService,
    pub loans: loans::LoansService,
    pub bookings: bookings::BookingsService,
    pub feedback: feedback::FeedbackService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            members: members::MembersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            courses: courses::CoursesService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            feedback: feedback::FeedbackService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
