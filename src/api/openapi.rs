//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, books, courses, feedback, health, loans, members, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "Library & Course Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::change_password,
        auth::change_email,
        auth::change_phone,
        // Books
        books::list_books,
        books::get_book,
        books::suggest_titles,
        books::featured_book,
        books::list_genres,
        books::rename_genre,
        books::related_books,
        books::record_download,
        books::book_stats,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Courses
        courses::list_courses,
        courses::get_course,
        courses::fill_rates,
        courses::record_view,
        courses::create_course,
        courses::update_course,
        courses::delete_course,
        // Members
        members::list_members,
        members::get_member,
        members::update_member,
        members::delete_member,
        // Loans
        loans::checkout,
        loans::extend_loan,
        loans::terminate_loan,
        loans::delete_loan,
        loans::list_loans,
        loans::overdue_loans,
        loans::expiring_loans,
        loans::loan_stats,
        loans::loan_alerts,
        loans::member_loans,
        loans::member_loan_history,
        loans::book_loan_history,
        // Bookings
        bookings::create_booking,
        bookings::confirm_booking,
        bookings::reject_booking,
        bookings::list_bookings,
        bookings::course_bookings,
        bookings::member_bookings,
        // Feedback
        feedback::create_review,
        feedback::update_review,
        feedback::book_reviews,
        feedback::create_course_rating,
        feedback::course_ratings,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::MemberInfo,
            auth::ChangePasswordRequest,
            auth::ChangeEmailRequest,
            auth::ChangePhoneRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::GenreCount,
            crate::models::book::CatalogStats,
            crate::models::book::BookStats,
            crate::models::book::RatingBucket,
            crate::models::book::MonthlyCount,
            books::RenameGenreRequest,
            books::RenameGenreResponse,
            books::RelatedResponse,
            books::DownloadResponse,
            // Courses
            crate::models::course::Course,
            crate::models::course::CreateCourse,
            crate::models::course::UpdateCourse,
            crate::models::course::CourseSummary,
            crate::models::course::CourseFillRate,
            courses::ViewResponse,
            // Members
            crate::models::member::Member,
            crate::models::member::MemberSummary,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            crate::models::member::Role,
            members::MemberProfile,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanWithRemaining,
            crate::models::loan::CreateLoan,
            crate::models::loan::LoanStats,
            crate::models::loan::LoanAlerts,
            loans::CheckoutResponse,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingStatus,
            crate::models::booking::CreateBooking,
            // Feedback
            crate::models::feedback::Review,
            crate::models::feedback::CourseRating,
            crate::models::feedback::CreateReview,
            crate::models::feedback::UpdateReview,
            crate::models::feedback::CreateCourseRating,
            // Stats
            stats::StatsResponse,
            stats::CourseStatsOverview,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication and profile"),
        (name = "books", description = "Catalog management"),
        (name = "courses", description = "Course management"),
        (name = "members", description = "Membership management"),
        (name = "loans", description = "Loan lifecycle"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "feedback", description = "Reviews and ratings"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
