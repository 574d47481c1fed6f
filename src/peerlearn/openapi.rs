use utoipa::OpenApi;

use super::handlers::{auth, dashboard, health, pages, root};
use crate::platform::schema;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        auth::login_page,
        auth::signup_page,
        auth::signup,
        auth::oauth,
        auth::logout,
        dashboard::dashboard,
        pages::profile,
        pages::study_rooms,
        pages::notes,
        pages::quizzes,
    ),
    components(schemas(
        auth::LoginPage,
        auth::SignupPage,
        auth::SignupRequest,
        auth::SignupResponse,
        dashboard::DashboardContext,
        dashboard::DashboardStats,
        dashboard::UserSummary,
        health::Health,
        pages::NotesPage,
        pages::QuizzesPage,
        pages::StudyRoomsPage,
        root::Landing,
        schema::NewProfile,
        schema::Note,
        schema::Profile,
        schema::RoomStatus,
        schema::RoomType,
        schema::StudyRoom,
    )),
    tags(
        (name = "pages", description = "Landing and authenticated page contexts"),
        (name = "auth", description = "Signup, OAuth and logout"),
        (name = "health", description = "Service and dependency health"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
