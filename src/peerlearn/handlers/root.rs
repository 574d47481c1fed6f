use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Landing {
    name: &'static str,
    tagline: &'static str,
    version: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page context", body = Landing)
    ),
    tag = "pages"
)]
pub async fn root() -> impl IntoResponse {
    Json(Landing {
        name: env!("CARGO_PKG_NAME"),
        tagline: "Join thousands of students learning together",
        version: env!("CARGO_PKG_VERSION"),
    })
}
