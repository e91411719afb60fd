// HTTP surface for the review service. All submodules use axum/tower-http.

pub mod routes;
pub mod server;
