//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod messages_test;
mod posts_test;

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use boosty::backend::routes::create_router;

use crate::common::{auth_header, TestDatabase};

/// Serve the full router over the fixture's database
pub fn create_test_server(db: &TestDatabase) -> TestServer {
    TestServer::new(create_router(db.state())).expect("Failed to start test server")
}

/// `Authorization: Bearer <token>`
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&auth_header(token)).expect("invalid header value");
    (header::AUTHORIZATION, value)
}
