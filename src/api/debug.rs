//! `GET /debug`: what the process currently holds.
//!
//! Exposes user emails. Meant for the demo deployment only.

use std::sync::Arc;

use serde::Serialize;

use super::App;
use crate::request::Request;
use crate::response::Json;
use crate::store::{BlogSummary, UserSummary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Dump {
    has_jwt_password: bool,
    user_count: usize,
    blog_count: usize,
    test_data: TestData,
}

#[derive(Serialize)]
pub(super) struct TestData {
    users: Vec<UserSummary>,
    blogs: Vec<BlogSummary>,
}

pub(super) async fn dump(app: Arc<App>, _req: Request) -> Json<Dump> {
    let snapshot = app.store.snapshot();
    Json(Dump {
        has_jwt_password: app.config.jwt_secret_configured,
        user_count: snapshot.user_count,
        blog_count: snapshot.blog_count,
        test_data: TestData { users: snapshot.users, blogs: snapshot.blogs },
    })
}
