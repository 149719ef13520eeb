//! Listing, fetching and creating blog posts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use serde_json::Value;

use super::{ApiError, App, into_string, present};
use crate::request::Request;
use crate::response::{Json, Response};
use crate::store::Blog;

#[derive(Deserialize)]
struct CreateBody {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Serialize)]
pub(super) struct BlogList {
    blogs: Vec<Blog>,
}

#[derive(Serialize)]
pub(super) struct Post {
    post: Blog,
}

#[derive(Serialize)]
pub(super) struct Created {
    id: u64,
    success: bool,
}

/// `GET /api/blogs`: `{"blogs": [...]}`.
pub(super) async fn list_wrapped(app: Arc<App>, _req: Request) -> Result<Response, ApiError> {
    listing(&BlogList { blogs: app.store.list_published_blogs() })
}

/// `GET /api/v1/blog/bulk`: the bare array.
pub(super) async fn list_bulk(app: Arc<App>, _req: Request) -> Result<Response, ApiError> {
    listing(&app.store.list_published_blogs())
}

fn listing<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    serde_json::to_vec(value)
        .map(Response::json)
        .map_err(|e| ApiError::internal("Error fetching blogs").with_details(e))
}

pub(super) async fn get(app: Arc<App>, req: Request) -> Result<Json<Post>, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    let id = parse_leading_int(raw).ok_or_else(|| ApiError::bad_request("Invalid blog ID"))?;
    debug!(raw, "fetching blog");

    u64::try_from(id).ok()
        .and_then(|id| app.store.get_blog_by_id(id))
        .map(|post| Json(Post { post }))
        .ok_or_else(|| ApiError::not_found("Blog not found"))
}

/// Requires a session token; the author is whoever the token names.
pub(super) async fn create(app: Arc<App>, req: Request) -> Result<Json<Created>, ApiError> {
    let claims = app.authenticate(&req)?;

    let body: CreateBody = req.json()
        .map_err(|e| ApiError::internal("Error creating blog").with_details(e))?;
    let (Some(title), Some(content)) = (present(body.title), present(body.content)) else {
        return Err(ApiError::bad_request("Missing title or content"));
    };
    let (Some(title), Some(content)) = (into_string(title), into_string(content)) else {
        return Err(ApiError::bad_request("Title and content must be strings"));
    };

    let blog = app.store.create_blog(title, content, claims.id);
    Ok(Json(Created { id: blog.id, success: true }))
}

/// Reads an optionally signed integer from the start of `raw`, after leading
/// whitespace, ignoring whatever follows the digits. `None` if there are no
/// digits. Values beyond `i128` saturate, which no blog id can match.
fn parse_leading_int(raw: &str) -> Option<i128> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].parse::<i128>().unwrap_or(i128::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
