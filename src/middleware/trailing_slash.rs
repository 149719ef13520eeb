//! Trailing-slash redirects.

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// For an unrouted GET/HEAD on `/some/path/`, returns a 301 to `/some/path`.
///
/// The root path is never rewritten; the query string is carried over.
pub(crate) fn redirect(req: &Request) -> Option<Response> {
    if !matches!(req.method(), Method::Get | Method::Head) {
        return None;
    }

    let path = req.path();
    if path == "/" {
        return None;
    }
    let trimmed = path.strip_suffix('/')?;

    let location = match req.query() {
        Some(q) => format!("{trimmed}?{q}"),
        None => trimmed.to_owned(),
    };
    Some(
        Response::builder()
            .status(Status::MovedPermanently)
            .header("location", &location)
            .no_body(),
    )
}
