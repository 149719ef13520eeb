//! Cross-origin resource sharing.

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// CORS policy applied by the router.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_origin: String,
    allow_methods: Vec<Method>,
    allow_headers: Vec<String>,
    expose_headers: Vec<String>,
    max_age_secs: u32,
    allow_credentials: bool,
}

impl Cors {
    /// Any origin, credentials allowed. The policy the API ships with.
    pub fn permissive() -> Self {
        Self {
            allow_origin: "*".to_owned(),
            allow_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options],
            allow_headers: vec!["Content-Type".to_owned(), "Authorization".to_owned()],
            expose_headers: vec!["Content-Length".to_owned(), "X-Kuma-Revision".to_owned()],
            max_age_secs: 600,
            allow_credentials: true,
        }
    }

    /// Answers an `OPTIONS` request directly with `204 No Content`.
    /// Returns `None` for every other method.
    pub(crate) fn preflight(&self, req: &Request) -> Option<Response> {
        if req.method() != Method::Options {
            return None;
        }

        let methods = self.allow_methods.iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder = Response::builder()
            .status(Status::NoContent)
            .header("access-control-allow-origin", &self.allow_origin)
            .header("access-control-max-age", &self.max_age_secs.to_string())
            .header("access-control-allow-methods", &methods)
            .header("access-control-allow-headers", &self.allow_headers.join(", "));
        if self.allow_credentials {
            builder = builder.header("access-control-allow-credentials", "true");
        }
        if !self.expose_headers.is_empty() {
            builder = builder.header("access-control-expose-headers", &self.expose_headers.join(", "));
        }
        Some(builder.no_body())
    }

    /// Adds the CORS headers to an ordinary response.
    pub(crate) fn apply(&self, res: &mut Response) {
        res.insert_header("access-control-allow-origin", &self.allow_origin);
        if self.allow_credentials {
            res.insert_header("access-control-allow-credentials", "true");
        }
        if !self.expose_headers.is_empty() {
            res.insert_header("access-control-expose-headers", &self.expose_headers.join(", "));
        }
    }
}
