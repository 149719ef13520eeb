//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. [`Router::handle`] is the
//! single entry point for a buffered request: the server calls it for every
//! connection, tests call it directly.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Cors, trace, trailing_slash};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    cors: Option<Cors>,
    trim_trailing_slash: bool,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), cors: None, trim_trailing_slash: false }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and `req.param("name")` retrieves
    /// them. Static segments win over parameters, so `/api/v1/blog/bulk` and
    /// `/api/v1/blog/{id}` coexist.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting route; routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Answer preflights and decorate every response with `cors`.
    pub fn cors(mut self, cors: Cors) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Redirect `/path/` to `/path` when only the latter is routed.
    pub fn trim_trailing_slash(mut self) -> Self {
        self.trim_trailing_slash = true;
        self
    }

    /// Routes one request through the middleware chain and its handler.
    pub async fn handle(&self, req: Request) -> Response {
        let method = req.method();
        let path = req.path().to_owned();
        trace::instrument(method.as_str(), &path, self.dispatch(req)).await
    }

    /// Answers a request the server refused before it became a [`Request`]
    /// (unknown method, unreadable or oversized body). Still traced and still
    /// carries the CORS headers.
    pub(crate) async fn reject(&self, method: &str, path: &str, mut res: Response) -> Response {
        trace::instrument(method, path, async move {
            if let Some(cors) = &self.cors {
                cors.apply(&mut res);
            }
            res
        })
        .await
    }

    async fn dispatch(&self, mut req: Request) -> Response {
        if let Some(res) = self.cors.as_ref().and_then(|c| c.preflight(&req)) {
            return res;
        }

        // HEAD is answered by the GET route, minus the body.
        let head = req.method() == Method::Head;
        let found = self.lookup(req.method(), req.path())
            .or_else(|| if head { self.lookup(Method::Get, req.path()) } else { None });

        let mut res = match found {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req).await
            }
            None => self.unrouted(&req),
        };
        if head {
            res.body.clear();
        }

        if let Some(cors) = &self.cors {
            cors.apply(&mut res);
        }
        res
    }

    fn unrouted(&self, req: &Request) -> Response {
        if self.trim_trailing_slash {
            if let Some(redirect) = trailing_slash::redirect(req) {
                return redirect;
            }
        }
        not_found()
    }

    /// Finds the handler for `method` + `path`. Parameter values are
    /// percent-decoded; invalid UTF-8 is replaced rather than rejected.
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

pub(crate) fn not_found() -> Response {
    Response::builder()
        .status(Status::NotFound)
        .json(br#"{"error":"Not found"}"#.to_vec())
}

pub(crate) fn method_not_allowed() -> Response {
    Response::builder()
        .status(Status::MethodNotAllowed)
        .json(br#"{"error":"Method not allowed"}"#.to_vec())
}
