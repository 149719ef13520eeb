use std::sync::Arc;

use scribble::api::{self, App};
use scribble::config::Config;
use scribble::fixtures::{LEGACY_FRONTEND_TOKEN, TEST_USER_EMAIL, TEST_USER_PASSWORD};
use scribble::{Method, Request, Response, Router};
use serde_json::{Value, json};

struct Harness {
    app: Arc<App>,
    router: Router,
}

impl Harness {
    fn seeded() -> Self {
        Self::with_config(Config { jwt_secret: "test-secret".into(), ..Config::default() })
    }

    fn empty() -> Self {
        Self::with_config(Config {
            jwt_secret: "test-secret".into(),
            seed_fixtures: false,
            ..Config::default()
        })
    }

    fn with_config(config: Config) -> Self {
        let app = Arc::new(App::new(config).unwrap());
        let router = api::routes(Arc::clone(&app));
        Self { app, router }
    }

    async fn send(&self, req: Request) -> (u16, Value) {
        let res = self.router.handle(req).await;
        (res.status_code(), body_json(&res))
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        self.send(Request::new(Method::Get, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        self.send(json_request(path, &body)).await
    }

    async fn post_authed(&self, path: &str, auth: &str, body: Value) -> (u16, Value) {
        self.send(json_request(path, &body).with_header("Authorization", auth)).await
    }

    async fn signup(&self, email: &str, password: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/signup", json!({ "email": email, "password": password, "name": name }))
            .await;
        assert_eq!(status, 200, "{body}");
        body["jwt"].as_str().unwrap().to_owned()
    }
}

fn json_request(path: &str, body: &Value) -> Request {
    Request::new(Method::Post, path)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_vec(body).unwrap())
}

fn body_json(res: &Response) -> Value {
    if res.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(res.body()).unwrap()
    }
}

// ── Signup / signin ───────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_returns_token_for_the_new_user() {
    let h = Harness::seeded();
    let (status, body) = h
        .post("/api/signup", json!({ "email": "a@b.com", "password": "p", "name": "A" }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["name"], "A");
    let claims = h.app.auth.verify_token(body["jwt"].as_str().unwrap()).unwrap();
    assert_eq!(claims.id, "user_2");
    assert_eq!(h.app.store.find_user_by_id("user_2").unwrap().email, "a@b.com");
}

#[tokio::test]
async fn signup_on_either_path_alias() {
    let h = Harness::empty();
    let (status, _) = h
        .post("/api/v1/user/signup", json!({ "email": "a@b.com", "password": "p", "name": "A" }))
        .await;
    assert_eq!(status, 200);
    assert!(h.app.store.find_user_by_email("a@b.com").is_some());
}

#[tokio::test]
async fn signup_with_used_email_is_rejected_whatever_the_other_fields() {
    let h = Harness::seeded();
    for body in [
        json!({ "email": TEST_USER_EMAIL, "password": TEST_USER_PASSWORD, "name": "Test User" }),
        json!({ "email": TEST_USER_EMAIL, "password": "different", "name": "Someone" }),
    ] {
        let (status, body) = h.post("/api/signup", body).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Email already registered");
    }
}

#[tokio::test]
async fn signup_requires_every_field() {
    let h = Harness::empty();
    for body in [
        json!({ "email": "a@b.com", "password": "p" }),
        json!({ "email": "", "password": "p", "name": "A" }),
        json!({ "email": "a@b.com", "password": null, "name": "A" }),
    ] {
        let (status, body) = h.post("/api/signup", body).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Missing required fields");
    }
    assert_eq!(h.app.store.snapshot().user_count, 0);
}

#[tokio::test]
async fn signup_with_non_string_field_is_rejected() {
    let h = Harness::empty();
    let (status, body) = h
        .post("/api/signup", json!({ "email": "a@b.com", "password": 123, "name": "A" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Error creating user");
    assert_eq!(h.app.store.snapshot().user_count, 0);
}

#[tokio::test]
async fn signup_with_unreadable_body_reports_details() {
    let h = Harness::empty();
    let req = Request::new(Method::Post, "/api/signup").with_body("{not json");
    let (status, body) = h.send(req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Error creating user");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn signin_succeeds_only_on_exact_credentials() {
    let h = Harness::seeded();

    let (status, body) = h
        .post("/api/signin", json!({ "email": TEST_USER_EMAIL, "password": TEST_USER_PASSWORD }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Test User");
    let claims = h.app.auth.verify_token(body["jwt"].as_str().unwrap()).unwrap();
    assert_eq!(claims.id, "user_1");

    for (email, password) in [
        (TEST_USER_EMAIL, "wrong"),
        ("TEST@example.com", TEST_USER_PASSWORD),
        ("nobody@example.com", TEST_USER_PASSWORD),
    ] {
        let (status, body) = h
            .post("/api/v1/user/signin", json!({ "email": email, "password": password }))
            .await;
        assert_eq!(status, 403);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn signin_requires_email_and_password() {
    let h = Harness::seeded();
    let (status, body) = h.post("/api/signin", json!({ "email": TEST_USER_EMAIL })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing email or password");

    let (status, _) = h
        .post("/api/signin", json!({ "email": TEST_USER_EMAIL, "password": 0 }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn signin_with_non_string_password_is_invalid_credentials() {
    let h = Harness::seeded();
    let (status, body) = h
        .post("/api/signin", json!({ "email": TEST_USER_EMAIL, "password": 123 }))
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Invalid credentials");
}

// ── Blogs ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_shapes_differ_by_path() {
    let h = Harness::seeded();

    let (status, bulk) = h.get("/api/v1/blog/bulk").await;
    assert_eq!(status, 200);
    assert_eq!(bulk.as_array().unwrap().len(), 2);

    let (status, wrapped) = h.get("/api/blogs").await;
    assert_eq!(status, 200);
    assert_eq!(wrapped["blogs"], bulk);

    let first = &bulk[0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["title"], "Getting Started with Scribble");
    assert_eq!(first["authorId"], "user_1");
    assert_eq!(first["published"], true);
    assert_eq!(first["author"]["name"], "Test User");
}

#[tokio::test]
async fn created_blogs_are_listed_in_creation_order() {
    let h = Harness::empty();
    let jwt = h.signup("a@b.com", "p", "A").await;

    for n in 1..=3 {
        let (status, body) = h
            .post_authed("/api/v1/blog", &jwt, json!({ "title": format!("T{n}"), "content": "C" }))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "id": n, "success": true }));
    }

    let (_, bulk) = h.get("/api/v1/blog/bulk").await;
    let titles: Vec<&str> = bulk.as_array().unwrap().iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["T1", "T2", "T3"]);
    assert!(bulk.as_array().unwrap().iter().all(|b| b["author"]["name"] == "A"));
}

#[tokio::test]
async fn create_then_fetch_continues_after_seeded_ids() {
    let h = Harness::seeded();
    let jwt = h.signup("a@b.com", "p", "A").await;

    let (status, body) = h
        .post_authed("/api/v1/blog", &format!("Bearer {jwt}"), json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "id": 3, "success": true }));

    let (status, body) = h.get("/api/v1/blog/3").await;
    assert_eq!(status, 200);
    assert_eq!(body["post"]["id"], 3);
    assert_eq!(body["post"]["title"], "T");
    assert_eq!(body["post"]["content"], "C");
    assert_eq!(body["post"]["authorId"], "user_2");
    assert_eq!(body["post"]["author"]["name"], "A");
}

#[tokio::test]
async fn create_on_legacy_path() {
    let h = Harness::seeded();
    let jwt = h.signup("a@b.com", "p", "A").await;
    let (status, body) = h
        .post_authed("/api/blog", &jwt, json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn create_without_valid_token_is_401_and_writes_nothing() {
    let h = Harness::seeded();
    let body = json!({ "title": "T", "content": "C" });

    let (status, res) = h.post("/api/v1/blog", body.clone()).await;
    assert_eq!(status, 401);
    assert_eq!(res["error"], "Unauthorized - No auth header");

    let other_secret = Harness::with_config(Config {
        jwt_secret: "another-secret".into(),
        seed_fixtures: false,
        ..Config::default()
    });
    let foreign = other_secret.signup("x@y.com", "p", "X").await;

    for auth in ["Bearer garbage", "garbage", "Bearer ", foreign.as_str()] {
        let (status, res) = h.post_authed("/api/v1/blog", auth, body.clone()).await;
        assert_eq!(status, 401, "{auth}");
        assert_eq!(res["error"], "Invalid token");
    }

    assert_eq!(h.app.store.snapshot().blog_count, 2);
}

#[tokio::test]
async fn create_requires_title_and_content() {
    let h = Harness::seeded();
    let jwt = h.signup("a@b.com", "p", "A").await;

    let (status, body) = h.post_authed("/api/v1/blog", &jwt, json!({ "title": "T" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing title or content");

    let req = Request::new(Method::Post, "/api/v1/blog")
        .with_header("Authorization", jwt.as_str())
        .with_body("nope");
    let (status, body) = h.send(req).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Error creating blog");

    assert_eq!(h.app.store.snapshot().blog_count, 2);
}

#[tokio::test]
async fn create_rejects_non_string_title_or_content() {
    let h = Harness::seeded();
    let jwt = h.signup("a@b.com", "p", "A").await;

    for body in [
        json!({ "title": "T", "content": 42 }),
        json!({ "title": ["T"], "content": "C" }),
    ] {
        let (status, body) = h.post_authed("/api/v1/blog", &jwt, body).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Title and content must be strings");
    }
    assert_eq!(h.app.store.snapshot().blog_count, 2);
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let h = Harness::seeded();
    let req = Request::new(Method::Post, "/api/v1/blog").with_body("nope");
    let (status, _) = h.send(req).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn legacy_frontend_token_posts_as_the_test_user() {
    let h = Harness::seeded();
    let (status, body) = h
        .post_authed(
            "/api/v1/blog",
            &format!("Bearer {LEGACY_FRONTEND_TOKEN}"),
            json!({ "title": "T", "content": "C" }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, post) = h.get(&format!("/api/v1/blog/{}", body["id"])).await;
    assert_eq!(post["post"]["authorId"], "user_1");
    assert_eq!(post["post"]["author"]["name"], "Test User");
}

#[tokio::test]
async fn legacy_frontend_token_is_refused_without_fixtures() {
    let h = Harness::empty();
    let (status, _) = h
        .post_authed("/api/v1/blog", LEGACY_FRONTEND_TOKEN, json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn token_for_unknown_user_still_creates_with_unknown_author() {
    let h = Harness::seeded();
    let jwt = h.app.auth.issue_token("user_99").unwrap();
    let (status, body) = h
        .post_authed("/api/v1/blog", &jwt, json!({ "title": "T", "content": "C" }))
        .await;
    assert_eq!(status, 200);

    let (_, post) = h.get(&format!("/api/v1/blog/{}", body["id"])).await;
    assert_eq!(post["post"]["author"]["name"], "Unknown");
}

#[tokio::test]
async fn fetch_by_id_errors() {
    let h = Harness::seeded();

    let (status, body) = h.get("/api/v1/blog/999").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Blog not found");

    let (status, _) = h.get("/api/v1/blog/-1").await;
    assert_eq!(status, 404);

    let (status, body) = h.get("/api/v1/blog/abc").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid blog ID");

    let (status, body) = h.get("/api/v1/blog/2x").await;
    assert_eq!(status, 200);
    assert_eq!(body["post"]["id"], 2);
}

#[tokio::test]
async fn fetch_by_percent_encoded_id() {
    let h = Harness::seeded();
    let (status, body) = h.get("/api/v1/blog/%32").await;
    assert_eq!(status, 200);
    assert_eq!(body["post"]["id"], 2);
}

// ── Supplementary endpoints and middleware ────────────────────────────────────

#[tokio::test]
async fn status_and_health_endpoints() {
    let h = Harness::empty();
    assert_eq!(
        h.get("/").await,
        (200, json!({ "status": "ok", "message": "Scribble API is running" })),
    );
    assert_eq!(h.get("/healthz").await.0, 200);
    assert_eq!(h.get("/readyz").await.1["status"], "ready");
}

#[tokio::test]
async fn debug_dump_lists_seeded_data() {
    let h = Harness::seeded();
    let (status, body) = h.get("/debug").await;
    assert_eq!(status, 200);
    assert_eq!(body["hasJwtPassword"], false);
    assert_eq!(body["userCount"], 1);
    assert_eq!(body["blogCount"], 2);
    assert_eq!(body["testData"]["users"][0]["email"], TEST_USER_EMAIL);
    assert_eq!(body["testData"]["blogs"][1]["title"], "Advanced Scribble Techniques");
}

#[tokio::test]
async fn responses_carry_open_cors_headers() {
    let h = Harness::seeded();
    let res = h.router.handle(Request::new(Method::Get, "/api/blogs")).await;
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    assert_eq!(res.header("access-control-allow-credentials"), Some("true"));

    let res = h.router.handle(Request::new(Method::Options, "/api/v1/blog")).await;
    assert_eq!(res.status_code(), 204);
    assert_eq!(res.header("access-control-allow-headers"), Some("Content-Type, Authorization"));
}

#[tokio::test]
async fn trailing_slash_redirects_to_the_routed_path() {
    let h = Harness::seeded();
    let res = h.router.handle(Request::new(Method::Get, "/api/blogs/")).await;
    assert_eq!(res.status_code(), 301);
    assert_eq!(res.header("location"), Some("/api/blogs"));
}

#[tokio::test]
async fn head_answers_like_get_without_a_body() {
    let h = Harness::seeded();
    let res = h.router.handle(Request::new(Method::Head, "/api/blogs")).await;
    assert_eq!(res.status_code(), 200);
    assert!(res.body().is_empty());
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let h = Harness::seeded();
    let (status, body) = h.get("/api/nothing").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not found");
}
