//! Signup and signin.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use serde_json::Value;

use super::{ApiError, App, into_string, present};
use crate::request::Request;
use crate::response::Json;
use crate::store::StoreError;

#[derive(Deserialize)]
struct SignupBody {
    #[serde(default)]
    email: Option<Value>,
    #[serde(default)]
    password: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
}

#[derive(Deserialize)]
struct SigninBody {
    #[serde(default)]
    email: Option<Value>,
    #[serde(default)]
    password: Option<Value>,
}

/// Returned by both signup and signin.
#[derive(Debug, Serialize)]
pub(super) struct Session {
    jwt: String,
    name: String,
}

pub(super) async fn signup(app: Arc<App>, req: Request) -> Result<Json<Session>, ApiError> {
    const FAILED: &str = "Error creating user";

    let body: SignupBody = req.json().map_err(|e| ApiError::bad_request(FAILED).with_details(e))?;
    let (Some(email), Some(password), Some(name)) =
        (present(body.email), present(body.password), present(body.name))
    else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let (Some(email), Some(password), Some(name)) =
        (into_string(email), into_string(password), into_string(name))
    else {
        return Err(ApiError::bad_request(FAILED).with_details("email, password and name must be strings"));
    };

    let user = app.store.create_user(email, password, name).map_err(|e| match e {
        StoreError::DuplicateEmail => ApiError::bad_request("Email already registered"),
    })?;
    let jwt = app.auth.issue_token(&user.id)
        .map_err(|e| ApiError::bad_request(FAILED).with_details(e))?;

    Ok(Json(Session { jwt, name: user.name }))
}

pub(super) async fn signin(app: Arc<App>, req: Request) -> Result<Json<Session>, ApiError> {
    const FAILED: &str = "Error signing in";

    let body: SigninBody = req.json().map_err(|e| ApiError::bad_request(FAILED).with_details(e))?;
    let (Some(email), Some(password)) = (present(body.email), present(body.password)) else {
        return Err(ApiError::bad_request("Missing email or password"));
    };

    // A non-string credential can never equal a stored one.
    let user = match (email.as_str(), password.as_str()) {
        (Some(email), Some(password)) => {
            app.store.find_user_by_email(email).filter(|u| u.password == password)
        }
        _ => None,
    };
    let user = user.ok_or_else(|| {
        debug!("signin rejected");
        ApiError::forbidden("Invalid credentials")
    })?;
    let jwt = app.auth.issue_token(&user.id)
        .map_err(|e| ApiError::bad_request(FAILED).with_details(e))?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(Session { jwt, name: user.name }))
}
