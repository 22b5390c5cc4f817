//! REST API calls against the Klasstra backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call these helpers; they go through the shared [`HttpClient`] so
//! the bearer header is applied uniformly. A successful login writes the
//! session, and the session subscription installed at bootstrap moves the
//! token into the HTTP client.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::{ApiError, HttpClient};
use super::types::{NewUser, TokenResponse, User};
use crate::state::session::SessionStore;
use crate::util::jwt;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const USERS_ENDPOINT: &str = "/users/";
pub const CURRENT_USER_ENDPOINT: &str = "/users/me";

/// Backend minimum for new passwords.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Token plus the role read from its claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub role: String,
}

/// Extract the role claim from a login response.
///
/// # Errors
///
/// [`ApiError::Decode`] if the token payload is unreadable,
/// [`ApiError::MissingRole`] if it has no string `role` claim.
pub fn credentials_from_token(resp: TokenResponse) -> Result<Credentials, ApiError> {
    let claims = jwt::decode(&resp.access_token).map_err(|e| ApiError::Decode(e.to_string()))?;
    let role = claims
        .role()
        .filter(|r| !r.is_empty())
        .ok_or(ApiError::MissingRole)?
        .to_owned();
    Ok(Credentials {
        token: resp.access_token,
        role,
    })
}

/// Trim the username and require both fields.
///
/// # Errors
///
/// [`ApiError::InvalidInput`] with a user-facing message.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), ApiError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput("Enter your username and password.".to_owned()));
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Check a registration form before sending it.
///
/// # Errors
///
/// [`ApiError::InvalidInput`] naming the first problem found.
pub fn validate_new_user(user: &NewUser) -> Result<(), ApiError> {
    let required = [
        ("username", &user.username),
        ("first name", &user.first_name),
        ("last name", &user.last_name),
        ("email", &user.email),
        ("role", &user.role),
    ];
    if let Some((label, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(ApiError::InvalidInput(format!("Enter a {label}.")));
    }
    if !user.email.contains('@') {
        return Err(ApiError::InvalidInput("Enter a valid email address.".to_owned()));
    }
    if user.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

/// Log in with username (or email) and password, storing the session.
///
/// # Errors
///
/// Input, transport, status, or token errors; the session is untouched on
/// any error.
pub async fn login(
    http: &HttpClient,
    session: &SessionStore,
    username: &str,
    password: &str,
) -> Result<Credentials, ApiError> {
    let (username, password) = validate_login_input(username, password)?;
    let form = [
        ("username", username.as_str()),
        ("password", password.as_str()),
    ];
    let resp: TokenResponse = http.post_form(LOGIN_ENDPOINT, &form).await?;
    let creds = credentials_from_token(resp)?;
    session.login(&creds.token, &creds.role);
    Ok(creds)
}

/// Create an account via `POST /users/`.
///
/// # Errors
///
/// Validation, transport, or status errors.
pub async fn register(http: &HttpClient, user: &NewUser) -> Result<User, ApiError> {
    validate_new_user(user)?;
    http.post_json(USERS_ENDPOINT, user).await
}

/// Fetch the logged-in user via `GET /users/me`.
///
/// # Errors
///
/// Transport or status errors; 401 when the token is missing or expired.
pub async fn fetch_me(http: &HttpClient) -> Result<User, ApiError> {
    http.get_json(CURRENT_USER_ENDPOINT).await
}
