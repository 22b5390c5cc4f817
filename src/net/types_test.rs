use super::*;
use serde_json::json;

#[test]
fn token_response_parses_login_body() {
    let resp: TokenResponse =
        serde_json::from_value(json!({"access_token": "abc", "token_type": "bearer"})).unwrap();
    assert_eq!(resp.access_token, "abc");
    assert_eq!(resp.token_type, "bearer");
}

#[test]
fn token_response_defaults_token_type() {
    let resp: TokenResponse = serde_json::from_value(json!({"access_token": "abc"})).unwrap();
    assert_eq!(resp.token_type, "bearer");
}

#[test]
fn user_parses_with_and_without_timestamps() {
    let body = json!({
        "id": 3,
        "username": "jdoe",
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane@example.com",
        "role": "parent",
        "created_at": "2024-09-01T08:00:00"
    });
    let user: User = serde_json::from_value(body).unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.created_at.as_deref(), Some("2024-09-01T08:00:00"));
    assert_eq!(user.updated_at, None);
}

#[test]
fn new_user_serializes_backend_field_names() {
    let user = NewUser {
        username: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        role: "parent".into(),
        password: "correct horse".into(),
    };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["first_name"], "Jane");
    assert_eq!(value["role"], "parent");
    assert_eq!(value.as_object().map(serde_json::Map::len), Some(6));
}

#[test]
fn display_name_falls_back_to_username() {
    let mut user = User {
        id: 1,
        username: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        role: "parent".into(),
        created_at: None,
        updated_at: None,
    };
    assert_eq!(user.display_name(), "Jane Doe");
    user.first_name = " ".into();
    user.last_name = String::new();
    assert_eq!(user.display_name(), "jdoe");
}
