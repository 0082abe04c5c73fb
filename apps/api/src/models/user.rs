use serde::Serialize;

/// A registered user. The password is an opaque string and is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    // Stored as given; no login flow reads it yet.
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
