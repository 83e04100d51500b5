use serde::{Deserialize, Serialize};

/// Account record owned by the identity service. The frontend holds a cached,
/// read-mostly copy for the session lifetime; `role` stays a free string on
/// the wire and is parsed into [`super::Role`] only at routing boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Body of `POST /auth/login` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Response shape of `GET/PUT /users/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub profile: Profile,
}

/// Partial update body for `PUT /users/profile`. Only provided fields are
/// serialized; email and role cannot be changed through this surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// The service rejects empty updates; callers check before issuing the PUT.
    pub fn has_updates(&self) -> bool {
        self.full_name.is_some()
            || self.age.is_some()
            || self.gender.is_some()
            || self.languages.is_some()
            || self.interests.is_some()
    }
}
