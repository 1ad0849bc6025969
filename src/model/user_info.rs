use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type UserId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    /// Path of the dashboard view each role lands on
    pub fn home(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Faculty => "/faculty",
            Role::Admin => "/admin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in user. The password never leaves the credential list, so it has no field here.
///
/// `id` and `role` are private: nothing may change them once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
}

impl UserInfo {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            avatar: None,
            bio: None,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Shallow merge: only the fields present in `update` are replaced.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
    }
}

/// Partial profile fields. `avatar: null` clears the avatar, an absent `avatar` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.avatar.is_none()
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_merges_only_present_fields() {
        let mut user = UserInfo::new(1, "John Doe", "student1@example.com", Role::Student);
        user.apply(ProfileUpdate {
            bio: Some("Second year".into()),
            ..Default::default()
        });

        assert_eq!(user.name(), "John Doe");
        assert_eq!(user.bio(), Some("Second year"));
        assert_eq!(user.role(), Role::Student);
    }

    #[test]
    fn null_avatar_clears_but_missing_avatar_keeps() {
        let mut user = UserInfo::new(1, "John Doe", "student1@example.com", Role::Student);
        user.apply(serde_json::from_str(r#"{ "avatar": "me.png" }"#).unwrap());
        assert_eq!(user.avatar(), Some("me.png"));

        user.apply(serde_json::from_str(r#"{ "name": "Johnny" }"#).unwrap());
        assert_eq!(user.avatar(), Some("me.png"));

        user.apply(serde_json::from_str(r#"{ "avatar": null }"#).unwrap());
        assert_eq!(user.avatar(), None);
        assert_eq!(user.name(), "Johnny");
    }

    #[test]
    fn untouched_avatar_survives_serialization() {
        let update = ProfileUpdate {
            name: Some("Johnny".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"name":"Johnny"}"#);

        let read_back: ProfileUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(read_back, update);

        let mut user = UserInfo::new(1, "John Doe", "student1@example.com", Role::Student);
        user.apply(serde_json::from_str(r#"{ "avatar": "me.png" }"#).unwrap());
        user.apply(read_back);
        assert_eq!(user.avatar(), Some("me.png"));

        let clear = ProfileUpdate {
            avatar: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&clear).unwrap(), r#"{"avatar":null}"#);
        assert_eq!(serde_json::to_string(&ProfileUpdate::default()).unwrap(), "{}");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Faculty).unwrap(), r#""faculty""#);
        assert_eq!(Role::Admin.home(), "/admin");
    }
}
