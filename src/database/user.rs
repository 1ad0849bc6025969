//! The fixed credential list. These are the only accounts that can sign in.

use crate::model::user_info::{Role, UserId, UserInfo};

struct Credential {
    id: UserId,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const CREDENTIALS: &[Credential] = &[
    Credential {
        id: 1,
        name: "John Doe",
        email: "student1@example.com",
        password: "password123",
        role: Role::Student,
    },
    Credential {
        id: 2,
        name: "Jane Smith",
        email: "student2@example.com",
        password: "password123",
        role: Role::Student,
    },
    Credential {
        id: 3,
        name: "Dr. Robert Johnson",
        email: "faculty@example.com",
        password: "password123",
        role: Role::Faculty,
    },
    Credential {
        id: 4,
        name: "Admin User",
        email: "admin@example.com",
        password: "password123",
        role: Role::Admin,
    },
    Credential {
        id: 5,
        name: "Dr. Sarah Miller",
        email: "smiller@example.com",
        password: "password123",
        role: Role::Faculty,
    },
    Credential {
        id: 6,
        name: "Prof. Michael Chen",
        email: "mchen@example.com",
        password: "password123",
        role: Role::Faculty,
    },
];

impl Credential {
    fn to_user(&self) -> UserInfo {
        UserInfo::new(self.id, self.name, self.email, self.role)
    }
}

/// Case-insensitive e-mail plus exact password. The returned record carries no password.
pub fn find_user(email: &str, password: &str) -> Option<UserInfo> {
    CREDENTIALS
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case(email) && c.password == password)
        .map(Credential::to_user)
}

/// Every account holding the role, in id order
pub fn users_with_role(role: Role) -> Vec<UserInfo> {
    CREDENTIALS
        .iter()
        .filter(|c| c.role == role)
        .map(Credential::to_user)
        .collect()
}

pub fn user_by_id(id: UserId) -> Option<UserInfo> {
    CREDENTIALS.iter().find(|c| c.id == id).map(Credential::to_user)
}

/// (email, password) pairs that sign in, for tests
#[cfg(test)]
pub fn valid_pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
    CREDENTIALS.iter().map(|c| (c.email, c.password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_pair_signs_in() {
        for (email, password) in valid_pairs() {
            let user = find_user(email, password).unwrap();
            assert_eq!(user.email(), email);
            let json = serde_json::to_value(&user).unwrap();
            assert!(json.get("password").is_none());
        }
    }

    #[test]
    fn email_is_case_insensitive_password_is_not() {
        assert!(find_user("Student1@Example.COM", "password123").is_some());
        assert!(find_user("student1@example.com", "Password123").is_none());
        assert!(find_user("nobody@example.com", "password123").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut ids = CREDENTIALS.iter().map(|c| c.id).collect::<Vec<_>>();
        ids.dedup();
        assert_eq!(ids.len(), CREDENTIALS.len());
        assert_eq!(users_with_role(Role::Faculty).len(), 3);
        assert_eq!(user_by_id(4).map(|u| u.role()), Some(Role::Admin));
    }
}
