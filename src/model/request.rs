use serde::{Deserialize, Serialize};

use crate::model::code_problem::Verdict;

/// Loose request body shared by the smaller form actions. Each action pulls out what it needs.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRequest {
    // Login
    pub email: Option<String>,
    pub password: Option<String>,
    pub remember: Option<bool>,

    // Grading
    pub grade: Option<u32>,
    pub feedback: Option<String>,

    // Code review
    pub verdict: Option<Verdict>,

    // Settings
    pub section: Option<String>,
}

impl ClientRequest {
    /// Returns (email, password), treating blank values as missing
    pub fn get_login(&self) -> Option<(String, String)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some((email.trim().to_owned(), password.to_owned()))
            }
            _ => None,
        }
    }

    /// Returns (grade, feedback)
    pub fn get_grade(&self) -> Option<(u32, Option<String>)> {
        self.grade.map(|grade| (grade, self.feedback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_login_fields_are_missing() {
        let req: ClientRequest =
            serde_json::from_str(r#"{ "email": "  ", "password": "password123" }"#).unwrap();
        assert_eq!(req.get_login(), None);

        let req: ClientRequest =
            serde_json::from_str(r#"{ "email": " a@b.c ", "password": "x" }"#).unwrap();
        assert_eq!(req.get_login(), Some(("a@b.c".into(), "x".into())));
    }
}
