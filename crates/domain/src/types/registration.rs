//! Registration and login form capture.
//!
//! These forms only collect input. Nothing here is persisted or sent to a backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields of the registration form that can be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationField {
    Username,
    Password,
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationField::Username => write!(f, "Username"),
            RegistrationField::Password => write!(f, "Password"),
        }
    }
}

/// Registration form input.
///
/// `relationship_status` is free text: the set of allowed values is still an
/// open product question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub hobbies: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// As typed by the user, expected as `MM/DD/YYYY`
    pub date_of_birth: Option<String>,
    pub relationship_status: Option<String>,
    /// Profile visibility; private unless the user opts in
    pub is_public: bool,
}

impl RegistrationForm {
    /// Start a form with the username prefilled (e.g. from the last session).
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Required fields that are empty or whitespace, in form order.
    pub fn missing_fields(&self) -> Vec<RegistrationField> {
        let mut missing = Vec::new();
        if self.username.trim().is_empty() {
            missing.push(RegistrationField::Username);
        }
        if self.password.trim().is_empty() {
            missing.push(RegistrationField::Password);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.trim().is_empty()
    }
}
