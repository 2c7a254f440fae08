//! Validated name newtypes for the town selection flow
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty after trimming
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

macro_rules! define_non_empty_name {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new validated ", $label, ".")]
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!(
                        $label,
                        " cannot be empty"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_non_empty_name!(
    /// The name a user appears under inside a town (non-empty, trimmed)
    DisplayName,
    "Display name"
);

define_non_empty_name!(
    /// Human-readable name given to a town at creation (non-empty, trimmed)
    FriendlyName,
    "Town name"
);

define_non_empty_name!(
    /// Server-assigned town identifier (non-empty, trimmed)
    TownId,
    "Town ID"
);
