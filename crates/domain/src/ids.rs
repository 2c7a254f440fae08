use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

// One per client session context (replaces the ambient video instance)
define_id!(SessionId);

// One per join/create orchestration attempt
define_id!(FlowId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_per_construction() {
        assert_ne!(FlowId::new(), FlowId::new());
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_matches_inner_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(SessionId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
