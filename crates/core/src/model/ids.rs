use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying database id.
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map($name::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

host_id!(
    /// Host identifier of a course.
    CourseId
);
host_id!(
    /// Host identifier of a course section row (not its ordinal number).
    SectionId
);
host_id!(
    /// Host identifier of a course module (activity instance).
    ModuleId
);
host_id!(
    /// Host identifier of a user account.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_display_and_parse() {
        let id = CourseId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<CourseId>().unwrap(), id);
    }

    #[test]
    fn parse_reports_the_id_kind() {
        let err = "nope".parse::<SectionId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse SectionId from string");
    }

    #[test]
    fn debug_names_the_type() {
        assert_eq!(format!("{:?}", UserId::new(7)), "UserId(7)");
        assert_eq!(format!("{:?}", ModuleId::new(3)), "ModuleId(3)");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&CourseId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
