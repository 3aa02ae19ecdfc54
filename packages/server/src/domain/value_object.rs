//! Value objects.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Defines a non-empty string value object with the usual accessors.
///
/// `blank_allowed` decides whether a whitespace-only value counts as non-empty.
macro_rules! string_value_object {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        string_value_object!($(#[$meta])* $name, $label, blank_allowed = false);
    };
    ($(#[$meta:meta])* $name:ident, $label:literal, blank_allowed = $blank_allowed:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.is_empty() || (!$blank_allowed && value.trim().is_empty()) {
                    return Err(ValueObjectError::Empty($label));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value_object!(
    /// Room identifier. Any non-empty string, whitespace included; the relay reserves no names.
    RoomId,
    "chatId",
    blank_allowed = true
);
string_value_object!(
    /// User identifier supplied by the external identity provider.
    UserId,
    "userId"
);
string_value_object!(
    /// Display name shown to other room members.
    Username,
    "username"
);
string_value_object!(
    /// Message identifier, client-supplied or generated by the relay.
    MessageId,
    "messageId"
);
string_value_object!(
    /// Chat message body.
    MessageContent,
    "text"
);

impl Username {
    /// Display name used when neither the envelope nor the registry knows one.
    pub const ANONYMOUS: &'static str = "Anonymous";

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }
}

impl MessageId {
    /// Generate a collision-resistant message identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Opaque handle of one live transport-level link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
