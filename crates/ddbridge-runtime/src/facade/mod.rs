//! Public Facades
//!
//! Thin handles that turn application calls into messages. A facade never
//! touches processor state and never waits: it decodes free-form kinds,
//! substitutes defaults, and enqueues exactly one message. Inputs it cannot
//! decode are dropped without a trace reaching the caller.
//!
//! Each facade is an enum with a `NoOp` variant, used before the SDK is
//! initialized, when a feature is disabled, or when logger creation is skipped.

mod logger;
mod rum;

pub use logger::Logger;
pub use rum::RumClient;

use ddbridge_core::Attributes;
use tracing::trace;

/// Decode a kind given either as the typed enum or as a string
fn decode<K, T>(kind: K, what: &str) -> Option<T>
where
    K: TryInto<T>,
{
    match kind.try_into() {
        Ok(value) => Some(value),
        Err(_) => {
            trace!("Dropping call with unrecognized {}", what);
            None
        }
    }
}

/// Required keys must be non-empty
fn require_key(key: &str, what: &str) -> bool {
    if key.trim().is_empty() {
        trace!("Dropping call with empty {}", what);
        false
    } else {
        true
    }
}

fn attributes_or_empty(attributes: Option<Attributes>) -> Attributes {
    attributes.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddbridge_core::RumActionType;

    #[test]
    fn test_decode_accepts_enum_and_string() {
        assert_eq!(
            decode::<_, RumActionType>(RumActionType::Swipe, "action type"),
            Some(RumActionType::Swipe)
        );
        assert_eq!(
            decode::<_, RumActionType>("tap", "action type"),
            Some(RumActionType::Tap)
        );
        assert_eq!(decode::<_, RumActionType>("hover", "action type"), None);
    }

    #[test]
    fn test_require_key() {
        assert!(require_key("home", "view key"));
        assert!(!require_key("  ", "view key"));
    }
}
