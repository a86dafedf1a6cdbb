//! Click event model for asynchronous click tracking.

/// A pending click increment for one short code.
///
/// Produced by the redirect path and consumed by
/// [`crate::domain::click_worker::run_click_worker`], so a slow or failing
/// counter update never delays the redirect itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation() {
        let event = ClickEvent::new("abc123");
        assert_eq!(event.code, "abc123");
    }

    #[test]
    fn test_click_event_clone() {
        let event = ClickEvent::new(String::from("xyz"));
        assert_eq!(event.clone(), event);
    }
}
