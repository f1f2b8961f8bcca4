use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate an opaque display handle for a locally selected asset,
/// e.g. `media://4f1c…`. Plays the role a blob object-URL plays in a
/// browser frontend: a stable reference for a presentation layer,
/// never dereferenced by the core.
pub fn new_display_handle() -> String {
    format!("media://{}", uuid::Uuid::new_v4())
}

/// Server-issued identifier of an asynchronous analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_handle_is_unique() {
        let a = new_display_handle();
        let b = new_display_handle();
        assert_ne!(a, b);
    }

    #[test]
    fn display_handle_scheme() {
        let handle = new_display_handle();
        assert!(handle.starts_with("media://"));
        let id = handle.strip_prefix("media://").unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn job_id_display() {
        let id = JobId::new("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn job_id_equality() {
        let a = JobId::new("abc");
        let b = JobId::from("abc".to_string());
        assert_eq!(a, b);
        assert_ne!(a, JobId::new("def"));
    }

    #[test]
    fn job_id_serialization() {
        let id = JobId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
