//! Contact form submissions.
//!
//! One route: validate the four required fields, insert, answer with a
//! bare success flag. Validation failures never reach storage, and
//! storage failures surface as a generic indicator with no field-level
//! detail.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db::MessageStore;

/// A contact-form submission. All four fields are required.
///
/// Missing JSON fields deserialize as empty strings so they fail
/// validation rather than rejecting at the extractor with a detailed
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// All four fields must be present; whitespace-only counts as missing.
    pub fn validate(&self) -> Result<(), &'static str> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("All fields are required");
        }
        Ok(())
    }
}

/// `POST /api/contact`
pub async fn submit(
    State(store): State<Arc<MessageStore>>,
    Json(submission): Json<ContactSubmission>,
) -> (StatusCode, Json<Value>) {
    if let Err(reason) = submission.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": reason })));
    }

    match store.insert(&submission) {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => {
            tracing::error!("contact insert failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            subject: "Hello".to_string(),
            message: "Testing the contact form.".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_submission() {
        assert!(full_submission().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_email() {
        let submission = ContactSubmission {
            email: String::new(),
            ..full_submission()
        };
        assert!(submission.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_whitespace_only() {
        let submission = ContactSubmission {
            message: "   ".to_string(),
            ..full_submission()
        };
        assert!(submission.validate().is_err());
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let submission: ContactSubmission =
            serde_json::from_str(r#"{"name": "Ada", "subject": "Hi", "message": "x"}"#).unwrap();
        assert!(submission.email.is_empty());
        assert!(submission.validate().is_err());
    }

    #[tokio::test]
    async fn test_submit_stores_and_reports_success() {
        let store = Arc::new(MessageStore::open_in_memory().unwrap());

        let (status, Json(body)) =
            submit(State(store.clone()), Json(full_submission())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(store.message_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_email_before_storage() {
        let store = Arc::new(MessageStore::open_in_memory().unwrap());
        let submission = ContactSubmission {
            email: String::new(),
            ..full_submission()
        };

        let (status, Json(body)) = submit(State(store.clone()), Json(submission)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("error").is_some());
        // Nothing touched storage
        assert_eq!(store.message_count().unwrap(), 0);
    }
}
