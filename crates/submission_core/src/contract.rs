use serde::{Deserialize, Serialize};

pub const NOTIFICATION_SUBJECT: &str = "Assignment Submission Details";

/// One submission request as carried inside a trigger message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRequest {
    #[serde(rename = "submissionUrl")]
    pub submission_url: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "assignmentId")]
    pub assignment_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedSubmissionRequest {
    pub submission_url: String,
    pub user_email: String,
    pub assignment_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed,
}

impl NotificationStatus {
    /// Wire value stored in the log table's `status` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "Mail Sent Successfully",
            Self::Failed => "Failed",
        }
    }
}

/// Durable log row describing one invocation's email outcome.
///
/// Append-only; exactly one record is written per processed request, whatever
/// failed along the way. `error_message` is empty when the send succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: String,
    pub email: String,
    pub timestamp: String,
    pub email_content: String,
    pub status: NotificationStatus,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Only the fields needed to notify and log are hard errors here; a bad
/// submission URL is a download failure and is reported through the
/// failure-path email instead.
pub fn normalize_request(
    request: SubmissionRequest,
) -> Result<NormalizedSubmissionRequest, ValidationError> {
    let user_email = request.user_email.trim().to_string();
    if user_email.is_empty() {
        return Err(ValidationError::new("userEmail cannot be empty"));
    }

    let assignment_id = request.assignment_id.trim().to_string();
    if assignment_id.is_empty() {
        return Err(ValidationError::new("assignmentId cannot be empty"));
    }

    Ok(NormalizedSubmissionRequest {
        submission_url: request.submission_url.trim().to_string(),
        user_email,
        assignment_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> SubmissionRequest {
        SubmissionRequest {
            submission_url: "https://example.com/archive.zip".to_string(),
            user_email: "student@example.com".to_string(),
            assignment_id: "assignment-01".to_string(),
        }
    }

    #[test]
    fn normalize_request_trims_fields() {
        let mut request = sample_request();
        request.user_email = "  student@example.com ".to_string();

        let normalized = normalize_request(request).expect("request should pass");
        assert_eq!(normalized.user_email, "student@example.com");
    }

    #[test]
    fn normalize_request_rejects_empty_email() {
        let mut request = sample_request();
        request.user_email = "   ".to_string();

        let error = normalize_request(request).expect_err("request should fail");
        assert_eq!(error.message(), "userEmail cannot be empty");
    }

    #[test]
    fn normalize_request_passes_a_bad_url_through() {
        let mut request = sample_request();
        request.submission_url = "notaurl".to_string();

        let normalized = normalize_request(request).expect("request should pass");
        assert_eq!(normalized.submission_url, "notaurl");
    }

    #[test]
    fn normalize_request_rejects_empty_assignment_id() {
        let mut request = sample_request();
        request.assignment_id = String::new();

        let error = normalize_request(request).expect_err("request should fail");
        assert_eq!(error.message(), "assignmentId cannot be empty");
    }

    #[test]
    fn request_parses_wire_field_names() {
        let request: SubmissionRequest = serde_json::from_str(
            r#"{"submissionUrl":"https://example.com/a.zip","userEmail":"s@example.com","assignmentId":"a1"}"#,
        )
        .expect("request should parse");

        assert_eq!(request.submission_url, "https://example.com/a.zip");
        assert_eq!(request.user_email, "s@example.com");
        assert_eq!(request.assignment_id, "a1");
    }

    #[test]
    fn status_wire_strings_match_log_table_contract() {
        assert_eq!(NotificationStatus::Sent.as_str(), "Mail Sent Successfully");
        assert_eq!(NotificationStatus::Failed.as_str(), "Failed");
    }
}
