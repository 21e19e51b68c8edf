use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use submission_core::contract::{
    NormalizedSubmissionRequest, NotificationRecord, NotificationStatus, NOTIFICATION_SUBJECT,
};
use submission_core::storage_keys::{artifact_object_key, public_object_url};

use crate::adapters::artifact_store::ArtifactStore;
use crate::adapters::fetch::SubmissionFetcher;
use crate::adapters::mailer::{EmailMessage, Mailer};
use crate::adapters::notification_log::NotificationLog;

const DOWNLOAD_FAILED_MESSAGE: &str = "The provided URL for the assignment submission is invalid \
     or the file could not be downloaded. Please check the URL and try again.";
const EMPTY_BODY_MESSAGE: &str = "Invalid URL: The file download has failed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub bucket: String,
    pub public_host: String,
    pub from_address: String,
    /// RFC 3339 timestamp written into the notification record.
    pub event_time: String,
    /// Single timestamp source for the artifact key.
    pub key_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub status: String,
    pub record_id: String,
    pub object_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandlerError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Download(String),
    Storage(String),
}

impl PipelineError {
    pub fn message(&self) -> &str {
        match self {
            Self::Download(message) | Self::Storage(message) => message,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Download(_) => "download_error",
            Self::Storage(_) => "storage_error",
        }
    }
}

struct StoredArtifact {
    object_key: String,
    public_url: String,
}

/// Runs one submission end to end: fetch, store, notify, record.
///
/// Download and storage failures are converted into the failure-path email;
/// the email send always happens, and exactly one notification record is
/// written afterwards whatever the send outcome was. Only a record-write
/// failure escapes to the caller.
pub fn handle_submission(
    request: &NormalizedSubmissionRequest,
    config: &ProcessorConfig,
    fetcher: &impl SubmissionFetcher,
    store: &impl ArtifactStore,
    mailer: &impl Mailer,
    log: &impl NotificationLog,
) -> Result<SubmissionResponse, SubmissionHandlerError> {
    log_submission_info(
        "submission_started",
        json!({
            "user_email": request.user_email.clone(),
            "assignment_id": request.assignment_id.clone(),
            "submission_url": request.submission_url.clone(),
        }),
    );

    let stored = fetch_and_store(request, config, fetcher, store);

    let (email_body, object_key) = match &stored {
        Ok(artifact) => (
            format!(
                "Your assignment has been uploaded successfully. Access the uploaded file at \
                 this location: {}",
                artifact.public_url
            ),
            Some(artifact.object_key.clone()),
        ),
        Err(error) => {
            log_submission_error(
                "submission_failed",
                json!({
                    "user_email": request.user_email.clone(),
                    "assignment_id": request.assignment_id.clone(),
                    "kind": error.kind(),
                    "error": error.message(),
                }),
            );
            (
                format!(
                    "There was an error in the assignment submission: {}",
                    error.message()
                ),
                None,
            )
        }
    };

    let message = EmailMessage {
        from: config.from_address.clone(),
        to: request.user_email.clone(),
        subject: NOTIFICATION_SUBJECT.to_string(),
        body: email_body.clone(),
    };

    let record_id = uuid::Uuid::new_v4().to_string();
    let (status, error_message) = match mailer.send(&message) {
        Ok(()) => {
            log_submission_info(
                "notification_sent",
                json!({
                    "user_email": request.user_email.clone(),
                    "record_id": record_id.clone(),
                }),
            );
            (NotificationStatus::Sent, String::new())
        }
        Err(send_error) => {
            log_submission_error(
                "notification_send_failed",
                json!({
                    "user_email": request.user_email.clone(),
                    "record_id": record_id.clone(),
                    "error": send_error.clone(),
                }),
            );
            (NotificationStatus::Failed, send_error)
        }
    };

    let record = NotificationRecord {
        id: record_id.clone(),
        email: request.user_email.clone(),
        timestamp: config.event_time.clone(),
        email_content: email_body,
        status,
        error_message,
    };

    log.put_record(&record).map_err(|error| SubmissionHandlerError {
        message: format!("Failed to persist notification record: {error}"),
    })?;

    log_submission_info(
        "outcome_recorded",
        json!({
            "record_id": record_id.clone(),
            "status": status.as_str(),
        }),
    );

    Ok(SubmissionResponse {
        status: "ok".to_string(),
        record_id,
        object_key,
    })
}

fn fetch_and_store(
    request: &NormalizedSubmissionRequest,
    config: &ProcessorConfig,
    fetcher: &impl SubmissionFetcher,
    store: &impl ArtifactStore,
) -> Result<StoredArtifact, PipelineError> {
    if !request.submission_url.starts_with("http://")
        && !request.submission_url.starts_with("https://")
    {
        log_submission_error(
            "download_failed",
            json!({
                "submission_url": request.submission_url.clone(),
                "error": "submission url is not an http(s) URL",
            }),
        );
        return Err(PipelineError::Download(DOWNLOAD_FAILED_MESSAGE.to_string()));
    }

    let content = fetcher.fetch(&request.submission_url).map_err(|error| {
        log_submission_error(
            "download_failed",
            json!({
                "submission_url": request.submission_url.clone(),
                "error": error,
            }),
        );
        PipelineError::Download(DOWNLOAD_FAILED_MESSAGE.to_string())
    })?;

    if content.is_empty() {
        return Err(PipelineError::Download(EMPTY_BODY_MESSAGE.to_string()));
    }

    let object_key = artifact_object_key(
        &request.user_email,
        &request.assignment_id,
        config.key_timestamp,
    );

    store.write_object(&object_key, &content).map_err(|error| {
        PipelineError::Storage(format!("Failed to store the submission artifact: {error}"))
    })?;

    log_submission_info(
        "artifact_stored",
        json!({
            "object_key": object_key.clone(),
            "bytes": content.len(),
        }),
    );

    let public_url = public_object_url(&config.public_host, &config.bucket, &object_key);
    Ok(StoredArtifact {
        object_key,
        public_url,
    })
}

fn log_submission_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "submission_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_submission_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "submission_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
