use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use submission_core::contract::{normalize_request, SubmissionRequest};
use submission_lambda::adapters::artifact_store::S3ArtifactStore;
use submission_lambda::adapters::fetch::HttpSubmissionFetcher;
use submission_lambda::adapters::mailer::MailgunMailer;
use submission_lambda::adapters::notification_log::DynamoNotificationLog;
use submission_lambda::handlers::submission::{handle_submission, ProcessorConfig};

#[derive(Clone)]
struct RuntimeDependencies {
    bucket: String,
    public_host: String,
    table_name: String,
    mailgun_domain: String,
    mailgun_api_key: String,
    from_address: String,
    s3_client: aws_sdk_s3::Client,
    dynamodb_client: aws_sdk_dynamodb::Client,
    http_client: reqwest::Client,
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let mailgun_domain = std::env::var("MAILGUN_DOMAIN")
        .map_err(|_| Error::from("MAILGUN_DOMAIN must be configured"))?;
    let deps = RuntimeDependencies {
        bucket: std::env::var("ARTIFACT_BUCKET")
            .map_err(|_| Error::from("ARTIFACT_BUCKET must be configured"))?,
        public_host: std::env::var("ARTIFACT_PUBLIC_HOST")
            .unwrap_or_else(|_| "storage.googleapis.com".to_string()),
        table_name: std::env::var("NOTIFICATION_TABLE")
            .map_err(|_| Error::from("NOTIFICATION_TABLE must be configured"))?,
        mailgun_api_key: std::env::var("MAILGUN_API_KEY")
            .map_err(|_| Error::from("MAILGUN_API_KEY must be configured"))?,
        from_address: std::env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| format!("submission-update@{mailgun_domain}")),
        mailgun_domain,
        s3_client: aws_sdk_s3::Client::new(&aws_config),
        dynamodb_client: aws_sdk_dynamodb::Client::new(&aws_config),
        http_client: reqwest::Client::new(),
    };

    let requests = if is_sns_event(&event.payload) {
        decode_sns_requests(&event.payload)?
    } else {
        let request: SubmissionRequest = serde_json::from_value(event.payload)
            .map_err(|error| Error::from(format!("invalid submission request: {error}")))?;
        vec![request]
    };

    let fetcher = HttpSubmissionFetcher::new(deps.http_client.clone());
    let store = S3ArtifactStore::new(deps.bucket.clone(), deps.s3_client.clone());
    let mailer = MailgunMailer::new(
        deps.http_client.clone(),
        deps.mailgun_domain.clone(),
        deps.mailgun_api_key.clone(),
    );
    let log = DynamoNotificationLog::new(deps.table_name.clone(), deps.dynamodb_client.clone());

    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        let normalized = normalize_request(request)
            .map_err(|error| Error::from(error.message().to_string()))?;
        // Per-request capture: artifact keys must stay distinct across
        // records sharing recipient and assignment.
        let now = Utc::now();
        let config = ProcessorConfig {
            bucket: deps.bucket.clone(),
            public_host: deps.public_host.clone(),
            from_address: deps.from_address.clone(),
            event_time: now.to_rfc3339(),
            key_timestamp: now,
        };

        let response = handle_submission(&normalized, &config, &fetcher, &store, &mailer, &log)
            .map_err(|error| Error::from(error.message))?;
        results.push(serde_json::to_value(response).map_err(|error| {
            Error::from(format!("failed to serialize submission response: {error}"))
        })?);
    }

    Ok(json!({ "status": "ok", "results": results }))
}

fn is_sns_event(event: &Value) -> bool {
    event
        .get("Records")
        .and_then(Value::as_array)
        .map(|records| {
            !records.is_empty()
                && records
                    .iter()
                    .all(|record| record.get("Sns").is_some_and(Value::is_object))
        })
        .unwrap_or(false)
}

fn decode_sns_requests(event: &Value) -> Result<Vec<SubmissionRequest>, Error> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::from("SNS event must include Records array"))?;

    let mut requests = Vec::with_capacity(records.len());
    for record in records {
        let message = record
            .get("Sns")
            .and_then(|sns| sns.get("Message"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::from("SNS record message must be a string"))?;
        let request: SubmissionRequest = serde_json::from_str(message)
            .map_err(|error| Error::from(format!("invalid submission request: {error}")))?;
        requests.push(request);
    }

    Ok(requests)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sns_event_shape() {
        let event = json!({
            "Records": [
                {"Sns": {"Message": "{}"}}
            ]
        });
        assert!(is_sns_event(&event));
    }

    #[test]
    fn rejects_non_sns_records() {
        let event = json!({
            "Records": [
                {"eventSource": "aws:sqs", "body": "{}"}
            ]
        });
        assert!(!is_sns_event(&event));
    }

    #[test]
    fn decodes_request_from_sns_message_string() {
        let event = json!({
            "Records": [
                {"Sns": {"Message": "{\"submissionUrl\":\"https://example.com/a.zip\",\"userEmail\":\"s@example.com\",\"assignmentId\":\"a1\"}"}}
            ]
        });

        let requests = decode_sns_requests(&event).expect("requests should decode");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].submission_url, "https://example.com/a.zip");
        assert_eq!(requests[0].user_email, "s@example.com");
        assert_eq!(requests[0].assignment_id, "a1");
    }

    #[test]
    fn decodes_every_record_in_order() {
        let event = json!({
            "Records": [
                {"Sns": {"Message": "{\"submissionUrl\":\"https://example.com/a.zip\",\"userEmail\":\"a@example.com\",\"assignmentId\":\"a1\"}"}},
                {"Sns": {"Message": "{\"submissionUrl\":\"https://example.com/b.zip\",\"userEmail\":\"b@example.com\",\"assignmentId\":\"b1\"}"}}
            ]
        });

        let requests = decode_sns_requests(&event).expect("requests should decode");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].user_email, "a@example.com");
        assert_eq!(requests[1].user_email, "b@example.com");
    }

    #[test]
    fn rejects_record_without_message_string() {
        let event = json!({
            "Records": [
                {"Sns": {"Message": 42}}
            ]
        });

        let error = decode_sns_requests(&event).expect_err("non-string message should fail");
        assert!(error
            .to_string()
            .contains("SNS record message must be a string"));
    }

    #[test]
    fn rejects_malformed_request_json() {
        let event = json!({
            "Records": [
                {"Sns": {"Message": "{\"submissionUrl\":\"https://example.com/a.zip\"}"}}
            ]
        });

        let error = decode_sns_requests(&event).expect_err("incomplete request should fail");
        assert!(error.to_string().contains("invalid submission request"));
    }
}
