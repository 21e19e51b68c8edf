pub mod artifact_store;
pub mod fetch;
pub mod mailer;
pub mod notification_log;
