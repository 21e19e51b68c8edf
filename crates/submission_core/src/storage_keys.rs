use chrono::{DateTime, Utc};

/// Replaces every non-alphanumeric byte with `_` so the recipient identifier
/// is safe inside an object key segment.
pub fn sanitize_recipient(recipient: &str) -> String {
    recipient
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect()
}

/// 17-digit `YYYYMMDDHHMMSSmmm` key timestamp. Millisecond precision keeps
/// keys distinct for same-recipient submissions landing within one second.
pub fn compact_timestamp(moment: DateTime<Utc>) -> String {
    moment.format("%Y%m%d%H%M%S%3f").to_string()
}

/// Builds the write-once artifact key for one submission. The timestamp is
/// the single uniqueness source across invocations that share recipient and
/// assignment.
pub fn artifact_object_key(
    user_email: &str,
    assignment_id: &str,
    moment: DateTime<Utc>,
) -> String {
    format!(
        "{}/{}/{}.zip",
        sanitize_recipient(user_email),
        assignment_id,
        compact_timestamp(moment),
    )
}

/// Public access URL for a stored artifact. Key segments are percent-encoded
/// individually so the `/` partition separators survive.
pub fn public_object_url(public_host: &str, bucket: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("https://{public_host}/{bucket}/{encoded_key}")
}
