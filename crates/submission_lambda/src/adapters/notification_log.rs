use aws_sdk_dynamodb::types::AttributeValue;
use submission_core::contract::NotificationRecord;

pub trait NotificationLog {
    fn put_record(&self, record: &NotificationRecord) -> Result<(), String>;
}

pub struct DynamoNotificationLog {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoNotificationLog {
    pub fn new(table_name: String, dynamodb_client: aws_sdk_dynamodb::Client) -> Self {
        Self {
            table_name,
            dynamodb_client,
        }
    }
}

impl NotificationLog for DynamoNotificationLog {
    fn put_record(&self, record: &NotificationRecord) -> Result<(), String> {
        let table_name = self.table_name.clone();
        let client = self.dynamodb_client.clone();
        let record = record.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .item("id", AttributeValue::S(record.id))
                    .item("email", AttributeValue::S(record.email))
                    .item("timestamp", AttributeValue::S(record.timestamp))
                    .item("emailContent", AttributeValue::S(record.email_content))
                    .item("status", AttributeValue::S(record.status.as_str().to_string()))
                    .item("errorMessage", AttributeValue::S(record.error_message))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write notification record: {error}"))
            })
        })
    }
}
