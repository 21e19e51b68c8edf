use aws_sdk_s3::primitives::ByteStream;

pub trait ArtifactStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String>;
}

pub struct S3ArtifactStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ArtifactStore {
    pub fn new(bucket: String, s3_client: aws_sdk_s3::Client) -> Self {
        Self { bucket, s3_client }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write artifact to object storage: {error}"))
            })
        })
    }
}
