pub trait SubmissionFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

pub struct HttpSubmissionFetcher {
    http_client: reqwest::Client,
}

impl HttpSubmissionFetcher {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl SubmissionFetcher for HttpSubmissionFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let client = self.http_client.clone();
        let target_url = url.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .get(&target_url)
                    .send()
                    .await
                    .map_err(|error| format!("failed to request submission url: {error}"))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(format!("submission url returned status {status}"));
                }

                response
                    .bytes()
                    .await
                    .map(|bytes| bytes.to_vec())
                    .map_err(|error| format!("failed to read submission body: {error}"))
            })
        })
    }
}
