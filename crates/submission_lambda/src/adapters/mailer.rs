#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer {
    fn send(&self, message: &EmailMessage) -> Result<(), String>;
}

/// Transactional email over the Mailgun messages API.
pub struct MailgunMailer {
    http_client: reqwest::Client,
    domain: String,
    api_key: String,
}

impl MailgunMailer {
    pub fn new(http_client: reqwest::Client, domain: String, api_key: String) -> Self {
        Self {
            http_client,
            domain,
            api_key,
        }
    }

    fn messages_url(&self) -> String {
        format!("https://api.mailgun.net/v3/{}/messages", self.domain)
    }
}

impl Mailer for MailgunMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), String> {
        let client = self.http_client.clone();
        let url = self.messages_url();
        let api_key = self.api_key.clone();
        let form = [
            ("from", message.from.clone()),
            ("to", message.to.clone()),
            ("subject", message.subject.clone()),
            ("text", message.body.clone()),
        ];

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .post(&url)
                    .basic_auth("api", Some(api_key))
                    .form(&form)
                    .send()
                    .await
                    .map_err(|error| format!("failed to reach email service: {error}"))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(format!("email service returned status {status}"));
                }

                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_messages_url_from_domain() {
        let mailer = MailgunMailer::new(
            reqwest::Client::new(),
            "mail.example.com".to_string(),
            "key-unused".to_string(),
        );

        assert_eq!(
            mailer.messages_url(),
            "https://api.mailgun.net/v3/mail.example.com/messages"
        );
    }
}
