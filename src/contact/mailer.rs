//! Enquiry delivery through a transactional email service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::form::Enquiry;
use crate::config::ContactConfig;
use crate::error::{FolioError, Result};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    /// Notification for a contact form enquiry, replying to the submitter.
    pub fn enquiry(enquiry: &Enquiry, from: &str, to: &str, received_at: DateTime<Utc>) -> Self {
        let subject = match &enquiry.service {
            Some(service) => format!("New enquiry from {} — {}", enquiry.name, service),
            None => format!("New enquiry from {}", enquiry.name),
        };

        let html = format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Service:</strong> {}</p>\n\
             <p><strong>Received:</strong> {}</p>\n\
             <hr />\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>",
            escape_html(&enquiry.name),
            escape_html(&enquiry.email),
            escape_html(enquiry.service.as_deref().unwrap_or("Not specified")),
            received_at.format("%Y-%m-%d %H:%M UTC"),
            escape_html(&enquiry.message).replace('\n', "<br />"),
        );

        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            reply_to: enquiry.email.clone(),
            subject,
            html,
        }
    }
}

/// Trait for email delivery backends.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Mailer for the Resend HTTP API.
pub struct ResendMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a mailer from configuration; `None` when no API key is set.
    pub fn from_config(config: &ContactConfig) -> Result<Option<Self>> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Some(Self::new(&config.endpoint, key)?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Email service rejected message");
            return Err(FolioError::Mail(format!("email service returned {}", status)));
        }

        debug!(subject = %message.subject, "Enquiry email sent");
        Ok(())
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
