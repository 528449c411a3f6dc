//! Contact form payload and validation.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Name, email, and message are required.")]
    MissingFields,

    #[error("Please provide a valid email address.")]
    InvalidEmail,
}

/// Contact form as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enquiry {
    pub name: String,
    pub email: String,
    pub service: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(self) -> Result<Enquiry, ContactError> {
        let (Some(name), Some(email), Some(message)) = (
            non_blank(self.name),
            non_blank(self.email),
            non_blank(self.message),
        ) else {
            return Err(ContactError::MissingFields);
        };

        if !email_pattern().is_match(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(Enquiry {
            name,
            email,
            service: non_blank(self.service),
            message,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}
