//! Contact form: validation, CAPTCHA verification and email delivery.
//!
//! [`submit_contact_form`] never fails; every problem ends up in the
//! returned [`ContactOutcome`].

use crate::config::Config;
use crate::i18n::{Locale, LocaleStrings};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{error, info, warn};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 100;
pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Code reported when the email service does not answer in time.
pub const TIMEOUT_CODE: u16 = 408;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-ZäöüÄÖÜßа-яёА-ЯЁ\s-]+$").expect("Invalid name regex")
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("Invalid email regex")
    })
}

/// Submitted form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "recaptchaToken")]
    pub recaptcha_token: Option<String>,
}

/// Localized messages per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recaptcha: Vec<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.message.is_empty()
            && self.recaptcha.is_empty()
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContactOutcome {
    Sent {
        message: String,
    },
    Invalid {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        errors: FieldErrors,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("EMAIL_SERVICE_URL is not configured")]
    NotConfigured,

    #[error("Email service timed out")]
    Timeout,

    #[error("Failed to send request to email service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Email service rejected the message (code {code:?}): {error}")]
    Rejected { code: Option<u16>, error: String },
}

impl DeliveryError {
    pub fn code(&self) -> Option<u16> {
        match self {
            DeliveryError::Timeout => Some(TIMEOUT_CODE),
            DeliveryError::Rejected { code, .. } => *code,
            DeliveryError::NotConfigured | DeliveryError::Transport(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    sender_name: &'a str,
    sender_email: &'a str,
    subject: String,
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmailResponse {
    success: bool,
    message_id: Option<String>,
    error: Option<String>,
    code: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaptchaResponse {
    success: bool,
}

// ==================== Validation ====================

/// Validate a form, collecting every violation with localized messages.
pub fn validate(form: &ContactForm, locale: Locale) -> Result<ValidContact, FieldErrors> {
    let strings = LocaleStrings::for_locale(locale);
    let mut errors = FieldErrors::default();

    let name = form.name.trim();
    let name_length = name.chars().count();
    if name_length < MIN_NAME_LENGTH {
        errors.name.push(strings.name_min.to_string());
    }
    if name_length > MAX_NAME_LENGTH {
        errors.name.push(strings.name_max.to_string());
    }
    if !name_regex().is_match(name) {
        errors.name.push(strings.name_regex.to_string());
    }

    let email = form.email.trim();
    if !is_valid_email(email) {
        errors.email.push(strings.email_invalid.to_string());
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.email.push(strings.email_max.to_string());
    }

    let message = form.message.trim();
    let message_length = message.chars().count();
    if message_length < MIN_MESSAGE_LENGTH {
        errors.message.push(strings.message_min.to_string());
    }
    if message_length > MAX_MESSAGE_LENGTH {
        errors.message.push(strings.message_max.to_string());
    }

    if errors.is_empty() {
        Ok(ValidContact {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    } else {
        Err(errors)
    }
}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && email_regex().is_match(email)
}

// ==================== External Services ====================

/// Verify a CAPTCHA token. Any failure counts as "not verified".
pub async fn verify_captcha(config: &Config, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let Some(secret) = config.recaptcha_secret_key.as_deref() else {
        warn!("RECAPTCHA_SECRET_KEY not set, rejecting CAPTCHA token");
        return false;
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&config.recaptcha_verify_url)
        .form(&[("secret", secret), ("response", token)])
        .timeout(config.request_timeout)
        .send()
        .await;

    match response {
        Ok(response) => match response.json::<CaptchaResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                warn!("Failed to parse CAPTCHA verification response: {}", e);
                false
            }
        },
        Err(e) => {
            error!("CAPTCHA verification failed: {}", e);
            false
        }
    }
}

/// Hand a validated message to the email service.
///
/// Returns the provider's message id when it reports one.
pub async fn send_contact_email(
    config: &Config,
    contact: &ValidContact,
) -> Result<Option<String>, DeliveryError> {
    let url = config
        .email_service_url
        .as_deref()
        .ok_or(DeliveryError::NotConfigured)?;

    let request = EmailRequest {
        sender_name: &contact.name,
        sender_email: &contact.email,
        subject: format!("Contact form: {}", contact.name),
        message: &contact.message,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .json(&request)
        .timeout(config.request_timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                DeliveryError::Timeout
            } else {
                DeliveryError::Transport(e)
            }
        })?;

    let status = response.status();
    let body: EmailResponse = match response.json().await {
        Ok(body) => body,
        Err(e) if e.is_timeout() => return Err(DeliveryError::Timeout),
        Err(e) => {
            warn!("Unreadable email service response ({}): {}", status, e);
            EmailResponse {
                code: Some(status.as_u16()),
                ..EmailResponse::default()
            }
        }
    };

    if status.is_success() && body.success {
        return Ok(body.message_id);
    }

    Err(DeliveryError::Rejected {
        code: body.code.or(Some(status.as_u16())),
        error: body.error.unwrap_or_else(|| "unknown error".to_string()),
    })
}

/// Localized message for an email-service failure code.
pub fn delivery_message(locale: Locale, code: Option<u16>) -> &'static str {
    let strings = LocaleStrings::for_locale(locale);
    match code {
        Some(400) | Some(422) => strings.contact_invalid_request,
        Some(408) | Some(504) => strings.contact_timeout,
        Some(429) => strings.contact_rate_limited,
        Some(500) | Some(502) | Some(503) => strings.contact_service_unavailable,
        _ => strings.contact_failed,
    }
}

// ==================== Submission ====================

/// Validate, verify and deliver a contact form submission.
pub async fn submit_contact_form(
    config: &Config,
    form: &ContactForm,
    locale: Locale,
) -> ContactOutcome {
    let strings = LocaleStrings::for_locale(locale);

    let contact = match validate(form, locale) {
        Ok(contact) => contact,
        Err(errors) => {
            info!("Contact form rejected by validation ({})", locale);
            return ContactOutcome::Invalid {
                message: None,
                errors,
            };
        }
    };

    if config.test_mode {
        info!("Test mode: skipping CAPTCHA verification");
    } else if !verify_captcha(config, form.recaptcha_token.as_deref().unwrap_or_default()).await {
        return ContactOutcome::Invalid {
            message: Some(strings.verification_failed.to_string()),
            errors: FieldErrors {
                recaptcha: vec!["Verification failed".to_string()],
                ..FieldErrors::default()
            },
        };
    }

    match send_contact_email(config, &contact).await {
        Ok(message_id) => {
            info!("Contact email sent (message id {:?})", message_id);
            ContactOutcome::Sent {
                message: strings.contact_success.to_string(),
            }
        }
        Err(e) => {
            error!("Contact email delivery failed: {}", e);
            let code = e.code();
            ContactOutcome::Failed {
                code,
                message: delivery_message(locale, code).to_string(),
            }
        }
    }
}
