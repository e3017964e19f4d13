//! Transactional email over the Resend HTTP API

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::traits::Mailer;
use async_trait::async_trait;
use di::{Ref, inject, injectable};
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement for an accepted email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("RESEND_API_KEY environment variable is not set")]
    NotConfigured,

    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

pub struct ResendMailer {
    client: Client,
    config: Ref<AppConfig>,
}

#[injectable(Mailer)]
impl ResendMailer {
    #[inject]
    pub fn create(config: Ref<AppConfig>) -> ResendMailer {
        ResendMailer {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<EmailReceipt, MailerError> {
        let api_key = self
            .config
            .resend_api_key
            .as_deref()
            .ok_or(MailerError::NotConfigured)?;

        info!("sending \"{}\" to {}", email.subject, email.to.join(", "));

        let response = self
            .client
            .post(&self.config.email_api_url)
            .bearer_auth(api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("email provider answered {status}: {body}");
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
