//! Environment configuration

use di::inject;
use di::injectable;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

static TEST_CONFIG: Mutex<Option<AppConfig>> = Mutex::new(None);

const DEFAULT_DATABASE_URL: &str = "sqlite:data/execfit.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_ADMIN_EMAIL: &str = "admin@execfitnow.com";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_COOKBOOK_DIR: &str = "public/cookbooks";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub resend_api_key: Option<String>,
    pub email_api_url: String,
    pub public_base_url: String,
    pub admin_email: String,
    pub data_dir: PathBuf,
    pub cookbook_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

#[injectable]
impl AppConfig {
    #[inject]
    pub fn create() -> AppConfig {
        if let Some(config) = Self::test_config() {
            return config;
        }

        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl AppConfig {
    /// Builds the configuration from an arbitrary key lookup, falling back to defaults for
    /// anything missing or blank.
    pub fn from_lookup<F>(lookup: F) -> AppConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    info!("{key} not set, using default: {default}");
                    default.to_owned()
                }
            }
        };

        let resend_api_key = lookup("RESEND_API_KEY").filter(|key| !key.trim().is_empty());
        if resend_api_key.is_none() {
            warn!("RESEND_API_KEY not set, outgoing email is disabled");
        }

        AppConfig {
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_address: var("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            resend_api_key,
            email_api_url: var("EMAIL_API_URL", DEFAULT_EMAIL_API_URL),
            public_base_url: normalize_base_url(&var("PUBLIC_BASE_URL", DEFAULT_BASE_URL)),
            admin_email: var("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
            data_dir: PathBuf::from(var("DATA_DIR", DEFAULT_DATA_DIR)),
            cookbook_dir: PathBuf::from(var("COOKBOOK_DIR", DEFAULT_COOKBOOK_DIR)),
            cors_origins: var("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Path of the JSON subscriber file.
    pub fn subscribers_file(&self) -> PathBuf {
        self.data_dir.join("subscribers.json")
    }

    /// Makes every `AppConfig` created through DI return `config` until cleared.
    pub fn set_test_config(config: AppConfig) {
        *TEST_CONFIG.lock().unwrap_or_else(|e| e.into_inner()) = Some(config);
    }

    pub fn clear_test_config() {
        *TEST_CONFIG.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn test_config() -> Option<AppConfig> {
        TEST_CONFIG
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Adds `https://` to bare host names and drops trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}
