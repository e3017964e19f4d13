//! File backed subscriber store
//!
//! Subscribers are kept as a pretty-printed JSON array, keyed by email. A missing file reads as
//! an empty list. A file that cannot be parsed reads as empty too, and the next save moves it
//! aside to `<name>.corrupt-<unix time>` before writing a fresh one, so no lead is ever
//! overwritten.

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::entities::Subscriber;
use crate::infrastructure::traits::SubscriberStore;
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, inject, injectable};
use log::{debug, error, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const DEFAULT_SOURCE: &str = "cookbook-download";
const UNKNOWN_COOKBOOK: &str = "unknown";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("subscriber file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("subscriber file could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("subscriber file is not a valid subscriber list: {0}")]
    Corrupt(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: String,
    pub cookbook_id: Option<String>,
    pub cookbook_title: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriberStats {
    pub by_cookbook: BTreeMap<String, usize>,
    pub total: usize,
}

pub struct FileSubscriberStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[injectable(SubscriberStore)]
impl FileSubscriberStore {
    #[inject]
    pub fn create(config: Ref<AppConfig>) -> FileSubscriberStore {
        FileSubscriberStore::new(config.subscribers_file())
    }
}

impl FileSubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> FileSubscriberStore {
        FileSubscriberStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Subscriber>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents).map_err(StoreError::Corrupt)
    }

    /// Reads for reporting: an unreadable file is logged and reported as empty.
    async fn read_for_listing(&self) -> Vec<Subscriber> {
        self.read_all().await.unwrap_or_else(|e| {
            error!("Error reading subscribers from {}: {e}", self.path.display());
            Vec::new()
        })
    }

    /// Reads for updating. A corrupt file is renamed out of the way so the write that follows
    /// cannot destroy it; any other read failure aborts the update.
    async fn read_for_update(&self) -> Result<Vec<Subscriber>, StoreError> {
        match self.read_all().await {
            Err(StoreError::Corrupt(e)) => {
                let mut quarantine = self.path.clone().into_os_string();
                quarantine.push(format!(".corrupt-{}", Utc::now().timestamp()));
                fs::rename(&self.path, &quarantine).await?;
                warn!(
                    "subscriber file {} could not be parsed ({e}), moved to {}",
                    self.path.display(),
                    PathBuf::from(&quarantine).display()
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn write_all(&self, subscribers: &[Subscriber]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let contents = serde_json::to_string_pretty(subscribers)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("wrote {} subscribers to {}", subscribers.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for FileSubscriberStore {
    async fn save(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let _guard = self.lock.lock().await;
        let mut subscribers = self.read_for_update().await?;

        let existing = subscribers
            .iter()
            .position(|s| s.email == subscriber.email);

        let saved = Subscriber {
            id: existing.map_or_else(
                || Uuid::new_v4().to_string(),
                |index| subscribers[index].id.clone(),
            ),
            email: subscriber.email,
            cookbook_id: subscriber.cookbook_id,
            cookbook_title: subscriber.cookbook_title,
            subscribed_at: Utc::now(),
            source: Some(
                subscriber
                    .source
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_owned()),
            ),
            is_active: true,
        };

        match existing {
            Some(index) => subscribers[index] = saved.clone(),
            None => subscribers.push(saved.clone()),
        }

        self.write_all(&subscribers).await?;
        Ok(saved)
    }

    async fn list_active(&self) -> Result<Vec<Subscriber>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut active: Vec<Subscriber> = self
            .read_for_listing()
            .await
            .into_iter()
            .filter(|s| s.is_active)
            .collect();

        active.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(active)
    }

    async fn stats(&self) -> Result<SubscriberStats, StoreError> {
        let active = self.list_active().await?;

        let mut stats = SubscriberStats {
            total: active.len(),
            ..SubscriberStats::default()
        };
        for subscriber in active {
            let key = subscriber
                .cookbook_id
                .unwrap_or_else(|| UNKNOWN_COOKBOOK.to_owned());
            *stats.by_cookbook.entry(key).or_default() += 1;
        }

        Ok(stats)
    }
}
