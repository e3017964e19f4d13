//! ExecFit coaching site backend - Library exports for testing
//!
//! (c) ExecFit 2026

pub mod api;
pub mod core;
pub mod infrastructure;

use crate::core::services::{MyLeadService, MyNotificationService, MySchedulingService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::mailer::ResendMailer;
use crate::infrastructure::repositories::DbSchedulingRepository;
use crate::infrastructure::subscribers::FileSubscriberStore;
use di::{Injectable, ServiceCollection};

/// Registers every service the HTTP handlers inject.
pub fn service_collection() -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services
        .add(AppConfig::singleton())
        .add(DatabaseConnection::singleton())
        .add(ResendMailer::singleton())
        .add(FileSubscriberStore::singleton())
        .add(DbSchedulingRepository::scoped())
        .add(MyNotificationService::scoped())
        .add(MySchedulingService::scoped())
        .add(MyLeadService::scoped());
    services
}
