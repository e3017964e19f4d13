pub mod config;
pub mod database;
pub mod entities;
pub mod mailer;
pub mod repositories;
pub mod subscribers;
pub mod traits;
