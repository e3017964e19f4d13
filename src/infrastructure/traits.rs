//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities;
use crate::infrastructure::mailer::{EmailReceipt, MailerError, OutgoingEmail};
use crate::infrastructure::subscribers::{NewSubscriber, StoreError, SubscriberStats};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A pending or confirmed consultation already holds this coach, date and time.
    #[error("time slot already booked")]
    SlotTaken,

    /// The consultation names a coach that does not exist.
    #[error("coach does not exist")]
    UnknownCoach,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait SchedulingRepository: Send + Sync {
    /// Lists coaches ordered by name, optionally only the active ones.
    async fn list_coaches(&self, active_only: bool) -> Result<Vec<entities::Coach>, RepositoryError>;

    async fn find_coach(&self, coach_id: Uuid) -> Result<Option<entities::Coach>, RepositoryError>;

    async fn count_coaches(&self) -> Result<i64, RepositoryError>;

    async fn insert_coaches(&self, coaches: Vec<entities::Coach>) -> Result<(), RepositoryError>;

    /// Slots of one coach on one date with the availability flag set, ordered by start time.
    async fn list_open_slots(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<entities::TimeSlot>, RepositoryError>;

    /// Start times held by pending or confirmed consultations of one coach on one date.
    async fn list_booked_times(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, RepositoryError>;

    async fn list_all_slots(&self) -> Result<Vec<entities::TimeSlot>, RepositoryError>;

    /// Inserts slots, skipping any that collide on (coach, date, start time).
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_slots(&self, slots: &[entities::TimeSlot]) -> Result<u64, RepositoryError>;

    async fn delete_all_slots(&self) -> Result<u64, RepositoryError>;

    async fn list_consultations(&self) -> Result<Vec<entities::Consultation>, RepositoryError>;

    /// Checks the slot and inserts the consultation in one transaction.
    ///
    /// Returns `Err(RepositoryError::SlotTaken)` if the coach already has a live booking at that
    /// date and time.
    async fn create_consultation(
        &self,
        consultation: entities::Consultation,
    ) -> Result<entities::Consultation, RepositoryError>;
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Inserts or replaces the subscriber with the same email, keeping the original id.
    async fn save(&self, subscriber: NewSubscriber) -> Result<entities::Subscriber, StoreError>;

    /// Active subscribers, newest first.
    async fn list_active(&self) -> Result<Vec<entities::Subscriber>, StoreError>;

    async fn stats(&self) -> Result<SubscriberStats, StoreError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<EmailReceipt, MailerError>;
}
