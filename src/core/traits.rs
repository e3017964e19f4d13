//! DI "Interfaces"

use crate::core::availability::{AvailableSlot, CoachSelection};
use crate::core::booking::BookingRequest;
use crate::core::email::ConsultationNotice;
use crate::core::errors::ServiceError;
use crate::infrastructure::entities;
use crate::infrastructure::mailer::EmailReceipt;
use crate::infrastructure::subscribers::SubscriberStats;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Outcome of a slot seeding run.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Coaches slots were generated for, as `(id, name)`.
    pub coaches: Vec<(Uuid, String)>,
    /// Rows actually inserted; collisions and failed batches are not counted.
    pub inserted_slots: u64,
}

/// Everything the scheduling tables hold, for troubleshooting.
#[derive(Debug, Clone, Default)]
pub struct SchedulingSnapshot {
    pub coaches: Vec<entities::Coach>,
    pub time_slots: Vec<entities::TimeSlot>,
    pub consultations: Vec<entities::Consultation>,
}

#[derive(Debug, Clone, Default)]
pub struct CookbookRequest {
    pub email: Option<String>,
    pub cookbook_id: Option<String>,
    pub cookbook_title: Option<String>,
}

#[async_trait]
pub trait SchedulingService: Send + Sync {
    /// Active coaches ordered by name.
    async fn list_coaches(&self) -> Result<Vec<entities::Coach>, ServiceError>;

    /// Open slots for one coach, or merged across active coaches for "no preference".
    async fn available_slots(
        &self,
        selection: CoachSelection,
        date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, ServiceError>;

    /// Validates and stores a consultation, then sends the confirmation emails.
    ///
    /// Returns `Err(ServiceError::SlotUnavailable)` if the named coach is already booked at that
    /// time. Email failures are logged and never fail the booking.
    async fn book_consultation(
        &self,
        request: BookingRequest,
    ) -> Result<entities::Consultation, ServiceError>;

    /// Seeds the default coaches into an empty database and tops up slots for active coaches.
    async fn initialize(&self, today: NaiveDate) -> Result<SeedReport, ServiceError>;

    /// Deletes every slot and regenerates them for all coaches.
    async fn regenerate_slots(&self, today: NaiveDate) -> Result<SeedReport, ServiceError>;

    async fn snapshot(&self) -> Result<SchedulingSnapshot, ServiceError>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Sends the client confirmation, then the admin notice.
    async fn send_consultation_confirmation(
        &self,
        notice: &ConsultationNotice,
    ) -> Result<(), ServiceError>;

    /// Sends a fixed message to the admin address.
    async fn send_test_email(&self) -> Result<EmailReceipt, ServiceError>;
}

#[async_trait]
pub trait LeadService: Send + Sync {
    /// Records the subscriber and emails the cookbook download link.
    ///
    /// A failure to record the subscriber is logged and does not stop the email.
    async fn send_cookbook(&self, request: CookbookRequest) -> Result<EmailReceipt, ServiceError>;

    async fn list_subscribers(&self) -> Result<Vec<entities::Subscriber>, ServiceError>;

    async fn subscriber_stats(&self) -> Result<SubscriberStats, ServiceError>;
}
