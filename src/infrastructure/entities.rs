//! Database entities

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Coach {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub image: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TimeSlot {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, FromRow)]
pub struct Consultation {
    pub id: Uuid,
    pub coach_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub consultation_date: NaiveDate,
    pub consultation_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: ConsultationStatus,
    pub client_goals: Option<String>,
    pub client_experience: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cookbook lead, stored as-is in the subscriber file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Opaque; older files carry millisecond timestamps here.
    pub id: String,
    pub email: String,
    pub cookbook_id: Option<String>,
    pub cookbook_title: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub source: Option<String>,
    pub is_active: bool,
}
