//! Coach, availability and booking endpoints

use crate::api::JsonBody;
use crate::api::error::ApiError;
use crate::core::availability::CoachSelection;
use crate::core::booking;
use crate::core::traits::SchedulingService;
use axum::extract::Query;
use axum::routing::{get, post};
use axum::{Json, Router};
use di_axum::Inject;
use log::info;

pub fn router() -> Router {
    Router::new()
        .route("/coaches", get(list_coaches))
        .route("/consultations/availability", get(availability))
        .route("/consultations/book", post(book_consultation))
}

async fn list_coaches(
    Inject(scheduling): Inject<dyn SchedulingService>,
) -> Result<Json<Vec<schemas::Coach>>, ApiError> {
    let coaches = scheduling.list_coaches().await?;
    Ok(Json(coaches.into_iter().map(schemas::Coach::from).collect()))
}

async fn availability(
    Inject(scheduling): Inject<dyn SchedulingService>,
    Query(query): Query<schemas::AvailabilityQuery>,
) -> Result<Json<Vec<schemas::AvailableSlot>>, ApiError> {
    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Date is required"))?;
    let coach = query
        .coach_id
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Coach ID is required"))?;

    let date = booking::parse_date(&date)?;
    let selection = coach
        .parse::<CoachSelection>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let slots = scheduling.available_slots(selection, date).await?;
    info!("{} open slots for {coach} on {date}", slots.len());

    Ok(Json(
        slots.into_iter().map(schemas::AvailableSlot::from).collect(),
    ))
}

async fn book_consultation(
    Inject(scheduling): Inject<dyn SchedulingService>,
    JsonBody(request): JsonBody<schemas::BookConsultation>,
) -> Result<Json<schemas::Consultation>, ApiError> {
    let consultation = scheduling.book_consultation(request.into()).await?;
    Ok(Json(consultation.into()))
}

pub mod schemas {
    use crate::core::availability;
    use crate::core::booking::BookingRequest;
    use crate::infrastructure::entities;
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Deserialize, Debug)]
    pub struct AvailabilityQuery {
        pub coach_id: Option<String>,
        pub date: Option<String>,
    }

    #[derive(Serialize, Debug)]
    pub struct Coach {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub specialty: String,
        pub image: String,
        pub timezone: String,
        pub is_active: bool,
    }

    impl From<entities::Coach> for Coach {
        fn from(coach: entities::Coach) -> Self {
            Coach {
                id: coach.id,
                name: coach.name,
                email: coach.email,
                specialty: coach.specialty,
                image: coach.image,
                timezone: coach.timezone,
                is_active: coach.is_active,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct AvailableSlot {
        pub id: Uuid,
        pub coach_id: Uuid,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
        pub coach_name: String,
        pub coach_specialty: String,
    }

    impl From<availability::AvailableSlot> for AvailableSlot {
        fn from(slot: availability::AvailableSlot) -> Self {
            AvailableSlot {
                id: slot.id,
                coach_id: slot.coach_id,
                start_time: slot.start_time,
                end_time: slot.end_time,
                coach_name: slot.coach_name,
                coach_specialty: slot.coach_specialty,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct TimeSlot {
        pub id: Uuid,
        pub coach_id: Uuid,
        pub date: NaiveDate,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
        pub is_available: bool,
    }

    impl From<entities::TimeSlot> for TimeSlot {
        fn from(slot: entities::TimeSlot) -> Self {
            TimeSlot {
                id: slot.id,
                coach_id: slot.coach_id,
                date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                is_available: slot.is_available,
            }
        }
    }

    /// Every field is optional here so that a missing one turns into a 400, not a 422.
    #[derive(Deserialize, Debug, Default)]
    pub struct BookConsultation {
        pub coach_id: Option<String>,
        pub client_name: Option<String>,
        pub client_email: Option<String>,
        pub client_phone: Option<String>,
        pub consultation_date: Option<String>,
        pub consultation_time: Option<String>,
        pub client_goals: Option<String>,
        pub client_experience: Option<String>,
    }

    impl From<BookConsultation> for BookingRequest {
        fn from(request: BookConsultation) -> Self {
            BookingRequest {
                coach_id: request.coach_id,
                client_name: request.client_name,
                client_email: request.client_email,
                client_phone: request.client_phone,
                consultation_date: request.consultation_date,
                consultation_time: request.consultation_time,
                client_goals: request.client_goals,
                client_experience: request.client_experience,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct Consultation {
        pub id: Uuid,
        pub coach_id: Option<Uuid>,
        pub client_name: String,
        pub client_email: String,
        pub client_phone: String,
        pub consultation_date: NaiveDate,
        pub consultation_time: NaiveTime,
        pub duration_minutes: i32,
        pub status: entities::ConsultationStatus,
        pub client_goals: Option<String>,
        pub client_experience: Option<String>,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<entities::Consultation> for Consultation {
        fn from(consultation: entities::Consultation) -> Self {
            Consultation {
                id: consultation.id,
                coach_id: consultation.coach_id,
                client_name: consultation.client_name,
                client_email: consultation.client_email,
                client_phone: consultation.client_phone,
                consultation_date: consultation.consultation_date,
                consultation_time: consultation.consultation_time,
                duration_minutes: consultation.duration_minutes,
                status: consultation.status,
                client_goals: consultation.client_goals,
                client_experience: consultation.client_experience,
                notes: consultation.notes,
                created_at: consultation.created_at,
                updated_at: consultation.updated_at,
            }
        }
    }
}
