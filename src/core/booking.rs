//! Booking request validation

use crate::core::availability::CoachSelection;
use crate::core::errors::ServiceError;
use crate::infrastructure::entities::{Consultation, ConsultationStatus};
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub const CONSULTATION_MINUTES: i32 = 30;

/// A booking as submitted by the client; every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub coach_id: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub consultation_date: Option<String>,
    pub consultation_time: Option<String>,
    pub client_goals: Option<String>,
    pub client_experience: Option<String>,
}

impl BookingRequest {
    /// Turns the request into a new pending consultation.
    ///
    /// Blank strings count as missing. A coach id of `no-preference` (or none at all) leaves the
    /// consultation unassigned.
    pub fn into_consultation(self) -> Result<Consultation, ServiceError> {
        let (
            Some(client_name),
            Some(client_email),
            Some(client_phone),
            Some(date),
            Some(time),
        ) = (
            non_blank(self.client_name),
            non_blank(self.client_email),
            non_blank(self.client_phone),
            non_blank(self.consultation_date),
            non_blank(self.consultation_time),
        )
        else {
            return Err(ServiceError::validation("Missing required fields"));
        };

        let coach_id = match non_blank(self.coach_id) {
            None => None,
            Some(raw) => match raw.parse::<CoachSelection>() {
                Ok(CoachSelection::Coach(id)) => Some(id),
                Ok(CoachSelection::NoPreference) => None,
                Err(e) => return Err(ServiceError::validation(e.to_string())),
            },
        };

        let now = Utc::now();
        Ok(Consultation {
            id: Uuid::new_v4(),
            coach_id,
            client_name,
            client_email,
            client_phone,
            consultation_date: parse_date(&date)?,
            consultation_time: parse_time(&time)?,
            duration_minutes: CONSULTATION_MINUTES,
            status: ConsultationStatus::Pending,
            client_goals: non_blank(self.client_goals),
            client_experience: non_blank(self.client_experience),
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::validation(format!("Invalid date `{value}`")))
}

/// Parses `HH:MM:SS` or `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, ServiceError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ServiceError::validation(format!("Invalid time `{value}`")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> BookingRequest {
        BookingRequest {
            coach_id: Some(Uuid::new_v4().to_string()),
            client_name: Some("Jordan Lee".to_owned()),
            client_email: Some("jordan@example.com".to_owned()),
            client_phone: Some("555-0100".to_owned()),
            consultation_date: Some("2025-02-03".to_owned()),
            consultation_time: Some("09:00:00".to_owned()),
            client_goals: Some("Lose 10 lbs".to_owned()),
            client_experience: Some("  ".to_owned()),
        }
    }

    #[test]
    fn complete_request_becomes_pending_consultation() {
        let consultation = complete_request().into_consultation().unwrap();

        assert!(consultation.coach_id.is_some());
        assert_eq!(consultation.status, ConsultationStatus::Pending);
        assert_eq!(consultation.duration_minutes, 30);
        assert_eq!(
            consultation.consultation_time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(consultation.client_goals.as_deref(), Some("Lose 10 lbs"));
        assert_eq!(consultation.client_experience, None);
    }

    #[test]
    fn every_required_field_is_checked() {
        let blankers: [fn(&mut BookingRequest); 5] = [
            |r| r.client_name = None,
            |r| r.client_email = Some(String::new()),
            |r| r.client_phone = Some("   ".to_owned()),
            |r| r.consultation_date = None,
            |r| r.consultation_time = None,
        ];

        for blank in blankers {
            let mut request = complete_request();
            blank(&mut request);

            let err = request.into_consultation().unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref m) if m == "Missing required fields"));
        }
    }

    #[test]
    fn no_preference_leaves_coach_unassigned() {
        let mut request = complete_request();
        request.coach_id = Some("no-preference".to_owned());
        assert_eq!(request.into_consultation().unwrap().coach_id, None);

        let mut request = complete_request();
        request.coach_id = None;
        assert_eq!(request.into_consultation().unwrap().coach_id, None);
    }

    #[test]
    fn rejects_garbage_coach_and_time() {
        let mut request = complete_request();
        request.coach_id = Some("maddy".to_owned());
        assert!(request.into_consultation().unwrap_err().is_client_error());

        let mut request = complete_request();
        request.consultation_time = Some("9am".to_owned());
        assert!(request.into_consultation().unwrap_err().is_client_error());
    }

    #[test]
    fn accepts_short_time_format() {
        assert_eq!(
            parse_time("14:00").unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        );
    }
}
