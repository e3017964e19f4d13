//! Open slot computation.
//!
//! A coach's open slots are the seeded slots for a date minus the start times held by pending or
//! confirmed consultations. With "no preference" the per-coach results are merged and reduced to
//! one entry per start time.

use crate::infrastructure::entities::{Coach, TimeSlot};
use chrono::NaiveTime;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Wire value for "any coach will do".
pub const NO_PREFERENCE: &str = "no-preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachSelection {
    Coach(Uuid),
    NoPreference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCoachId(String);

impl fmt::Display for InvalidCoachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid coach id `{}`", self.0)
    }
}

impl FromStr for CoachSelection {
    type Err = InvalidCoachId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == NO_PREFERENCE {
            return Ok(CoachSelection::NoPreference);
        }

        Uuid::parse_str(s)
            .map(CoachSelection::Coach)
            .map_err(|_| InvalidCoachId(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSlot {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub coach_name: String,
    pub coach_specialty: String,
}

impl AvailableSlot {
    pub fn new(slot: TimeSlot, coach: Option<&Coach>) -> Self {
        AvailableSlot {
            id: slot.id,
            coach_id: slot.coach_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            coach_name: coach.map(|c| c.name.clone()).unwrap_or_default(),
            coach_specialty: coach.map(|c| c.specialty.clone()).unwrap_or_default(),
        }
    }
}

/// Drops every slot whose start time is booked. Order is preserved.
pub fn subtract_booked(slots: Vec<TimeSlot>, booked: &[NaiveTime]) -> Vec<TimeSlot> {
    let booked: HashSet<&NaiveTime> = booked.iter().collect();
    slots
        .into_iter()
        .filter(|slot| !booked.contains(&slot.start_time))
        .collect()
}

/// Sorts by start time and keeps the first slot seen for each start time.
///
/// The sort is stable, so when several coaches share a start time the one that came first in
/// `slots` keeps it.
pub fn merge_no_preference(mut slots: Vec<AvailableSlot>) -> Vec<AvailableSlot> {
    slots.sort_by_key(|slot| slot.start_time);

    let mut seen = HashSet::new();
    slots.retain(|slot| seen.insert(slot.start_time));
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn slot(coach_id: Uuid, hour: u32) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            coach_id,
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            start_time: time(hour),
            end_time: time(hour + 1),
            is_available: true,
            created_at: Utc::now(),
        }
    }

    fn coach(name: &str) -> Coach {
        Coach {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            specialty: "Strength".to_owned(),
            image: String::new(),
            timezone: "America/New_York".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parses_coach_selection() {
        let id = Uuid::new_v4();
        assert_eq!(
            id.to_string().parse::<CoachSelection>(),
            Ok(CoachSelection::Coach(id))
        );
        assert_eq!(
            "no-preference".parse::<CoachSelection>(),
            Ok(CoachSelection::NoPreference)
        );
        assert!("gabriela".parse::<CoachSelection>().is_err());
    }

    #[test]
    fn booked_start_times_are_removed() {
        let coach_id = Uuid::new_v4();
        let slots = vec![slot(coach_id, 9), slot(coach_id, 10), slot(coach_id, 11)];

        let open = subtract_booked(slots, &[time(10)]);

        let starts: Vec<_> = open.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![time(9), time(11)]);
    }

    #[test]
    fn nothing_booked_keeps_everything() {
        let coach_id = Uuid::new_v4();
        let open = subtract_booked(vec![slot(coach_id, 9), slot(coach_id, 14)], &[]);
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn merge_keeps_one_entry_per_start_time() {
        let gabriela = coach("Gabriela");
        let maddy = coach("Maddy");

        let merged = merge_no_preference(vec![
            AvailableSlot::new(slot(gabriela.id, 10), Some(&gabriela)),
            AvailableSlot::new(slot(gabriela.id, 14), Some(&gabriela)),
            AvailableSlot::new(slot(maddy.id, 9), Some(&maddy)),
            AvailableSlot::new(slot(maddy.id, 10), Some(&maddy)),
        ]);

        let starts: Vec<_> = merged.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![time(9), time(10), time(14)]);
        // first coach in input order wins a shared start time
        assert_eq!(merged[1].coach_name, "Gabriela");
    }

    #[test]
    fn unknown_coach_gives_blank_attribution() {
        let available = AvailableSlot::new(slot(Uuid::new_v4(), 9), None);
        assert_eq!(available.coach_name, "");
        assert_eq!(available.coach_specialty, "");
    }
}
