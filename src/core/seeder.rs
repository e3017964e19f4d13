//! Weekday slot generation and the default coach roster.

use crate::infrastructure::entities::{Coach, TimeSlot};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use uuid::Uuid;

/// How many days ahead of today slots are generated for.
pub const SEED_HORIZON_DAYS: u64 = 30;

/// Slots are written to the database in chunks of this size.
pub const SEED_BATCH_SIZE: usize = 100;

/// Start hours of the daily slots. Every slot lasts one hour.
pub const SLOT_START_HOURS: [u32; 7] = [9, 10, 11, 14, 15, 16, 17];

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Bookable dates: tomorrow through `SEED_HORIZON_DAYS` days out, weekdays only.
pub fn seed_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..=SEED_HORIZON_DAYS)
        .filter_map(move |offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
}

pub fn generate_slots(coach_ids: &[Uuid], today: NaiveDate) -> Vec<TimeSlot> {
    let created_at = Utc::now();
    let mut slots = Vec::new();

    for &coach_id in coach_ids {
        for date in seed_dates(today) {
            for start_time in SLOT_START_HOURS
                .iter()
                .filter_map(|&hour| NaiveTime::from_hms_opt(hour, 0, 0))
            {
                slots.push(TimeSlot {
                    id: Uuid::new_v4(),
                    coach_id,
                    date,
                    start_time,
                    end_time: start_time + TimeDelta::hours(1),
                    is_available: true,
                    created_at,
                });
            }
        }
    }

    slots
}

/// The coaches inserted into an empty database.
pub fn default_coaches() -> Vec<Coach> {
    [
        (
            "Gabriela Garcia",
            "gabriela@execfitnow.com",
            "Personal Trainer | Nutrition Coach",
            "/images/coach-gabriela.jpg",
        ),
        (
            "Maddy Gold",
            "maddy@execfitnow.com",
            "Certified Personal Trainer | PN1 Nutrition Coach",
            "/images/coach-maddy.jpg",
        ),
        (
            "Yosof Abuhasan",
            "yosof@execfitnow.com",
            "Physique/Strength Training/Mindset Coaching",
            "/images/coach-yosof.jpg",
        ),
    ]
    .into_iter()
    .map(|(name, email, specialty, image)| Coach {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        email: email.to_owned(),
        specialty: specialty.to_owned(),
        image: image.to_owned(),
        timezone: DEFAULT_TIMEZONE.to_owned(),
        is_active: true,
        created_at: Utc::now(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dates_skip_weekends_and_today() {
        // Friday
        let today = date(2025, 1, 31);
        let dates: Vec<_> = seed_dates(today).collect();

        assert_eq!(dates.first(), Some(&date(2025, 2, 3)));
        assert!(dates.iter().all(|d| *d > today));
        assert!(dates.iter().all(|d| *d <= date(2025, 3, 2)));
        assert!(
            dates
                .iter()
                .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        );
        // 30 days from a Friday cover 4 full weeks plus Sat and Sun
        assert_eq!(dates.len(), 20);
    }

    #[test]
    fn seven_one_hour_slots_per_weekday() {
        let coach_id = Uuid::new_v4();
        let today = date(2025, 1, 31);
        let slots = generate_slots(&[coach_id], today);

        assert_eq!(slots.len(), 20 * 7);

        let first_day: Vec<_> = slots.iter().filter(|s| s.date == date(2025, 2, 3)).collect();
        assert_eq!(first_day.len(), 7);
        assert_eq!(first_day[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(first_day[6].end_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert!(
            first_day
                .iter()
                .all(|s| s.end_time - s.start_time == TimeDelta::hours(1))
        );
    }

    #[test]
    fn slot_keys_are_unique_across_coaches() {
        let coaches = [Uuid::new_v4(), Uuid::new_v4()];
        let slots = generate_slots(&coaches, date(2025, 6, 1));

        let keys: HashSet<_> = slots
            .iter()
            .map(|s| (s.coach_id, s.date, s.start_time))
            .collect();
        assert_eq!(keys.len(), slots.len());
    }

    #[test]
    fn default_roster_has_three_active_coaches() {
        let coaches = default_coaches();
        assert_eq!(coaches.len(), 3);
        assert!(coaches.iter().all(|c| c.is_active));
        assert_eq!(coaches[1].email, "maddy@execfitnow.com");
    }
}
