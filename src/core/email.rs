//! Email composition.
//!
//! Bodies are minijinja templates registered under `.html` names, so every interpolated value is
//! HTML-escaped unless explicitly marked safe.

use crate::infrastructure::entities::Consultation;
use crate::infrastructure::mailer::OutgoingEmail;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use minijinja::{Environment, Value, context};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use uuid::Uuid;

pub const CONSULTATIONS_SENDER: &str = "ExecFit <consultations@execfitnow.com>";
pub const NOREPLY_SENDER: &str = "ExecFit <noreply@execfitnow.com>";
pub const TEST_SENDER: &str = "ExecFit Test <onboarding@resend.dev>";

const CONFIRMATION_TEMPLATE: (&str, &str) = (
    "consultation_confirmation.html",
    include_str!("../../templates/consultation_confirmation.html"),
);
const ADMIN_NOTICE_TEMPLATE: (&str, &str) = (
    "consultation_admin.html",
    include_str!("../../templates/consultation_admin.html"),
);
const COOKBOOK_TEMPLATE: (&str, &str) = (
    "cookbook_delivery.html",
    include_str!("../../templates/cookbook_delivery.html"),
);
const TEST_TEMPLATE: (&str, &str) = (
    "test_email.html",
    include_str!("../../templates/test_email.html"),
);

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// The consultation fields the confirmation emails need.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationNotice {
    pub coach_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub consultation_date: NaiveDate,
    pub consultation_time: NaiveTime,
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    pub client_goals: Option<String>,
    pub client_experience: Option<String>,
}

fn default_duration() -> i32 {
    crate::core::booking::CONSULTATION_MINUTES
}

impl From<&Consultation> for ConsultationNotice {
    fn from(consultation: &Consultation) -> Self {
        ConsultationNotice {
            coach_id: consultation.coach_id,
            client_name: consultation.client_name.clone(),
            client_email: consultation.client_email.clone(),
            client_phone: consultation.client_phone.clone(),
            consultation_date: consultation.consultation_date,
            consultation_time: consultation.consultation_time,
            duration_minutes: consultation.duration_minutes,
            client_goals: consultation.client_goals.clone(),
            client_experience: consultation.client_experience.clone(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// `Monday, February 3, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `9:00 AM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn consultation_confirmation(
    notice: &ConsultationNotice,
) -> Result<OutgoingEmail, minijinja::Error> {
    let html = render(
        CONFIRMATION_TEMPLATE,
        context! {
            client_name => notice.client_name,
            client_email => notice.client_email,
            date => format_date(notice.consultation_date),
            time => format_time(notice.consultation_time),
            duration_minutes => notice.duration_minutes,
            has_coach => notice.coach_id.is_some(),
        },
    )?;

    Ok(OutgoingEmail {
        from: CONSULTATIONS_SENDER.to_owned(),
        to: vec![notice.client_email.clone()],
        subject: "Your ExecFit Consultation is Confirmed!".to_owned(),
        html,
    })
}

pub fn consultation_admin_notice(
    notice: &ConsultationNotice,
    admin_email: &str,
) -> Result<OutgoingEmail, minijinja::Error> {
    let html = render(
        ADMIN_NOTICE_TEMPLATE,
        context! {
            client_name => notice.client_name,
            client_email => notice.client_email,
            client_phone => notice.client_phone,
            date => format_date(notice.consultation_date),
            time => format_time(notice.consultation_time),
            client_goals => notice.client_goals,
            client_experience => notice.client_experience,
        },
    )?;

    Ok(OutgoingEmail {
        from: CONSULTATIONS_SENDER.to_owned(),
        to: vec![admin_email.to_owned()],
        subject: "New Consultation Booking".to_owned(),
        html,
    })
}

/// `download_url` is inserted verbatim, so it must not contain untrusted input.
pub fn cookbook_delivery(
    to: &str,
    cookbook_title: &str,
    download_url: &str,
) -> Result<OutgoingEmail, minijinja::Error> {
    let html = render(
        COOKBOOK_TEMPLATE,
        context! {
            cookbook_title => cookbook_title,
            download_url => Value::from_safe_string(download_url.to_owned()),
            year => Utc::now().year(),
        },
    )?;

    Ok(OutgoingEmail {
        from: NOREPLY_SENDER.to_owned(),
        to: vec![to.to_owned()],
        subject: format!("Your {cookbook_title} is Ready! 🍽️"),
        html,
    })
}

pub fn test_message(to: &str) -> Result<OutgoingEmail, minijinja::Error> {
    Ok(OutgoingEmail {
        from: TEST_SENDER.to_owned(),
        to: vec![to.to_owned()],
        subject: "🎉 ExecFit Email Test - Success!".to_owned(),
        html: render(TEST_TEMPLATE, context! {})?,
    })
}

fn render((name, source): (&str, &'static str), ctx: Value) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(name, source)?;
    env.get_template(name)?.render(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> ConsultationNotice {
        ConsultationNotice {
            coach_id: None,
            client_name: "Jordan <b>Lee</b>".to_owned(),
            client_email: "jordan@example.com".to_owned(),
            client_phone: "555-0100".to_owned(),
            consultation_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            consultation_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            duration_minutes: 30,
            client_goals: None,
            client_experience: Some("Beginner".to_owned()),
        }
    }

    #[test]
    fn validates_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
    }

    #[test]
    fn formats_dates_and_times_for_humans() {
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
            "Monday, February 3, 2025"
        );
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()), "9:00 AM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(17, 30, 0).unwrap()), "5:30 PM");
    }

    #[test]
    fn confirmation_escapes_client_input() {
        let email = consultation_confirmation(&notice()).unwrap();

        assert_eq!(email.to, vec!["jordan@example.com"]);
        assert!(email.html.contains("Jordan &lt;b&gt;Lee&lt;"));
        assert!(!email.html.contains("<b>Lee"));
        assert!(email.html.contains("Monday, February 3, 2025"));
        assert!(email.html.contains("2:00 PM"));
        assert!(email.html.contains("Best available coach"));
    }

    #[test]
    fn admin_notice_fills_in_missing_answers() {
        let email = consultation_admin_notice(&notice(), "admin@execfitnow.com").unwrap();

        assert_eq!(email.to, vec!["admin@execfitnow.com"]);
        assert!(email.html.contains("<strong>Goals:</strong> Not specified"));
        assert!(email.html.contains("<strong>Experience:</strong> Beginner"));
    }

    #[test]
    fn cookbook_email_links_to_download() {
        let url = "https://execfitnow.com/api/download-cookbook?id=vegan-exec";
        let email = cookbook_delivery("a@b.co", "VeganExec Cookbook", url).unwrap();

        assert_eq!(email.subject, "Your VeganExec Cookbook is Ready! 🍽️");
        assert!(email.html.contains(&format!("href=\"{url}\"")));
    }
}
