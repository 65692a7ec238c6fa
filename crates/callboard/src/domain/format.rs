//! Display formatting for call rows and transcripts

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;

use crate::domain::timestamp;

static AU_MOBILE: OnceLock<Regex> = OnceLock::new();

fn au_mobile() -> &'static Regex {
    AU_MOBILE.get_or_init(|| Regex::new(r"(\+61)(\d)(\d{4})(\d{4})").expect("valid regex"))
}

/// `9:05 am`
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %P").to_string()
}

/// `Today, 9:05 am` for calls on the same local day as `now`, otherwise `14 Jun, 9:05 am`
pub fn format_call_time<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        format!("Today, {}", format_time(&local))
    } else {
        format!("{}, {}", local.format("%-d %b"), format_time(&local))
    }
}

/// Group Australian numbers: `+61412345678` becomes `+61 4 1234 5678`
pub fn format_phone_number(phone: &str) -> String {
    if phone.starts_with("+61") {
        return au_mobile().replace(phone, "$1 $2 $3 $4").into_owned();
    }
    phone.to_string()
}

/// Truncate by characters, appending `...` when shortened
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

/// Wrap whole-word, case-insensitive keyword matches with `wrap`.
///
/// Keywords are applied one after another over the already-wrapped text.
pub fn highlight_keywords<F>(text: &str, keywords: &[String], wrap: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut highlighted = text.to_string();

    for keyword in keywords.iter().filter(|k| !k.is_empty()) {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
        let Ok(re) = Regex::new(&pattern) else {
            tracing::debug!(keyword = %keyword, "Skipping keyword that does not compile");
            continue;
        };
        highlighted = re
            .replace_all(&highlighted, |caps: &regex::Captures| wrap(&caps[0]))
            .into_owned();
    }

    highlighted
}

/// Date of birth as `dd/mm/yyyy`, or the raw text when it does not parse
pub fn format_dob(dob: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    match timestamp::parse(dob) {
        Some(parsed) => parsed.format("%d/%m/%Y").to_string(),
        None => dob.to_string(),
    }
}

/// Appointment time as `Friday, 14 June 2024, 9:05 am` in `tz`, or the raw text
pub fn format_scheduled<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match timestamp::parse(raw) {
        Some(parsed) => {
            let local = parsed.with_timezone(tz);
            format!("{}, {}", local.format("%A, %-d %B %Y"), format_time(&local))
        }
        None => raw.to_string(),
    }
}

/// Doctor name with a `Dr. ` prefix
pub fn doctor_display(doctor: &str) -> String {
    if doctor.starts_with("Dr.") {
        doctor.to_string()
    } else {
        format!("Dr. {}", doctor)
    }
}
