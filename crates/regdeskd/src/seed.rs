//! Sample data for local demos.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use regdesk_dashboard::fields::{
    ADDITIONAL_PROGRAMS, HEAR_ABOUT_US, PROFESSIONS, SPECIALIZATIONS, TRAINING_PROGRAMS,
};
use regdesk_state::{RegistrationDraft, RegistrationStatus, StateResult, StateStore};
use tracing::info;

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Priya", "Rohan", "Meera", "Vikram", "Ananya", "Kabir", "Isha", "Arjun", "Neha",
];
const LAST_NAMES: &[&str] = &["Sharma", "Iyer", "Patel", "Reddy", "Khan", "Menon", "Das"];
const INSTITUTIONS: &[&str] = &[
    "City General Hospital",
    "St. Mary's Medical College",
    "Apex Heart Institute",
    "Lakeside Clinic",
];

fn pick<'a>(items: &[&'a str], n: usize) -> &'a str {
    items[n % items.len()]
}

/// Deterministic sample draft number `n`.
pub fn sample_draft(n: usize) -> RegistrationDraft {
    let first = pick(FIRST_NAMES, n);
    let last = pick(LAST_NAMES, n / FIRST_NAMES.len() + n);
    let base = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).single();

    RegistrationDraft {
        full_name: format!("{first} {last}"),
        email: format!("{}.{}{n}@example.com", first.to_lowercase(), last.to_lowercase()),
        phone_number: Some(format!("+91 98{:08}", n.wrapping_mul(7919) % 100_000_000)),
        dob: NaiveDate::from_ymd_opt(1970 + (n % 25) as i32, (n % 12) as u32 + 1, 10),
        experience: Some(format!("{}", n % 20)),
        institution: Some(pick(INSTITUTIONS, n).to_string()),
        call_date_time: base.and_then(|b| {
            let offset = i64::try_from(n).ok()?.checked_mul(9)?;
            b.checked_add_signed(Duration::try_days(offset)?)
        }),
        hear_about_us: Some(pick(HEAR_ABOUT_US, n).to_string()),
        current_profession: Some(pick(PROFESSIONS, n).to_string()),
        specialization: Some(pick(SPECIALIZATIONS, n).to_string()),
        learning_goals: (n % 3 == 0).then(|| "Hands-on robotic console hours".to_string()),
        training_programs: vec![pick(TRAINING_PROGRAMS, n).to_string()],
        additional_programs: if n % 2 == 0 {
            vec![pick(ADDITIONAL_PROGRAMS, n).to_string()]
        } else {
            Vec::new()
        },
        upload_id: None,
        status: Some(RegistrationStatus::ALL[n % RegistrationStatus::ALL.len()]),
        is_expired: None,
    }
}

/// Largest `--count` the CLI accepts.
pub const MAX_SEED_COUNT: u32 = 100_000;

/// Insert `count` sample registrations.
pub fn seed(store: &StateStore, count: usize) -> StateResult<usize> {
    for n in 0..count {
        store.create_registration(sample_draft(n))?;
    }
    info!(count, "sample registrations inserted");
    Ok(count)
}
