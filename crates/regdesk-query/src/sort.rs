//! Column sorting for registration tables.
//!
//! Every registration field is a valid sort key. Text compares with
//! [`collate`](crate::collate::collate), numbers numerically, timestamps
//! chronologically. Absent values order before present ones.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regdesk_state::Registration;
use serde::{Deserialize, Serialize};

use crate::collate::collate;
use crate::error::QueryError;

/// A sortable registration column, named by its JSON field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    TicketNo,
    #[default]
    FullName,
    Email,
    PhoneNumber,
    Dob,
    Experience,
    Institution,
    CallDateTime,
    HearAboutUs,
    CurrentProfession,
    Specialization,
    LearningGoals,
    TrainingPrograms,
    AdditionalPrograms,
    UploadId,
    Status,
    IsExpired,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub const ALL: [SortKey; 20] = [
        SortKey::Id,
        SortKey::TicketNo,
        SortKey::FullName,
        SortKey::Email,
        SortKey::PhoneNumber,
        SortKey::Dob,
        SortKey::Experience,
        SortKey::Institution,
        SortKey::CallDateTime,
        SortKey::HearAboutUs,
        SortKey::CurrentProfession,
        SortKey::Specialization,
        SortKey::LearningGoals,
        SortKey::TrainingPrograms,
        SortKey::AdditionalPrograms,
        SortKey::UploadId,
        SortKey::Status,
        SortKey::IsExpired,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::TicketNo => "ticketNo",
            SortKey::FullName => "fullName",
            SortKey::Email => "email",
            SortKey::PhoneNumber => "phoneNumber",
            SortKey::Dob => "dob",
            SortKey::Experience => "experience",
            SortKey::Institution => "institution",
            SortKey::CallDateTime => "callDateTime",
            SortKey::HearAboutUs => "hearAboutUs",
            SortKey::CurrentProfession => "currentProfession",
            SortKey::Specialization => "specialization",
            SortKey::LearningGoals => "learningGoals",
            SortKey::TrainingPrograms => "trainingPrograms",
            SortKey::AdditionalPrograms => "additionalPrograms",
            SortKey::UploadId => "uploadId",
            SortKey::Status => "status",
            SortKey::IsExpired => "isExpired",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
        }
    }

    /// Compare two registrations on this column, ascending.
    pub fn compare(self, a: &Registration, b: &Registration) -> Ordering {
        compare_values(&self.value_of(a), &self.value_of(b))
    }

    fn value_of(self, r: &Registration) -> SortValue {
        match self {
            SortKey::Id => SortValue::text(&r.id),
            SortKey::TicketNo => SortValue::from_number(r.ticket_no.map(|n| n as f64)),
            SortKey::FullName => SortValue::text(&r.full_name),
            SortKey::Email => SortValue::text(&r.email),
            SortKey::PhoneNumber => SortValue::opt_text(&r.phone_number),
            SortKey::Dob => SortValue::from_time(
                r.dob
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc().timestamp()),
            ),
            SortKey::Experience => match &r.experience {
                Some(raw) => match raw.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => SortValue::Number(n),
                    _ => SortValue::text(raw),
                },
                None => SortValue::Missing,
            },
            SortKey::Institution => SortValue::opt_text(&r.institution),
            SortKey::CallDateTime => SortValue::from_time(r.call_date_time.map(|dt| dt.timestamp())),
            SortKey::HearAboutUs => SortValue::opt_text(&r.hear_about_us),
            SortKey::CurrentProfession => SortValue::opt_text(&r.current_profession),
            SortKey::Specialization => SortValue::opt_text(&r.specialization),
            SortKey::LearningGoals => SortValue::opt_text(&r.learning_goals),
            SortKey::TrainingPrograms => SortValue::list(&r.training_programs),
            SortKey::AdditionalPrograms => SortValue::list(&r.additional_programs),
            SortKey::UploadId => SortValue::opt_text(&r.upload_id),
            SortKey::Status => SortValue::text(r.status.as_str()),
            SortKey::IsExpired => SortValue::Number(if r.is_expired { 1.0 } else { 0.0 }),
            SortKey::CreatedAt => SortValue::Time(r.created_at.timestamp_micros()),
            SortKey::UpdatedAt => SortValue::Time(r.updated_at.timestamp_micros()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QueryError::InvalidSortKey(wanted.to_string()))
    }
}

/// Projected column value used for ordering.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Missing,
    Number(f64),
    Time(i64),
    Text(String),
}

impl SortValue {
    fn text(s: &str) -> Self {
        SortValue::Text(s.to_string())
    }

    fn opt_text(s: &Option<String>) -> Self {
        s.as_deref().map_or(SortValue::Missing, SortValue::text)
    }

    fn list(items: &[String]) -> Self {
        if items.is_empty() {
            SortValue::Missing
        } else {
            SortValue::Text(items.join(", "))
        }
    }

    fn from_number(n: Option<f64>) -> Self {
        n.map_or(SortValue::Missing, SortValue::Number)
    }

    fn from_time(t: Option<i64>) -> Self {
        t.map_or(SortValue::Missing, SortValue::Time)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Time(_) => 2,
            SortValue::Text(_) => 3,
        }
    }
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Time(x), SortValue::Time(y)) => x.cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => collate(x, y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Stable sort on `key`. Descending uses the reversed comparator, so
/// distinct values come out in exactly the opposite order.
pub fn sort_records(records: &mut [&Registration], key: SortKey, ascending: bool) {
    records.sort_by(|a, b| {
        let ord = key.compare(a, b);
        if ascending { ord } else { ord.reverse() }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use regdesk_state::RegistrationStatus;

    fn reg(name: &str, ticket: u64, experience: Option<&str>) -> Registration {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Registration {
            id: format!("id-{ticket}"),
            ticket_no: Some(ticket),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: None,
            dob: None,
            experience: experience.map(str::to_string),
            institution: None,
            call_date_time: None,
            hear_about_us: None,
            current_profession: None,
            specialization: None,
            learning_goals: None,
            training_programs: vec![],
            additional_programs: vec![],
            upload_id: None,
            status: RegistrationStatus::Upcoming,
            is_expired: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn names(records: &[&Registration]) -> Vec<String> {
        records.iter().map(|r| r.full_name.clone()).collect()
    }

    #[test]
    fn parse_keys_case_insensitively() {
        assert_eq!("ticketNo".parse::<SortKey>().unwrap(), SortKey::TicketNo);
        assert_eq!("FULLNAME".parse::<SortKey>().unwrap(), SortKey::FullName);
        assert!("shoeSize".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn string_sort_ascending_and_reversed() {
        let (a, b, c) = (reg("charlie", 3, None), reg("Alice", 1, None), reg("bob", 2, None));
        let mut rows = vec![&a, &b, &c];

        sort_records(&mut rows, SortKey::FullName, true);
        assert_eq!(names(&rows), vec!["Alice", "bob", "charlie"]);

        sort_records(&mut rows, SortKey::FullName, false);
        assert_eq!(names(&rows), vec!["charlie", "bob", "Alice"]);
    }

    #[test]
    fn numeric_sort_on_ticket() {
        let (a, b, c) = (reg("a", 10, None), reg("b", 9, None), reg("c", 100, None));
        let mut rows = vec![&a, &b, &c];
        sort_records(&mut rows, SortKey::TicketNo, true);
        assert_eq!(names(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn experience_sorts_numbers_numerically() {
        let (a, b, c) = (
            reg("a", 1, Some("10")),
            reg("b", 2, Some("9")),
            reg("c", 3, None),
        );
        let mut rows = vec![&a, &b, &c];
        sort_records(&mut rows, SortKey::Experience, true);
        assert_eq!(names(&rows), vec!["c", "b", "a"]);
    }

    #[test]
    fn missing_values_first_when_ascending() {
        let mut a = reg("a", 1, None);
        a.institution = Some("Zeta".to_string());
        let b = reg("b", 2, None);
        let mut rows = vec![&a, &b];
        sort_records(&mut rows, SortKey::Institution, true);
        assert_eq!(names(&rows), vec!["b", "a"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let (a, b) = (reg("same", 1, None), reg("same", 2, None));
        let mut rows = vec![&b, &a];
        sort_records(&mut rows, SortKey::FullName, true);
        assert_eq!(rows[0].ticket_no, Some(2));
    }
}
