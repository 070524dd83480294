//! Domain types for the regdesk state store.
//!
//! `Registration` is the persisted document. `RegistrationDraft`,
//! `RegistrationPatch` and `StatusUpdate` are the write-side payloads
//! accepted by the store; each carries its own validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Unique identifier for a registration (UUID v4, hyphenated).
pub type RegistrationId = String;

/// Unique identifier for an uploaded file (UUID v4, hyphenated).
pub type UploadId = String;

/// True if `id` has the shape of a store-assigned identifier.
pub fn is_valid_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// Generate a fresh store identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ── Status ─────────────────────────────────────────────────────────

/// Where a registration stands. Any status may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Upcoming,
    Pending,
    Completed,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 3] = [
        RegistrationStatus::Upcoming,
        RegistrationStatus::Pending,
        RegistrationStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Upcoming => "upcoming",
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Upcoming => "Upcoming",
            RegistrationStatus::Pending => "Pending",
            RegistrationStatus::Completed => "Completed",
        }
    }

    /// The `isExpired` value implied by this status.
    pub fn implies_expired(self) -> bool {
        self == RegistrationStatus::Completed
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(RegistrationStatus::Upcoming),
            "pending" => Ok(RegistrationStatus::Pending),
            "completed" => Ok(RegistrationStatus::Completed),
            other => Err(StateError::Invalid(format!("unknown status '{other}'"))),
        }
    }
}

/// Reject an explicit `isExpired` that disagrees with `status`.
fn check_expired_flag(status: RegistrationStatus, is_expired: Option<bool>) -> StateResult<()> {
    match is_expired {
        Some(flag) if flag != status.implies_expired() => Err(StateError::Invalid(format!(
            "isExpired={flag} contradicts status '{status}'"
        ))),
        _ => Ok(()),
    }
}

// ── Registration ───────────────────────────────────────────────────

/// One applicant's training signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    /// Human-facing sequential number, assigned once at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_no: Option<u64>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, with = "lenient::date")]
    pub dob: Option<NaiveDate>,
    /// Free-form text or a number of years.
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub experience: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default, with = "lenient::datetime")]
    pub call_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hear_about_us: Option<String>,
    #[serde(default)]
    pub current_profession: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub training_programs: Vec<String>,
    #[serde(default)]
    pub additional_programs: Vec<String>,
    /// Reference to a file in the upload tables.
    #[serde(default)]
    pub upload_id: Option<UploadId>,
    #[serde(default)]
    pub status: RegistrationStatus,
    /// Mirrors `status == completed`; kept in the document for API clients.
    #[serde(default)]
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn table_key(&self) -> &str {
        &self.id
    }

    /// Set the status and its derived expiry flag together.
    pub fn set_status(&mut self, status: RegistrationStatus) {
        self.status = status;
        self.is_expired = status.implies_expired();
    }
}

// ── Create ─────────────────────────────────────────────────────────

/// Payload for creating a registration. The store assigns `id`,
/// `ticketNo` and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, with = "lenient::date")]
    pub dob: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub experience: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default, with = "lenient::datetime")]
    pub call_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hear_about_us: Option<String>,
    #[serde(default)]
    pub current_profession: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub training_programs: Vec<String>,
    #[serde(default)]
    pub additional_programs: Vec<String>,
    #[serde(default)]
    pub upload_id: Option<UploadId>,
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
    #[serde(default)]
    pub is_expired: Option<bool>,
}

impl RegistrationDraft {
    pub fn validate(&self) -> StateResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(StateError::Invalid("fullName is required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(StateError::Invalid("email is invalid".to_string()));
        }
        check_upload_id(&non_empty(self.upload_id.clone()))?;
        check_expired_flag(self.status.unwrap_or_default(), self.is_expired)
    }

    /// Build the stored document. Call `validate` first.
    pub fn into_registration(
        self,
        id: RegistrationId,
        ticket_no: u64,
        now: DateTime<Utc>,
    ) -> Registration {
        let status = self.status.unwrap_or_default();
        Registration {
            id,
            ticket_no: Some(ticket_no),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: non_empty(self.phone_number),
            dob: self.dob,
            experience: non_empty(self.experience),
            institution: non_empty(self.institution),
            call_date_time: self.call_date_time,
            hear_about_us: non_empty(self.hear_about_us),
            current_profession: non_empty(self.current_profession),
            specialization: non_empty(self.specialization),
            learning_goals: non_empty(self.learning_goals),
            training_programs: normalize_selection(self.training_programs),
            additional_programs: normalize_selection(self.additional_programs),
            upload_id: non_empty(self.upload_id),
            status,
            is_expired: status.implies_expired(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Update ─────────────────────────────────────────────────────────

/// Body of a status change: `{status, isExpired?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: RegistrationStatus,
    #[serde(default)]
    pub is_expired: Option<bool>,
}

impl StatusUpdate {
    pub fn new(status: RegistrationStatus) -> Self {
        Self {
            status,
            is_expired: None,
        }
    }

    pub fn validate(&self) -> StateResult<()> {
        check_expired_flag(self.status, self.is_expired)
    }
}

/// Partial edit of a registration. Absent fields are left unchanged;
/// an empty string clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub experience: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub call_date_time: Option<String>,
    #[serde(default)]
    pub hear_about_us: Option<String>,
    #[serde(default)]
    pub current_profession: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub training_programs: Option<Vec<String>>,
    #[serde(default)]
    pub additional_programs: Option<Vec<String>>,
    #[serde(default)]
    pub upload_id: Option<String>,
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
    #[serde(default)]
    pub is_expired: Option<bool>,
}

impl RegistrationPatch {
    /// Apply the patch in place. Leaves `reg` untouched on error.
    pub fn apply(&self, reg: &mut Registration) -> StateResult<()> {
        let mut next = reg.clone();

        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(StateError::Invalid("fullName cannot be empty".to_string()));
            }
            next.full_name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(StateError::Invalid("email is invalid".to_string()));
            }
            next.email = email.trim().to_string();
        }
        if let Some(raw) = &self.dob {
            next.dob = match raw.trim() {
                "" => None,
                s => Some(
                    lenient::parse_date(s)
                        .ok_or_else(|| StateError::Invalid(format!("invalid dob '{s}'")))?,
                ),
            };
        }
        if let Some(raw) = &self.call_date_time {
            next.call_date_time = match raw.trim() {
                "" => None,
                s => Some(lenient::parse_datetime(s).ok_or_else(|| {
                    StateError::Invalid(format!("invalid callDateTime '{s}'"))
                })?),
            };
        }
        if let Some(upload_id) = &self.upload_id {
            let upload_id = non_empty(Some(upload_id.clone()));
            check_upload_id(&upload_id)?;
            next.upload_id = upload_id;
        }

        patch_text(&mut next.phone_number, &self.phone_number);
        patch_text(&mut next.experience, &self.experience);
        patch_text(&mut next.institution, &self.institution);
        patch_text(&mut next.hear_about_us, &self.hear_about_us);
        patch_text(&mut next.current_profession, &self.current_profession);
        patch_text(&mut next.specialization, &self.specialization);
        patch_text(&mut next.learning_goals, &self.learning_goals);

        if let Some(programs) = &self.training_programs {
            next.training_programs = normalize_selection(programs.clone());
        }
        if let Some(programs) = &self.additional_programs {
            next.additional_programs = normalize_selection(programs.clone());
        }

        let status = self.status.unwrap_or(next.status);
        check_expired_flag(status, self.is_expired)?;
        next.set_status(status);

        *reg = next;
        Ok(())
    }
}

fn patch_text(field: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        *field = non_empty(Some(v.clone()));
    }
}

// ── Uploads ────────────────────────────────────────────────────────

/// Metadata for a file stored alongside registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: UploadId,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

// ── Normalization ──────────────────────────────────────────────────

/// Blank ids are normalised to `None` before this check.
fn check_upload_id(upload_id: &Option<String>) -> StateResult<()> {
    match upload_id {
        Some(id) if !is_valid_id(id) => {
            Err(StateError::Invalid("uploadId is invalid".to_string()))
        }
        _ => Ok(()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim entries, drop blanks and duplicates, keep first-seen order.
pub fn normalize_selection(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim();
        if !v.is_empty() && !out.iter().any(|existing| existing == v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Lenient (de)serializers for fields that arrive in several shapes.
pub mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC,
    /// or a bare date taken as midnight UTC.
    pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Parse `YYYY-MM-DD`, or take the date part of a timestamp.
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
    }

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(s)) => Some(s),
            Some(Raw::Int(n)) => Some(n.to_string()),
            Some(Raw::Float(n)) => Some(n.to_string()),
            None => None,
        })
    }

    pub mod datetime {
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => super::parse_datetime(&s)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date-time '{s}'"))),
            }
        }
    }

    pub mod date {
        use chrono::NaiveDate;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => super::parse_date(&s)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date '{s}'"))),
            }
        }
    }
}
