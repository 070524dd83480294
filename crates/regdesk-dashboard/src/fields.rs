//! Edit-form field table.
//!
//! The edit page is generated from [`EDIT_FIELDS`]: each entry names a
//! registration field, its label, and the widget used to edit it. The
//! form posts back as [`EditForm`], whose field names match the table.

use chrono::{DateTime, NaiveDate, Utc};
use regdesk_state::{Registration, RegistrationPatch, RegistrationStatus};
use serde::Deserialize;

pub const TRAINING_PROGRAMS: &[&str] = &[
    "Surgeon Training",
    "Surgical Staff Training",
    "Anesthesia Training for Robotic Surgery",
];

pub const ADDITIONAL_PROGRAMS: &[&str] = &[
    "MantraSync Tele-Surgery Program",
    "Animal Lab Training",
    "Cadaver Lab Training",
];

pub const SPECIALIZATIONS: &[&str] = &[
    "Urology",
    "Gynecology",
    "Cardiac",
    "Thoracic",
    "General Surgery",
    "Head and Neck",
    "Colorectal",
    "Pediatric",
    "Oncology",
    "Others",
];

pub const HEAR_ABOUT_US: &[&str] = &[
    "Website",
    "Social Media",
    "Colleague Referral",
    "Conference",
    "Other",
];

pub const PROFESSIONS: &[&str] = &[
    "Surgeon",
    "Assistant Surgeon",
    "Anesthesiologist",
    "Nurse",
    "Technician",
    "Bio Medical Engineer",
    "Others",
];

const STATUSES: &[&str] = &["upcoming", "pending", "completed"];

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidget {
    Text,
    Email,
    Tel,
    Date,
    DateTime,
    TextArea,
    Select(&'static [&'static str]),
    Checkboxes(&'static [&'static str]),
}

impl FieldWidget {
    /// Template discriminator.
    pub fn kind(self) -> &'static str {
        match self {
            FieldWidget::Text => "text",
            FieldWidget::Email => "email",
            FieldWidget::Tel => "tel",
            FieldWidget::Date => "date",
            FieldWidget::DateTime => "datetime-local",
            FieldWidget::TextArea => "textarea",
            FieldWidget::Select(_) => "select",
            FieldWidget::Checkboxes(_) => "checkboxes",
        }
    }

    fn options(self) -> &'static [&'static str] {
        match self {
            FieldWidget::Select(opts) | FieldWidget::Checkboxes(opts) => opts,
            _ => &[],
        }
    }
}

pub struct FieldSpec {
    /// Form field name; matches the JSON field name.
    pub name: &'static str,
    pub label: &'static str,
    pub widget: FieldWidget,
    pub required: bool,
    /// Current value(s) in the form's text encoding.
    pub values: fn(&Registration) -> Vec<String>,
}

const fn field(
    name: &'static str,
    label: &'static str,
    widget: FieldWidget,
    values: fn(&Registration) -> Vec<String>,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        widget,
        required: false,
        values,
    }
}

const fn required(
    name: &'static str,
    label: &'static str,
    widget: FieldWidget,
    values: fn(&Registration) -> Vec<String>,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        widget,
        required: true,
        values,
    }
}

pub const EDIT_FIELDS: &[FieldSpec] = &[
    required("fullName", "Full Name", FieldWidget::Text, |r| {
        vec![r.full_name.clone()]
    }),
    required("email", "Email Address", FieldWidget::Email, |r| {
        vec![r.email.clone()]
    }),
    field("phoneNumber", "Phone Number", FieldWidget::Tel, |r| {
        opt(&r.phone_number)
    }),
    field("dob", "Date of Birth", FieldWidget::Date, |r| {
        r.dob.map(format_date_input).into_iter().collect()
    }),
    field(
        "experience",
        "Professional Experience",
        FieldWidget::Text,
        |r| opt(&r.experience),
    ),
    field("institution", "Institution", FieldWidget::Text, |r| {
        opt(&r.institution)
    }),
    field(
        "callDateTime",
        "Registration Date",
        FieldWidget::DateTime,
        |r| r.call_date_time.map(format_datetime_input).into_iter().collect(),
    ),
    field(
        "hearAboutUs",
        "Heard About Us",
        FieldWidget::Select(HEAR_ABOUT_US),
        |r| opt(&r.hear_about_us),
    ),
    field(
        "currentProfession",
        "Current Profession",
        FieldWidget::Select(PROFESSIONS),
        |r| opt(&r.current_profession),
    ),
    field(
        "specialization",
        "Area of Specialization",
        FieldWidget::Select(SPECIALIZATIONS),
        |r| opt(&r.specialization),
    ),
    field(
        "learningGoals",
        "Learning Goals",
        FieldWidget::TextArea,
        |r| opt(&r.learning_goals),
    ),
    field(
        "trainingPrograms",
        "Training Programs",
        FieldWidget::Checkboxes(TRAINING_PROGRAMS),
        |r| r.training_programs.clone(),
    ),
    field(
        "additionalPrograms",
        "Additional Programs",
        FieldWidget::Checkboxes(ADDITIONAL_PROGRAMS),
        |r| r.additional_programs.clone(),
    ),
    required(
        "status",
        "Training Status",
        FieldWidget::Select(STATUSES),
        |r| vec![r.status.as_str().to_string()],
    ),
];

// ── Template view ───────────────────────────────────────────────

pub struct OptionView {
    pub value: String,
    pub selected: bool,
}

/// One rendered form control, pre-filled from the record.
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub required: bool,
    pub value: String,
    pub options: Vec<OptionView>,
}

impl FieldView {
    pub fn build(spec: &FieldSpec, reg: &Registration) -> Self {
        let selected = (spec.values)(reg);
        let value = selected.first().cloned().unwrap_or_default();

        let mut options: Vec<OptionView> = spec
            .widget
            .options()
            .iter()
            .map(|opt| OptionView {
                value: opt.to_string(),
                selected: selected.iter().any(|s| s == opt),
            })
            .collect();
        // Keep stored values that aren't in the fixed option list.
        if !spec.widget.options().is_empty() {
            for extra in selected
                .iter()
                .filter(|s| !spec.widget.options().contains(&s.as_str()))
            {
                options.push(OptionView {
                    value: extra.clone(),
                    selected: true,
                });
            }
        }

        Self {
            name: spec.name,
            label: spec.label,
            kind: spec.widget.kind(),
            required: spec.required,
            value,
            options,
        }
    }
}

fn opt(value: &Option<String>) -> Vec<String> {
    value.iter().cloned().collect()
}

fn format_date_input(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn format_datetime_input(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

pub fn edit_fields(reg: &Registration) -> Vec<FieldView> {
    EDIT_FIELDS.iter().map(|spec| FieldView::build(spec, reg)).collect()
}

// ── Submission ──────────────────────────────────────────────────

/// Posted edit form. Unchecked checkbox groups are absent, so every
/// list defaults to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub call_date_time: String,
    #[serde(default)]
    pub hear_about_us: String,
    #[serde(default)]
    pub current_profession: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub learning_goals: String,
    #[serde(default)]
    pub training_programs: Vec<String>,
    #[serde(default)]
    pub additional_programs: Vec<String>,
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
}

impl EditForm {
    /// The form always carries every field, so each becomes a set (or
    /// clear) in the patch.
    pub fn into_patch(self) -> RegistrationPatch {
        RegistrationPatch {
            full_name: Some(self.full_name),
            email: Some(self.email),
            phone_number: Some(self.phone_number),
            dob: Some(self.dob),
            experience: Some(self.experience),
            institution: Some(self.institution),
            call_date_time: Some(self.call_date_time),
            hear_about_us: Some(self.hear_about_us),
            current_profession: Some(self.current_profession),
            specialization: Some(self.specialization),
            learning_goals: Some(self.learning_goals),
            training_programs: Some(self.training_programs),
            additional_programs: Some(self.additional_programs),
            upload_id: None,
            status: self.status,
            is_expired: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regdesk_state::{RegistrationDraft, new_id};

    fn sample() -> Registration {
        RegistrationDraft {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            specialization: Some("Robotics".to_string()),
            training_programs: vec!["Surgeon Training".to_string()],
            call_date_time: Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()),
            ..Default::default()
        }
        .into_registration(new_id(), 211550, Utc::now())
    }

    fn populated() -> Registration {
        RegistrationDraft {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: Some("+44 20 7946 0000".to_string()),
            dob: NaiveDate::from_ymd_opt(1985, 12, 10),
            experience: Some("12".to_string()),
            institution: Some("City Hospital".to_string()),
            call_date_time: Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()),
            hear_about_us: Some("Conference".to_string()),
            current_profession: Some("Surgeon".to_string()),
            specialization: Some("Robotics".to_string()),
            learning_goals: Some("Console hours".to_string()),
            training_programs: vec!["Surgeon Training".to_string()],
            additional_programs: vec![
                "Animal Lab Training".to_string(),
                "Cadaver Lab Training".to_string(),
            ],
            status: Some(RegistrationStatus::Completed),
            ..Default::default()
        }
        .into_registration(new_id(), 211550, Utc::now())
    }

    /// Post back exactly what the form shows.
    fn submit(fields: &[FieldView]) -> EditForm {
        let mut body = serde_json::Map::new();
        for f in fields {
            let value = match f.kind {
                "checkboxes" => serde_json::Value::from(
                    f.options
                        .iter()
                        .filter(|o| o.selected)
                        .map(|o| o.value.clone())
                        .collect::<Vec<_>>(),
                ),
                "select" => serde_json::Value::from(
                    f.options
                        .iter()
                        .find(|o| o.selected)
                        .map(|o| o.value.clone())
                        .unwrap_or_default(),
                ),
                _ => serde_json::Value::from(f.value.clone()),
            };
            body.insert(f.name.to_string(), value);
        }
        serde_json::from_value(serde_json::Value::Object(body)).unwrap()
    }

    #[test]
    fn every_field_round_trips_unchanged() {
        let reg = populated();
        for spec in EDIT_FIELDS {
            assert!(!(spec.values)(&reg).is_empty(), "{} has no value", spec.name);
        }
        assert_eq!(EDIT_FIELDS.len(), 14);

        let mut saved = reg.clone();
        submit(&edit_fields(&reg))
            .into_patch()
            .apply(&mut saved)
            .unwrap();
        assert_eq!(saved, reg);
    }

    #[test]
    fn views_prefill_from_record() {
        let fields = edit_fields(&sample());
        let call = fields.iter().find(|f| f.name == "callDateTime").unwrap();
        assert_eq!(call.kind, "datetime-local");
        assert_eq!(call.value, "2025-03-14T09:30");

        let programs = fields.iter().find(|f| f.name == "trainingPrograms").unwrap();
        let checked: Vec<_> = programs
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(checked, vec!["Surgeon Training"]);
    }

    #[test]
    fn unknown_stored_option_is_kept() {
        let fields = edit_fields(&sample());
        let spec = fields.iter().find(|f| f.name == "specialization").unwrap();
        let last = spec.options.last().unwrap();
        assert_eq!(last.value, "Robotics");
        assert!(last.selected);
    }

    #[test]
    fn form_round_trips_into_patch() {
        let mut reg = sample();
        let form = EditForm {
            full_name: "Ada King".to_string(),
            email: "ada@example.com".to_string(),
            institution: "City Hospital".to_string(),
            call_date_time: "2025-04-01T10:00".to_string(),
            status: Some(RegistrationStatus::Completed),
            ..Default::default()
        };
        form.into_patch().apply(&mut reg).unwrap();
        assert_eq!(reg.full_name, "Ada King");
        assert_eq!(reg.institution.as_deref(), Some("City Hospital"));
        assert!(reg.training_programs.is_empty());
        assert!(reg.specialization.is_none());
        assert!(reg.is_expired);
    }
}
