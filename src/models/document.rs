use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Contact and summary fields of the resume owner.
///
/// Every field is a plain string; an empty string means "not provided".
/// Only `full_name` and `email` are required, and only by document generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub summary: String,
}

/// One work experience entry.
///
/// `id` is a position tag (`position + 1`), re-derived after every collection
/// mutation. It is not a stable identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: u32,
    pub title: String,
    pub company: String,
    /// `YYYY-MM`, empty when not set
    pub start_date: String,
    /// `YYYY-MM`, empty when not set or when `current` is true
    pub end_date: String,
    pub current: bool,
    /// Free text, one bullet per line
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: u32,
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub year: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: u32,
    pub title: String,
    pub description: String,
}

/// The canonical structured resume.
///
/// This is the single source of truth for every preview surface and the body
/// sent to `POST /generate_resume`. The serialized field names follow the
/// backend's expected request shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal: PersonalInfo,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    /// Comma-delimited skill list as typed by the user
    pub skills: String,
    #[serde(rename = "projectsList")]
    pub projects: Vec<ProjectEntry>,
}

/// Identifier of a directly-edited personal field.
///
/// Parses from the camelCase field ids used by the editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Linkedin,
    Summary,
}

impl PersonalField {
    pub const ALL: [PersonalField; 6] = [
        PersonalField::FullName,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::Location,
        PersonalField::Linkedin,
        PersonalField::Summary,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PersonalField::FullName => "fullName",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::Location => "location",
            PersonalField::Linkedin => "linkedin",
            PersonalField::Summary => "summary",
        }
    }
}

impl fmt::Display for PersonalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PersonalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonalField::ALL
            .into_iter()
            .find(|field| field.id() == s)
            .ok_or_else(|| format!("Unknown personal field: {s}"))
    }
}

impl PersonalInfo {
    pub fn get(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::FullName => &self.full_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Location => &self.location,
            PersonalField::Linkedin => &self.linkedin,
            PersonalField::Summary => &self.summary,
        }
    }

    pub fn set(&mut self, field: PersonalField, value: String) {
        let slot = match field {
            PersonalField::FullName => &mut self.full_name,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::Location => &mut self.location,
            PersonalField::Linkedin => &mut self.linkedin,
            PersonalField::Summary => &mut self.summary,
        };
        *slot = value;
    }
}

/// Number of checks behind [`ResumeDocument::completion_percent`].
const COMPLETION_CHECKS: usize = 6;

impl ResumeDocument {
    /// Whether the fields required for document generation are present.
    pub fn has_required_identity(&self) -> bool {
        !self.personal.full_name.is_empty() && !self.personal.email.is_empty()
    }

    /// Share of completed core sections, 0..=100.
    ///
    /// Counts name, email, summary, at least one experience, at least one
    /// education entry and a non-empty skills string.
    pub fn completion_percent(&self) -> u8 {
        let checks = [
            !self.personal.full_name.is_empty(),
            !self.personal.email.is_empty(),
            !self.personal.summary.is_empty(),
            !self.experiences.is_empty(),
            !self.education.is_empty(),
            !self.skills.is_empty(),
        ];
        let completed = checks.iter().filter(|done| **done).count();
        ((completed * 100 + COMPLETION_CHECKS / 2) / COMPLETION_CHECKS) as u8
    }
}
