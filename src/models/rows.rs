//! Editable-row view models for the three dynamic collections.
//!
//! A row holds what its input widgets currently display. Reading rows back
//! into entries ([`RowModel::to_entry`]) is a pure function, which is what
//! the collection resync is built on.

use crate::models::document::{EducationEntry, ExperienceEntry, ProjectEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three ordered collections of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Experience,
    Education,
    Projects,
}

impl CollectionKind {
    /// Prefix of the human-readable row label ("Experience 3").
    pub fn label_prefix(self) -> &'static str {
        match self {
            CollectionKind::Experience => "Experience",
            CollectionKind::Education => "Education",
            CollectionKind::Projects => "Project",
        }
    }

    /// Text of the placeholder row shown while the collection is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            CollectionKind::Experience => "No work experience added yet",
            CollectionKind::Education => "No education added yet",
            CollectionKind::Projects => "No projects added yet",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionKind::Experience => "experience",
            CollectionKind::Education => "education",
            CollectionKind::Projects => "projects",
        };
        f.write_str(name)
    }
}

/// Entries whose `id` is a position tag.
pub trait PositionTagged {
    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);
}

macro_rules! position_tagged {
    ($($entry:ty),*) => {
        $(
            impl PositionTagged for $entry {
                fn id(&self) -> u32 {
                    self.id
                }

                fn set_id(&mut self, id: u32) {
                    self.id = id;
                }
            }
        )*
    };
}

position_tagged!(ExperienceEntry, EducationEntry, ProjectEntry);

/// A row view model that serializes into one document entry.
pub trait RowModel: Clone + Default + fmt::Debug {
    type Entry: PositionTagged + Default + Clone + fmt::Debug + PartialEq;

    const KIND: CollectionKind;

    /// Read the row's current input values into an entry tagged `id`.
    fn to_entry(&self, id: u32) -> Self::Entry;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceRow {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    /// Mirrors the disabled state of the end-date input
    pub end_date_disabled: bool,
    pub current: bool,
    pub description: String,
}

impl ExperienceRow {
    /// Toggle "currently employed".
    ///
    /// Enabling clears and disables the end date; disabling re-enables it.
    pub fn set_current(&mut self, current: bool) {
        self.current = current;
        self.end_date_disabled = current;
        if current {
            self.end_date.clear();
        }
    }

    /// Set one text field. Returns false when the input is disabled.
    pub fn set(&mut self, field: ExperienceField, value: String) -> bool {
        match field {
            ExperienceField::Title => self.title = value,
            ExperienceField::Company => self.company = value,
            ExperienceField::StartDate => self.start_date = value,
            ExperienceField::EndDate => {
                if self.end_date_disabled {
                    return false;
                }
                self.end_date = value;
            }
            ExperienceField::Description => self.description = value,
        }
        true
    }
}

impl RowModel for ExperienceRow {
    type Entry = ExperienceEntry;

    const KIND: CollectionKind = CollectionKind::Experience;

    fn to_entry(&self, id: u32) -> ExperienceEntry {
        ExperienceEntry {
            id,
            title: self.title.clone(),
            company: self.company.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            current: self.current,
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationRow {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub year: String,
    pub details: String,
}

impl EducationRow {
    pub fn set(&mut self, field: EducationField, value: String) {
        let slot = match field {
            EducationField::Degree => &mut self.degree,
            EducationField::Field => &mut self.field,
            EducationField::Institution => &mut self.institution,
            EducationField::Year => &mut self.year,
            EducationField::Details => &mut self.details,
        };
        *slot = value;
    }
}

impl RowModel for EducationRow {
    type Entry = EducationEntry;

    const KIND: CollectionKind = CollectionKind::Education;

    fn to_entry(&self, id: u32) -> EducationEntry {
        EducationEntry {
            id,
            degree: self.degree.clone(),
            field: self.field.clone(),
            institution: self.institution.clone(),
            year: self.year.clone(),
            details: self.details.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRow {
    pub title: String,
    pub description: String,
}

impl ProjectRow {
    pub fn set(&mut self, field: ProjectField, value: String) {
        match field {
            ProjectField::Title => self.title = value,
            ProjectField::Description => self.description = value,
        }
    }
}

/// Fields of one externally-produced project record.
///
/// Only fields that are present and non-empty overwrite the matching row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);
        blank(&self.title) && blank(&self.description)
    }

    pub fn apply_to(&self, row: &mut ProjectRow) {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            row.title = title.to_string();
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            row.description = description.to_string();
        }
    }
}

impl RowModel for ProjectRow {
    type Entry = ProjectEntry;

    const KIND: CollectionKind = CollectionKind::Projects;

    fn to_entry(&self, id: u32) -> ProjectEntry {
        ProjectEntry {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

macro_rules! field_ids {
    ($name:ident { $($variant:ident => $id:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id),*
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok($name::$variant),)*
                    other => Err(format!("Unknown {} field: {}", stringify!($name), other)),
                }
            }
        }
    };
}

field_ids!(ExperienceField {
    Title => "title",
    Company => "company",
    StartDate => "startDate",
    EndDate => "endDate",
    Description => "description",
});

field_ids!(EducationField {
    Degree => "degree",
    Field => "field",
    Institution => "institution",
    Year => "year",
    Details => "details",
});

field_ids!(ProjectField {
    Title => "title",
    Description => "description",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_current_clears_and_disables_end_date() {
        let mut row = ExperienceRow {
            end_date: "2021-06".to_string(),
            ..Default::default()
        };

        row.set_current(true);
        assert!(row.current);
        assert!(row.end_date_disabled);
        assert!(row.end_date.is_empty());

        assert!(!row.set(ExperienceField::EndDate, "2022-01".to_string()));
        assert!(row.end_date.is_empty());

        row.set_current(false);
        assert!(row.set(ExperienceField::EndDate, "2022-01".to_string()));
        assert_eq!(row.end_date, "2022-01");
    }

    #[test]
    fn test_to_entry_copies_displayed_values() {
        let mut row = EducationRow::default();
        row.set(EducationField::Degree, "BSc".to_string());
        row.set(EducationField::Year, "2019".to_string());

        let entry = row.to_entry(4);
        assert_eq!(entry.id, 4);
        assert_eq!(entry.degree, "BSc");
        assert_eq!(entry.year, "2019");
    }

    #[test]
    fn test_field_ids_parse() {
        assert_eq!("startDate".parse(), Ok(ExperienceField::StartDate));
        assert_eq!("institution".parse(), Ok(EducationField::Institution));
        assert_eq!("description".parse(), Ok(ProjectField::Description));
        assert!("salary".parse::<ExperienceField>().is_err());
    }

    #[test]
    fn test_project_patch_updates_present_fields_only() {
        let mut row = ProjectRow {
            title: "Old".to_string(),
            description: "Keep me".to_string(),
        };
        let patch = ProjectPatch {
            title: Some("New".to_string()),
            description: Some(String::new()),
        };

        patch.apply_to(&mut row);
        assert_eq!(row.title, "New");
        assert_eq!(row.description, "Keep me");
        assert!(!patch.is_empty());
        assert!(ProjectPatch::default().is_empty());
    }

    #[test]
    fn test_collection_labels() {
        assert_eq!(CollectionKind::Projects.label_prefix(), "Project");
        assert_eq!(CollectionKind::Experience.to_string(), "experience");
        assert_eq!(
            CollectionKind::Education.placeholder(),
            "No education added yet"
        );
    }
}
