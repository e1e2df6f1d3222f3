//! Preview projector.
//!
//! Projects a [`ResumeDocument`] onto every template surface. Surfaces are
//! pure derived values: they are rebuilt in full from the document after each
//! mutation and never edited on their own. All templates carry identical
//! content; they differ only in styling, which lives outside this module.
//!
//! A section whose source data is empty is `None` on every surface, so no
//! empty markup is ever produced for it.

pub mod format;
pub mod html;

use crate::models::ResumeDocument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use format::{contact_line, date_range, degree_line, format_description, format_month, parse_skills};

/// Fallback shown when the name field is blank.
pub const NAME_PLACEHOLDER: &str = "Your Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Professional,
    Executive,
    Creative,
    Minimalist,
    /// The style-configurable surface driven by the design configuration
    Custom,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::Modern,
        TemplateId::Professional,
        TemplateId::Executive,
        TemplateId::Creative,
        TemplateId::Minimalist,
        TemplateId::Custom,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Professional => "professional",
            TemplateId::Executive => "executive",
            TemplateId::Creative => "creative",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Custom => "custom",
        }
    }

    pub fn is_customizable(self) -> bool {
        self == TemplateId::Custom
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|template| template.id() == s)
            .ok_or_else(|| format!("Unknown template: {s}"))
    }
}

/// Optional sections of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    pub date_range: String,
    /// Absent when the description has no non-blank line
    pub bullets: Option<Vec<String>>,
}

impl ExperienceItem {
    /// Bullet lines joined with line breaks.
    pub fn description_text(&self) -> Option<String> {
        self.bullets.as_ref().map(|lines| lines.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationItem {
    pub heading: String,
    pub institution: String,
    pub details: Option<String>,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectItem {
    pub title: String,
    pub description: String,
}

/// One template's rendering of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSurface {
    pub template: TemplateId,
    pub name: String,
    pub contact: String,
    pub summary: Option<String>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<ProjectItem>>,
}

impl RenderedSurface {
    pub fn has_section(&self, section: SectionId) -> bool {
        match section {
            SectionId::Summary => self.summary.is_some(),
            SectionId::Experience => self.experience.is_some(),
            SectionId::Education => self.education.is_some(),
            SectionId::Skills => self.skills.is_some(),
            SectionId::Projects => self.projects.is_some(),
        }
    }

    pub fn to_html(&self) -> String {
        html::render_surface(self, None)
    }
}

/// Every template surface, in [`TemplateId::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    surfaces: Vec<RenderedSurface>,
}

impl Default for Preview {
    fn default() -> Self {
        project(&ResumeDocument::default())
    }
}

impl Preview {
    pub fn surfaces(&self) -> &[RenderedSurface] {
        &self.surfaces
    }

    pub fn surface(&self, template: TemplateId) -> Option<&RenderedSurface> {
        self.surfaces.iter().find(|s| s.template == template)
    }

    /// True when no surface renders `section`.
    pub fn section_absent_everywhere(&self, section: SectionId) -> bool {
        self.surfaces.iter().all(|s| !s.has_section(section))
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Render one surface from the document.
pub fn render_surface(template: TemplateId, doc: &ResumeDocument) -> RenderedSurface {
    let personal = &doc.personal;

    let experience = non_empty(
        doc.experiences
            .iter()
            .map(|exp| ExperienceItem {
                title: or_placeholder(&exp.title, "Job Title"),
                company: or_placeholder(&exp.company, "Company Name"),
                date_range: date_range(exp),
                bullets: non_empty(format_description(&exp.description)),
            })
            .collect(),
    );

    let education = non_empty(
        doc.education
            .iter()
            .map(|edu| EducationItem {
                heading: or_placeholder(&degree_line(&edu.degree, &edu.field), "Degree"),
                institution: or_placeholder(&edu.institution, "Institution"),
                details: (!edu.details.is_empty()).then(|| edu.details.clone()),
                year: edu.year.clone(),
            })
            .collect(),
    );

    let projects = non_empty(
        doc.projects
            .iter()
            .map(|project| ProjectItem {
                title: or_placeholder(&project.title, "Project Title"),
                description: project.description.clone(),
            })
            .collect(),
    );

    RenderedSurface {
        template,
        name: or_placeholder(&personal.full_name, NAME_PLACEHOLDER),
        contact: contact_line(personal),
        summary: (!personal.summary.is_empty()).then(|| personal.summary.clone()),
        experience,
        education,
        skills: non_empty(parse_skills(&doc.skills)),
        projects,
    }
}

/// Project the document onto every template surface.
pub fn project(doc: &ResumeDocument) -> Preview {
    let surfaces = TemplateId::ALL
        .into_iter()
        .map(|template| render_surface(template, doc))
        .collect();
    Preview { surfaces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationEntry, ExperienceEntry, ProjectEntry};

    #[test]
    fn test_empty_document_suppresses_optional_sections() {
        let preview = project(&ResumeDocument::default());

        assert_eq!(preview.surfaces().len(), TemplateId::ALL.len());
        for section in [
            SectionId::Summary,
            SectionId::Experience,
            SectionId::Education,
            SectionId::Skills,
            SectionId::Projects,
        ] {
            assert!(preview.section_absent_everywhere(section));
        }
        let modern = preview.surface(TemplateId::Modern).unwrap();
        assert_eq!(modern.name, NAME_PLACEHOLDER);
        assert_eq!(modern.contact, "");
    }

    #[test]
    fn test_all_surfaces_identically_populated() {
        let mut doc = ResumeDocument::default();
        doc.personal.full_name = "Ada Lovelace".to_string();
        doc.personal.summary = "Analyst".to_string();
        doc.skills = "Math, Engines".to_string();
        doc.experiences.push(ExperienceEntry {
            id: 1,
            start_date: "1842-09".to_string(),
            ..Default::default()
        });

        let preview = project(&doc);
        let first = &preview.surfaces()[0];
        for surface in preview.surfaces() {
            assert_eq!(surface.name, first.name);
            assert_eq!(surface.summary, first.summary);
            assert_eq!(surface.skills, first.skills);
            assert_eq!(surface.experience, first.experience);
        }
    }

    #[test]
    fn test_item_placeholders() {
        let mut doc = ResumeDocument::default();
        doc.experiences.push(ExperienceEntry::default());
        doc.education.push(EducationEntry {
            field: "Physics".to_string(),
            ..Default::default()
        });
        doc.projects.push(ProjectEntry::default());

        let surface = render_surface(TemplateId::Creative, &doc);
        let exp = &surface.experience.as_ref().unwrap()[0];
        assert_eq!(exp.title, "Job Title");
        assert_eq!(exp.company, "Company Name");
        assert_eq!(exp.date_range, "");
        assert!(exp.bullets.is_none());

        let edu = &surface.education.as_ref().unwrap()[0];
        assert_eq!(edu.heading, "Physics");
        assert_eq!(edu.institution, "Institution");
        assert!(edu.details.is_none());

        assert_eq!(surface.projects.as_ref().unwrap()[0].title, "Project Title");
    }

    #[test]
    fn test_whitespace_only_skills_suppress_section() {
        let mut doc = ResumeDocument::default();
        doc.skills = " , ,, ".to_string();
        assert!(project(&doc).section_absent_everywhere(SectionId::Skills));
    }

    #[test]
    fn test_description_text_joins_bullets() {
        let mut doc = ResumeDocument::default();
        doc.experiences.push(ExperienceEntry {
            description: "Shipped v1\n- Hired team".to_string(),
            ..Default::default()
        });
        let surface = render_surface(TemplateId::Modern, &doc);
        let item = &surface.experience.unwrap()[0];
        assert_eq!(
            item.description_text().as_deref(),
            Some("• Shipped v1\n- Hired team")
        );
    }

    #[test]
    fn test_template_ids_parse() {
        assert_eq!("custom".parse(), Ok(TemplateId::Custom));
        assert!("fancy".parse::<TemplateId>().is_err());
        assert!(TemplateId::Custom.is_customizable());
        assert!(!TemplateId::Modern.is_customizable());
    }
}
