use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    #[default]
    Gradient,
    Solid,
    Minimal,
    Bordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionHeaderStyle {
    #[default]
    Underline,
    Background,
    BorderLeft,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillsDisplay {
    #[default]
    Pills,
    List,
    Grid,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDensity {
    Compact,
    #[default]
    Normal,
    Spacious,
}

/// Render an enum parameter as its serialized (class-name) form.
fn class_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(name)) => name,
        _ => String::new(),
    }
}

/// Presentation parameters of the customizable template surface.
///
/// Independent of document content. Serialized with the camelCase parameter
/// names used by the persisted blob and the exported JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConfig {
    pub header_style: HeaderStyle,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub font_family: String,
    /// Pixels
    pub font_size: u32,
    /// rem
    pub section_spacing: f64,
    pub border_style: BorderStyle,
    pub section_header_style: SectionHeaderStyle,
    pub skills_display: SkillsDisplay,
    pub layout_density: LayoutDensity,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            header_style: HeaderStyle::Gradient,
            primary_color: "#667eea".to_string(),
            secondary_color: "#764ba2".to_string(),
            text_color: "#2d3748".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 14,
            section_spacing: 2.0,
            border_style: BorderStyle::Solid,
            section_header_style: SectionHeaderStyle::Underline,
            skills_display: SkillsDisplay::Pills,
            layout_density: LayoutDensity::Normal,
        }
    }
}

#[derive(Debug, Error)]
pub enum DesignParamError {
    #[error("Unknown design parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid value for design parameter {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl DesignConfig {
    /// The configuration as an ordered flat `name -> value` mapping.
    pub fn params(&self) -> IndexMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => IndexMap::new(),
        }
    }

    /// Update a single parameter by name.
    ///
    /// Unknown names and values of the wrong type are rejected and leave the
    /// configuration untouched.
    pub fn set_param(&mut self, name: &str, value: Value) -> Result<(), DesignParamError> {
        let mut params = self.params();
        if !params.contains_key(name) {
            return Err(DesignParamError::UnknownParameter(name.to_string()));
        }
        params.insert(name.to_string(), value);

        *self = Self::from_params(params).map_err(|e| DesignParamError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Overwrite every known parameter present in `overrides`.
    ///
    /// Unknown keys are ignored. Fails without modifying `self` if any known
    /// key carries an invalid value.
    pub fn merge(&mut self, overrides: &Map<String, Value>) -> Result<(), serde_json::Error> {
        let mut params = self.params();
        for (name, value) in overrides {
            if let Some(slot) = params.get_mut(name) {
                *slot = value.clone();
            }
        }
        *self = Self::from_params(params)?;
        Ok(())
    }

    fn from_params(params: IndexMap<String, Value>) -> Result<Self, serde_json::Error> {
        let map: Map<String, Value> = params.into_iter().collect();
        serde_json::from_value(Value::Object(map))
    }

    /// Compute the styling applied to the custom template surface.
    pub fn surface_style(&self) -> SurfaceStyle {
        let mut custom_properties = IndexMap::new();
        custom_properties.insert("--primary-color".to_string(), self.primary_color.clone());
        custom_properties.insert("--secondary-color".to_string(), self.secondary_color.clone());
        custom_properties.insert("--text-color".to_string(), self.text_color.clone());

        let item_border = match self.border_style {
            BorderStyle::None => "none".to_string(),
            style => format!("1px {} #e2e8f0", class_name(&style)),
        };

        SurfaceStyle {
            custom_properties,
            font_family: self.font_family.clone(),
            font_size: format!("{}px", self.font_size),
            text_color: self.text_color.clone(),
            header_class: format!("custom-header {}", class_name(&self.header_style)),
            section_margin: format!("{}rem", self.section_spacing),
            section_header_class: class_name(&self.section_header_style),
            item_border,
            skills_container_class: format!(
                "skills-container {}",
                class_name(&self.skills_display)
            ),
            skill_tag_background: format!(
                "linear-gradient(135deg, {}, {})",
                self.primary_color, self.secondary_color
            ),
            density_class: class_name(&self.layout_density),
        }
    }
}

/// Derived styling of the custom surface. Recomputed, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceStyle {
    pub custom_properties: IndexMap<String, String>,
    pub font_family: String,
    pub font_size: String,
    pub text_color: String,
    pub header_class: String,
    pub section_margin: String,
    pub section_header_class: String,
    pub item_border: String,
    pub skills_container_class: String,
    pub skill_tag_background: String,
    pub density_class: String,
}
