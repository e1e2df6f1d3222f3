//! Markup for rendered surfaces.
//!
//! User text is always escaped. Absent sections emit nothing.

use crate::models::SurfaceStyle;
use crate::preview::RenderedSurface;
use std::fmt::Write;

/// Escape text for element content and double-quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_style(style: &SurfaceStyle) -> String {
    let mut css = String::new();
    for (name, value) in &style.custom_properties {
        let _ = write!(css, "{name}: {value}; ");
    }
    let _ = write!(
        css,
        "font-family: {}; font-size: {}; color: {};",
        style.font_family, style.font_size, style.text_color
    );
    escape_html(&css)
}

fn open_section(out: &mut String, id: &str, key: &str, title: &str, style: Option<&SurfaceStyle>) {
    let margin = style
        .map(|s| format!(" style=\"margin-bottom: {}\"", escape_html(&s.section_margin)))
        .unwrap_or_default();
    let header_class = style
        .map(|s| format!(" class=\"{}\"", escape_html(&s.section_header_class)))
        .unwrap_or_default();
    let _ = write!(
        out,
        "<div class=\"resume-section\" id=\"{id}{key}\"{margin}><h2{header_class}>{title}</h2>"
    );
}

fn item_style(style: Option<&SurfaceStyle>) -> String {
    style
        .map(|s| format!(" style=\"border-bottom: {}\"", escape_html(&s.item_border)))
        .unwrap_or_default()
}

/// Render a surface. `style` is only passed for the customizable template.
pub fn render_surface(surface: &RenderedSurface, style: Option<&SurfaceStyle>) -> String {
    let id = surface.template.id();
    let mut out = String::new();

    match style {
        Some(s) => {
            let _ = write!(
                out,
                "<div class=\"resume-template {id}-template {}\" id=\"{id}Template\" style=\"{}\">",
                escape_html(&s.density_class),
                inline_style(s)
            );
            let _ = write!(out, "<header class=\"{}\">", escape_html(&s.header_class));
        }
        None => {
            let _ = write!(
                out,
                "<div class=\"resume-template {id}-template\" id=\"{id}Template\"><header>"
            );
        }
    }
    let _ = write!(
        out,
        "<h1 id=\"{id}Name\">{}</h1><div id=\"{id}Contact\">{}</div></header>",
        escape_html(&surface.name),
        escape_html(&surface.contact)
    );

    if let Some(summary) = &surface.summary {
        open_section(&mut out, id, "Summary", "Professional Summary", style);
        let _ = write!(out, "<p>{}</p></div>", escape_html(summary));
    }

    if let Some(items) = &surface.experience {
        open_section(&mut out, id, "Experience", "Work Experience", style);
        for item in items {
            let _ = write!(
                out,
                "<div class=\"experience-item\"{}><div class=\"item-title-preview\">{}</div>\
                 <div class=\"item-company\">{}</div><div class=\"item-date\">{}</div>",
                item_style(style),
                escape_html(&item.title),
                escape_html(&item.company),
                escape_html(&item.date_range)
            );
            if let Some(bullets) = &item.bullets {
                let lines: Vec<String> = bullets.iter().map(|b| escape_html(b)).collect();
                let _ = write!(out, "<div class=\"item-description\">{}</div>", lines.join("<br>"));
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }

    if let Some(items) = &surface.education {
        open_section(&mut out, id, "Education", "Education", style);
        for item in items {
            let _ = write!(
                out,
                "<div class=\"education-item\"{}><div class=\"item-title-preview\">{}</div>\
                 <div class=\"item-company\">{}</div>",
                item_style(style),
                escape_html(&item.heading),
                escape_html(&item.institution)
            );
            if let Some(details) = &item.details {
                let _ = write!(out, "<div class=\"education-details\">{}</div>", escape_html(details));
            }
            let _ = write!(out, "<div class=\"item-date\">{}</div></div>", escape_html(&item.year));
        }
        out.push_str("</div>");
    }

    if let Some(skills) = &surface.skills {
        open_section(&mut out, id, "Skills", "Skills", style);
        let container_class = style
            .map(|s| escape_html(&s.skills_container_class))
            .unwrap_or_else(|| "skills-container".to_string());
        let tag_style = style
            .map(|s| format!(" style=\"background: {}\"", escape_html(&s.skill_tag_background)))
            .unwrap_or_default();
        let _ = write!(out, "<div class=\"{container_class}\">");
        for skill in skills {
            let _ = write!(out, "<span class=\"skill-tag\"{tag_style}>{}</span>", escape_html(skill));
        }
        out.push_str("</div></div>");
    }

    if let Some(items) = &surface.projects {
        open_section(&mut out, id, "Projects", "Projects", style);
        for item in items {
            let _ = write!(
                out,
                "<div class=\"project-item\"{}><div class=\"item-title-preview\">{}</div>\
                 <div class=\"item-description\">{}</div></div>",
                item_style(style),
                escape_html(&item.title),
                escape_html(&item.description)
            );
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
    out
}
