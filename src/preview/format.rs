//! Pure field formatting rules shared by every template surface.

use crate::models::{ExperienceEntry, PersonalInfo};
use chrono::NaiveDate;

/// Separator between contact fields on the identity line.
pub const CONTACT_SEPARATOR: &str = " • ";

/// Bullet marker prefixed to description lines.
pub const BULLET: &str = "•";

/// Join the non-empty contact fields in the order email, phone, location, linkedin.
pub fn contact_line(personal: &PersonalInfo) -> String {
    [
        &personal.email,
        &personal.phone,
        &personal.location,
        &personal.linkedin,
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(CONTACT_SEPARATOR)
}

/// Render a `YYYY-MM` month as `"Jan 2020"`.
///
/// Empty input gives an empty string; anything unparseable is returned as-is.
pub fn format_month(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Display date range of an experience entry.
///
/// - no start date: empty
/// - current: `"start - Present"`
/// - end date set: `"start - end"`
/// - otherwise the start alone
pub fn date_range(entry: &ExperienceEntry) -> String {
    if entry.start_date.is_empty() {
        return String::new();
    }
    let start = format_month(&entry.start_date);
    let end = if entry.current {
        "Present".to_string()
    } else {
        format_month(&entry.end_date)
    };

    if end.is_empty() {
        start
    } else {
        format!("{start} - {end}")
    }
}

/// Reformat a free-text description into bullet lines.
///
/// Blank lines are dropped, lines already starting with a bullet or hyphen
/// are kept, every other line gets a bullet prefix.
pub fn format_description(description: &str) -> Vec<String> {
    description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with(BULLET) || line.starts_with('-') {
                line.to_string()
            } else {
                format!("{BULLET} {line}")
            }
        })
        .collect()
}

/// Split the comma-delimited skills string into trimmed, non-empty tags.
pub fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"degree in field"`, dropping the joiner when either side is blank.
pub fn degree_line(degree: &str, field: &str) -> String {
    [degree, field]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" in ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(start: &str, end: &str, current: bool) -> ExperienceEntry {
        ExperienceEntry {
            start_date: start.to_string(),
            end_date: end.to_string(),
            current,
            ..Default::default()
        }
    }

    #[test]
    fn test_date_range_examples() {
        assert_eq!(date_range(&experience("2020-01", "", true)), "Jan 2020 - Present");
        assert_eq!(
            date_range(&experience("2020-01", "2021-06", false)),
            "Jan 2020 - Jun 2021"
        );
        assert_eq!(date_range(&experience("", "2021-06", true)), "");
        assert_eq!(date_range(&experience("2020-01", "", false)), "Jan 2020");
    }

    #[test]
    fn test_current_wins_over_end_date() {
        assert_eq!(
            date_range(&experience("2019-11", "2021-06", true)),
            "Nov 2019 - Present"
        );
    }

    #[test]
    fn test_format_month_passes_through_garbage() {
        assert_eq!(format_month("2020-13"), "2020-13");
        assert_eq!(format_month("soon"), "soon");
        assert_eq!(format_month(""), "");
    }

    #[test]
    fn test_format_description() {
        let lines = format_description("Built things\n\n  • Led team \n- Shipped\r\n   ");
        assert_eq!(lines, vec!["• Built things", "• Led team", "- Shipped"]);
        assert!(format_description("   \n").is_empty());
    }

    #[test]
    fn test_parse_skills() {
        assert_eq!(parse_skills("Python, Go,  Rust ,,"), vec!["Python", "Go", "Rust"]);
        assert!(parse_skills(" , ,").is_empty());
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn test_degree_line() {
        assert_eq!(degree_line("BSc", "Physics"), "BSc in Physics");
        assert_eq!(degree_line("BSc", ""), "BSc");
        assert_eq!(degree_line("", "Physics"), "Physics");
        assert_eq!(degree_line("", ""), "");
    }

    #[test]
    fn test_contact_line_order_and_skips() {
        let personal = PersonalInfo {
            email: "a@b.c".to_string(),
            location: "Oslo".to_string(),
            linkedin: "in/ada".to_string(),
            ..Default::default()
        };
        assert_eq!(contact_line(&personal), "a@b.c • Oslo • in/ada");
        assert_eq!(contact_line(&PersonalInfo::default()), "");
    }
}
