//! Regex/heuristic résumé parser — the non-LLM fallback path.
//!
//! Deliberately best-effort: it scans line by line for contact details, then
//! walks keyword-delimited sections to recover education, experience, and
//! skills. Anything it cannot place is dropped rather than guessed at.
//! Source order is preserved throughout.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?1?[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("valid regex")
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    Projects,
    Skills,
}

/// Parses résumé text with regexes and keyword heuristics only.
pub fn parse_heuristic(text: &str) -> ResumeRecord {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut record = ResumeRecord::default();

    scan_contact_lines(&lines, &mut record);
    scan_name(&lines, &mut record);
    scan_sections(&lines, &mut record);

    record
}

fn scan_contact_lines(lines: &[&str], record: &mut ResumeRecord) {
    for line in lines {
        if record.email.is_empty() {
            if let Some(m) = EMAIL_RE.find(line) {
                record.email = m.as_str().to_string();
            }
        }
        if record.phone.is_empty() {
            if let Some(m) = PHONE_RE.find(line) {
                record.phone = m.as_str().to_string();
            }
        }

        let lower = line.to_lowercase();
        if record.linkedin.is_empty() && lower.contains("linkedin.com") {
            record.linkedin = line.to_string();
        }
        if record.github.is_empty() && lower.contains("github.com") {
            record.github = line.to_string();
        }
        if record.website.is_empty()
            && (lower.contains("http") || lower.contains("www."))
            && !lower.contains("linkedin")
            && !lower.contains("github")
        {
            record.website = line.to_string();
        }
    }
}

/// The name is usually the first short line near the top that is not a
/// contact detail.
fn scan_name(lines: &[&str], record: &mut ResumeRecord) {
    if !record.name.is_empty() {
        return;
    }
    for line in lines.iter().take(5) {
        let looks_like_contact = line.contains('@') || line.contains('(') || line.contains(')');
        if !looks_like_contact && line.split_whitespace().count() <= 4 && line.len() > 2 {
            record.name = line.to_string();
            return;
        }
    }
}

fn section_for(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    if lower.contains("education") || lower.contains("academic") {
        Some(Section::Education)
    } else if lower.contains("experience")
        || lower.contains("work")
        || lower.contains("employment")
        || lower.contains("professional")
    {
        Some(Section::Experience)
    } else if lower.contains("project") || lower.contains("portfolio") {
        Some(Section::Projects)
    } else if lower.contains("skill")
        || lower.contains("technical")
        || lower.contains("programming")
        || lower.contains("languages")
    {
        Some(Section::Skills)
    } else {
        None
    }
}

fn scan_sections(lines: &[&str], record: &mut ResumeRecord) {
    let mut section: Option<Section> = None;
    let mut education: Option<EducationEntry> = None;
    let mut experience: Option<ExperienceEntry> = None;

    for line in lines {
        if let Some(next) = section_for(line) {
            // Heading line only when short; long lines merely mention the word.
            if line.split_whitespace().count() <= 4 {
                flush_education(&mut education, record);
                flush_experience(&mut experience, record);
                section = Some(next);
                continue;
            }
        }

        match section {
            Some(Section::Education) => scan_education_line(line, &mut education, record),
            Some(Section::Experience) => scan_experience_line(line, &mut experience, record),
            Some(Section::Skills) => scan_skills_line(line, record),
            _ => {}
        }
    }

    flush_education(&mut education, record);
    flush_experience(&mut experience, record);
}

fn scan_education_line(
    line: &str,
    current: &mut Option<EducationEntry>,
    record: &mut ResumeRecord,
) {
    let lower = line.to_lowercase();
    let is_degree = ["bachelor", "master", "phd", "associate", "certificate"]
        .iter()
        .any(|kw| lower.contains(kw));

    if is_degree {
        flush_education(current, record);
        *current = Some(EducationEntry {
            degree: line.to_string(),
            ..Default::default()
        });
    } else if let Some(entry) = current {
        if entry.institution.is_empty() {
            entry.institution = line.to_string();
        } else if entry.date.is_empty() && YEAR_RE.is_match(line) {
            entry.date = line.to_string();
        }
    }
}

fn scan_experience_line(
    line: &str,
    current: &mut Option<ExperienceEntry>,
    record: &mut ResumeRecord,
) {
    let looks_like_heading =
        line.contains('-') || line.contains('|') || YEAR_RE.is_match(line);

    if looks_like_heading && current.as_ref().map_or(true, |e| !e.description.is_empty()) {
        flush_experience(current, record);
        *current = Some(ExperienceEntry {
            title: line.to_string(),
            ..Default::default()
        });
    } else if let Some(entry) = current {
        entry.description.push(line.to_string());
    }
}

fn scan_skills_line(line: &str, record: &mut ResumeRecord) {
    let lower = line.to_lowercase();
    let items = || split_skill_items(line);

    if lower.contains("language") || lower.contains("programming") {
        if record.skills.languages.is_empty() {
            record.skills.languages = items();
        }
    } else if lower.contains("framework") {
        if record.skills.frameworks.is_empty() {
            record.skills.frameworks = items();
        }
    } else if (lower.contains("tool") || lower.contains("software"))
        && record.skills.tools.is_empty()
    {
        record.skills.tools = items();
    }
}

fn split_skill_items(line: &str) -> Vec<String> {
    let after_label = line.rsplit(':').next().unwrap_or(line);
    after_label
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn flush_education(current: &mut Option<EducationEntry>, record: &mut ResumeRecord) {
    if let Some(entry) = current.take() {
        record.education.push(entry);
    }
}

fn flush_experience(current: &mut Option<ExperienceEntry>, record: &mut ResumeRecord) {
    if let Some(entry) = current.take() {
        record.experience.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Ada Lovelace
ada.lovelace@example.com
(555) 010-0199
linkedin.com/in/adalovelace
github.com/adalovelace

Education
Bachelor of Mathematics
University of London
1833 - 1835

Experience
Analyst | Analytical Engine Project | 1842-1843
Wrote the first published algorithm
Translated and annotated Menabrea's notes

Skills
Programming Languages: Analytical Engine Notation, Pseudocode
Tools: Punched cards, Difference engine
";

    #[test]
    fn test_contact_details_extracted() {
        let record = parse_heuristic(SAMPLE);
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.email, "ada.lovelace@example.com");
        assert!(record.phone.contains("555"));
        assert!(record.linkedin.contains("linkedin.com/in/adalovelace"));
        assert!(record.github.contains("github.com/adalovelace"));
    }

    #[test]
    fn test_education_section_parsed() {
        let record = parse_heuristic(SAMPLE);
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].degree, "Bachelor of Mathematics");
        assert_eq!(record.education[0].institution, "University of London");
        assert_eq!(record.education[0].date, "1833 - 1835");
    }

    #[test]
    fn test_experience_section_parsed_with_bullets_in_order() {
        let record = parse_heuristic(SAMPLE);
        assert_eq!(record.experience.len(), 1);
        assert!(record.experience[0].title.contains("Analyst"));
        assert_eq!(record.experience[0].description.len(), 2);
        assert!(record.experience[0].description[0].contains("first published algorithm"));
    }

    #[test]
    fn test_skills_lines_split_on_commas() {
        let record = parse_heuristic(SAMPLE);
        assert_eq!(
            record.skills.languages,
            vec!["Analytical Engine Notation", "Pseudocode"]
        );
        assert_eq!(record.skills.tools.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let record = parse_heuristic("");
        assert_eq!(record.name, "");
        assert!(record.education.is_empty());
        assert!(record.experience.is_empty());
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_name_skips_contact_looking_lines() {
        let record = parse_heuristic("ada@example.com\nAda Lovelace\n");
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.email, "ada@example.com");
    }
}
