//! The normalized résumé record — the contract between extraction and rendering.
//!
//! Every field is present with a defined empty value: scalar fields are
//! `String` (empty = absent), collections are `Vec` (empty = absent). The
//! custom deserializers below map JSON `null` and missing keys to those empty
//! values, so by the time a record reaches the assembler there are no
//! `Option`s left to check — an empty value simply suppresses its section.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "null_to_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub linkedin: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub github: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub website: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub address: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub summary: String,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "null_to_default_skills")]
    pub skills: SkillSet,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub certifications: Vec<CertificationEntry>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub awards: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "null_to_empty")]
    pub degree: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub institution: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub date: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub location: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub gpa: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "null_to_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub company: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub date: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub location: String,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "null_to_empty")]
    pub title: String,
    /// Extraction sometimes returns a list of lines here; it is flattened to
    /// one space-joined string at deserialization time.
    #[serde(deserialize_with = "string_or_lines")]
    pub description: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub technologies: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub date: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub link: String,
}

/// Skill categories in display order. A category with no items is omitted
/// from the rendered document; a record where all categories are empty
/// renders no skills section at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSet {
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub frameworks: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub tools: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub libraries: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub databases: Vec<String>,
    #[serde(deserialize_with = "null_to_empty_vec")]
    pub other: Vec<String>,
}

impl SkillSet {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
            && self.frameworks.is_empty()
            && self.tools.is_empty()
            && self.libraries.is_empty()
            && self.databases.is_empty()
            && self.other.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    #[serde(deserialize_with = "null_to_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub issuer: String,
    #[serde(deserialize_with = "null_to_empty")]
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    #[serde(deserialize_with = "null_to_empty")]
    pub title: String,
    /// May contain embedded line breaks; multi-line content renders as a
    /// bulleted list, single-line content as prose.
    #[serde(deserialize_with = "string_or_lines_joined")]
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Null-tolerant deserializers
// ────────────────────────────────────────────────────────────────────────────

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_to_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_to_default_skills<'de, D>(deserializer: D) -> Result<SkillSet, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SkillSet>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string, a list of strings, or null. Lists are space-joined.
fn string_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrLines {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrLines>::deserialize(deserializer)? {
        None => String::new(),
        Some(StringOrLines::One(s)) => s,
        Some(StringOrLines::Many(lines)) => lines.join(" "),
    })
}

/// Like `string_or_lines`, but joins with newlines — custom section content
/// keeps its bullet-per-line shape.
fn string_or_lines_joined<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrLines {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrLines>::deserialize(deserializer)? {
        None => String::new(),
        Some(StringOrLines::One(s)) => s,
        Some(StringOrLines::Many(lines)) => lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_normalize_to_empty() {
        let record: ResumeRecord = serde_json::from_str(r#"{"name": "Ada Lovelace"}"#).unwrap();
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.email, "");
        assert!(record.education.is_empty());
        assert!(record.skills.is_empty());
        assert!(record.custom_sections.is_empty());
    }

    #[test]
    fn test_null_fields_normalize_to_empty() {
        let record: ResumeRecord = serde_json::from_str(
            r#"{"name": null, "email": null, "experience": null, "skills": null}"#,
        )
        .unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.email, "");
        assert!(record.experience.is_empty());
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_project_description_accepts_string() {
        let project: ProjectEntry =
            serde_json::from_str(r#"{"title": "CVLatex", "description": "Resume builder"}"#)
                .unwrap();
        assert_eq!(project.description, "Resume builder");
    }

    #[test]
    fn test_project_description_flattens_list() {
        let project: ProjectEntry = serde_json::from_str(
            r#"{"title": "CVLatex", "description": ["Resume builder", "with LaTeX output"]}"#,
        )
        .unwrap();
        assert_eq!(project.description, "Resume builder with LaTeX output");
    }

    #[test]
    fn test_custom_section_content_list_keeps_lines() {
        let section: CustomSection =
            serde_json::from_str(r#"{"title": "Certifications", "content": ["AWS", "GCP"]}"#)
                .unwrap();
        assert_eq!(section.content, "AWS\nGCP");
    }

    #[test]
    fn test_experience_order_is_preserved() {
        let record: ResumeRecord = serde_json::from_str(
            r#"{"experience": [{"title": "First"}, {"title": "Second"}, {"title": "Third"}]}"#,
        )
        .unwrap();
        let titles: Vec<&str> = record.experience.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_skill_set_is_empty() {
        let mut skills = SkillSet::default();
        assert!(skills.is_empty());
        skills.databases.push("PostgreSQL".to_string());
        assert!(!skills.is_empty());
    }
}
