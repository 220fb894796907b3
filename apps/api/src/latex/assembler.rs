//! Deterministic LaTeX document assembly from a [`ResumeRecord`].
//!
//! `assemble` is a pure function: no I/O, no randomness, same record in →
//! same document out. Each section is built by its own small function
//! returning `Option<String>` — `None` means the section's data is empty and
//! nothing at all is emitted for it, not an empty header. The top level
//! collects the fragments and joins them exactly once.
//!
//! The skeleton is Jake Gutierrez's resume template (MIT), kept intact so
//! the emitted `.tex` compiles on a stock TeX Live without extra packages.

use crate::latex::escape::escape;
use crate::models::resume::{
    CustomSection, EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord, SkillSet,
};

/// Display cap on experience bullets; extra items are dropped, not an error.
const MAX_EXPERIENCE_BULLETS: usize = 4;

/// Header fallback when extraction found no name at all.
const NAME_PLACEHOLDER: &str = "Name Not Found";

const PREAMBLE: &str = r"%-------------------------
% Resume in Latex
% Author : Jake Gutierrez
% Based off of: https://github.com/sb2nov/resume
% License : MIT
%------------------------

\documentclass[letterpaper,11pt]{article}

\usepackage{latexsym}
\usepackage[empty]{fullpage}
\usepackage{titlesec}
\usepackage{marvosym}
\usepackage[usenames,dvipsnames]{color}
\usepackage{verbatim}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\usepackage{fancyhdr}
\usepackage[english]{babel}
\usepackage{tabularx}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{textcomp}
\input{glyphtounicode}

\pagestyle{fancy}
\fancyhf{} % clear all header and footer fields
\fancyfoot{}
\renewcommand{\headrulewidth}{0pt}
\renewcommand{\footrulewidth}{0pt}

% Adjust margins
\addtolength{\oddsidemargin}{-0.5in}
\addtolength{\evensidemargin}{-0.5in}
\addtolength{\textwidth}{1in}
\addtolength{\topmargin}{-.5in}
\addtolength{\textheight}{1.0in}

\urlstyle{same}

\raggedbottom
\raggedright
\setlength{\tabcolsep}{0in}

% Sections formatting
\titleformat{\section}{
  \vspace{-4pt}\scshape\raggedright\large
}{}{0em}{}[\color{black}\titlerule \vspace{-5pt}]

% Ensure that generated pdf is machine readable/ATS parsable
\pdfgentounicode=1

%-------------------------
% Custom commands
\newcommand{\resumeItem}[1]{
  \item\small{
    {#1 \vspace{-2pt}}
  }
}

\newcommand{\resumeSubheading}[4]{
  \vspace{-2pt}\item
    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}
      \textbf{#1} & #2 \\
      \textit{\small#3} & \textit{\small #4} \\
    \end{tabular*}\vspace{-7pt}
}

\newcommand{\resumeProjectHeading}[2]{
    \item
    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}
      \small#1 & #2 \\
    \end{tabular*}\vspace{-7pt}
}

\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}

\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}

%-------------------------------------------
%%%%%%  RESUME STARTS HERE  %%%%%%%%%%%%%%%%%%%%%%%%%%%%

\begin{document}";

const CLOSING: &str = r"%-------------------------------------------
\end{document}";

/// Assembles the complete LaTeX document for a normalized résumé record.
pub fn assemble(record: &ResumeRecord) -> String {
    let mut fragments: Vec<String> = vec![PREAMBLE.to_string(), header_block(record)];

    fragments.extend(
        [
            summary_section(&record.summary),
            education_section(&record.education),
            experience_section(&record.experience),
            projects_section(&record.projects),
            skills_section(&record.skills),
            certifications_section(&record.certifications),
            awards_section(&record.awards),
            languages_section(&record.languages),
            custom_sections_block(&record.custom_sections),
        ]
        .into_iter()
        .flatten(),
    );

    fragments.push(CLOSING.to_string());
    fragments.join("\n\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Header and contact line
// ────────────────────────────────────────────────────────────────────────────

fn header_block(record: &ResumeRecord) -> String {
    let name = if record.name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        escape(&record.name)
    };

    let mut block = format!(
        "%----------HEADING----------\n\\begin{{center}}\n    \\textbf{{\\Huge \\scshape {name}}} \\\\ \\vspace{{1pt}}"
    );

    if let Some(contact) = contact_line(record) {
        block.push_str("\n    \\small ");
        block.push_str(&contact);
    }

    block.push_str("\n\\end{center}");
    block
}

/// Joins whichever contact fields are present, in fixed order, with ` $|$ `.
/// Returns `None` when no contact field is set — no empty line is emitted.
fn contact_line(record: &ResumeRecord) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if !record.phone.is_empty() {
        parts.push(escape(&record.phone));
    }
    if !record.email.is_empty() {
        let email = escape(&record.email);
        parts.push(format!("\\href{{mailto:{email}}}{{\\underline{{{email}}}}}"));
    }
    if !record.linkedin.is_empty() {
        let url = href_target(&record.linkedin);
        parts.push(format!("\\href{{{url}}}{{\\underline{{LinkedIn}}}}"));
    }
    if !record.github.is_empty() {
        let url = href_target(&record.github);
        parts.push(format!("\\href{{{url}}}{{\\underline{{GitHub}}}}"));
    }
    if !record.website.is_empty() {
        let url = href_target(&record.website);
        parts.push(format!("\\href{{{url}}}{{\\underline{{Website}}}}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" $|$ "))
    }
}

/// Prepends `https://` when the value carries no scheme; already-schemed
/// URLs are embedded unchanged.
fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Builds a safe `\href` target: scheme-normalized, with the two characters
/// that break an href argument (`%` comments out the rest of the line, `#`
/// is a macro parameter) escaped. hyperref resolves both escaped forms to
/// the literal character in the link.
fn href_target(url: &str) -> String {
    ensure_scheme(url).replace('%', "\\%").replace('#', "\\#")
}

// ────────────────────────────────────────────────────────────────────────────
// Section builders
// ────────────────────────────────────────────────────────────────────────────

fn summary_section(summary: &str) -> Option<String> {
    if summary.is_empty() {
        return None;
    }
    Some(format!(
        "%-----------SUMMARY-----------\n\\section{{Summary}}\n  \\small{{{}}}",
        escape(summary)
    ))
}

fn education_section(entries: &[EducationEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut out = String::from(
        "%-----------EDUCATION-----------\n\\section{Education}\n  \\resumeSubHeadingListStart",
    );

    for edu in entries {
        out.push_str(&format!(
            "\n    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}",
            escape(&edu.degree),
            escape(&edu.date),
            escape(&edu.institution),
            escape(&edu.location),
        ));

        if !edu.gpa.is_empty() || !edu.details.is_empty() {
            out.push_str("\n      \\resumeItemListStart");
            if !edu.gpa.is_empty() {
                out.push_str(&format!("\n        \\resumeItem{{GPA: {}}}", escape(&edu.gpa)));
            }
            if !edu.details.is_empty() {
                out.push_str(&format!("\n        \\resumeItem{{{}}}", escape(&edu.details)));
            }
            out.push_str("\n      \\resumeItemListEnd");
        }
    }

    out.push_str("\n  \\resumeSubHeadingListEnd");
    Some(out)
}

fn experience_section(entries: &[ExperienceEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut out = String::from(
        "%-----------EXPERIENCE-----------\n\\section{Experience}\n  \\resumeSubHeadingListStart",
    );

    for exp in entries {
        out.push_str(&format!(
            "\n    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}",
            escape(&exp.title),
            escape(&exp.date),
            escape(&exp.company),
            escape(&exp.location),
        ));

        if !exp.description.is_empty() {
            out.push_str("\n      \\resumeItemListStart");
            for bullet in exp.description.iter().take(MAX_EXPERIENCE_BULLETS) {
                out.push_str(&format!("\n        \\resumeItem{{{}}}", escape(bullet)));
            }
            out.push_str("\n      \\resumeItemListEnd");
        }
    }

    out.push_str("\n  \\resumeSubHeadingListEnd");
    Some(out)
}

fn projects_section(entries: &[ProjectEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut out = String::from(
        "%-----------PROJECTS-----------\n\\section{Projects}\n    \\resumeSubHeadingListStart",
    );

    for project in entries {
        let mut title = escape(&project.title);
        if !project.technologies.is_empty() {
            title.push_str(&format!(" $|$ \\emph{{{}}}", escape(&project.technologies)));
        }

        out.push_str(&format!(
            "\n      \\resumeProjectHeading\n          {{\\textbf{{{title}}}}}{{{}}}",
            escape(&project.date),
        ));

        if !project.description.is_empty() {
            out.push_str(&format!(
                "\n          \\resumeItemListStart\n            \\resumeItem{{{}}}",
                escape(&project.description),
            ));
            if !project.link.is_empty() {
                let url = href_target(&project.link);
                out.push_str(&format!(
                    "\n            \\resumeItem{{Link: \\href{{{url}}}{{\\underline{{{}}}}}}}",
                    escape(&project.link),
                ));
            }
            out.push_str("\n          \\resumeItemListEnd");
        }
    }

    out.push_str("\n    \\resumeSubHeadingListEnd");
    Some(out)
}

fn skills_section(skills: &SkillSet) -> Option<String> {
    let categories: [(&str, &[String]); 6] = [
        ("Languages", &skills.languages),
        ("Frameworks", &skills.frameworks),
        ("Developer Tools", &skills.tools),
        ("Libraries", &skills.libraries),
        ("Databases", &skills.databases),
        ("Other", &skills.other),
    ];

    let lines: Vec<String> = categories
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| {
            let joined = items.iter().map(|s| escape(s)).collect::<Vec<_>>().join(", ");
            format!("\\textbf{{{label}}}: {joined}")
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "%-----------TECHNICAL SKILLS-----------\n\\section{{Technical Skills}}\n \\begin{{itemize}}[leftmargin=0.15in, label={{}}]\n    \\small{{\\item{{\n     {}\n    }}}}\n \\end{{itemize}}",
        lines.join(" \\\\\n     "),
    ))
}

fn certifications_section(entries: &[crate::models::resume::CertificationEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut out = String::from(
        "%-----------CERTIFICATIONS-----------\n\\section{Certifications}\n  \\resumeSubHeadingListStart",
    );

    for cert in entries {
        out.push_str(&format!(
            "\n    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{}}",
            escape(&cert.name),
            escape(&cert.date),
            escape(&cert.issuer),
        ));
    }

    out.push_str("\n  \\resumeSubHeadingListEnd");
    Some(out)
}

fn awards_section(awards: &[String]) -> Option<String> {
    if awards.is_empty() {
        return None;
    }

    let items: String = awards
        .iter()
        .map(|award| format!("\n    \\resumeItem{{{}}}", escape(award)))
        .collect();

    Some(format!(
        "%-----------AWARDS-----------\n\\section{{Awards \\& Honors}}\n  \\resumeItemListStart{items}\n  \\resumeItemListEnd",
    ))
}

fn languages_section(languages: &[String]) -> Option<String> {
    if languages.is_empty() {
        return None;
    }

    let items: String = languages
        .iter()
        .map(|lang| format!("\n    \\resumeItem{{{}}}", escape(lang)))
        .collect();

    Some(format!(
        "%-----------LANGUAGES-----------\n\\section{{Languages}}\n  \\resumeItemListStart{items}\n  \\resumeItemListEnd",
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Custom sections
// ────────────────────────────────────────────────────────────────────────────

/// Bullet glyphs (and plain list markers) stripped from the start of custom
/// section content lines — the list environment supplies its own marker.
const LEADING_BULLETS: &[char] = &['•', '●', '○', '◦', '▪', '▫', '-', '*'];

fn custom_sections_block(sections: &[CustomSection]) -> Option<String> {
    let rendered: Vec<String> = sections.iter().filter_map(custom_section).collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("\n\n"))
    }
}

fn custom_section(section: &CustomSection) -> Option<String> {
    if section.title.is_empty() && section.content.is_empty() {
        return None;
    }

    let title = escape(&section.title.to_uppercase());
    let lines: Vec<&str> = section
        .content
        .lines()
        .map(strip_leading_bullet)
        .filter(|line| !line.is_empty())
        .collect();

    let body = match lines.len() {
        0 => return None,
        1 => format!("  \\small{{{}}}", escape(lines[0])),
        _ => {
            let items: String = lines
                .iter()
                .map(|line| format!("\n    \\resumeItem{{{}}}", escape(line)))
                .collect();
            format!("  \\resumeItemListStart{items}\n  \\resumeItemListEnd")
        }
    };

    Some(format!(
        "%-----------CUSTOM SECTION-----------\n\\section{{{title}}}\n{body}"
    ))
}

fn strip_leading_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(LEADING_BULLETS).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::CertificationEntry;

    fn record_with_name() -> ResumeRecord {
        ResumeRecord {
            name: "Ada Lovelace".to_string(),
            ..Default::default()
        }
    }

    // ── header and contact line ─────────────────────────────────────────────

    #[test]
    fn test_minimal_record_contains_name_and_no_sections() {
        let record = ResumeRecord {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);

        assert!(doc.contains("Ada Lovelace"));
        assert!(doc.contains("\\href{mailto:ada@example.com}"));
        assert!(!doc.contains("\\section{Education}"));
        assert!(!doc.contains("\\section{Experience}"));
        assert!(!doc.contains("\\section{Technical Skills}"));
        assert!(doc.starts_with("%-------------------------"));
        assert!(doc.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_missing_name_uses_placeholder() {
        let doc = assemble(&ResumeRecord::default());
        assert!(doc.contains("Name Not Found"));
    }

    #[test]
    fn test_no_contact_fields_emits_no_contact_line() {
        let doc = assemble(&record_with_name());
        assert!(!doc.contains("\\small \\href"));
        assert!(!doc.contains(" $|$ "));
    }

    #[test]
    fn test_contact_fields_join_in_fixed_order() {
        let record = ResumeRecord {
            name: "Ada".to_string(),
            phone: "555-0100".to_string(),
            email: "ada@example.com".to_string(),
            github: "github.com/ada".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);
        let phone = doc.find("555-0100").unwrap();
        let email = doc.find("mailto:ada@example.com").unwrap();
        let github = doc.find("{GitHub}").unwrap();
        assert!(phone < email && email < github);
        assert!(doc.contains(" $|$ "));
    }

    #[test]
    fn test_link_without_scheme_gets_https() {
        let record = ResumeRecord {
            linkedin: "linkedin.com/in/ada".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\href{https://linkedin.com/in/ada}"));
    }

    #[test]
    fn test_href_escapes_percent_and_hash() {
        let record = ResumeRecord {
            website: "example.com/a%20b#top".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\href{https://example.com/a\\%20b\\#top}"));
        // The raw characters must not survive inside any href argument.
        assert!(!doc.contains("a%20b"));
        assert!(!doc.contains("b#top"));
    }

    #[test]
    fn test_link_with_scheme_is_unchanged() {
        let record = ResumeRecord {
            website: "http://ada.dev".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\href{http://ada.dev}"));
        assert!(!doc.contains("https://http://"));
    }

    // ── experience ──────────────────────────────────────────────────────────

    #[test]
    fn test_experience_bullets_capped_at_four() {
        let record = ResumeRecord {
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: vec![
                    "Did X".to_string(),
                    "Did Y".to_string(),
                    "Did Z".to_string(),
                    "Did W".to_string(),
                    "Did V".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let doc = assemble(&record);

        assert!(doc.contains("\\resumeItem{Did X}"));
        assert!(doc.contains("\\resumeItem{Did W}"));
        assert!(!doc.contains("Did V"));
        assert_eq!(doc.matches("\\resumeItem{Did ").count(), 4);
    }

    #[test]
    fn test_experience_entries_keep_input_order() {
        let record = ResumeRecord {
            experience: vec![
                ExperienceEntry {
                    title: "Second Job".to_string(),
                    ..Default::default()
                },
                ExperienceEntry {
                    title: "First Job".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.find("Second Job").unwrap() < doc.find("First Job").unwrap());
    }

    // ── projects ────────────────────────────────────────────────────────────

    #[test]
    fn test_project_technologies_render_as_emphasized_suffix() {
        let record = ResumeRecord {
            projects: vec![ProjectEntry {
                title: "CVLatex".to_string(),
                technologies: "Rust, LaTeX".to_string(),
                description: "Resume builder".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("CVLatex $|$ \\emph{Rust, LaTeX}"));
        assert!(doc.contains("\\resumeItem{Resume builder}"));
    }

    #[test]
    fn test_project_link_rendered_when_description_present() {
        let record = ResumeRecord {
            projects: vec![ProjectEntry {
                title: "CVLatex".to_string(),
                description: "Resume builder".to_string(),
                link: "github.com/ada/cvlatex".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\href{https://github.com/ada/cvlatex}"));
    }

    // ── skills ──────────────────────────────────────────────────────────────

    #[test]
    fn test_skills_empty_categories_omitted() {
        let record = ResumeRecord {
            skills: SkillSet {
                languages: vec!["Rust".to_string(), "Python".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\textbf{Languages}: Rust, Python"));
        assert!(!doc.contains("\\textbf{Frameworks}"));
        assert!(!doc.contains("\\textbf{Databases}"));
    }

    #[test]
    fn test_all_skills_empty_omits_section() {
        let doc = assemble(&record_with_name());
        assert!(!doc.contains("Technical Skills"));
    }

    // ── remaining simple sections ───────────────────────────────────────────

    #[test]
    fn test_summary_renders_escaped_prose() {
        let record = ResumeRecord {
            summary: "R&D engineer".to_string(),
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\section{Summary}"));
        assert!(doc.contains("R\\&D engineer"));
    }

    #[test]
    fn test_certifications_render_issuer_and_date() {
        let record = ResumeRecord {
            certifications: vec![CertificationEntry {
                name: "Solutions Architect".to_string(),
                issuer: "AWS".to_string(),
                date: "2023".to_string(),
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\section{Certifications}"));
        assert!(doc.contains("{Solutions Architect}{2023}"));
        assert!(doc.contains("{AWS}{}"));
    }

    #[test]
    fn test_awards_and_languages_sections() {
        let record = ResumeRecord {
            awards: vec!["Turing Award".to_string()],
            languages: vec!["English".to_string(), "French".to_string()],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\section{Awards \\& Honors}"));
        assert!(doc.contains("\\resumeItem{Turing Award}"));
        assert!(doc.contains("\\section{Languages}"));
        assert!(doc.find("English").unwrap() < doc.find("French").unwrap());
    }

    // ── custom sections ─────────────────────────────────────────────────────

    #[test]
    fn test_custom_section_multiline_renders_bullets_with_glyphs_stripped() {
        let record = ResumeRecord {
            custom_sections: vec![CustomSection {
                title: "Certifications".to_string(),
                content: "• AWS\n• GCP".to_string(),
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\section{CERTIFICATIONS}"));
        assert!(doc.contains("\\resumeItem{AWS}"));
        assert!(doc.contains("\\resumeItem{GCP}"));
        assert!(!doc.contains("textbullet{}AWS"));
    }

    #[test]
    fn test_custom_section_single_line_renders_prose() {
        let record = ResumeRecord {
            custom_sections: vec![CustomSection {
                title: "Interests".to_string(),
                content: "Analytical engines".to_string(),
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        assert!(doc.contains("\\section{INTERESTS}"));
        assert!(doc.contains("\\small{Analytical engines}"));
        assert!(!doc.contains("\\resumeItem{Analytical engines}"));
    }

    #[test]
    fn test_custom_section_with_blank_lines_counts_nonempty_only() {
        let record = ResumeRecord {
            custom_sections: vec![CustomSection {
                title: "Talks".to_string(),
                content: "\n- On computation\n\n".to_string(),
            }],
            ..Default::default()
        };
        let doc = assemble(&record);
        // One non-empty line after stripping → prose, not a list.
        assert!(doc.contains("\\small{On computation}"));
    }

    // ── determinism ─────────────────────────────────────────────────────────

    #[test]
    fn test_assemble_is_deterministic() {
        let record = ResumeRecord {
            name: "Ada".to_string(),
            summary: "Engineer — R&D".to_string(),
            awards: vec!["Award".to_string()],
            ..Default::default()
        };
        assert_eq!(assemble(&record), assemble(&record));
    }
}
