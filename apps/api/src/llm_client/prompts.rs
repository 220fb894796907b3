// LLM prompt templates for résumé extraction and improvement.
// All prompts for the parse module are defined here.

/// Extraction prompt. `{cv_text}` is replaced with the raw text pulled from
/// the uploaded file. The schema mirrors `ResumeRecord` field for field.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Parse the following CV/Resume text and extract structured information in JSON format.
IMPORTANT: Only include information that actually exists in the CV text. Do not add placeholder or example data.
If a field doesn't exist in the CV, either omit it entirely or set it to null/empty.

Required JSON structure (only include fields that have actual data):
{
    "name": "Full name (only if found)",
    "email": "Email address (only if found)",
    "phone": "Phone number (only if found)",
    "linkedin": "LinkedIn URL (only if found)",
    "github": "GitHub URL (only if found)",
    "website": "Personal website (only if found)",
    "address": "Address/Location (only if found)",
    "summary": "Professional summary paragraph (only if found)",
    "education": [
        {
            "degree": "Degree name",
            "institution": "Institution name",
            "date": "Date range",
            "location": "Location (if mentioned)",
            "gpa": "GPA (if mentioned)",
            "details": "Additional details (if any)"
        }
    ],
    "experience": [
        {
            "title": "Job title",
            "company": "Company name",
            "date": "Date range",
            "location": "Location (if mentioned)",
            "description": ["List of responsibilities and achievements"]
        }
    ],
    "projects": [
        {
            "title": "Project name",
            "description": "Project description",
            "technologies": "Technologies used",
            "date": "Date or duration (if mentioned)",
            "link": "Project link (if mentioned)"
        }
    ],
    "skills": {
        "languages": ["Programming languages (only if mentioned)"],
        "frameworks": ["Frameworks and libraries (only if mentioned)"],
        "tools": ["Tools and software (only if mentioned)"],
        "libraries": ["Additional libraries (only if mentioned)"],
        "databases": ["Databases (only if mentioned)"],
        "other": ["Other technical skills (only if mentioned)"]
    },
    "certifications": [
        {
            "name": "Certification name",
            "issuer": "Issuing organization",
            "date": "Date obtained (if mentioned)"
        }
    ],
    "awards": ["Awards and honors (only if mentioned)"],
    "languages": ["Spoken languages (only if mentioned)"]
}

CV Text:
{cv_text}

Return only the JSON object with actual data from the CV, no additional text:"#;

/// Improvement prompt. `{resume_json}` is the current record serialized as
/// JSON; `{feedback}` is the reviewer's free-text critique. The model must
/// return the full record again, in the same schema, with the feedback
/// applied — never dropping data that the feedback did not touch.
pub const IMPROVE_PROMPT_TEMPLATE: &str = r#"You are reviewing a structured resume and applying reviewer feedback to it.

CURRENT RESUME (JSON):
{resume_json}

REVIEWER FEEDBACK:
{feedback}

Rewrite the resume JSON to address the feedback. Rules:
- Keep the exact same JSON schema and field names as the input.
- Keep every piece of factual data (names, dates, companies, links) unchanged unless the feedback explicitly corrects it.
- Improve wording, ordering, and emphasis as the feedback directs.
- Never invent employers, degrees, dates, or metrics that are not in the input.

Return only the improved JSON object, no additional text:"#;
