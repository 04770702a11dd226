// LLM prompt constants for resume rewriting and bullet generation.
// Cross-cutting fragments come from llm_client::prompts.

/// Resume rewrite prompt.
/// Replace: {truthfulness_instruction}, {bullet_style_instruction}, {user_category},
///          {category_guidance}, {target_role}, {linkedin_url}, {github_url},
///          {job_description}, {resume_text}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"{truthfulness_instruction}

{bullet_style_instruction}

Rewrite the resume below so it is optimized for the target role and job description.

CANDIDATE CATEGORY: {user_category}
{category_guidance}

TARGET ROLE: {target_role}
LINKEDIN: {linkedin_url}
GITHUB: {github_url}

JOB DESCRIPTION:
{job_description}

ORIGINAL RESUME:
{resume_text}

Return a JSON object with this EXACT schema (omit nothing; use empty strings / arrays when absent):
{
  "name": "",
  "phone": "",
  "email": "",
  "linkedin": "",
  "github": "",
  "location": "",
  "target_role": "",
  "summary": "2-3 sentence professional summary aligned with the role",
  "work_experience": [
    {"role": "", "company": "", "duration": "", "bullets": ["", ""]}
  ],
  "projects": [
    {"title": "", "bullets": ["", ""], "github_url": null}
  ],
  "skills": [
    {"category": "Languages", "items": ["Go", "Rust"]}
  ],
  "certifications": [""],
  "education": [
    {"degree": "", "school": "", "year": "", "cgpa": null}
  ],
  "achievements": [],
  "extracurricular_activities": [],
  "languages_known": [],
  "personal_details": null
}

Rules:
1. Keep every employer, project and certification that exists in the original; never add new ones
2. Order work experience most recent first; at most 3 projects
3. Group skills by category and put job-description technologies first"#;

/// Extra guidance for freshers: education first, fuller optional sections.
pub const FRESHER_GUIDANCE: &str = "The candidate is early-career. Lead with education and projects; \
    keep achievements, extracurricular activities, languages known and personal details when present.";

/// Extra guidance for experienced candidates.
pub const EXPERIENCED_GUIDANCE: &str = "The candidate is experienced. Lead with work experience and quantified impact; \
    leave achievements, extracurricular activities and personal details empty unless they are senior-level.";

/// Manual project bullet prompt.
/// Replace: {bullet_style_instruction}, {title}, {tech_stack}, {target_role}, {job_description}
pub const PROJECT_BULLETS_PROMPT_TEMPLATE: &str = r#"{bullet_style_instruction}

Write resume bullet points for a project the candidate built.

PROJECT TITLE: {title}
TECH STACK: {tech_stack}
TARGET ROLE: {target_role}

JOB DESCRIPTION:
{job_description}

Return a JSON ARRAY of exactly 3 strings, e.g.:
["Built ...", "Designed ...", "Reduced ..."]

Only mention technologies from the tech stack above."#;
