// Prompt templates for project analysis.
// Placeholders: {target_role}, {job_description}, {skills}, {projects_json}

pub const STANDARD_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Decide whether each project on this resume is a good fit for the target role.

TARGET ROLE: {target_role}

JOB DESCRIPTION:
{job_description}

CANDIDATE SKILLS: {skills}

RESUME PROJECTS:
{projects_json}

Return a JSON object with this EXACT schema:
{
  "project_analysis": [
    {
      "title": "exact project title from the resume",
      "suitable": true,
      "reason": "one sentence, only when unsuitable",
      "replacement_suggestion": {
        "title": "Better-aligned project",
        "github_url": "https://github.com/owner/repo",
        "bullet_points": ["...", "..."]
      }
    }
  ],
  "suggested_projects": [
    {
      "title": "Additional project idea",
      "github_url": "https://github.com/owner/repo",
      "bullet_points": ["...", "...", "..."]
    }
  ]
}

Rules:
1. Include every resume project exactly once, using its exact title
2. A project is suitable when its technologies or problem domain clearly match the job
3. Only unsuitable projects get a reason and a replacement_suggestion
4. Suggest at most 3 additional projects that use technologies named in the job description
5. Every bullet point starts with an action verb and is under 25 words"#;

pub const ADVANCED_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Score each project on this resume from 0 to 100 for relevance to the target role.

TARGET ROLE: {target_role}

JOB DESCRIPTION:
{job_description}

CANDIDATE SKILLS: {skills}

RESUME PROJECTS:
{projects_json}

Scoring guide:
- 90-100: core technologies and problem domain match the job
- 80-89: strong overlap, minor gaps
- 50-79: transferable but not aligned
- 0-49: unrelated to the role

Return a JSON object with this EXACT schema:
{
  "projects_to_replace": [
    {"title": "exact project title", "score": 42, "reason": "why it scores low"}
  ],
  "replacement_suggestions": [
    {
      "title": "Replacement project",
      "github_url": "https://github.com/owner/repo",
      "bullets": ["...", "...", "..."]
    }
  ]
}

Rules:
1. List only projects scoring below 80 in projects_to_replace
2. Provide one replacement suggestion per listed project, aligned with the job's stack
3. Every bullet starts with an action verb and is under 25 words"#;
