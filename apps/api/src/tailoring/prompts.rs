// Prompt constants for résumé tailoring.

/// Tailoring prompt template. Replace `{summary}`, `{experience}`,
/// `{skills}` and `{job_description}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Your task is to tailor a candidate's resume to match a job description.
Analyze the job description and the candidate's resume sections (summary, experience, and skills).
Modify the sections so they align with the job description, add value, and incorporate its keywords.

**Job Description:**
{job_description}

**Candidate's Current Resume Sections:**
- **Summary:** {summary}
- **Experience:** {experience}
- **Skills:** {skills}

**Instructions:**
1. Rewrite the Summary: concise and impactful, directly addressing the key requirements of the job.
2. Enhance Experience: do NOT remove existing entries and keep every field of each entry. Add quantifiable achievements and responsibilities that align with the job description.
3. Expand Skills: add skills from the job description that are missing from the candidate's list.

Return a JSON object with this EXACT shape and no other text:
{
  "summary": "A new, rewritten summary.",
  "experience": [{"company": "...", "position": "...", "description": "..."}],
  "skills": ["Skill one", "Skill two"]
}
"skills" MUST be an array of plain strings."#;
