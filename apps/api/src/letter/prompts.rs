// All LLM prompt constants for letter generation.
// Reuses the cross-cutting markup fragment from llm_client::prompts.

/// System prompt for cover letter drafting. The tone label is appended at call time.
pub const LETTER_SYSTEM: &str = "You are a professional cover letter generator. Your goal is to write a tailored, \
    ATS-friendly cover letter in a simple, readable font, avoiding complex tables or graphics. \
    The letter must be 3-4 distinct paragraphs. \
    Highlight measurable achievements (use specific numbers/percentages) and explicitly \
    connect the provided skills to the experience summary and, if present, the job description. \
    The tone should be: ";

/// Letter prompt template. Replace every `{placeholder}` before sending.
pub const LETTER_PROMPT_TEMPLATE: &str = r#"Draft a cover letter for the following application:
- Job Title: {job_title}
- Company Name: {company}
- Desired Tone: {tone}

Candidate Highlights:
- Key Skills to Emphasize: {skills}
- Experience Summary (Focus on achievements with measurable impact): {experience}

Job Description (If provided, match skills to this text):
---
{job_description}
---

Preferred verbs for this tone: {preferred_verbs}
Avoid: {avoid}

Begin the letter with a polite salutation (e.g., 'Dear Hiring Team,' or 'Dear {company} Hiring Team,').
Do NOT include a contact header; it is added separately.

{markup_instruction}"#;

/// Substituted when the user leaves the job description empty.
pub const NO_JOB_DESCRIPTION: &str = "No job description provided.";
