//! Letter request types and form validation.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::letter::tone::Tone;

/// Exact separator used to split the skills field. Caller-side policy: a skill
/// list typed as "Rust,Go" stays a single skill.
pub const SKILL_SEPARATOR: &str = ", ";

/// Validated input to the Draft Composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterRequest {
    pub job_title: String,
    pub company: String,
    /// Non-empty; the first two are highlighted separately from the full list.
    pub skills: Vec<String>,
    pub experience: String,
    pub tone: Tone,
    pub job_description: String,
}

impl LetterRequest {
    /// The first two skills joined for the opening paragraph.
    pub fn leading_skills(&self) -> String {
        self.skills
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(SKILL_SEPARATOR)
    }

    pub fn all_skills(&self) -> String {
        self.skills.join(SKILL_SEPARATOR)
    }
}

/// Raw form submission. Skills arrive as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterForm {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl LetterForm {
    /// Checks the required fields and produces a `LetterRequest`.
    ///
    /// All missing fields are reported together so the user can fix them in one pass.
    pub fn validate(self) -> Result<LetterRequest, AppError> {
        let skills = split_skills(&self.skills);

        let mut missing = Vec::new();
        if self.job_title.trim().is_empty() {
            missing.push("job_title");
        }
        if self.company.trim().is_empty() {
            missing.push("company");
        }
        if skills.is_empty() {
            missing.push("skills");
        }
        if self.experience.trim().is_empty() {
            missing.push("experience");
        }

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in the required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(LetterRequest {
            job_title: self.job_title.trim().to_string(),
            company: self.company.trim().to_string(),
            skills,
            experience: self.experience.trim().to_string(),
            tone: self.tone,
            job_description: self
                .job_description
                .map(|jd| jd.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Splits a skills field on `", "` exactly, dropping blank pieces.
pub fn split_skills(raw: &str) -> Vec<String> {
    // Split first, then trim: a trailing ", " must not leave a comma behind.
    raw.split(SKILL_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Contact block placed at the top of every letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub url: String,
}

impl Default for ContactDetails {
    fn default() -> Self {
        Self {
            name: "[Your Name]".to_string(),
            phone: "[Your Phone Number]".to_string(),
            email: "[Your Email Address]".to_string(),
            url: "[Your LinkedIn/Portfolio URL]".to_string(),
        }
    }
}

/// Pre-filled values for the application form.
#[derive(Debug, Clone, Serialize)]
pub struct FormDefaults {
    pub job_title: &'static str,
    pub company: &'static str,
    pub skills: &'static str,
    pub experience: &'static str,
    pub tone: Tone,
    pub job_description: &'static str,
}

pub const FORM_DEFAULTS: FormDefaults = FormDefaults {
    job_title: "Senior Data Scientist",
    company: "Gemini Labs",
    skills: "Python, PyTorch, A/B Testing, Cloud Deployment, Statistical Modeling",
    experience: "Led a team of 3 engineers to optimize ML models, cutting inference time by 40% \
        and saving $10k/month in cloud costs. Built and deployed 5 production-ready systems using \
        Python and Azure, directly impacting 100k users. Mentored junior staff on best practices \
        for PyTorch development.",
    tone: Tone::ConfidentStrategic,
    job_description: "We are looking for a Senior Data Scientist to lead our core research \
        initiatives. The ideal candidate will have deep expertise in PyTorch, experience deploying \
        models to production environments (Azure/GCP), and a proven ability to mentor junior team \
        members. Must have strong statistical modeling and A/B testing skills.",
};
