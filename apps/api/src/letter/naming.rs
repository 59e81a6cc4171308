//! Export file naming.

use crate::letter::request::LetterRequest;

/// Used when a session has a draft but no known request (edited before generating).
pub const DEFAULT_FILE_NAME: &str = "Cover_Letter.pdf";

const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `{company}_{job_title}_{tone without spaces}_Cover_Letter.pdf`, made safe for filesystems
/// and `Content-Disposition` headers.
pub fn export_file_name(request: &LetterRequest) -> String {
    let stem = format!(
        "{}_{}_{}_Cover_Letter",
        request.company,
        request.job_title,
        request.tone.file_fragment()
    );
    let sanitized = sanitize_file_stem(&stem);
    if sanitized.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    format!("{sanitized}.pdf")
}

/// Replaces path separators, reserved characters and control characters with `_`,
/// then trims leading/trailing dots and whitespace.
pub fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_control() || UNSAFE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::tone::Tone;

    fn request(company: &str, title: &str, tone: Tone) -> LetterRequest {
        LetterRequest {
            job_title: title.to_string(),
            company: company.to_string(),
            skills: vec!["Rust".to_string()],
            experience: "x".to_string(),
            tone,
            job_description: String::new(),
        }
    }

    #[test]
    fn test_file_name_layout() {
        let name = export_file_name(&request(
            "Gemini Labs",
            "Senior Data Scientist",
            Tone::ConfidentStrategic,
        ));
        assert_eq!(
            name,
            "Gemini Labs_Senior Data Scientist_ConfidentandStrategic_Cover_Letter.pdf"
        );
    }

    #[test]
    fn test_file_name_sanitizes_path_characters() {
        let name = export_file_name(&request(
            "../Acme/Corp",
            "C\\C++ Dev: \"Lead\"?",
            Tone::FormalResultsDriven,
        ));
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(!name.contains(':'));
        assert!(!name.contains('"'));
        assert!(!name.contains('?'));
        assert!(name.starts_with("_Acme_Corp_C_C++ Dev_ _Lead__"), "{name}");
        assert!(name.ends_with("_FormalandResults-Driven_Cover_Letter.pdf"));
    }

    #[test]
    fn test_sanitize_strips_control_characters_and_edges() {
        assert_eq!(sanitize_file_stem(" .hidden\nname. "), "hidden_name");
        assert_eq!(sanitize_file_stem("..."), "");
    }
}
