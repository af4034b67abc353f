//! Input validation for ideas and document uploads.
//!
//! Every check returns a specific `AppError` so callers can surface the
//! precise client-fixable mistake.

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_FILENAME_LENGTH, MAX_TITLE_LENGTH};
use crate::error::AppError;
use crate::models::ExpectedImpact;

/// Validate and normalize an idea title: trimmed, non-empty, at most 200 chars.
pub fn validate_idea_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(
            "Title must be 1-200 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an idea description: trimmed, non-empty, at most 2000 chars.
pub fn validate_idea_description(description: &str) -> Result<String, AppError> {
    let trimmed = description.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::Validation(
            "Description must be 1-2000 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse an expected-impact value, mapping unknown values to a validation error.
pub fn parse_expected_impact(value: &str) -> Result<ExpectedImpact, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Validation("Invalid impact level".to_string()))
}

/// Sanitize a client-supplied filename for display and derived naming.
///
/// Path separators are removed outright, then anything outside
/// `[A-Za-z0-9._-]` is dropped. The stored object key is generated
/// independently, so this only protects display and logging surfaces.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\')
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .take(MAX_FILENAME_LENGTH)
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        return "file".to_string();
    }

    sanitized
}

/// Validate file size against the configured maximum.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate the file extension against the allow-list; returns the
/// lowercased extension on success.
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    if !filename.contains('.') || !allowed_extensions.contains(&extension) {
        return Err(AppError::Validation(format!(
            "File type is not allowed. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        ["pdf", "doc", "docx", "txt", "png"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn title_trimmed_and_bounded() {
        assert_eq!(validate_idea_title("  Solar roof  ").unwrap(), "Solar roof");
        assert!(validate_idea_title("   ").is_err());
        assert!(validate_idea_title(&"x".repeat(201)).is_err());
        assert!(validate_idea_title(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn description_trimmed_and_bounded() {
        assert_eq!(validate_idea_description(" ok ").unwrap(), "ok");
        assert!(validate_idea_description("").is_err());
        assert!(validate_idea_description(&"x".repeat(2001)).is_err());
        assert!(validate_idea_description(&"x".repeat(2000)).is_ok());
    }

    #[test]
    fn impact_parses_known_values_only() {
        assert_eq!(parse_expected_impact("MEDIUM").unwrap(), ExpectedImpact::Medium);
        assert!(parse_expected_impact("medium").is_err());
        assert!(parse_expected_impact("URGENT").is_err());
    }

    #[test]
    fn sanitize_strips_separators_and_specials() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("my file (1).pdf"), "myfile1.pdf");
        assert_eq!(sanitize_filename("a\\b/c.txt"), "abc.txt");
    }

    #[test]
    fn sanitize_falls_back_for_empty_results() {
        assert_eq!(sanitize_filename("(((*)))"), "file");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("..."), "file");
    }

    #[test]
    fn file_size_limit_enforced() {
        let max = 10 * 1024 * 1024;
        assert!(validate_file_size(max, max).is_ok());
        let err = validate_file_size(max + 1, max).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn extension_allow_list_enforced() {
        assert_eq!(validate_file_extension("a.PDF", &allowed()).unwrap(), "pdf");
        assert_eq!(
            validate_file_extension("archive.tar.txt", &allowed()).unwrap(),
            "txt"
        );
        assert!(validate_file_extension("script.exe", &allowed()).is_err());
        assert!(validate_file_extension("noextension", &allowed()).is_err());
    }
}
