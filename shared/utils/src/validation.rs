use crate::error::{ProcuraError, ProcuraResult};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> ProcuraResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(ProcuraError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match error.message.as_ref() {
                Some(message) => message.to_string(),
                None => format!("Validation failed for field '{}': {}", field, error.code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> ProcuraResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(ProcuraError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> ProcuraResult<()> {
    if file_size > max_size {
        return Err(ProcuraError::validation(
            "file_size",
            format!(
                "File size {} bytes exceeds maximum allowed size {} bytes",
                file_size, max_size
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct TitleOnly {
        #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
        title: String,
    }

    #[test]
    fn test_validate_model_reports_message() {
        let err = validate_model(&TitleOnly { title: "ab".to_string() }).unwrap_err();
        assert!(err.to_string().contains("between 3 and 100"));

        assert!(validate_model(&TitleOnly { title: "Quarterly review".to_string() }).is_ok());
    }

    #[test]
    fn test_validate_file_type() {
        let allowed_types = &["xlsx", "xls", "csv"];
        assert!(validate_file_type("orders.csv", allowed_types).is_ok());
        assert!(validate_file_type("orders.XLSX", allowed_types).is_ok());
        assert!(validate_file_type("orders.txt", allowed_types).is_err());
        assert!(validate_file_type("orders", allowed_types).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(1024, 10 * 1024 * 1024).is_ok());
        assert!(validate_file_size(11 * 1024 * 1024, 10 * 1024 * 1024).is_err());
    }
}
