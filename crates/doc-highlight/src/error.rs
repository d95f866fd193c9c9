use crate::payload::IndexKey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HighlightError {
    #[error("File read error: {0}")]
    FileReadError(String),

    #[error("File write error: {0}")]
    FileWriteError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No highlight for {}", format_keys(.0))]
    UnresolvedKeys(Vec<IndexKey>),

    #[error("Page {0} out of range")]
    PageOutOfRange(u32),
}

fn format_keys(keys: &[IndexKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, HighlightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_error_display() {
        let error = HighlightError::FileReadError("file locked".to_string());
        assert_eq!(format!("{}", error), "File read error: file locked");
    }

    #[test]
    fn test_file_write_error_display() {
        let error = HighlightError::FileWriteError("permission denied".to_string());
        assert_eq!(format!("{}", error), "File write error: permission denied");
    }

    #[test]
    fn test_serialization_error_display() {
        let error = HighlightError::SerializationError("invalid JSON".to_string());
        assert_eq!(format!("{}", error), "Serialization error: invalid JSON");
    }

    #[test]
    fn test_invalid_config_display() {
        let error = HighlightError::InvalidConfig("decay_ms must be positive".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid config: decay_ms must be positive"
        );
    }

    #[test]
    fn test_unresolved_keys_lists_every_key() {
        let error = HighlightError::UnresolvedKeys(vec![IndexKey::Word(3), IndexKey::Line(12)]);
        assert_eq!(format!("{}", error), "No highlight for word 3, line 12");
    }

    #[test]
    fn test_page_out_of_range_display() {
        let error = HighlightError::PageOutOfRange(7);
        assert_eq!(format!("{}", error), "Page 7 out of range");
    }

    #[test]
    fn test_error_is_cloneable() {
        let error = HighlightError::PageOutOfRange(1);
        assert_eq!(error.clone(), error);
    }
}
