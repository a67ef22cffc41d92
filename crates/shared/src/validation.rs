//! Common validation utilities.

use validator::ValidationError;

/// Largest batch the importer will send in one transaction.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Upper bound for the pause between batches (1 minute).
pub const MAX_BATCH_DELAY_MS: u64 = 60_000;

/// Maximum length of an external source tag.
const MAX_SOURCE_TAG_LENGTH: usize = 32;

/// Validates that a batch size is within 1..=MAX_BATCH_SIZE.
pub fn validate_batch_size(size: usize) -> Result<(), ValidationError> {
    if (1..=MAX_BATCH_SIZE).contains(&size) {
        Ok(())
    } else {
        let mut err = ValidationError::new("batch_size_range");
        err.message = Some(format!("Batch size must be between 1 and {}", MAX_BATCH_SIZE).into());
        Err(err)
    }
}

/// Validates the delay between batches.
pub fn validate_batch_delay(delay_ms: u64) -> Result<(), ValidationError> {
    if delay_ms <= MAX_BATCH_DELAY_MS {
        Ok(())
    } else {
        let mut err = ValidationError::new("batch_delay_range");
        err.message = Some(
            format!("Batch delay cannot exceed {} milliseconds", MAX_BATCH_DELAY_MS).into(),
        );
        Err(err)
    }
}

/// Validates an external source tag such as `vincere`.
///
/// Tags are part of the idempotency key, so they must be stable lowercase
/// identifiers: ASCII letters, digits and underscores only.
pub fn validate_source_tag(tag: &str) -> Result<(), ValidationError> {
    let valid_chars = tag
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !tag.is_empty() && tag.len() <= MAX_SOURCE_TAG_LENGTH && valid_chars {
        Ok(())
    } else {
        let mut err = ValidationError::new("source_tag_format");
        err.message = Some("Source tag must be 1-32 lowercase letters, digits or underscores".into());
        Err(err)
    }
}
