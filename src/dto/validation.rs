//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a game answer is a single word made of letters.
///
/// Surrounding whitespace is ignored, matching how the answer is stored.
///
/// # Examples
///
/// ```ignore
/// validate_answer("hangman")   // Ok
/// validate_answer("  rust ")   // Ok
/// validate_answer("two words") // Err - whitespace inside
/// validate_answer("r2d2")      // Err - digits
/// ```
pub fn validate_answer(answer: &str) -> Result<(), ValidationError> {
    let answer = answer.trim();
    if answer.is_empty() {
        let mut err = ValidationError::new("answer_empty");
        err.message = Some("You must enter an answer to create a new game!".into());
        return Err(err);
    }

    if !answer.chars().all(char::is_alphabetic) {
        let mut err = ValidationError::new("answer_format");
        err.message = Some("The answer may only contain letters!".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_answer_valid() {
        assert!(validate_answer("hangman").is_ok());
        assert!(validate_answer("  Rust ").is_ok());
        assert!(validate_answer("café").is_ok());
    }

    #[test]
    fn test_validate_answer_empty() {
        assert!(validate_answer("").is_err());
        assert!(validate_answer("   ").is_err());
    }

    #[test]
    fn test_validate_answer_invalid_format() {
        assert!(validate_answer("two words").is_err());
        assert!(validate_answer("r2d2").is_err());
        assert!(validate_answer("hang-man").is_err());
    }
}
