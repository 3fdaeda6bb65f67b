//! Result type alias
//!
//! This module provides a convenient Result type alias that uses NosqlError
//! as the error type.

use super::errors::NosqlError;

/// Result type alias for cosmos-nosql operations
///
/// # Examples
///
/// ```
/// use cosmos_nosql::domain::result::Result;
/// use cosmos_nosql::domain::errors::NosqlError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(NosqlError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, NosqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
