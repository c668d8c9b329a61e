use crate::error::CoreError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::InvalidRating(rating))
    }
}

/// Returns the trimmed comment.
pub fn validate_comment(comment: &str) -> Result<&str, CoreError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        Err(CoreError::EmptyComment)
    } else {
        Ok(trimmed)
    }
}

pub fn validate_review(rating: i32, comment: &str) -> Result<&str, CoreError> {
    validate_rating(rating)?;
    validate_comment(comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert_eq!(validate_rating(0), Err(CoreError::InvalidRating(0)));
        assert_eq!(validate_rating(6), Err(CoreError::InvalidRating(6)));
    }

    #[test]
    fn test_comment_trimmed() {
        assert_eq!(validate_review(4, "  tasty  "), Ok("tasty"));
        assert_eq!(validate_review(4, "   "), Err(CoreError::EmptyComment));
    }
}
