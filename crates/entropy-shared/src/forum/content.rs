pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Comment content is required")]
    EmptyComment,

    #[error("Comment is too long (max. {MAX_COMMENT_CHARS} characters)")]
    CommentTooLong,

    #[error("Title and content are required")]
    MissingPostFields,

    #[error("Category name is required")]
    MissingCategoryName,
}

/// Trims the comment and enforces the length limit, counted in characters.
pub fn validate_comment(content: &str) -> Result<String, ContentError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ContentError::EmptyComment);
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(ContentError::CommentTooLong);
    }
    Ok(content.to_string())
}

pub fn validate_post(title: &str, content: &str) -> Result<(String, String), ContentError> {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        return Err(ContentError::MissingPostFields);
    }
    Ok((title.to_string(), content.to_string()))
}

pub fn validate_category_name(name: &str) -> Result<String, ContentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContentError::MissingCategoryName);
    }
    Ok(name.to_string())
}
