//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::FieldError;

/// Minimum title length, in characters.
pub const TITLE_MIN_CHARS: usize = 5;
/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Minimum content length, in characters.
pub const CONTENT_MIN_CHARS: usize = 20;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        validate_post_fields(&self.title, &self.content)
    }
}

/// Request to fully update a post. Both fields are required (PUT semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        validate_post_fields(&self.title, &self.content)
    }
}

/// The only domain rules: title length in [5, 100], content length >= 20.
/// Lengths are counted in characters, not bytes.
fn validate_post_fields(title: &str, content: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    let title_len = title.chars().count();
    if title_len < TITLE_MIN_CHARS {
        errors.push(FieldError::new(
            "title",
            "Title must be at least 5 characters long.",
        ));
    } else if title_len > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", "Title cannot exceed 100 characters."));
    }

    if content.chars().count() < CONTENT_MIN_CHARS {
        errors.push(FieldError::new(
            "content",
            "Content must be at least 20 characters long.",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// A single post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<PostResponse>,
}

/// Query parameters accepted by `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at_after: Option<NaiveDate>,
    pub created_at_before: Option<NaiveDate>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_valid_post_passes() {
        let req = request("Hello world", "This content is long enough to pass.");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_short_title_rejected() {
        let req = request("Hi", "This content is long enough to pass.");
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title must be at least 5 characters long.");
    }

    #[test]
    fn test_long_title_rejected() {
        let req = request(&"x".repeat(101), "This content is long enough to pass.");
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].message, "Title cannot exceed 100 characters.");
    }

    #[test]
    fn test_boundary_lengths_accepted() {
        // 5 and 100 char titles, 20 char content are all valid
        assert!(request(&"x".repeat(5), &"y".repeat(20)).validate().is_ok());
        assert!(request(&"x".repeat(100), &"y".repeat(20)).validate().is_ok());
    }

    #[test]
    fn test_short_content_rejected() {
        let req = request("Valid title", "too short");
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "content");
    }

    #[test]
    fn test_errors_are_itemized_per_field() {
        let req = request("Hi", "nope");
        let errors = req.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content"]);
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 5 multibyte chars: valid title even though it is 15 bytes
        assert!(request("日本語記事", &"y".repeat(20)).validate().is_ok());
    }
}
