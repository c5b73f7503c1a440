//! Property-based tests for request validation

use forum::shared::comment::{CreateCommentRequest, COMMENT_MAX_CHARS};
use forum::shared::post::CreatePostRequest;
use forum::shared::user::{normalize_email, RegisterRequest};
use forum::shared::validation::check;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_well_formed_registration_accepted(
        username in "[A-Za-z0-9_]{2,30}",
        local in "[a-z]{1,12}",
        password in "[a-z]{2,8}[A-Z]{2,8}[0-9]{2,8}",
    ) {
        let request = RegisterRequest {
            username,
            email: format!("{}@example.com", local),
            password,
        };

        prop_assert!(check(&request).is_ok());
    }

    #[test]
    fn test_password_without_digit_rejected(password in "[a-zA-Z]{6,20}") {
        let request = RegisterRequest {
            username: "valid_user".to_string(),
            email: "valid@example.com".to_string(),
            password,
        };

        let err = check(&request).unwrap_err();
        let details = err.details();
        prop_assert!(details.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn test_email_normalization_is_idempotent(email in "[ ]{0,3}[A-Za-z]{1,10}@[A-Za-z]{1,10}\\.com[ ]{0,3}") {
        let once = normalize_email(&email);

        prop_assert_eq!(normalize_email(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
        prop_assert_eq!(once.to_lowercase(), once);
    }

    #[test]
    fn test_post_title_length_limit(len in 1usize..400) {
        let request = CreatePostRequest {
            title: "t".repeat(len),
            content: "Long enough content".to_string(),
            ..Default::default()
        };

        prop_assert_eq!(check(&request).is_ok(), len <= 200);
    }

    #[test]
    fn test_comment_content_trimmed_then_checked(body in "[a-z ]{0,50}", pad in 0usize..5) {
        let padding = " ".repeat(pad);
        let request = CreateCommentRequest {
            content: format!("{}{}{}", padding, body, padding),
            parent_comment: None,
        }
        .normalized();

        prop_assert_eq!(request.content.as_str(), body.trim());
        prop_assert_eq!(check(&request).is_ok(), !body.trim().is_empty());
        prop_assert!(request.content.chars().count() as u64 <= COMMENT_MAX_CHARS);
    }
}
