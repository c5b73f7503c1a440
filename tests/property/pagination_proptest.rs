//! Property-based tests for pagination and list queries

use forum::shared::pagination::{ListQuery, PageRequest, Pagination, DEFAULT_POST_LIMIT, MAX_LIMIT};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_pages_cover_total(total in 0u64..100_000, page in 1u32..1000, limit in 1u32..=MAX_LIMIT) {
        let pagination = Pagination::new(total, PageRequest::new(page, limit));

        prop_assert!(pagination.pages * u64::from(limit) >= total);
        if total > 0 {
            prop_assert!((pagination.pages - 1) * u64::from(limit) < total);
        } else {
            prop_assert_eq!(pagination.pages, 0);
        }
    }

    #[test]
    fn test_page_request_is_clamped(page in any::<u32>(), limit in any::<u32>()) {
        let request = PageRequest::new(page, limit);

        prop_assert!(request.page >= 1);
        prop_assert!((1..=MAX_LIMIT).contains(&request.limit));
    }

    #[test]
    fn test_valid_window_accepted(page in 1u32..10_000, limit in 1u32..=MAX_LIMIT) {
        let query = ListQuery::default().page(page).limit(limit);
        let request = query.page_request(DEFAULT_POST_LIMIT).unwrap();

        prop_assert_eq!(request.page, page);
        prop_assert_eq!(request.limit, limit);
        prop_assert_eq!(request.offset(), u64::from(page - 1) * u64::from(limit));
    }

    #[test]
    fn test_oversized_limit_rejected(limit in (MAX_LIMIT + 1)..u32::MAX) {
        let query = ListQuery::default().limit(limit);
        let err = query.page_request(DEFAULT_POST_LIMIT).unwrap_err();

        let details = err.details();
        prop_assert_eq!(details[0].field.as_str(), "limit");
    }

    #[test]
    fn test_non_numeric_page_rejected(page in "[a-z]{1,8}") {
        let query = ListQuery {
            page: Some(page),
            ..Default::default()
        };

        prop_assert!(query.post_params().is_err());
    }
}
