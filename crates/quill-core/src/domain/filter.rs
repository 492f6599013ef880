use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::Post;

/// Default number of posts per listing page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound a client may request for `page_size`.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Upper bound a client may request for `page`, chosen so that
/// `page * page_size` can never overflow a u64.
pub const MAX_PAGE: u64 = u64::MAX / MAX_PAGE_SIZE;

/// Query-parameter-driven predicate narrowing the listed posts.
///
/// Substring matches are case-insensitive; the date range is inclusive on
/// both ends (`created_at_before=2024-01-31` keeps posts created any time
/// during that day).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilter {
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at_after: Option<NaiveDate>,
    pub created_at_before: Option<NaiveDate>,
}

impl PostFilter {
    /// Inclusive lower bound on `created_at`.
    pub fn after_bound(&self) -> Option<DateTime<Utc>> {
        self.created_at_after
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound on `created_at` (midnight of the following day,
    /// so the named day itself is fully included).
    pub fn before_bound(&self) -> Option<DateTime<Utc>> {
        self.created_at_before
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Evaluate the filter against a post. Used by the in-memory repository;
    /// the Postgres repository translates the same predicates to SQL.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(needle) = &self.title {
            if !contains_ignore_case(&post.title, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.content {
            if !contains_ignore_case(&post.content, needle) {
                return false;
            }
        }
        if let Some(after) = self.after_bound() {
            if post.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.before_bound() {
            if post.created_at >= before {
                return false;
            }
        }
        true
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.created_at_after.is_none()
            && self.created_at_before.is_none()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Page-number pagination request (1-based).
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Build a request from raw query values, clamping to sane bounds.
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a filtered listing, with the total match count.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn post(title: &str, content: &str) -> Post {
        Post::new(Uuid::new_v4(), title.to_string(), content.to_string())
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let filter = PostFilter {
            title: Some("RUST".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&post("Learning rust slowly", "some content here")));
        assert!(!filter.matches(&post("Learning go slowly", "some content here")));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let mut p = post("A day in the life", "twenty characters of content");
        p.created_at = "2024-06-15T23:30:00Z".parse().unwrap();

        let filter = PostFilter {
            created_at_after: Some("2024-06-15".parse().unwrap()),
            created_at_before: Some("2024-06-15".parse().unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = PostFilter {
            created_at_before: Some("2024-06-14".parse().unwrap()),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_page_request_clamps_bounds() {
        let page = PageRequest::new(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 0);

        let page = PageRequest::new(Some(3), None);
        assert_eq!(page.offset(), 2 * DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_absurd_page_number_does_not_overflow() {
        let page = PageRequest::new(Some(u64::MAX), Some(1000));
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        // page * page_size stays within u64
        assert!(page.offset() <= u64::MAX - page.page_size);
    }
}
