use serde::Deserialize;
use store_object::{PageRequest, StoreError};

use super::state::AppState;

/// Raw `?limit=&cursor=` values; interpretation is left to `PageRequest`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

impl ListQuery {
    /// Pick `limit` and `cursor` out of decoded query pairs
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut query.limit,
                "cursor" => &mut query.cursor,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn page_request(&self, state: &AppState) -> Result<PageRequest, StoreError> {
        PageRequest::from_query(
            self.limit.as_deref(),
            self.cursor.as_deref(),
            state.pagination.default_limit as usize,
            state.pagination.max_limit as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_value_wins() {
        let query = ListQuery::from_pairs(pairs(&[("limit", "1"), ("limit", "2"), ("sort", "x")]));
        assert_eq!(query.limit.as_deref(), Some("1"));
        assert_eq!(query.cursor, None);
    }

    #[test]
    fn test_empty_query() {
        let query = ListQuery::from_pairs(Vec::new());
        assert!(query.limit.is_none() && query.cursor.is_none());
    }
}
