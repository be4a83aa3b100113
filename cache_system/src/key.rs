//! Query keys
//!
//! A key is a path of segments such as `clients` or `clients/pipeline`.
//! Invalidating a key drops every key it prefixes.

use std::fmt;

use crate::errors::CacheError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Result<Self, CacheError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(CacheError::InvalidKey("a key needs at least one segment".to_string()));
        }
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || s.contains('/')) {
            return Err(CacheError::InvalidKey(format!("bad segment {:?}", bad)));
        }
        Ok(Self(segments))
    }

    /// Key of a whole resource collection, e.g. `clients`
    pub fn resource(name: &'static str) -> Self {
        Self(vec![name.to_string()])
    }

    /// This key extended by one segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching_is_segment_wise() {
        let clients = QueryKey::resource("clients");
        let pipeline = clients.child("pipeline");
        let other = QueryKey::new(["clientsx"]).unwrap();

        assert!(pipeline.starts_with(&clients));
        assert!(clients.starts_with(&clients));
        assert!(!clients.starts_with(&pipeline));
        assert!(!other.starts_with(&clients));
        assert_eq!(pipeline.to_string(), "clients/pipeline");
    }

    #[test]
    fn test_rejects_empty_keys() {
        assert!(QueryKey::new(Vec::<String>::new()).is_err());
        assert!(QueryKey::new(["clients", ""]).is_err());
        assert!(QueryKey::new(["a/b"]).is_err());
    }
}
