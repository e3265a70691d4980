//! Mock data builders for tags and repositories.

use acr_browser::TagRecord;
use jiff::Timestamp;

/// Builder for creating test tags
pub struct TagBuilder {
    record: TagRecord,
}

impl TagBuilder {
    /// Create a tag with a digest derived from its name
    pub fn new(name: &str) -> Self {
        Self {
            record: TagRecord::new(
                name,
                format!("sha256:{name}0000"),
                timestamp("2024-01-01T00:00:00Z"),
            ),
        }
    }

    pub fn digest(mut self, digest: &str) -> Self {
        self.record.digest = digest.to_string();
        self
    }

    pub fn created(mut self, at: &str) -> Self {
        self.record.created_at = timestamp(at);
        self
    }

    pub fn updated(mut self, at: &str) -> Self {
        self.record.updated_at = Some(timestamp(at));
        self
    }

    pub fn build(self) -> TagRecord {
        self.record
    }
}

pub fn timestamp(s: &str) -> Timestamp {
    s.parse().expect("test timestamp should be valid")
}

/// A tag with default metadata
pub fn mock_tag(name: &str) -> TagRecord {
    TagBuilder::new(name).build()
}

/// Repository names from string literals
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
