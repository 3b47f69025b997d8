use serde::{Deserialize, Serialize};

use super::RawRecord;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    pub per_page: u64,
}

impl Metadata {
    /// Number of pages needed to cover `total` results.
    ///
    /// `None` when the API reports results but a page size of zero.
    pub fn page_count(&self) -> Option<u64> {
        if self.total == 0 {
            return Some(0);
        }
        if self.per_page == 0 {
            return None;
        }
        Some(self.total.div_ceil(self.per_page))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SchoolsResponse {
    pub metadata: Metadata,
    pub results: Vec<RawRecord>,
}

#[cfg(test)]
mod tests {
    use super::Metadata;

    fn meta(total: u64, per_page: u64) -> Metadata {
        Metadata {
            total,
            page: 0,
            per_page,
        }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(meta(120, 50).page_count(), Some(3));
        assert_eq!(meta(100, 50).page_count(), Some(2));
        assert_eq!(meta(1, 50).page_count(), Some(1));
    }

    #[test]
    fn page_count_empty_result() {
        assert_eq!(meta(0, 50).page_count(), Some(0));
        assert_eq!(meta(0, 0).page_count(), Some(0));
    }

    #[test]
    fn page_count_zero_page_size() {
        assert_eq!(meta(10, 0).page_count(), None);
    }
}
