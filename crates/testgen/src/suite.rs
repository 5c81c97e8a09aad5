use serde::{Deserialize, Serialize};

/// Parsed output of the text-generation service.
///
/// Every field has a neutral default so a partial or garbled response still
/// yields a usable (possibly empty) suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSuite {
    pub code: String,
    pub description: String,
    pub edge_cases: Vec<String>,
    /// Estimated coverage percentage, 0..=100.
    pub estimated_coverage: u8,
}

impl GeneratedSuite {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
            && self.description.is_empty()
            && self.edge_cases.is_empty()
            && self.estimated_coverage == 0
    }
}
