use serde::{Deserialize, Serialize};

use crate::constants::AUTODETECT_LABEL;

/// Which grouping of the catalog a source came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Excel,
    Rag,
}

impl SourceCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceCategory::Excel => "excel",
            SourceCategory::Rag => "rag",
        }
    }
}

/// One selectable knowledge source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// `None` is the synthetic auto-detect source
    pub id: Option<String>,
    pub label: String,
    pub category: SourceCategory,
}

impl Source {
    pub fn autodetect() -> Self {
        Self {
            id: None,
            label: AUTODETECT_LABEL.to_string(),
            category: SourceCategory::Rag,
        }
    }

    pub fn is_autodetect(&self) -> bool {
        self.id.is_none()
    }
}
