use tracing::warn;

use super::source::{Source, SourceCategory};
use crate::constants::{SOURCES_ERROR_NOTICE, SOURCES_TITLE};
use crate::models::{CatalogEntry, SourceCatalog};

/// State of the source selector region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceSelector {
    /// Catalog not fetched yet
    #[default]
    NotLoaded,
    /// One control per source; `active` indexes `controls`
    Loaded {
        title: String,
        controls: Vec<Source>,
        active: usize,
    },
    /// Fetch failed; the region shows only the notice
    Failed { notice: String },
}

impl SourceSelector {
    /// Build the selector from a fetched catalog.
    ///
    /// Auto-detect comes first and starts active, then every `excel` entry,
    /// then every `rag` entry, each in catalog order.
    pub fn from_catalog(catalog: SourceCatalog) -> Self {
        let mut controls = vec![Source::autodetect()];

        let grouped = catalog
            .excel
            .into_iter()
            .map(|e| (e, SourceCategory::Excel))
            .chain(catalog.rag.into_iter().map(|e| (e, SourceCategory::Rag)));

        for (entry, category) in grouped {
            if let Some(source) = source_from_entry(entry, category) {
                controls.push(source);
            }
        }

        SourceSelector::Loaded {
            title: SOURCES_TITLE.to_string(),
            controls,
            active: 0,
        }
    }

    pub fn failed() -> Self {
        SourceSelector::Failed {
            notice: SOURCES_ERROR_NOTICE.to_string(),
        }
    }

    /// Activate the control at `index`, deactivating the current one.
    /// Returns false (and changes nothing) when there is no such control.
    pub fn click(&mut self, index: usize) -> bool {
        match self {
            SourceSelector::Loaded { controls, active, .. } if index < controls.len() => {
                *active = index;
                true
            }
            _ => false,
        }
    }

    /// Move the selection one control forward, wrapping around
    pub fn select_next(&mut self) -> bool {
        match self {
            SourceSelector::Loaded { controls, active, .. } if !controls.is_empty() => {
                let next = (*active + 1) % controls.len();
                self.click(next)
            }
            _ => false,
        }
    }

    /// Move the selection one control back, wrapping around
    pub fn select_previous(&mut self) -> bool {
        match self {
            SourceSelector::Loaded { controls, active, .. } if !controls.is_empty() => {
                let prev = (*active + controls.len() - 1) % controls.len();
                self.click(prev)
            }
            _ => false,
        }
    }

    pub fn active_source(&self) -> Option<&Source> {
        match self {
            SourceSelector::Loaded { controls, active, .. } => controls.get(*active),
            _ => None,
        }
    }

    /// Identifier to scope the next question to.
    /// `None` means auto-detect, which is also what an unloaded or failed
    /// selector falls back to.
    pub fn active_source_id(&self) -> Option<String> {
        self.active_source().and_then(|s| s.id.clone())
    }

    pub fn controls(&self) -> &[Source] {
        match self {
            SourceSelector::Loaded { controls, .. } => controls,
            _ => &[],
        }
    }

    /// Every control paired with whether it is the active one
    pub fn controls_with_state(&self) -> impl Iterator<Item = (&Source, bool)> {
        let active = match self {
            SourceSelector::Loaded { active, .. } => Some(*active),
            _ => None,
        };
        self.controls()
            .iter()
            .enumerate()
            .map(move |(i, s)| (s, Some(i) == active))
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SourceSelector::Loaded { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            SourceSelector::Failed { notice } => Some(notice),
            _ => None,
        }
    }
}

fn source_from_entry(entry: CatalogEntry, category: SourceCategory) -> Option<Source> {
    match entry.identifier() {
        Some(id) => Some(Source {
            id: Some(id),
            label: entry.filename,
            category,
        }),
        None => {
            warn!(filename = %entry.filename, "catalog entry without id, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryId;
    use pretty_assertions::assert_eq;

    fn entry(filename: &str, id: &str) -> CatalogEntry {
        CatalogEntry {
            filename: filename.to_string(),
            id: Some(EntryId::Text(id.to_string())),
            file_id: None,
        }
    }

    fn sample() -> SourceSelector {
        SourceSelector::from_catalog(SourceCatalog {
            excel: vec![entry("report.xlsx", "s1"), entry("ventas.xlsx", "s2")],
            rag: vec![entry("manual.pdf", "r1")],
        })
    }

    fn active_count(selector: &SourceSelector) -> usize {
        selector.controls_with_state().filter(|(_, a)| *a).count()
    }

    #[test]
    fn test_autodetect_first_and_active() {
        let selector = sample();
        let labels: Vec<&str> = selector.controls().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Autodetectar", "report.xlsx", "ventas.xlsx", "manual.pdf"]
        );
        assert_eq!(active_count(&selector), 1);
        assert!(selector.active_source().unwrap().is_autodetect());
        assert_eq!(selector.active_source_id(), None);
        assert_eq!(selector.title(), Some(SOURCES_TITLE));
    }

    #[test]
    fn test_categories_follow_catalog_groups() {
        let selector = sample();
        let categories: Vec<SourceCategory> =
            selector.controls()[1..].iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![SourceCategory::Excel, SourceCategory::Excel, SourceCategory::Rag]
        );
    }

    #[test]
    fn test_click_keeps_exactly_one_active() {
        let mut selector = sample();
        for index in [2, 3, 0, 1, 1] {
            assert!(selector.click(index));
            assert_eq!(active_count(&selector), 1);
            let (_, active) = selector.controls_with_state().nth(index).unwrap();
            assert!(active);
        }
        assert_eq!(selector.active_source_id(), Some("s1".to_string()));

        assert!(selector.click(0));
        assert_eq!(selector.active_source_id(), None);
    }

    #[test]
    fn test_click_out_of_range_is_ignored() {
        let mut selector = sample();
        selector.click(3);
        assert!(!selector.click(10));
        assert_eq!(selector.active_source_id(), Some("r1".to_string()));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut selector = sample();
        selector.select_previous();
        assert_eq!(selector.active_source_id(), Some("r1".to_string()));
        selector.select_next();
        assert_eq!(selector.active_source_id(), None);
        selector.select_next();
        assert_eq!(selector.active_source_id(), Some("s1".to_string()));
    }

    #[test]
    fn test_cycling_without_controls_does_nothing() {
        let mut selector = SourceSelector::Loaded {
            title: "Fuente de datos:".to_string(),
            controls: vec![],
            active: 0,
        };
        assert!(!selector.select_next());
        assert!(!selector.select_previous());
        assert_eq!(selector.active_source_id(), None);
    }

    #[test]
    fn test_empty_catalog_has_only_autodetect() {
        let selector = SourceSelector::from_catalog(SourceCatalog::default());
        assert_eq!(selector.controls().len(), 1);
        assert_eq!(active_count(&selector), 1);
    }

    #[test]
    fn test_entries_without_id_are_skipped() {
        let selector = SourceSelector::from_catalog(SourceCatalog {
            excel: vec![CatalogEntry {
                filename: "broken.xlsx".to_string(),
                id: None,
                file_id: None,
            }],
            rag: vec![CatalogEntry {
                filename: "manual.pdf".to_string(),
                id: None,
                file_id: Some(EntryId::Number(12)),
            }],
        });
        let ids: Vec<Option<String>> = selector.controls().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![None, Some("12".to_string())]);
    }

    #[test]
    fn test_failed_and_unloaded_fall_back_to_autodetect() {
        let mut failed = SourceSelector::failed();
        assert!(failed.controls().is_empty());
        assert_eq!(failed.notice(), Some(SOURCES_ERROR_NOTICE));
        assert_eq!(failed.active_source_id(), None);
        assert!(!failed.click(0));
        assert!(!failed.select_next());

        let unloaded = SourceSelector::default();
        assert_eq!(unloaded.active_source_id(), None);
        assert_eq!(unloaded.notice(), None);
    }
}
