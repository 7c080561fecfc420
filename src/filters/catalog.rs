//! Filter catalog: the closed set of filter kinds.
//!
//! [`FilterKind`] is the tagged variant a filter unit stores; each variant
//! dispatches to one [`FilterOp`] implementation. [`FilterCatalog`] is the
//! enumerable view a presentation layer populates its "add filter" list and
//! parameter editors from.

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::ParameterSet;
use crate::core::schema::{ParameterDefinition, Schema};
use crate::filters::builtin::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every filter kind a pipeline can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Invert,
    SplitChannel,
    GammaCorrect,
    Threshold,
    ThresholdToZero,
    ThresholdAdaptive,
    ThresholdOtsuGauss,
    BoxBlur,
    MedianBlur,
    GaussianBlur,
    Erode,
    Dilate,
    MorphologyEx,
    Rotate,
    Affine,
    Perspective,
    WarpPolar,
    ConvolvePresets,
    Convolve,
}

impl FilterKind {
    /// All kinds in catalog order.
    pub const ALL: &'static [FilterKind] = &[
        FilterKind::Invert,
        FilterKind::SplitChannel,
        FilterKind::GammaCorrect,
        FilterKind::Threshold,
        FilterKind::ThresholdToZero,
        FilterKind::ThresholdAdaptive,
        FilterKind::ThresholdOtsuGauss,
        FilterKind::BoxBlur,
        FilterKind::MedianBlur,
        FilterKind::GaussianBlur,
        FilterKind::Erode,
        FilterKind::Dilate,
        FilterKind::MorphologyEx,
        FilterKind::Rotate,
        FilterKind::Affine,
        FilterKind::Perspective,
        FilterKind::WarpPolar,
        FilterKind::ConvolvePresets,
        FilterKind::Convolve,
    ];

    /// The operation implementing this kind.
    pub fn op(self) -> &'static dyn FilterOp {
        match self {
            FilterKind::Invert => &Invert,
            FilterKind::SplitChannel => &SplitChannel,
            FilterKind::GammaCorrect => &GammaCorrect,
            FilterKind::Threshold => &Threshold,
            FilterKind::ThresholdToZero => &ThresholdToZero,
            FilterKind::ThresholdAdaptive => &ThresholdAdaptive,
            FilterKind::ThresholdOtsuGauss => &ThresholdOtsuGauss,
            FilterKind::BoxBlur => &BoxBlur,
            FilterKind::MedianBlur => &MedianBlur,
            FilterKind::GaussianBlur => &GaussianBlur,
            FilterKind::Erode => &Erode,
            FilterKind::Dilate => &Dilate,
            FilterKind::MorphologyEx => &MorphologyEx,
            FilterKind::Rotate => &Rotate,
            FilterKind::Affine => &Affine,
            FilterKind::Perspective => &Perspective,
            FilterKind::WarpPolar => &WarpPolar,
            FilterKind::ConvolvePresets => &ConvolvePresets,
            FilterKind::Convolve => &Convolve,
        }
    }

    pub fn metadata(self) -> FilterMetadata {
        self.op().metadata()
    }

    /// Stable identifier, e.g. `gaussian_blur`.
    pub fn id(self) -> String {
        self.metadata().id
    }

    /// Display name, e.g. `Gaussian Blur`.
    pub fn name(self) -> String {
        self.metadata().name
    }

    pub fn category(self) -> Category {
        self.metadata().category
    }

    /// Parameter values a new unit of this kind starts with.
    pub fn default_parameters(self) -> ParameterSet {
        self.op().parameters()
    }

    pub fn schema(self) -> Schema {
        ParameterDefinition::describe_all(&self.default_parameters())
    }

    /// Look a kind up by id or display name, ignoring case.
    pub fn lookup(key: &str) -> Option<FilterKind> {
        let key = key.trim();
        Self::ALL.iter().copied().find(|kind| {
            let metadata = kind.metadata();
            metadata.id.eq_ignore_ascii_case(key) || metadata.name.eq_ignore_ascii_case(key)
        })
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Catalog entry: a kind with its metadata and parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: FilterKind,
    pub metadata: FilterMetadata,
    pub schema: Schema,
}

/// Enumerable catalog of every filter kind.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    /// Entries indexed by filter id, in catalog order.
    entries: IndexMap<String, CatalogEntry>,
}

impl FilterCatalog {
    /// Build the catalog of all built-in kinds.
    pub fn new() -> Self {
        let entries = FilterKind::ALL
            .iter()
            .map(|&kind| {
                let metadata = kind.metadata();
                let entry = CatalogEntry {
                    kind,
                    schema: kind.schema(),
                    metadata,
                };
                (entry.metadata.id.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entry by filter id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Entry by id or display name, ignoring case.
    pub fn find(&self, key: &str) -> Option<&CatalogEntry> {
        self.get(key)
            .or_else(|| FilterKind::lookup(key).and_then(|kind| self.entries.get(&kind.id())))
    }

    /// Search filters by id, name or description.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_lowercase();

        self.entries
            .values()
            .filter(|entry| {
                let id_match = entry.metadata.id.to_lowercase().contains(&query);
                let name_match = entry.metadata.name.to_lowercase().contains(&query);
                let desc_match = entry.metadata.description.to_lowercase().contains(&query);

                id_match || name_match || desc_match
            })
            .collect()
    }

    /// Entries of one category, in catalog order.
    pub fn by_category(&self, category: Category) -> Vec<&CatalogEntry> {
        self.entries
            .values()
            .filter(|entry| entry.metadata.category == category)
            .collect()
    }

    /// Entries grouped by category for UI display.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&CatalogEntry>> {
        let mut grouped: IndexMap<Category, Vec<&CatalogEntry>> = IndexMap::new();
        for &category in Category::all() {
            let entries = self.by_category(category);
            if !entries.is_empty() {
                grouped.insert(category, entries);
            }
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole catalog as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let entries: Vec<&CatalogEntry> = self.entries().collect();
        serde_json::to_string_pretty(&entries)
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::ACTIVE;
    use crate::core::types::Value;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_contains_every_kind() {
        let catalog = FilterCatalog::new();
        assert_eq!(catalog.len(), FilterKind::ALL.len());
        for kind in FilterKind::ALL {
            let entry = catalog.get(&kind.id()).unwrap();
            assert_eq!(entry.kind, *kind);
        }
    }

    #[test]
    fn test_ids_and_names_unique() {
        let ids: HashSet<String> = FilterKind::ALL.iter().map(|k| k.id()).collect();
        let names: HashSet<String> = FilterKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(ids.len(), FilterKind::ALL.len());
        assert_eq!(names.len(), FilterKind::ALL.len());
    }

    #[test]
    fn test_every_schema_starts_with_active_true() {
        for kind in FilterKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema[0].name, ACTIVE, "{}", kind);
            assert_eq!(schema[0].default_value, Value::Boolean(true));
        }
    }

    #[test]
    fn test_serde_id_matches_metadata_id() {
        for kind in FilterKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(FilterKind::lookup("gaussian_blur"), Some(FilterKind::GaussianBlur));
        assert_eq!(FilterKind::lookup("Gaussian Blur"), Some(FilterKind::GaussianBlur));
        assert_eq!(FilterKind::lookup("WARP POLAR"), Some(FilterKind::WarpPolar));
        assert_eq!(FilterKind::lookup("sepia"), None);

        let catalog = FilterCatalog::new();
        assert_eq!(catalog.find("Otsu's Binarization Threshold").unwrap().kind, FilterKind::ThresholdOtsuGauss);
    }

    #[test]
    fn test_search_and_categories() {
        let catalog = FilterCatalog::new();
        let blurs = catalog.search("blur");
        let in_blur = blurs
            .iter()
            .filter(|e| e.metadata.category == Category::Blur)
            .count();
        assert_eq!(in_blur, 3);
        assert!(catalog.search("no such filter").is_empty());

        assert_eq!(catalog.by_category(Category::Morphology).len(), 3);
        assert_eq!(catalog.by_category(Category::Threshold).len(), 4);
        assert_eq!(catalog.grouped_by_category().len(), Category::all().len());
    }

    #[test]
    fn test_catalog_json() {
        let json = FilterCatalog::new().to_json().unwrap();
        let parsed: Vec<CatalogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), FilterKind::ALL.len());
        assert_eq!(parsed[0].kind, FilterKind::Invert);
    }
}
