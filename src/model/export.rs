//! Export payload built from the per-tab selections

use crate::model::spec::{ChartSpec, RecommendationGroup};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Host key the payload is written under
pub const EXPORT_KEY: &str = "selectedVisLst";

/// One tab's share of the export: the group's fields with `vspec` narrowed
/// to the selected charts, in selection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub action: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub vspec: Vec<ChartSpec>,
}

/// Tab key -> selected charts, in tab order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportPayload(IndexMap<String, ExportEntry>);

impl ExportPayload {
    /// Build the payload from scratch
    ///
    /// Tabs without any selected chart are left out. Indices that no longer
    /// point into a group's `vspec` are skipped.
    pub fn build(
        recommendations: &[RecommendationGroup],
        selection_by_tab: &BTreeMap<usize, Vec<usize>>,
    ) -> Self {
        let mut entries = IndexMap::new();

        for (&tab_index, selected) in selection_by_tab {
            let Some(group) = recommendations.get(tab_index) else {
                tracing::warn!(tab_index, "selection refers to a missing tab");
                continue;
            };

            let vspec: Vec<ChartSpec> = selected
                .iter()
                .filter_map(|&i| {
                    let spec = group.vspec.get(i).cloned();
                    if spec.is_none() {
                        tracing::warn!(tab = %group.action, index = i, "selection index out of range");
                    }
                    spec
                })
                .collect();

            if vspec.is_empty() {
                continue;
            }

            entries.insert(
                group.action.clone(),
                ExportEntry {
                    action: group.action.clone(),
                    extra: group.extra.clone(),
                    vspec,
                },
            );
        }

        Self(entries)
    }

    pub fn get(&self, tab_key: &str) -> Option<&ExportEntry> {
        self.0.get(tab_key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of tabs with at least one selection
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total charts across all tabs
    pub fn chart_count(&self) -> usize {
        self.0.values().map(|entry| entry.vspec.len()).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
