//! Tree navigation over the reference hierarchy.
//!
//! Filtering is top-down and independent per level: a node survives when it
//! matches itself or through a descendant, and the children of a surviving
//! node are filtered again by their own level's rule. Expansion state is kept
//! separately in [`TreeState`] and never changes as a side effect of
//! filtering or selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{BalanceGroup, Country, Tso};

/// Country expanded when the tree is first shown.
pub const INITIALLY_EXPANDED: &str = "germany";

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn balance_group_matches(bg: &BalanceGroup, term: &str) -> bool {
    contains(&bg.name, term)
        || contains(&bg.responsible_party, term)
        || contains(&bg.eic_code, term)
}

fn tso_matches(tso: &Tso, term: &str) -> bool {
    contains(&tso.name, term)
        || contains(&tso.eic_code, term)
        || tso
            .balance_groups
            .iter()
            .any(|bg| balance_group_matches(bg, term))
}

fn country_matches(country: &Country, term: &str) -> bool {
    contains(&country.name, term) || country.tsos.iter().any(|tso| tso_matches(tso, term))
}

/// Filter the hierarchy by a case-insensitive search term.
///
/// An empty term returns the hierarchy unchanged. Whitespace is part of the
/// term.
pub fn filter_hierarchy(hierarchy: &[Country], term: &str) -> Vec<Country> {
    if term.is_empty() {
        return hierarchy.to_vec();
    }
    let term = term.to_lowercase();

    hierarchy
        .iter()
        .filter(|country| country_matches(country, &term))
        .map(|country| Country {
            tsos: country
                .tsos
                .iter()
                .filter(|tso| tso_matches(tso, &term))
                .map(|tso| Tso {
                    balance_groups: tso
                        .balance_groups
                        .iter()
                        .filter(|bg| balance_group_matches(bg, &term))
                        .cloned()
                        .collect(),
                    ..tso.clone()
                })
                .collect(),
            ..country.clone()
        })
        .collect()
}

/// Node counts of a (possibly filtered) hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStats {
    pub countries: usize,
    pub tsos: usize,
    pub balance_groups: usize,
}

impl HierarchyStats {
    pub fn of(hierarchy: &[Country]) -> Self {
        Self {
            countries: hierarchy.len(),
            tsos: hierarchy.iter().map(|c| c.tsos.len()).sum(),
            balance_groups: hierarchy
                .iter()
                .flat_map(|c| &c.tsos)
                .map(|t| t.balance_groups.len())
                .sum(),
        }
    }
}

/// Expand/collapse state of country and TSO nodes, keyed by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    expanded: BTreeSet<String>,
}

impl Default for TreeState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::from([INITIALLY_EXPANDED.to_string()]),
        }
    }
}

impl TreeState {
    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.expanded.contains(node_id)
    }

    /// Flip one node. Returns the new state.
    pub fn toggle(&mut self, node_id: &str) -> bool {
        if self.expanded.remove(node_id) {
            false
        } else {
            self.expanded.insert(node_id.to_string());
            true
        }
    }

    /// Expand every country and TSO of `hierarchy`.
    pub fn expand_all(&mut self, hierarchy: &[Country]) {
        self.expanded = hierarchy
            .iter()
            .flat_map(|c| std::iter::once(c.id.clone()).chain(c.tsos.iter().map(|t| t.id.clone())))
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}
