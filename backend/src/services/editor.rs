//! Schedule editor session state.
//!
//! An [`EditorSession`] owns the UI-local state of one editor: the selected
//! navigation path, the active tab, the tree search term and expansion, and
//! which positions are unfolded. Schedule data itself lives in the
//! [`ScheduleStore`]; the session only routes mutations for the selected
//! balance group to it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{find_balance_group, Country, Schedule, ScheduleUpdate};
use crate::services::navigation::{filter_hierarchy, TreeState};
use crate::services::schedule_store::ScheduleStore;
use crate::services::validation::validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Overview,
    Positions,
    Validation,
}

impl EditorTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorTab::Overview => "overview",
            EditorTab::Positions => "positions",
            EditorTab::Validation => "validation",
        }
    }
}

impl fmt::Display for EditorTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "positions" => Ok(Self::Positions),
            "validation" => Ok(Self::Validation),
            _ => Err(format!("Unknown editor tab: {}", s)),
        }
    }
}

/// Ids of the selected country, TSO and balance group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub country_id: String,
    pub tso_id: String,
    pub balance_group_id: String,
}

/// Result of the explicit save action.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The schedule passed validation and was written to the store.
    Saved(Schedule),
    /// Validation failed; the session switched to the validation tab.
    Rejected(Vec<String>),
    /// No balance group is selected.
    NoSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    selection: Option<Selection>,
    active_tab: EditorTab,
    search_term: String,
    tree: TreeState,
    expanded_positions: BTreeSet<String>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn selected_id(&self) -> Option<String> {
        self.selection.as_ref().map(|s| s.balance_group_id.clone())
    }

    /// Select a balance group by id.
    ///
    /// Unfolded positions are reset; tree expansion is left alone. Returns
    /// `false` and keeps the previous selection when the id is unknown.
    pub fn select_balance_group(&mut self, hierarchy: &[Country], balance_group_id: &str) -> bool {
        let Some((country, tso, bg)) = find_balance_group(hierarchy, balance_group_id) else {
            return false;
        };
        self.selection = Some(Selection {
            country_id: country.id.clone(),
            tso_id: tso.id.clone(),
            balance_group_id: bg.id.clone(),
        });
        self.expanded_positions.clear();
        true
    }

    pub fn active_tab(&self) -> EditorTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: EditorTab) {
        self.active_tab = tab;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The hierarchy filtered by the current search term.
    pub fn visible_hierarchy(&self, hierarchy: &[Country]) -> Vec<Country> {
        filter_hierarchy(hierarchy, &self.search_term)
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeState {
        &mut self.tree
    }

    pub fn is_position_expanded(&self, position_id: &str) -> bool {
        self.expanded_positions.contains(position_id)
    }

    pub fn toggle_position_expanded(&mut self, position_id: &str) -> bool {
        if self.expanded_positions.remove(position_id) {
            false
        } else {
            self.expanded_positions.insert(position_id.to_string());
            true
        }
    }

    /// Schedule of the selected balance group, if any.
    pub fn current_schedule(&self, store: &ScheduleStore) -> Option<Schedule> {
        self.selection
            .as_ref()
            .map(|s| store.get(&s.balance_group_id))
    }

    /// Add a position to the selected schedule and unfold it.
    pub async fn add_position(&mut self, store: &mut ScheduleStore) -> Option<String> {
        let bg = self.selected_id()?;
        let id = store.add_position(&bg).await;
        self.expanded_positions.insert(id.clone());
        Some(id)
    }

    pub async fn duplicate_position(
        &mut self,
        store: &mut ScheduleStore,
        position_id: &str,
    ) -> Option<String> {
        let bg = self.selected_id()?;
        let id = store.duplicate_position(&bg, position_id).await?;
        self.expanded_positions.insert(id.clone());
        Some(id)
    }

    pub async fn remove_position(&mut self, store: &mut ScheduleStore, position_id: &str) -> bool {
        let Some(bg) = self.selected_id() else {
            return false;
        };
        self.expanded_positions.remove(position_id);
        store.remove_position(&bg, position_id).await
    }

    /// Validate the selected schedule and write it to the store.
    ///
    /// On validation errors nothing is written and the validation tab
    /// becomes active.
    pub async fn save(&mut self, store: &mut ScheduleStore) -> SaveOutcome {
        let Some(bg) = self.selected_id() else {
            return SaveOutcome::NoSelection;
        };

        let errors = validate(&store.get(&bg));
        if !errors.is_empty() {
            self.active_tab = EditorTab::Validation;
            return SaveOutcome::Rejected(errors);
        }

        SaveOutcome::Saved(store.update(&bg, ScheduleUpdate::default()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::repositories::LocalRepository;
    use crate::services::reference_data::StaticReferenceData;
    use crate::services::templates::IntervalTemplate;

    async fn setup() -> (EditorSession, ScheduleStore, LocalRepository) {
        let repo = LocalRepository::new();
        let store = ScheduleStore::hydrate(Arc::new(repo.clone()), &StaticReferenceData).await;
        (EditorSession::new(), store, repo)
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("Positions".parse::<EditorTab>().unwrap(), EditorTab::Positions);
        assert!("history".parse::<EditorTab>().is_err());
        assert_eq!(EditorTab::default(), EditorTab::Overview);
    }

    #[tokio::test]
    async fn test_mutations_without_selection_are_noops() {
        let (mut session, mut store, repo) = setup().await;
        assert!(session.add_position(&mut store).await.is_none());
        assert!(session.current_schedule(&store).is_none());
        assert_eq!(session.save(&mut store).await, SaveOutcome::NoSelection);
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn test_select_resets_positions_but_not_tree() {
        let (mut session, mut store, _) = setup().await;
        let hierarchy = store.hierarchy().to_vec();
        session.tree_mut().toggle("apg");

        assert!(session.select_balance_group(&hierarchy, "tennet-bg3"));
        let id = session.add_position(&mut store).await.unwrap();
        assert!(session.is_position_expanded(&id));

        assert!(session.select_balance_group(&hierarchy, "apg-bg1"));
        assert!(!session.is_position_expanded(&id));
        assert!(session.tree().is_expanded("apg"));
        assert!(session.tree().is_expanded("germany"));
        assert!(!session.tree().is_expanded("austria"));

        assert!(!session.select_balance_group(&hierarchy, "nope"));
        assert_eq!(session.selection().unwrap().balance_group_id, "apg-bg1");
        assert_eq!(session.selection().unwrap().country_id, "austria");
    }

    #[tokio::test]
    async fn test_remove_position_folds_it() {
        let (mut session, mut store, _) = setup().await;
        let hierarchy = store.hierarchy().to_vec();
        session.select_balance_group(&hierarchy, "apg-bg2");

        let id = session.add_position(&mut store).await.unwrap();
        let copy = session.duplicate_position(&mut store, &id).await.unwrap();
        assert!(session.is_position_expanded(&copy));

        assert!(session.remove_position(&mut store, &copy).await);
        assert!(!session.is_position_expanded(&copy));
        assert_eq!(session.current_schedule(&store).unwrap().positions.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejected_switches_to_validation() {
        let (mut session, mut store, repo) = setup().await;
        let hierarchy = store.hierarchy().to_vec();
        session.select_balance_group(&hierarchy, "transnetbw-bg1");
        session.add_position(&mut store).await;
        session.set_tab(EditorTab::Positions);
        let writes = repo.write_count();

        match session.save(&mut store).await {
            SaveOutcome::Rejected(errors) => {
                assert_eq!(errors, vec!["Position 1: No energy values defined"]);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(session.active_tab(), EditorTab::Validation);
        assert_eq!(repo.write_count(), writes);
    }

    #[tokio::test]
    async fn test_save_valid_schedule() {
        let (mut session, mut store, _) = setup().await;
        let hierarchy = store.hierarchy().to_vec();
        session.select_balance_group(&hierarchy, "transnetbw-bg1");
        session.add_position(&mut store).await;
        store
            .apply_template("transnetbw-bg1", IntervalTemplate::Flat, None)
            .await;
        session.set_tab(EditorTab::Positions);

        match session.save(&mut store).await {
            SaveOutcome::Saved(schedule) => {
                assert_eq!(schedule.sender, "10X1001A1001A10A");
                assert_eq!(schedule.receiver, "10X1001A1001A63L");
            }
            other => panic!("expected save, got {:?}", other),
        }
        assert_eq!(session.active_tab(), EditorTab::Positions);
    }

    #[tokio::test]
    async fn test_search_term_filters_visible_tree() {
        let (mut session, store, _) = setup().await;
        session.set_search_term("Wien");
        let visible = session.visible_hierarchy(store.hierarchy());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "austria");
    }
}
