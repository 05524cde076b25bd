//! Top-level view selection.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Communication,
    Editor,
    Analytics,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Communication,
        View::Editor,
        View::Analytics,
        View::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Communication => "communication",
            View::Editor => "editor",
            View::Analytics => "analytics",
            View::Settings => "settings",
        }
    }

    /// Parse a view name; unknown names fall back to the dashboard.
    pub fn parse_or_default(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shell {
    active: View,
}

impl Shell {
    pub fn active(&self) -> View {
        self.active
    }

    pub fn select(&mut self, view: View) {
        self.active = view;
    }

    /// Select by name. Returns the view actually selected.
    pub fn select_named(&mut self, name: &str) -> View {
        self.active = View::parse_or_default(name);
        self.active
    }
}
