//! Per-session navigation state
//!
//! Each logged-in session owns one `SessionContext`. Handlers receive it
//! explicitly (held under a per-session mutex) instead of reaching for
//! process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::music::Track;

/// Feed filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Every review except the viewer's own
    #[default]
    Everyone,
    /// Only reviews by authors the viewer follows
    Following,
}

/// The page currently shown to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Feed {
        #[serde(default)]
        mode: FeedMode,
    },
    Profile {
        username: String,
    },
    RateTrack,
    ListenList,
}

impl Default for View {
    fn default() -> Self {
        View::Feed {
            mode: FeedMode::Everyone,
        }
    }
}

/// Transient results of one search box
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchSlot {
    pub results: Vec<Track>,
    /// Index into `results`; the first result is preselected
    pub selected: usize,
}

impl SearchSlot {
    pub fn set_results(&mut self, results: Vec<Track>) {
        self.results = results;
        self.selected = 0;
    }

    pub fn select(&mut self, index: usize) -> Result<&Track, AppError> {
        if index >= self.results.len() {
            return Err(AppError::Validation(format!(
                "selection {} is out of range ({} results)",
                index,
                self.results.len()
            )));
        }
        self.selected = index;
        Ok(&self.results[index])
    }

    /// The track a publish/add action would use
    pub fn selection(&self) -> Option<&Track> {
        self.results.get(self.selected)
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.selected = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Navigation state of one session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionContext {
    pub current_user: Option<String>,
    pub active_view: View,
    /// Results of the rate-a-track search box
    pub review_search: SearchSlot,
    /// Results of the listen-list search box
    pub listen_search: SearchSlot,
}

impl SessionContext {
    /// Fresh context for a user who just logged in
    pub fn logged_in(username: &str) -> Self {
        Self {
            current_user: Some(username.to_string()),
            ..Self::default()
        }
    }

    /// The logged-in username, or `Unauthorized` after logout
    pub fn user(&self) -> Result<&str, AppError> {
        self.current_user.as_deref().ok_or(AppError::Unauthorized)
    }

    pub fn navigate(&mut self, view: View) {
        self.active_view = view;
    }

    pub fn logout(&mut self) {
        self.current_user = None;
        self.active_view = View::default();
        self.review_search.clear();
        self.listen_search.clear();
    }
}
