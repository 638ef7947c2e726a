//! Application state for the earthquake list.
//!
//! [`App`] is the presentation-side consumer of [`Outcome`]s: it keeps the
//! most recent list, the selection, and enough about the last cycle to pick
//! the right empty-state message.

use ratatui::widgets::ListState;

use crate::feed::Earthquake;
use crate::loader::Outcome;

/// What the list area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    NoFeed,
    Loaded,
    Cancelled,
    Failed(String),
}

pub struct App {
    /// Earthquakes from the last successful cycle, in feed order.
    pub earthquakes: Vec<Earthquake>,
    pub phase: Phase,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last loader status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            earthquakes: Vec::new(),
            phase: Phase::Loading,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.status = "Loading…".into();
    }

    pub fn load_cancelled(&mut self) {
        self.phase = Phase::Cancelled;
        self.status = "Load cancelled".into();
    }

    /// Replace the list with the outcome of a finished cycle.
    ///
    /// A failure keeps nothing from earlier cycles: the list is cleared so
    /// the failure message is what the user sees.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded {
                earthquakes,
                skipped,
            } => {
                self.status = match skipped {
                    0 => format!("Loaded {} earthquakes", earthquakes.len()),
                    n => format!("Loaded {} earthquakes ({n} malformed skipped)", earthquakes.len()),
                };
                self.earthquakes = earthquakes;
                self.phase = Phase::Loaded;
            }
            Outcome::NoFeed => {
                self.earthquakes.clear();
                self.phase = Phase::NoFeed;
                self.status = "No feed configured".into();
            }
            Outcome::Failed(err) => {
                self.earthquakes.clear();
                self.status = format!("Error: {err}");
                self.phase = Phase::Failed(err.to_string());
            }
        }

        let selected = match self.earthquakes.len() {
            0 => None,
            _ => Some(0),
        };
        self.list_state.select(selected);
    }

    /// Message for the list area when there is nothing to list.
    pub fn empty_message(&self) -> Option<String> {
        if !self.earthquakes.is_empty() {
            return None;
        }
        let message = match &self.phase {
            Phase::Loading => "Loading…".to_string(),
            Phase::NoFeed => "No feed configured".to_string(),
            Phase::Loaded => "No earthquakes found".to_string(),
            Phase::Cancelled => "Load cancelled, press r to retry".to_string(),
            Phase::Failed(cause) => format!("Failed to load earthquakes: {cause}"),
        };
        Some(message)
    }

    pub fn selected(&self) -> Option<&Earthquake> {
        self.list_state.selected().and_then(|i| self.earthquakes.get(i))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.earthquakes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.earthquakes.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.earthquakes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.earthquakes.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.earthquakes.is_empty() {
            self.list_state.select(Some(self.earthquakes.len() - 1));
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
