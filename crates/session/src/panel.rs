use crate::query::Phase;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelState {
    Open,
    Closed,
}

/// Events the panel reacts to.
///
/// `feature_count` is the size of the current result set at the time of the
/// event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelTrigger {
    QuerySubmitted,
    SessionSettled { phase: Phase, feature_count: usize },
    Selected,
    Toggle { phase: Phase, feature_count: usize },
}

/// Open/closed state of the results panel.
///
/// Rules, in order:
/// - submission closes
/// - completion with results opens
/// - completion without results, or an error, closes
/// - a selection closes
/// - a user toggle flips, but only over a completed, non-empty result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelController {
    state: PanelState,
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelController {
    pub fn new() -> Self {
        Self {
            state: PanelState::Closed,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Applies `trigger`. Returns `true` if the state changed.
    pub fn apply(&mut self, trigger: PanelTrigger) -> bool {
        let next = match trigger {
            PanelTrigger::QuerySubmitted => PanelState::Closed,
            PanelTrigger::SessionSettled {
                phase: Phase::Completed,
                feature_count,
            } if feature_count > 0 => PanelState::Open,
            PanelTrigger::SessionSettled { .. } => PanelState::Closed,
            PanelTrigger::Selected => PanelState::Closed,
            PanelTrigger::Toggle {
                phase: Phase::Completed,
                feature_count,
            } if feature_count > 0 => match self.state {
                PanelState::Open => PanelState::Closed,
                PanelState::Closed => PanelState::Open,
            },
            PanelTrigger::Toggle { .. } => self.state,
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }
}

/// What the host surface around the list shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelSurface {
    /// Nothing submitted yet.
    Idle,
    /// A query is in flight; the panel is hidden.
    Loading,
    /// Disabled "no results" indicator, after an empty or failed query.
    NoResults,
    Results { count: usize, open: bool },
}

impl PanelSurface {
    pub fn derive(phase: Phase, feature_count: usize, panel: PanelState) -> Self {
        match phase {
            Phase::Idle => PanelSurface::Idle,
            Phase::Loading => PanelSurface::Loading,
            Phase::Completed if feature_count > 0 => PanelSurface::Results {
                count: feature_count,
                open: panel == PanelState::Open,
            },
            Phase::Completed | Phase::Errored => PanelSurface::NoResults,
        }
    }

    pub fn header_text(&self) -> Option<String> {
        match self {
            PanelSurface::Results { count, .. } => Some(format!("Found {count} Results")),
            PanelSurface::NoResults => Some("No results found for your query.".to_string()),
            PanelSurface::Idle | PanelSurface::Loading => None,
        }
    }
}
