//! Contracts for the rendering collaborators.
//!
//! The page controller never relies on implicit re-rendering: every state
//! change that affects what the map, the list or the panel shows is followed by
//! an explicit call on one of these traits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use foundation::Viewport;
use protocol::{GeoFeature, SourceKind};

use crate::panel::PanelSurface;
use crate::selection::SelectionCoordinator;

/// Map widget. Implemented by the host (e.g. a Leaflet binding).
pub trait MapView {
    /// Replaces all markers with one per feature.
    fn render(&mut self, features: &[GeoFeature]);

    /// Animates the viewport to `viewport` (the feature's position at the
    /// focus zoom).
    fn center_on(&mut self, feature: &GeoFeature, viewport: Viewport);
}

/// Results list plus the surface around it.
pub trait ResultsView {
    fn render(&mut self, listing: &ResultsListing);

    fn show_surface(&mut self, surface: PanelSurface);
}

/// User-facing notifications (toasts). Fire-and-forget.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

/// One row of the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Position in the current feature set; clicks report it back.
    pub index: usize,
    pub title: String,
    pub subtitle: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsListing {
    Loading { placeholder_rows: usize },
    Rows(Vec<ResultRow>),
}

impl ResultsListing {
    /// Builds the listing for the given state.
    ///
    /// While loading, only placeholders are produced regardless of `features`.
    pub fn build(
        features: &[GeoFeature],
        loading: bool,
        selection: &SelectionCoordinator,
        placeholder_rows: usize,
    ) -> Self {
        if loading {
            return ResultsListing::Loading { placeholder_rows };
        }
        let rows = features
            .iter()
            .enumerate()
            .map(|(index, f)| ResultRow {
                index,
                title: f.properties.place_name.clone(),
                subtitle: format!("{} | Type: {}", f.properties.city, f.properties.entity_type),
                selected: selection.is_selected(f),
            })
            .collect();
        ResultsListing::Rows(rows)
    }

    pub fn selected_count(&self) -> usize {
        match self {
            ResultsListing::Loading { .. } => 0,
            ResultsListing::Rows(rows) => rows.iter().filter(|r| r.selected).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    QueryComplete { count: usize, source: SourceKind },
    QueryFailed,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::QueryFailed)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::QueryComplete { .. } => "Query Complete!",
            Notification::QueryFailed => "Uh oh! Something went wrong.",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notification::QueryComplete { count, source } => {
                format!("Found {count} locations. Source: {}.", source.label())
            }
            Notification::QueryFailed => {
                "Could not get an answer from the map. Please try again.".to_string()
            }
        }
    }
}

/// Notifier that only queues. Clones share one queue, so the owner of the
/// page can keep a handle and deliver notifications once the page is no longer
/// borrowed.
#[derive(Debug, Clone, Default)]
pub struct QueuedNotifier {
    queue: Rc<RefCell<VecDeque<Notification>>>,
}

impl QueuedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn take(&self) -> Vec<Notification> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&mut self, notification: &Notification) {
        self.queue.borrow_mut().push_back(notification.clone());
    }
}
