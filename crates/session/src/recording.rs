//! Headless collaborators that record every call they receive.
//!
//! Useful for driving a [`crate::PageController`] without a browser, and for
//! asserting on what the page pushed to its views.

use foundation::Viewport;
use protocol::GeoFeature;

use crate::panel::PanelSurface;
use crate::views::{MapView, Notification, Notifier, ResultsListing, ResultsView};

#[derive(Debug, Default, Clone)]
pub struct RecordingMap {
    /// Marker count of every `render` call.
    pub renders: Vec<usize>,
    pub markers: Vec<GeoFeature>,
    /// `(place_name, viewport)` of every `center_on` call.
    pub centers: Vec<(String, Viewport)>,
}

impl MapView for RecordingMap {
    fn render(&mut self, features: &[GeoFeature]) {
        self.renders.push(features.len());
        self.markers = features.to_vec();
    }

    fn center_on(&mut self, feature: &GeoFeature, viewport: Viewport) {
        self.centers
            .push((feature.place_name().to_string(), viewport));
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingResults {
    pub listings: Vec<ResultsListing>,
    pub surfaces: Vec<PanelSurface>,
}

impl ResultsView for RecordingResults {
    fn render(&mut self, listing: &ResultsListing) {
        self.listings.push(listing.clone());
    }

    fn show_surface(&mut self, surface: PanelSurface) {
        self.surfaces.push(surface);
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub seen: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) {
        self.seen.push(notification.clone());
    }
}
