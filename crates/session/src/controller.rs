use foundation::Generation;
use protocol::{GeoFeature, QueryResponse};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::event_bus::{EventBus, kind};
use crate::panel::{PanelController, PanelSurface, PanelTrigger};
use crate::query::{Phase, QuerySession, QueryTicket, Resolution};
use crate::selection::SelectionCoordinator;
use crate::transport::TransportError;
use crate::views::{MapView, Notification, Notifier, ResultsListing, ResultsView};

/// Everything the page knows, in one owned value.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub session: QuerySession,
    pub selection: SelectionCoordinator,
    pub panel: PanelController,
}

impl PageState {
    pub fn surface(&self) -> PanelSurface {
        PanelSurface::derive(
            self.session.phase(),
            self.session.features().len(),
            self.panel.state(),
        )
    }
}

/// Page-level owner of [`PageState`] and the rendering collaborators.
///
/// All mutation goes through `submit`, `complete`, `select`/`select_row` and
/// `toggle_panel`; each one finishes by pushing the affected state to the
/// collaborators.
pub struct PageController<M, R, N> {
    config: ClientConfig,
    state: PageState,
    map: M,
    results: R,
    notifier: N,
    bus: EventBus,
}

impl<M, R, N> PageController<M, R, N>
where
    M: MapView,
    R: ResultsView,
    N: Notifier,
{
    pub fn new(config: ClientConfig, map: M, results: R, notifier: N) -> Self {
        Self {
            config,
            state: PageState::default(),
            map,
            results,
            notifier,
            bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn results(&self) -> &R {
        &self.results
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn surface(&self) -> PanelSurface {
        self.state.surface()
    }

    /// Pushes the initial (empty) state to every collaborator.
    pub fn mount(&mut self) {
        self.map.render(&[]);
        self.refresh_results();
    }

    /// Starts a query. Blank text is ignored and returns `None`.
    ///
    /// The returned ticket must be sent exactly once and its outcome handed
    /// back through [`PageController::complete`].
    pub fn submit(&mut self, query_text: &str) -> Option<QueryTicket> {
        let ticket = self.state.session.begin(query_text)?;
        let generation = ticket.generation;

        self.state.selection.clear();
        self.apply_panel(generation, PanelTrigger::QuerySubmitted);
        self.bus.emit(generation, kind::SUBMITTED, query_text);

        self.map.render(&[]);
        self.refresh_results();
        Some(ticket)
    }

    /// Hands the outcome of request `generation` to the session.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<QueryResponse, TransportError>,
    ) -> Resolution {
        if generation != self.state.session.generation()
            || self.state.session.phase() != Phase::Loading
        {
            warn!(
                %generation,
                current = %self.state.session.generation(),
                "discarding stale query response"
            );
            self.bus.emit(generation, kind::STALE, "response superseded");
            return Resolution::Stale;
        }

        let (resolution, notification) = match outcome {
            Ok(response) => {
                if !response.dropped.is_empty() {
                    warn!(
                        %generation,
                        dropped = response.dropped.len(),
                        "dropped malformed features"
                    );
                    for d in &response.dropped {
                        self.bus.emit(
                            generation,
                            kind::DROPPED,
                            format!("#{}: {}", d.index, d.reason),
                        );
                    }
                }
                let source = response.source();
                let resolution = self
                    .state
                    .session
                    .resolve(generation, Some(response.features));
                let count = self.state.session.features().len();
                info!(%generation, count, source = source.label(), "query completed");
                self.bus
                    .emit(generation, kind::COMPLETED, format!("{count} features"));
                (resolution, Notification::QueryComplete { count, source })
            }
            Err(err) => {
                warn!(%generation, error = %err, "query failed");
                let resolution = self.state.session.resolve(generation, None);
                self.bus.emit(generation, kind::ERRORED, err.to_string());
                (resolution, Notification::QueryFailed)
            }
        };

        self.apply_panel(
            generation,
            PanelTrigger::SessionSettled {
                phase: self.state.session.phase(),
                feature_count: self.state.session.features().len(),
            },
        );
        self.map.render(self.state.session.features());
        self.refresh_results();
        self.notifier.notify(&notification);
        resolution
    }

    /// Focuses `feature`: centers the map on it and collapses the panel.
    pub fn select(&mut self, feature: GeoFeature) {
        let generation = self.state.session.generation();
        let viewport = self.config.focus_viewport(&feature);
        self.bus
            .emit(generation, kind::SELECTED, feature.place_name().to_string());

        self.map.center_on(&feature, viewport);
        self.state.selection.select(feature);
        self.apply_panel(generation, PanelTrigger::Selected);
        self.refresh_results();
    }

    /// List click by row index. Returns `false` for an index outside the
    /// current result set.
    pub fn select_row(&mut self, index: usize) -> bool {
        let Some(feature) = self.state.session.features().get(index).cloned() else {
            return false;
        };
        self.select(feature);
        true
    }

    /// User click on the panel header. Returns `true` if the panel flipped.
    pub fn toggle_panel(&mut self) -> bool {
        let trigger = PanelTrigger::Toggle {
            phase: self.state.session.phase(),
            feature_count: self.state.session.features().len(),
        };
        let changed = self.apply_panel(self.state.session.generation(), trigger);
        if changed {
            self.results.show_surface(self.state.surface());
        }
        changed
    }

    fn apply_panel(&mut self, generation: Generation, trigger: PanelTrigger) -> bool {
        let changed = self.state.panel.apply(trigger);
        if changed {
            self.bus.emit(
                generation,
                kind::PANEL,
                format!("{:?}", self.state.panel.state()),
            );
        }
        changed
    }

    fn refresh_results(&mut self) {
        let listing = ResultsListing::build(
            self.state.session.features(),
            self.state.session.is_loading(),
            &self.state.selection,
            self.config.placeholder_rows,
        );
        self.results.render(&listing);
        self.results.show_surface(self.state.surface());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelState;
    use crate::recording::{RecordingMap, RecordingNotifier, RecordingResults};
    use foundation::LonLat;
    use protocol::QueryResponse;

    fn feature(name: &str, lon: f64, lat: f64) -> GeoFeature {
        GeoFeature::new(LonLat::try_new(lon, lat).unwrap(), name, "Bengaluru", "Startup")
    }

    type Page = PageController<RecordingMap, RecordingResults, RecordingNotifier>;

    fn page() -> Page {
        PageController::new(
            ClientConfig::default(),
            RecordingMap::default(),
            RecordingResults::default(),
            RecordingNotifier::default(),
        )
    }

    fn completed(page: &mut Page, names: &[&str]) {
        let t = page.submit("q").unwrap();
        let features = names.iter().map(|n| feature(n, 77.0, 12.0)).collect();
        page.complete(t.generation, Ok(QueryResponse::new(features, "db_lookup")));
    }

    #[test]
    fn mount_pushes_idle_state() {
        let mut p = page();
        p.mount();
        assert_eq!(p.results().surfaces.last(), Some(&PanelSurface::Idle));
        assert_eq!(p.map().renders, vec![0]);
    }

    #[test]
    fn submit_clears_selection_and_panel_and_renders_placeholders() {
        let mut p = page();
        completed(&mut p, &["a", "b"]);
        p.select_row(1);
        p.toggle_panel();
        assert!(p.state().panel.is_open());

        p.submit("next").unwrap();
        assert_eq!(p.state().session.phase(), Phase::Loading);
        assert!(p.state().selection.is_empty());
        assert_eq!(p.state().panel.state(), PanelState::Closed);
        assert_eq!(
            p.results().listings.last(),
            Some(&ResultsListing::Loading { placeholder_rows: 5 })
        );
        assert_eq!(p.surface(), PanelSurface::Loading);
        assert_eq!(p.map().renders.last(), Some(&0));
    }

    #[test]
    fn blank_submit_touches_nothing() {
        let mut p = page();
        completed(&mut p, &["a"]);
        p.select_row(0);
        let renders = p.map().renders.len();
        let events = p.events().events().len();

        assert!(p.submit("  ").is_none());
        assert_eq!(p.state().session.phase(), Phase::Completed);
        assert!(!p.state().selection.is_empty());
        assert_eq!(p.map().renders.len(), renders);
        assert_eq!(p.events().events().len(), events);
    }

    #[test]
    fn select_row_out_of_range_is_ignored() {
        let mut p = page();
        completed(&mut p, &["a"]);
        assert!(!p.select_row(3));
        assert!(p.map().centers.is_empty());
        assert!(p.state().panel.is_open());
    }

    #[test]
    fn select_centers_at_focus_zoom_and_collapses() {
        let mut p = page();
        completed(&mut p, &["a", "b"]);
        assert!(p.state().panel.is_open());

        assert!(p.select_row(0));
        let (name, viewport) = p.map().centers.last().unwrap().clone();
        assert_eq!(name, "a");
        assert_eq!(viewport.zoom, 13);
        assert_eq!(viewport.center.lat_lon(), [12.0, 77.0]);
        assert!(!p.state().panel.is_open());
        assert_eq!(p.results().listings.last().unwrap().selected_count(), 1);
    }

    #[test]
    fn toggle_is_noop_while_loading() {
        let mut p = page();
        p.submit("q").unwrap();
        assert!(!p.toggle_panel());
        assert!(!p.state().panel.is_open());
    }

    #[test]
    fn transport_error_settles_errored() {
        let mut p = page();
        let t = p.submit("q").unwrap();
        let r = p.complete(t.generation, Err(TransportError::Status(502)));
        assert_eq!(r, Resolution::Errored);
        assert_eq!(p.surface(), PanelSurface::NoResults);
        assert_eq!(p.notifier().seen, vec![Notification::QueryFailed]);
        assert!(p.events().kinds().contains(&kind::ERRORED));
    }

    #[test]
    fn dropped_features_are_traced() {
        let mut p = page();
        let t = p.submit("q").unwrap();
        let response = protocol::decode_response(
            r#"{"action_triggered": "db", "data": [{"geometry": {}}, {
                "geometry": {"coordinates": [1.0, 2.0]},
                "properties": {"place_name": "ok", "city": "c", "entity_type": "e"}
            }]}"#,
        )
        .unwrap();
        assert_eq!(
            p.complete(t.generation, Ok(response)),
            Resolution::Completed { count: 1 }
        );
        let dropped: Vec<_> = p
            .events()
            .events()
            .iter()
            .filter(|e| e.kind == kind::DROPPED)
            .collect();
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].message.starts_with("#0"));
    }

    #[test]
    fn drained_bus_is_empty_after_a_cycle() {
        let mut p = page();
        for _ in 0..3 {
            completed(&mut p, &["a", "b", "c"]);
            p.select_row(0);
            p.toggle_panel();
            let drained = p.events_mut().drain();
            assert!(drained.iter().any(|e| e.kind == kind::COMPLETED));
            assert!(p.events().events().is_empty());
        }
    }

    #[test]
    fn undrained_bus_stays_bounded() {
        let mut p = page();
        for _ in 0..200 {
            completed(&mut p, &["a", "b", "c"]);
            p.select_row(0);
            p.toggle_panel();
        }
        assert_eq!(p.events().events().len(), p.events().capacity());
    }

    #[test]
    fn stale_response_is_logged_as_warning() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut p = page();
            let old = p.submit("old").unwrap();
            p.submit("new").unwrap();
            assert_eq!(
                p.complete(old.generation, Err(TransportError::Status(500))),
                Resolution::Stale
            );
        });

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = out
            .lines()
            .find(|l| l.contains("discarding stale query response"))
            .unwrap();
        assert!(line.contains("WARN"));
    }
}
