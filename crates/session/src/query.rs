use foundation::Generation;
use protocol::{GeoFeature, QueryRequest};
use tracing::debug;

/// Lifecycle of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Completed,
    Errored,
}

/// Outbound request issued by [`QuerySession::begin`].
///
/// The generation travels with the request so the response can be matched
/// against the session that is current when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: Generation,
    pub request: QueryRequest,
}

/// What [`QuerySession::resolve`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Completed { count: usize },
    Errored,
    /// The response belongs to a superseded (or already resolved) submission.
    Stale,
}

/// Query lifecycle state machine.
///
/// Only the most recent submission may settle the session; responses tagged
/// with an older generation are ignored.
#[derive(Debug, Clone)]
pub struct QuerySession {
    phase: Phase,
    features: Vec<GeoFeature>,
    last_query_text: Option<String>,
    generation: Generation,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            features: Vec::new(),
            last_query_text: None,
            generation: Generation::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    pub fn last_query_text(&self) -> Option<&str> {
        self.last_query_text.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// True when a completed session holds at least one feature.
    pub fn has_results(&self) -> bool {
        self.phase == Phase::Completed && !self.features.is_empty()
    }

    /// Starts a new submission.
    ///
    /// Returns `None` (and changes nothing) when the trimmed text is empty.
    /// The raw, untrimmed text is what gets recorded and sent.
    pub fn begin(&mut self, query_text: &str) -> Option<QueryTicket> {
        if query_text.trim().is_empty() {
            return None;
        }
        self.generation = self.generation.next();
        self.features.clear();
        self.phase = Phase::Loading;
        self.last_query_text = Some(query_text.to_string());
        debug!(generation = %self.generation, "query session loading");
        Some(QueryTicket {
            generation: self.generation,
            request: QueryRequest::new(query_text),
        })
    }

    /// Settles the session with the outcome of request `generation`.
    ///
    /// `Some(features)` completes, `None` errors. Anything not matching the
    /// current, still-loading generation is reported as [`Resolution::Stale`]
    /// and leaves the session untouched.
    pub fn resolve(
        &mut self,
        generation: Generation,
        outcome: Option<Vec<GeoFeature>>,
    ) -> Resolution {
        if generation != self.generation || self.phase != Phase::Loading {
            return Resolution::Stale;
        }
        match outcome {
            Some(features) => {
                let count = features.len();
                self.features = features;
                self.phase = Phase::Completed;
                Resolution::Completed { count }
            }
            None => {
                self.features.clear();
                self.phase = Phase::Errored;
                Resolution::Errored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::LonLat;

    fn feature(name: &str) -> GeoFeature {
        GeoFeature::new(LonLat::try_new(77.0, 12.0).unwrap(), name, "Bengaluru", "Startup")
    }

    #[test]
    fn starts_idle_and_empty() {
        let s = QuerySession::new();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.features().is_empty());
        assert_eq!(s.last_query_text(), None);
    }

    #[test]
    fn blank_text_is_a_no_op() {
        let mut s = QuerySession::new();
        let t = s.begin("q").unwrap();
        s.resolve(t.generation, Some(vec![feature("a")]));

        for blank in ["", "   ", "\t\n"] {
            assert!(s.begin(blank).is_none());
            assert_eq!(s.phase(), Phase::Completed);
            assert_eq!(s.features().len(), 1);
            assert_eq!(s.last_query_text(), Some("q"));
            assert_eq!(s.generation(), t.generation);
        }
    }

    #[test]
    fn begin_records_raw_text_and_advances_generation() {
        let mut s = QuerySession::new();
        let t1 = s.begin("  Most funded startups ").unwrap();
        assert_eq!(t1.request.query, "  Most funded startups ");
        assert_eq!(s.last_query_text(), Some("  Most funded startups "));
        assert_eq!(s.phase(), Phase::Loading);

        let t2 = s.begin("again").unwrap();
        assert!(t2.generation > t1.generation);
    }

    #[test]
    fn begin_clears_features_from_any_phase() {
        let mut s = QuerySession::new();
        let t = s.begin("one").unwrap();
        s.resolve(t.generation, Some(vec![feature("a"), feature("b")]));
        assert_eq!(s.phase(), Phase::Completed);

        s.begin("two").unwrap();
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.features().is_empty());

        let t = s.begin("three").unwrap();
        s.resolve(t.generation, None);
        assert_eq!(s.phase(), Phase::Errored);
        s.begin("four").unwrap();
        assert_eq!(s.phase(), Phase::Loading);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut s = QuerySession::new();
        let old = s.begin("old").unwrap();
        let new = s.begin("new").unwrap();

        assert_eq!(
            s.resolve(old.generation, Some(vec![feature("stale")])),
            Resolution::Stale
        );
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.features().is_empty());

        assert_eq!(
            s.resolve(new.generation, Some(vec![feature("fresh")])),
            Resolution::Completed { count: 1 }
        );
        assert_eq!(s.resolve(old.generation, None), Resolution::Stale);
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.features()[0].place_name(), "fresh");
    }

    #[test]
    fn second_resolution_of_same_generation_is_stale() {
        let mut s = QuerySession::new();
        let t = s.begin("q").unwrap();
        assert_eq!(s.resolve(t.generation, Some(vec![])), Resolution::Completed { count: 0 });
        assert_eq!(s.resolve(t.generation, None), Resolution::Stale);
        assert_eq!(s.phase(), Phase::Completed);
    }

    #[test]
    fn error_forces_features_empty() {
        let mut s = QuerySession::new();
        let t = s.begin("q").unwrap();
        assert_eq!(s.resolve(t.generation, None), Resolution::Errored);
        assert_eq!(s.phase(), Phase::Errored);
        assert!(s.features().is_empty());
        assert!(!s.has_results());
    }
}
