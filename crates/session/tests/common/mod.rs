#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use foundation::LonLat;
use protocol::{GeoFeature, QueryRequest, QueryResponse};
use session::recording::{RecordingMap, RecordingNotifier, RecordingResults};
use session::{ClientConfig, PageController, QueryTransport, TransportError};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

pub type Page = PageController<RecordingMap, RecordingResults, RecordingNotifier>;
pub type Answer = Result<QueryResponse, TransportError>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn page_with(config: ClientConfig) -> Page {
    init_tracing();
    let mut page = PageController::new(
        config,
        RecordingMap::default(),
        RecordingResults::default(),
        RecordingNotifier::default(),
    );
    page.mount();
    page
}

pub fn page() -> Page {
    page_with(ClientConfig::default())
}

pub fn feature(name: &str, lon: f64, lat: f64) -> GeoFeature {
    GeoFeature::new(LonLat::try_new(lon, lat).unwrap(), name, "Bengaluru", "Startup")
}

pub fn three_ai_companies() -> Vec<GeoFeature> {
    vec![
        feature("Sarvam AI", 77.5946, 12.9716),
        feature("Krutrim", 77.6309, 12.9352),
        feature("Acme HQ", 72.8777, 19.0760),
    ]
}

/// Transport whose answers are delivered by the test, in send order.
#[derive(Default)]
pub struct ScriptedTransport {
    pending: RefCell<VecDeque<oneshot::Receiver<Answer>>>,
    pub sent: RefCell<Vec<QueryRequest>>,
}

impl ScriptedTransport {
    /// Reserves the answer for the next `send`.
    pub fn expect(&self) -> oneshot::Sender<Answer> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(rx);
        tx
    }
}

impl QueryTransport for ScriptedTransport {
    async fn send(&self, request: QueryRequest) -> Answer {
        self.sent.borrow_mut().push(request);
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("answer dropped".to_string()))),
            None => Err(TransportError::Network("unscripted request".to_string())),
        }
    }
}
