pub mod config;
pub mod controller;
pub mod event_bus;
pub mod panel;
pub mod query;
pub mod recording;
pub mod selection;
pub mod transport;
pub mod views;

pub use config::*;
pub use controller::*;
pub use event_bus::{Event, EventBus};
pub use panel::*;
pub use query::*;
pub use selection::*;
pub use transport::{QueryTransport, TransportError, begin_query, finish_query, run_query};
pub use views::*;

#[cfg(not(target_arch = "wasm32"))]
pub use transport::http::HttpTransport;
