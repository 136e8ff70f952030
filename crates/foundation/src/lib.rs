pub mod generation;
pub mod geo;

// Foundation crate: small, well-tested primitives only.
pub use generation::*;
pub use geo::*;
