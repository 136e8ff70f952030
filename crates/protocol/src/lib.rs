pub mod feature;
pub mod query;

pub use feature::*;
pub use query::*;
