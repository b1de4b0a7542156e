pub mod calculations;
pub mod models;
pub mod rates;

pub use models::*;
pub use rates::{RateError, RateSource, StaticRateSource, resolve_rates};
