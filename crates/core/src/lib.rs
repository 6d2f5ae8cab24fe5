//! Battery-life estimation for duty-cycled devices.
//!
//! A device spends its day in four regimes (fully active, light sleep,
//! forced deep sleep and idle). [`estimator`] blends their current draws
//! into a 24-hour average and divides the battery capacity by it.

pub mod config;
pub mod estimator;
pub mod report;
pub mod types;
