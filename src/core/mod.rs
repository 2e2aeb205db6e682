pub mod error;
pub mod memory;
pub mod params;
pub mod units;
