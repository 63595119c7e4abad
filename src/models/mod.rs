pub mod cache;
pub mod regions;
pub mod snapshot;
pub mod timeseries;
