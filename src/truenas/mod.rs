pub mod client;
pub mod types;

pub use client::TrueNasClient;
pub use types::{Dataset, NfsShare, PropertyValue};
