//! Trip planning engine: place resolution cache and schedule synchronisation.

#[cfg(feature = "example-data")]
pub mod demo;
pub mod domain;
pub mod outbound;
