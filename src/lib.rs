//! Reduce per-iteration benchmark measurements into median summaries shaped
//! for plotting.
//!
//! Raw csv rows are grouped by their categorical keys ([`index`]), each bucket
//! collapses to its median ([`reduce`]) and the reduced cells are projected into
//! one named view per chart ([`views`]). [`pipeline`] strings the steps
//! together for the performance and recovery configurations.

pub mod cli;
pub mod error;
pub mod gen;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod reduce;
pub mod titles;
pub mod views;

pub use error::{ReduceError, Result};
