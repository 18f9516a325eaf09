//! `titlemap-recon` — title normalization and tiered catalog matching.
//!
//! Pure engine crate: receives pre-loaded tables, returns the resolved
//! records, report lists and the assembled output table.
//! No CLI or file IO dependencies.

pub mod assemble;
pub mod classify;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{Classification, ReconInput, ReconResult, StatementRecord, TitleValue};
pub use normalize::{normalize, normalize_str, TitleNormalizer};
