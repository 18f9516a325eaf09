//! `titlemap-core` — tabular data model shared by the IO layer and the engine.

pub mod cell;
pub mod table;

pub use cell::Cell;
pub use table::Table;
