//! Built-in attribute calculators.

pub mod offline;
pub mod rosu;

pub use offline::OfflineCalculator;
pub use rosu::RosuCalculator;
