//! Fleet scanning: walk a world's generated chunks outward from a center and
//! capture every distinct structure found along the way.

pub mod config;
pub mod state;
pub mod fleet;

pub use config::ScannerConfig;
pub use state::ScanState;
pub use fleet::{FleetScanner, ScanHit, ScanPhase, ScanStats};
