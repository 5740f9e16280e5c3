pub mod buffer;
pub mod config;
pub mod context;
pub mod errors;
pub mod loader;
pub mod results;
pub mod scanner;

pub use buffer::SequenceBuffer;
pub use config::ScanConfig;
pub use errors::{ScanError, ScanResult};
pub use loader::{load_files, LoadStats};
pub use results::ScanSummary;
pub use scanner::scan;
