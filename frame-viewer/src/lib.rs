pub mod display_loop;
pub mod embedded_assets;
pub mod error;
pub mod logging;
pub mod stats_server;

pub use error::ViewerError;
