pub mod config;
pub mod constants;
pub mod content;
pub mod logging;
pub mod srs;
pub mod store;
pub mod validation;
