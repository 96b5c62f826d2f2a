pub mod logging;
pub mod monitor;
