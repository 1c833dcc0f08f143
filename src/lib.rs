pub mod capture;
pub mod config;
pub mod cube;
pub mod logging;
