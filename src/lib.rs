pub mod config;
pub mod fetch;
pub mod fpl;
pub mod logging;
pub mod optimize;
pub mod output;
pub mod scoring;
