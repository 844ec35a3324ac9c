pub mod api;
pub mod cli;
pub mod core;
pub mod providers;
pub mod relay;
pub mod transcript;
