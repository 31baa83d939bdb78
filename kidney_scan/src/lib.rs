mod render;
mod routes;

pub mod app;
pub mod config;
pub mod i18n;
pub mod intake;
pub mod page;
pub mod prediction;
pub mod presentation;
pub mod server;
pub mod telemetry;

pub use app::start_app;
