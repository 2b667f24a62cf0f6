//! Service configuration (TOML file + env overrides).

pub mod app;

pub use app::AppConfig;
