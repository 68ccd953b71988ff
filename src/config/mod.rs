//! Configuration loaded from `burnnote.toml`.

pub mod settings;

pub use settings::Settings;
