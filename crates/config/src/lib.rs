//! Configuration schema, clamping validators, file persistence, and the
//! shared config store that owns the model catalog.

pub mod loader;
pub mod schema;
pub mod store;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_or_default_config_path, load_config, save_config},
    schema::{AccessConfig, AppConfig, DEFAULT_INPUT_TEMPLATE, ModelConfig},
    store::ConfigStore,
    validate::normalize_model_config,
};
