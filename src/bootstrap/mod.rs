pub mod config;
pub mod run;
pub mod tracing;

pub use config::{
    default_config_path, default_endpoint_tag, load_config, load_config_or_default,
    resolve_engine_config, save_config, ConfigOverrides,
};
pub use run::{run_until, start_engine, EngineAdapters};
pub use self::tracing::init_tracing_subscriber;
