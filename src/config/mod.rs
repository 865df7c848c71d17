mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{
    ChatSettings, GeneratorSettings, LoggingSettings, NotifierSettings, ServerSettings, Settings,
    StoreSettings,
};

/// Prefix for environment overrides, e.g. `RELAY__SERVER__WS_PORT`.
pub const ENV_PREFIX: &str = "RELAY";

/// Loads the configuration from the default file and environment variables.
///
/// Values are merged onto `Settings::default()`. Fails with
/// `ConfigError::NotFound` when a required credential is absent, so the
/// process refuses to start without it.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    let settings = Settings::default().merge(partial);

    match settings.missing_required() {
        Some(key) => Err(ConfigError::NotFound(key.to_string())),
        None => Ok(settings),
    }
}

#[cfg(test)]
mod tests;
