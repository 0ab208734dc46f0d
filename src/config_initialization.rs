//! Configuration initialization and hierarchy management

use tracing::info;

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{CompressXError, CompressXResult};

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> CompressXResult<AppConfig> {
    resolve_configuration(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub fn resolve_configuration<F>(cli: &Cli, env: F) -> CompressXResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Steps 1 and 2: defaults, then the config file
    let mut config = TomlConfigAdapter::load_or_default(cli.config.as_deref())?;

    // Step 3: environment variables
    config
        .apply_env(env)
        .map_err(|message| CompressXError::Config { message })?;

    // Step 4: command line
    apply_cli_configuration_overrides(&mut config, cli)?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> CompressXResult<()> {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level
            .parse()
            .map_err(|message| CompressXError::Config { message })?;
        cli_overrides += 1;
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format
            .parse()
            .map_err(|message| CompressXError::Config { message })?;
        cli_overrides += 1;
    }

    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }
    Ok(())
}
