use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs go to stderr so they never
/// interleave with rendered samples on stdout.
///
/// The filter is taken from `cli_level`, then `RUST_LOG`, then `config_level`.
pub fn init(cli_level: Option<&str>, config_level: &str, json: bool) -> Result<()> {
    let env_level = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = select_filter(cli_level, env_level.as_deref(), config_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).compact().try_init()
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

/// An unparsable `RUST_LOG` falls through to the config level; a bad CLI or
/// config level is an error.
fn select_filter(
    cli_level: Option<&str>,
    env_level: Option<&str>,
    config_level: &str,
) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return EnvFilter::try_new(level).map_err(|e| eyre!("invalid log level `{level}`: {e}"));
    }
    if let Some(filter) = env_level
        .filter(|env| !env.trim().is_empty())
        .and_then(|env| EnvFilter::try_new(env).ok())
    {
        return Ok(filter);
    }
    EnvFilter::try_new(config_level).map_err(|e| eyre!("invalid log level `{config_level}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(cli: Option<&str>, env: Option<&str>, config: &str) -> String {
        select_filter(cli, env, config)
            .unwrap()
            .to_string()
            .to_lowercase()
    }

    #[test]
    fn cli_level_beats_rust_log() {
        assert_eq!(directives(Some("debug"), Some("error"), "warn"), "debug");
    }

    #[test]
    fn rust_log_beats_config() {
        assert_eq!(directives(None, Some("error"), "warn"), "error");
        assert_eq!(directives(None, Some("hwmon=trace"), "warn"), "hwmon=trace");
    }

    #[test]
    fn config_level_is_the_fallback() {
        assert_eq!(directives(None, None, "info"), "info");
        assert_eq!(directives(None, Some(""), "info"), "info");
        assert_eq!(directives(None, Some("hwmon=loud"), "info"), "info");
    }

    #[test]
    fn bad_cli_level_is_reported() {
        let err = select_filter(Some("hwmon=loud"), None, "warn").unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }
}
