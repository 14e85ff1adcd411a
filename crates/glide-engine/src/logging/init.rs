use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"glide_engine=debug,wgpu=warn"`. When unset, `RUST_LOG` applies, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Prefix lines with the emitting module path.
    pub module_path: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            module_path: true,
        }
    }
}

impl LoggingConfig {
    /// Filter that keeps the engine chatty and the GPU stack quiet.
    pub fn verbose() -> Self {
        Self {
            env_filter: Some("info,glide_engine=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn".into()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder
            .write_style(config.write_style)
            .format_module_path(config.module_path);

        // Another crate may have installed a logger already.
        if builder.try_init().is_err() {
            log::debug!("global logger already set; glide logging config not applied");
            return;
        }
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::verbose());
        init_logging(LoggingConfig::default());
        log::debug!("still logging");
    }
}
