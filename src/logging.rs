use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "CLUSTERCTX_LOG";

/// Installs the stderr subscriber.
///
/// `CLUSTERCTX_LOG` takes EnvFilter directives. Without it, `verbosity` picks
/// the level: 0 = warn, 1 = info, 2 = debug, more = trace. A subscriber that is
/// already installed is left in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("clusterctx={level}"))
    });

    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_keeps_first_subscriber() {
        init(0);
        init(3);
        tracing::debug!("still logging");
    }
}
