use anyhow::{bail, Result};
use std::{fmt::Display, str::FromStr};
use tracing::{error, level_filters::LevelFilter, warn, Subscriber};
use tracing_subscriber::{prelude::*, EnvFilter};

// A simple way to log without interrupting fluency
pub trait LogMe<T> {
    fn log_warn<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T>;
    fn log_error<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T>;
}

// Will log a warning in case of error
// WARN {context_msg}: {cause}
impl<T, Error: Into<anyhow::Error> + Display + Send + Sync + 'static> LogMe<T>
    for Result<T, Error>
{
    fn log_warn<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T> {
        match self {
            Err(e) => {
                let ae: anyhow::Error = e.into();
                let ae = ae.context(context_msg);
                warn!("{:#}", ae);
                Err(ae)
            }
            Ok(t) => Ok(t),
        }
    }

    fn log_error<C: Display + Send + Sync + 'static>(self, context_msg: C) -> anyhow::Result<T> {
        match self {
            Err(e) => {
                let ae: anyhow::Error = e.into();
                let ae = ae.context(context_msg);
                error!("{:#}", ae);
                Err(ae)
            }
            Ok(t) => Ok(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingMode {
    /// Human readable lines, for running the tools by hand
    Full,
    /// JSON lines, for running in a container
    Json,
}

impl FromStr for TracingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(TracingMode::Full),
            "json" => Ok(TracingMode::Json),
            other => bail!("unknown log format {other:?}, expected \"full\" or \"json\""),
        }
    }
}

/// Setup tracing - stdout subscriber
/// stdout defaults to INFO; RPC transport chatter stays at INFO unless RUST_LOG names it.
pub fn setup_tracing(mode: TracingMode) -> Result<()> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;

    let var = std::env::var("RUST_LOG").unwrap_or_default();
    if !var.contains("alloy") {
        filter = filter.add_directive("alloy_rpc_client=info".parse()?);
        filter = filter.add_directive("alloy_transport_http=info".parse()?);
    }
    if !var.contains("tower_http") {
        // API request/response debug tracing
        filter = filter.add_directive("tower_http::trace=debug".parse()?);
    }

    // Can't use match inline because these are different return types
    match mode {
        TracingMode::Full => register_global_subscriber(filter, tracing_subscriber::fmt::layer()),
        TracingMode::Json => register_global_subscriber(
            filter,
            tracing_subscriber::fmt::layer().event_format(tracing_subscriber::fmt::format().json()),
        ),
    };

    Ok(())
}

fn register_global_subscriber<T, S>(filter: EnvFilter, fmt_layer: T)
where
    S: Subscriber,
    T: tracing_subscriber::Layer<S> + Send + Sync,
    tracing_subscriber::filter::Filtered<T, tracing_subscriber::EnvFilter, S>:
        tracing_subscriber::Layer<tracing_subscriber::Registry>,
{
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn tracing_mode_from_conf() {
        assert_eq!("full".parse::<TracingMode>().unwrap(), TracingMode::Full);
        assert_eq!("json".parse::<TracingMode>().unwrap(), TracingMode::Json);
        assert!("xml".parse::<TracingMode>().is_err());
    }

    #[test_log::test]
    fn log_me_adds_context() {
        let res: Result<u8> = Err(anyhow!("connection refused"));
        let err = res.log_warn("Fetching hardcap").unwrap_err();
        assert_eq!(format!("{err:#}"), "Fetching hardcap: connection refused");

        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.log_error("unused").unwrap(), 3);
    }
}
