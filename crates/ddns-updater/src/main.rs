// # ddns-updater
//
// Thin entry point around `ddns_core::HomeIpUpdater`. All decision logic
// lives in ddns-core; this binary only:
// 1. Reads process configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Builds the resolver and parameter store once
// 4. Drives the updater from the selected trigger
//
// ## Configuration
//
// Read on every invocation (see `ddns_core::config`):
// - `DDNS_HOSTNAME`: DDNS hostname to resolve
// - `HOME_IP_SSM_PARAM_NAME`: Parameter holding the last known home IP
//
// Read once at startup:
// - `DDNS_RUN_MODE`: `lambda` (default), `once`, or `daemon`
// - `DDNS_STORE_TYPE`: `ssm` (default), `file`, or `memory`
// - `DDNS_STORE_PATH`: Path to the parameter file (for file store)
// - `DDNS_INTERVAL_SECS`: Tick interval in daemon mode (default 300)
// - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error
// - `DDNS_LOG_FORMAT`: `json` (default) or `text`
//
// ## Example
//
// ```bash
// export DDNS_HOSTNAME=home.example.net
// export HOME_IP_SSM_PARAM_NAME=/home/current-ip
// export DDNS_RUN_MODE=daemon
// export DDNS_STORE_TYPE=file
// export DDNS_STORE_PATH=/var/lib/ddns/parameters.json
//
// ddns-updater
// ```

use anyhow::Result;
use ddns_core::{
    FileParameterStore, HomeIpUpdater, InvocationResult, MemoryParameterStore, ParameterStore,
    UpdaterConfig,
};
use ddns_resolver_hickory::HickoryResolver;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum UpdaterExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (including a failed `once` invocation)
    RuntimeError = 2,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Default daemon tick: every five minutes, matching the production schedule
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    run_mode: String,
    store_type: String,
    store_path: Option<String>,
    interval_secs: u64,
    log_level: String,
    log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let interval_secs = match lookup("DDNS_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("DDNS_INTERVAL_SECS must be a number of seconds. Got: {}", raw)
            })?,
            None => DEFAULT_INTERVAL_SECS,
        };

        Ok(Self {
            run_mode: lookup("DDNS_RUN_MODE").unwrap_or_else(|| "lambda".to_string()),
            store_type: lookup("DDNS_STORE_TYPE").unwrap_or_else(|| "ssm".to_string()),
            store_path: lookup("DDNS_STORE_PATH"),
            interval_secs,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("DDNS_LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.run_mode.as_str() {
            "lambda" | "once" | "daemon" => {}
            _ => anyhow::bail!(
                "DDNS_RUN_MODE '{}' is not supported. \
                Supported modes: lambda, once, daemon",
                self.run_mode
            ),
        }

        match self.store_type.as_str() {
            "ssm" | "memory" => {}
            "file" => {
                if self.store_path.as_ref().is_none_or(|p| p.trim().is_empty()) {
                    anyhow::bail!(
                        "DDNS_STORE_PATH is required when DDNS_STORE_TYPE=file. \
                        Set it via: export DDNS_STORE_PATH=/var/lib/ddns/parameters.json"
                    );
                }
            }
            _ => anyhow::bail!(
                "DDNS_STORE_TYPE '{}' is not supported. \
                Supported types: ssm, file, memory",
                self.store_type
            ),
        }

        if self.run_mode == "daemon" && !(10..=3600).contains(&self.interval_secs) {
            anyhow::bail!(
                "DDNS_INTERVAL_SECS must be between 10 and 3600 seconds. Got: {}",
                self.interval_secs
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        match self.log_format.as_str() {
            "json" | "text" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_FORMAT '{}' is not valid. Valid formats: json, text",
                self.log_format
            ),
        }

        Ok(())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    info!(
        run_mode = %config.run_mode,
        store = %config.store_type,
        "Starting ddns-updater"
    );

    // Per-invocation config is re-read later; this is only an early hint
    if let Err(e) = UpdaterConfig::from_env() {
        warn!(error = %e, "Updater configuration incomplete, invocations will fail until it is set");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(code) => code,
            Err(e) => {
                error!("Updater error: {:#}", e);
                UpdaterExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Install the global tracing subscriber
fn init_tracing(config: &Config) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_target(false);

    if config.log_format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

/// Build collaborators once and hand off to the selected trigger
async fn run(config: Config) -> Result<UpdaterExitCode> {
    let store = create_store(&config).await?;
    let updater = Arc::new(HomeIpUpdater::new(Arc::new(HickoryResolver::new()), store));

    match config.run_mode.as_str() {
        "once" => run_once(&updater).await,
        "daemon" => {
            run_daemon(&updater, Duration::from_secs(config.interval_secs)).await?;
            Ok(UpdaterExitCode::CleanShutdown)
        }
        _ => {
            run_lambda(updater).await?;
            Ok(UpdaterExitCode::CleanShutdown)
        }
    }
}

/// Create the parameter store selected by `DDNS_STORE_TYPE`
async fn create_store(config: &Config) -> Result<Arc<dyn ParameterStore>> {
    match config.store_type.as_str() {
        "file" => {
            let path = config
                .store_path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DDNS_STORE_PATH is required for file store"))?;
            info!(path, "Using file parameter store");
            Ok(Arc::new(FileParameterStore::new(path).await?))
        }
        "memory" => {
            warn!("Using in-memory parameter store, values are lost on exit");
            Ok(Arc::new(MemoryParameterStore::new()))
        }
        #[cfg(feature = "ssm")]
        "ssm" => Ok(Arc::new(ddns_store_ssm::SsmParameterStore::new())),
        other => anyhow::bail!("Parameter store '{}' is not available in this build", other),
    }
}

/// Serve invocations from the Lambda runtime until it shuts us down
async fn run_lambda(updater: Arc<HomeIpUpdater>) -> Result<()> {
    info!("Handing over to Lambda runtime");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let updater = Arc::clone(&updater);
        async move { handle_event(&updater, event, UpdaterConfig::from_env()).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime error: {}", e))
}

/// Handle one scheduled invocation
///
/// The caller loads `config` per invocation so a fix to the function's
/// environment takes effect without a cold start.
async fn handle_event(
    updater: &HomeIpUpdater,
    event: LambdaEvent<Value>,
    config: ddns_core::Result<UpdaterConfig>,
) -> Result<InvocationResult, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        event_id = payload.get("id").and_then(serde_json::Value::as_str).unwrap_or("-"),
        event_time = payload.get("time").and_then(serde_json::Value::as_str).unwrap_or("-"),
        "DDNS updater invocation started"
    );

    let result = updater.invoke(config).await;
    log_result(&result);
    Ok(result)
}

/// Run a single invocation and print its result as JSON
async fn run_once(updater: &HomeIpUpdater) -> Result<UpdaterExitCode> {
    let result = updater.invoke(UpdaterConfig::from_env()).await;
    log_result(&result);
    println!("{}", serde_json::to_string(&result)?);

    Ok(if result.is_success() {
        UpdaterExitCode::CleanShutdown
    } else {
        UpdaterExitCode::RuntimeError
    })
}

/// Invoke the updater on a fixed interval until SIGTERM/SIGINT
///
/// The first tick fires immediately. Ticks missed while a pass is running are
/// skipped, not bursted.
async fn run_daemon(updater: &HomeIpUpdater, interval: Duration) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "Starting scheduled updates");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = updater.invoke(UpdaterConfig::from_env()).await;
                log_result(&result);
            }

            received = &mut shutdown => {
                info!("Received shutdown signal: {}", received?);
                break;
            }
        }
    }

    info!("Shutting down ddns-updater");
    Ok(())
}

fn log_result(result: &InvocationResult) {
    if result.is_success() {
        info!(status = result.status_code, message = %result.message, "Invocation finished");
    } else {
        error!(status = result.status_code, message = %result.message, "Invocation failed");
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ddns_core::traits::{HostnameResolver, Resolution};
    use lambda_runtime::Context;
    use serde_json::json;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use tempfile::tempdir;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_lambda_with_ssm() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.run_mode, "lambda");
        assert_eq!(config.store_type, "ssm");
        assert_eq!(config.interval_secs, DEFAULT_INTERVAL_SECS);
        assert_eq!(config.log_level(), Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_store_requires_path() {
        let config = config_from(&[("DDNS_STORE_TYPE", "file")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DDNS_STORE_PATH"));

        let config = config_from(&[
            ("DDNS_STORE_TYPE", "file"),
            ("DDNS_STORE_PATH", "/tmp/parameters.json"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn daemon_interval_is_bounded() {
        let config = config_from(&[("DDNS_RUN_MODE", "daemon"), ("DDNS_INTERVAL_SECS", "5")]).unwrap();
        assert!(config.validate().is_err());

        let config =
            config_from(&[("DDNS_RUN_MODE", "daemon"), ("DDNS_INTERVAL_SECS", "60")]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        assert!(config_from(&[("DDNS_INTERVAL_SECS", "five")]).is_err());
    }

    #[test]
    fn unknown_values_are_rejected() {
        for vars in [
            [("DDNS_RUN_MODE", "cron")],
            [("DDNS_STORE_TYPE", "dynamodb")],
            [("DDNS_LOG_LEVEL", "verbose")],
            [("DDNS_LOG_FORMAT", "xml")],
        ] {
            let config = config_from(&vars).unwrap();
            assert!(config.validate().is_err(), "{vars:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn memory_store_is_created() {
        let config = config_from(&[("DDNS_STORE_TYPE", "memory")]).unwrap();
        let store = create_store(&config).await.unwrap();
        assert_eq!(store.store_name(), "memory");
    }

    #[tokio::test]
    async fn file_store_is_created_at_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("parameters.json");
        let config = config_from(&[
            ("DDNS_STORE_TYPE", "file"),
            ("DDNS_STORE_PATH", path.to_str().unwrap()),
        ])
        .unwrap();

        let store = create_store(&config).await.unwrap();
        assert_eq!(store.store_name(), "file");
        assert!(path.parent().unwrap().is_dir());
    }

    struct StaticResolver(Ipv4Addr);

    #[async_trait]
    impl HostnameResolver for StaticResolver {
        async fn resolve(&self, _hostname: &str) -> Resolution {
            Resolution::Resolved(self.0)
        }

        fn resolver_name(&self) -> &'static str {
            "static"
        }
    }

    fn scheduled_event() -> LambdaEvent<Value> {
        let payload = json!({
            "id": "cdc73f9d-aea9-11e3-9d5a-835b769c0d9c",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "time": "2026-10-17T12:00:00Z",
        });
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn lambda_event_updates_stale_parameter() {
        let store = Arc::new(MemoryParameterStore::with_parameters([(
            "/home/current-ip",
            "0.0.0.0",
        )]));
        let updater = HomeIpUpdater::new(
            Arc::new(StaticResolver(Ipv4Addr::new(203, 0, 113, 5))),
            store.clone(),
        );
        let config = Ok(UpdaterConfig::new("home.example.net", "/home/current-ip"));

        let result = handle_event(&updater, scheduled_event(), config).await.unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"statusCode": 200, "body": "Parameter updated successfully."})
        );
        assert_eq!(
            store.get("/home/current-ip").await.unwrap().value(),
            Some("203.0.113.5")
        );
    }

    #[tokio::test]
    async fn lambda_event_without_configuration_fails_before_io() {
        let store = Arc::new(MemoryParameterStore::new());
        let updater = HomeIpUpdater::new(
            Arc::new(StaticResolver(Ipv4Addr::new(203, 0, 113, 5))),
            store.clone(),
        );
        let config = UpdaterConfig::from_lookup(|_| None);

        let result = handle_event(&updater, scheduled_event(), config).await.unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"statusCode": 500, "body": "Missing configuration."})
        );
        assert!(store.is_empty().await);
    }
}
