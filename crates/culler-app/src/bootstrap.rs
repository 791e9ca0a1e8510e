//! Startup wiring for the daemon and signal-driven shutdown.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use culler_config::{CullerConfig, load_predicate_document};
use culler_engine::{EvictionEngine, EvictionPolicy};
use culler_predicate::SchemaPredicate;
use culler_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use culler_torrent_core::TorrentPredicate;
use culler_transmission::{TransmissionClient, TransmissionConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::daemon::EvictionDaemon;
use crate::error::{AppError, AppResult};
use crate::http;
use crate::scheduler::run_periodic;

/// Entry point for the daemon: parse flags and environment, then run.
///
/// # Errors
///
/// Returns an error if configuration is invalid or startup fails.
pub async fn run_app() -> AppResult<()> {
    let config = Cli::parse().into_config();
    run_app_with(config).await
}

/// Validate `config`, wire every service, and run cycles until a shutdown signal.
///
/// # Errors
///
/// Returns an error if validation, predicate compilation, logging setup, or
/// the metrics listener bind fails. Cycle failures never surface here.
pub async fn run_app_with(config: CullerConfig) -> AppResult<()> {
    config
        .validate()
        .map_err(|err| AppError::config("config.validate", err))?;

    let format = config
        .logging
        .format
        .as_deref()
        .map_or_else(LogFormat::infer, LogFormat::from_name);
    culler_telemetry::init_logging(&LoggingConfig {
        level: &config.logging.level,
        format,
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("daemon");

    info!(
        cycles = config.policy.cycles,
        interval_secs = config.interval_secs,
        remove_finished = config.policy.remove_finished,
        remove_stalled = config.policy.remove_stalled,
        "culler starting"
    );

    let metrics =
        Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let engine = build_engine(&config, metrics.clone())?;
    let client = Arc::new(build_client(&config)?);
    info!(endpoint = %client.endpoint(), "transmission client ready");
    let mut daemon = EvictionDaemon::new(engine, client.clone(), client);

    let shutdown = CancellationToken::new();
    let signals = tokio::spawn(listen_for_shutdown(shutdown.clone()));

    let metrics_server = match config
        .metrics_addr()
        .map_err(|err| AppError::config("config.metrics_addr", err))?
    {
        Some(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|err| AppError::io("metrics.bind", err))?;
            Some(tokio::spawn(http::serve(
                listener,
                metrics.clone(),
                shutdown.clone(),
            )))
        }
        None => None,
    };

    let runs = run_periodic(&mut daemon, config.interval(), &shutdown).await;
    info!(runs, "culler stopped scheduling cycles");

    shutdown.cancel();
    signals.abort();
    if let Some(server) = metrics_server {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "metrics listener terminated with an error"),
            Err(err) => warn!(error = %err, "metrics listener task failed"),
        }
    }
    Ok(())
}

/// Build the eviction engine, compiling any configured predicates.
pub(crate) fn build_engine(config: &CullerConfig, metrics: Metrics) -> AppResult<EvictionEngine> {
    let policy = EvictionPolicy {
        threshold: config.policy.cycles,
        remove_finished: config.policy.remove_finished,
        remove_stalled: config.policy.remove_stalled,
        call_timeout: config.rpc_timeout(),
    };
    let mut engine = EvictionEngine::new(policy, metrics);
    if let Some(path) = &config.policy.remove_predicate {
        engine = engine.with_remove_predicate(load_predicate("remove", path)?);
    }
    if let Some(path) = &config.policy.ignore_predicate {
        engine = engine.with_ignore_predicate(load_predicate("ignore", path)?);
    }
    Ok(engine)
}

fn build_client(config: &CullerConfig) -> AppResult<TransmissionClient> {
    let url = config
        .transmission_url()
        .map_err(|err| AppError::config("config.transmission_url", err))?;
    TransmissionClient::new(TransmissionConfig {
        url,
        username: config.transmission.username.clone(),
        password: config.transmission.password.clone(),
        timeout: config.rpc_timeout(),
    })
    .map_err(|err| AppError::transmission("transmission.client", err))
}

fn load_predicate(label: &str, path: &Path) -> AppResult<Arc<dyn TorrentPredicate>> {
    let document =
        load_predicate_document(path).map_err(|err| AppError::config("predicate.load", err))?;
    let predicate =
        SchemaPredicate::compile(label, &document).map_err(|source| AppError::Predicate {
            path: path.to_path_buf(),
            source,
        })?;
    info!(predicate = label, path = %path.display(), "predicate compiled");
    Ok(Arc::new(predicate))
}

async fn listen_for_shutdown(shutdown: CancellationToken) {
    wait_for_signal().await;
    info!("shutdown signal received; finishing the current cycle");
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                () = ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            warn!(error = %err, "failed to install SIGTERM handler");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culler_engine::StrikeLedger;
    use culler_test_support::{RecordingRemover, ScriptedSource, finished};
    use culler_torrent_core::TorrentId;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[tokio::test]
    async fn invalid_config_fails_before_startup() -> anyhow::Result<()> {
        let config = CullerConfig {
            interval_secs: 0,
            ..CullerConfig::default()
        };
        let err = run_app_with(config).await.expect_err("zero interval");
        assert!(matches!(
            err,
            AppError::Config {
                operation: "config.validate",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn absurd_interval_fails_before_startup() {
        let config = CullerConfig {
            interval_secs: u64::MAX,
            ..CullerConfig::default()
        };
        let Err(err) = run_app_with(config).await else {
            panic!("an interval of u64::MAX must be rejected");
        };
        assert!(matches!(
            err,
            AppError::Config {
                operation: "config.validate",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn yaml_remove_predicate_gates_finished_torrents() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = write(
            &dir,
            "remove.yaml",
            "properties:\n  uploadRatio:\n    minimum: 2\nrequired: [uploadRatio]\n",
        )?;
        let mut config = CullerConfig::default();
        config.policy.cycles = 1;
        config.policy.remove_predicate = Some(path);
        let engine = build_engine(&config, Metrics::new()?)?;

        let source = ScriptedSource::repeating(vec![
            finished(1, "seeded").with_attribute("uploadRatio", 2.5),
            finished(2, "leeched").with_attribute("uploadRatio", 0.4),
        ]);
        let remover = RecordingRemover::default();
        let mut ledger = StrikeLedger::new();
        engine.run_cycle(&mut ledger, &source, &remover).await?;

        assert_eq!(remover.calls(), vec![(TorrentId(1), false)]);
        Ok(())
    }

    #[test]
    fn uncompilable_predicate_is_fatal() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = write(&dir, "ignore.json", r#"{ "type": 12 }"#)?;
        let mut config = CullerConfig::default();
        config.policy.ignore_predicate = Some(path.clone());

        let Err(err) = build_engine(&config, Metrics::new()?) else {
            anyhow::bail!("expected predicate compilation to fail");
        };
        assert!(matches!(err, AppError::Predicate { path: ref failed, .. } if *failed == path));
        Ok(())
    }

    #[test]
    fn missing_predicate_file_is_a_config_error() -> anyhow::Result<()> {
        let mut config = CullerConfig::default();
        config.policy.remove_predicate = Some(PathBuf::from("/definitely/missing.yaml"));
        let Err(err) = build_engine(&config, Metrics::new()?) else {
            anyhow::bail!("expected missing file to fail");
        };
        assert!(matches!(
            err,
            AppError::Config {
                operation: "predicate.load",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn client_uses_configured_endpoint() -> anyhow::Result<()> {
        let mut config = CullerConfig::default();
        config.transmission.url = "http://nas:9091/transmission/rpc".into();
        let client = build_client(&config)?;
        assert_eq!(client.endpoint().host_str(), Some("nas"));
        Ok(())
    }
}
