use crate::output;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use stockrank_market::{MarketDataProvider, MarketstackClient, MarketstackConfig};
use stockrank_service::{
    AnalysisService, AppState, EodJob, IntradayJob, JobReport, router, spawn_daily,
};
use stockrank_store::{MemoryPriceStore, PgPriceStore, PriceStore};
use stockrank_utils::AppConfig;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

async fn connect_store(config: &AppConfig) -> Result<Arc<dyn PriceStore>> {
    let store = PgPriceStore::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    Ok(Arc::new(store))
}

fn market_client(config: &AppConfig) -> Result<Arc<dyn MarketDataProvider>> {
    let market = MarketstackConfig::builder()
        .api_key(&config.api_key)
        .build()
        .context("Invalid Marketstack configuration")?;
    Ok(Arc::new(MarketstackClient::new(market)?))
}

pub async fn serve(config: &AppConfig, in_memory: bool, with_intraday: bool) -> Result<()> {
    let store: Arc<dyn PriceStore> = if in_memory {
        warn!("using in-memory store, prices are lost on exit");
        Arc::new(MemoryPriceStore::new())
    } else {
        connect_store(config).await?
    };
    store.migrate().await.context("Failed to run migrations")?;

    let provider = market_client(config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let eod = EodJob::new(provider.clone(), store.clone(), config.symbols.clone());
    let mut schedulers = vec![spawn_daily(Arc::new(eod), config.eod_run_hour, shutdown_rx.clone())];
    info!(hour = config.eod_run_hour, "EOD job scheduled");

    if with_intraday {
        let intraday = IntradayJob::new(provider, store.clone(), config.symbols.clone());
        schedulers.push(spawn_daily(Arc::new(intraday), config.eod_run_hour, shutdown_rx));
        info!(hour = config.eod_run_hour, "intraday job scheduled");
    }

    let app = router(AppState::new(AnalysisService::new(store)));
    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    // Receivers may already be gone if a scheduler exited early
    let _ = shutdown_tx.send(true);
    for scheduler in schedulers {
        scheduler.await?;
    }

    Ok(())
}

pub async fn migrate(config: &AppConfig) -> Result<()> {
    let store = connect_store(config).await?;
    store.migrate().await.context("Failed to run migrations")?;
    println!("Database migrated successfully");
    Ok(())
}

pub async fn fetch_eod(config: &AppConfig, range: Option<(NaiveDate, NaiveDate)>) -> Result<()> {
    let store = connect_store(config).await?;
    let job = EodJob::new(market_client(config)?, store, config.symbols.clone());

    let report = match range {
        Some((from, to)) => job.backfill(from, to).await?,
        None => job.run().await?,
    };
    print_report("EOD", report);
    Ok(())
}

pub async fn fetch_intraday(
    config: &AppConfig,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<()> {
    let store = connect_store(config).await?;
    let job = IntradayJob::new(market_client(config)?, store, config.symbols.clone());

    let report = match range {
        Some((from, to)) => job.backfill(from, to).await?,
        None => job.run().await?,
    };
    print_report("Intraday", report);
    Ok(())
}

pub async fn analyze(config: &AppConfig, json: bool) -> Result<()> {
    let store = connect_store(config).await?;
    let result = AnalysisService::new(store).analyze().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", output::leaderboard(&result));
    }
    Ok(())
}

fn print_report(label: &str, report: JobReport) {
    println!("{label}: {report}");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
