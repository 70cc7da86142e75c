use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::{mpsc, watch};

use band_watch::coindcx::rest::CoinDcxRestClient;
use band_watch::config::Config;
use band_watch::event::AppEvent;
use band_watch::input::{
    parse_edit_command, parse_main_command, step_bound, BandEditor, EditCommand, UiCommand,
};
use band_watch::model::band::ThresholdBand;
use band_watch::model::candle::CandleSeries;
use band_watch::monitor::Monitor;
use band_watch::notify::Notifier;
use band_watch::twilio::rest::TwilioClient;
use band_watch::ui;
use band_watch::ui::AppState;

mod ui_handlers;

use ui_handlers::{handle_edit_command, handle_main_command};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Check config/default.toml and, with notifications enabled, TWILIO_SID and TWILIO_AUTH_TOKEN in .env");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with TUI
    let log_file = std::fs::File::create("band-watch.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let symbol = config.market.market_symbol();
    tracing::info!(
        symbol = %symbol,
        ticker_url = %config.market.ticker_url,
        interval = %config.candles.interval,
        notify_enabled = config.notify.enabled,
        "Starting band-watch"
    );

    let band = config.band.to_band()?;
    let window_ms = config
        .candles
        .window_ms()
        .context("validated candles.interval became invalid at runtime")?;

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (band_tx, band_rx) = watch::channel(band);
    let (running_tx, running_rx) = watch::channel(true);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let source = CoinDcxRestClient::new(
        &config.market.ticker_url,
        &symbol,
        config.market.request_timeout(),
    )?;
    let notifier = if config.notify.enabled {
        let client = TwilioClient::new(
            &config.notify.api_base_url,
            &config.notify.account_sid,
            &config.notify.auth_token,
            &config.notify.from,
            &config.notify.to,
            config.notify.request_timeout(),
        )?;
        Notifier::new(client, config.notify.policy)
    } else {
        Notifier::<TwilioClient>::disabled()
    };
    let monitor = Monitor::new(
        source,
        CandleSeries::new(window_ms, config.candles.max_candles),
        notifier,
        band_rx,
        app_tx.clone(),
        config.market.poll_interval(),
    );
    let monitor_handle = tokio::spawn(monitor.run(running_rx, shutdown_rx.clone()));

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(&symbol, &config.candles.interval, band, config.ui.chart_height);
    app_state.band_step = config.band.step;
    app_state.notify_enabled = config.notify.enabled;
    app_state.push_log(format!(
        "band-watch started | {} | polling {} every {}ms",
        symbol, config.market.ticker_url, config.market.poll_interval_ms
    ));

    loop {
        while let Ok(event) = app_rx.try_recv() {
            app_state.apply(event);
        }

        terminal.draw(|frame| ui::render(frame, &app_state))?;

        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app_state.editor.is_some() {
                    if let Some(cmd) = parse_edit_command(&key.code) {
                        handle_edit_command(cmd, &mut app_state, &band_tx);
                    }
                    continue;
                }
                match parse_main_command(&key.code) {
                    Some(UiCommand::Quit) => {
                        tracing::info!("User quit");
                        let _ = shutdown_tx.send(true);
                        break;
                    }
                    Some(cmd) => {
                        handle_main_command(cmd, &mut app_state, &band_tx, &running_tx, &app_tx)
                    }
                    None => {}
                }
            }
        }

        if *shutdown_rx.borrow() {
            break;
        }
    }

    ratatui::restore();
    if tokio::time::timeout(Duration::from_secs(2), monitor_handle)
        .await
        .is_err()
    {
        tracing::warn!("Monitor did not stop within 2s");
    }
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check band-watch.log for details.");
    Ok(())
}
