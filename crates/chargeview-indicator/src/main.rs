//! chargeview
//!
//! Terminal battery indicator. Subscribes to the configured telemetry host
//! and redraws whenever a new snapshot arrives.

use anyhow::{Context, Result};
use chargeview_config::{Backend, ChargeviewConfig, LoggingConfig, MockConfig};
use chargeview_hal::mock::{MockHost, MockReadings};
use chargeview_hal::upower::UPowerHost;
use chargeview_hal::subscribe;
use chargeview_indicator::{App, view};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::{error, info};

fn main() -> Result<()> {
    let config = ChargeviewConfig::load_default().context("Failed to load configuration")?;
    setup_logging(&config.logging)?;

    info!("chargeview starting (backend={:?})", config.indicator.backend);

    // Multi-threaded so UPower change streams keep running while the UI
    // thread blocks on terminal input.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let app = runtime.block_on(build_app(&config));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(config.indicator.tick_rate_ms);
    let result = run(&mut terminal, app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!("Indicator failed: {:#}", e);
    }

    info!("chargeview stopped");
    result
}

async fn build_app(config: &ChargeviewConfig) -> App {
    let theme = config.indicator.theme;
    match config.indicator.backend {
        Backend::Upower => App::new(subscribe(&UPowerHost::new()).await, theme),
        Backend::Mock => {
            let host = mock_host(&config.mock);
            let battery = host.battery();
            App::new(subscribe(&host).await, theme).with_mock(battery)
        }
    }
}

fn mock_host(config: &MockConfig) -> MockHost {
    if !config.available {
        return MockHost::unsupported();
    }
    if let Some(reason) = &config.reject {
        return MockHost::rejecting(reason.clone());
    }

    MockHost::new(MockReadings {
        level: config.level,
        charging: config.charging,
        charging_time: config.charging_time_secs(),
        discharging_time: config.discharging_time_secs(),
    })
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| view::draw(f, app.state(), app.theme(), app.help_text()))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }

    app.shutdown();
    Ok(())
}

fn setup_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let path = config.file_path();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();

    Ok(())
}
