use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credscope_core::backend::{HttpBackendClient, PayloadSource, StaticPayload};
use credscope_core::dashboard::{self, DashboardState, FailurePolicy};
use credscope_core::domain::view_model::ViewModel;
use credscope_core::render;

#[derive(Debug, Parser)]
#[command(name = "credscope", about = "Credit rating dashboard for a company ticker")]
struct Args {
    /// Ticker to look up (e.g. AAPL). Without it, tickers are read from stdin.
    #[arg(long)]
    symbol: Option<String>,

    /// Normalize a saved backend response instead of calling the backend.
    #[arg(long, value_name = "FILE")]
    payload: Option<PathBuf>,

    /// Print the view model as JSON instead of the text dashboard.
    #[arg(long)]
    json: bool,

    /// What to show after a failed search: `clear` or `retain`.
    /// Defaults to DASHBOARD_FAILURE_POLICY.
    #[arg(long)]
    failure_policy: Option<FailurePolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = credscope_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let policy = args.failure_policy.unwrap_or(settings.failure_policy);
    let mut state = DashboardState::new(policy);

    let source: Box<dyn PayloadSource> = match &args.payload {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read payload file {}", path.display()))?;
            Box::new(StaticPayload::from_text(text))
        }
        None => Box::new(HttpBackendClient::from_settings(&settings)?),
    };

    if args.payload.is_some() || args.symbol.is_some() {
        let symbol = args.symbol.as_deref().unwrap_or_default();
        let vm = dashboard::run_search(source.as_ref(), symbol, &mut state).await;
        print_view(&vm, args.json)?;
        if vm.has_error() {
            anyhow::bail!("dashboard search for `{symbol}` failed");
        }
        return Ok(());
    }

    interactive(source.as_ref(), &mut state, args.json).await
}

async fn interactive(
    source: &dyn PayloadSource,
    state: &mut DashboardState,
    json: bool,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!(policy = %state.policy(), "reading tickers from stdin");
    loop {
        stdout.write_all(b"ticker> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let Some(symbol) = parse_submission(&line) else {
            continue;
        };
        if matches!(symbol, "quit" | "exit") {
            break;
        }

        let vm = dashboard::run_search(source, symbol, state).await;
        print_view(&vm, json)?;
    }

    Ok(())
}

fn parse_submission(line: &str) -> Option<&str> {
    let symbol = line.trim();
    (!symbol.is_empty()).then_some(symbol)
}

fn print_view(vm: &ViewModel, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(vm)?);
    } else {
        println!("{}", render::render_text(vm));
    }
    Ok(())
}

fn init_sentry(settings: &credscope_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
