use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use seatwatch::bot::{self, Notifier};
use seatwatch::config::Config;
use seatwatch::portal::slots::SLOTS;
use seatwatch::portal::PortalClient;
use seatwatch::scheduler::{self, SchedulerConfig};
use seatwatch::liveness;

#[derive(Parser)]
#[command(name = "seatwatch")]
#[command(about = "Course seat availability monitor with a bot command channel", long_about = None)]
#[command(version)]
struct Cli {
    /// Seconds between scan cycles
    #[arg(long, default_value_t = 900)]
    interval_secs: u64,

    /// Upper bound in seconds for each command long-poll
    #[arg(long, default_value_t = 5)]
    poll_timeout_secs: u64,

    /// Port for the liveness endpoint
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seatwatch=info")),
        )
        .init();

    let config = Config::from_env().context("incomplete configuration, refusing to start")?;

    let liveness_addr = liveness::spawn(cli.port)?;
    println!("{} Liveness endpoint on {liveness_addr}", "✓".green().bold());

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed))
            .context("failed to install shutdown handler")?;
    }

    let (mut channel, notifier) = bot::telegram(&config.bot_token, config.operator_chat_id)?;
    let portal = PortalClient::new(
        &config.portal_base_url,
        &config.portal_username,
        &config.portal_password,
    );

    let scheduler_config = SchedulerConfig {
        scan_interval: Duration::from_secs(cli.interval_secs),
        poll_timeout: Duration::from_secs(cli.poll_timeout_secs),
    };

    notifier.notify("🤖 Bot is running. Send /start to begin monitoring.");
    println!("{} Monitoring loop started", "✓".green().bold());

    let operator_chat_id = config.operator_chat_id;
    let is_operator = move |chat_id: i64| chat_id == operator_chat_id;
    scheduler::run(
        &mut channel,
        &portal,
        &notifier,
        &SLOTS,
        &is_operator,
        scheduler_config,
        &shutdown,
    );

    println!("{} Shutting down", "─".dimmed());
    Ok(())
}
