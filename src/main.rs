//! Jackpot TUI: pick 10 of 20 numbers and buy a ticket before the daily draw.

mod app;
mod countdown;
mod dispatch;
mod game;
mod geometry;
mod input;
mod records;
mod render;
mod selection;
mod surface;
mod theme;
mod timers;
mod ui;

use anyhow::{Context, Result};
use app::App;
use chrono::NaiveTime;
use clap::{Parser, ValueEnum};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Rules of the session: wallet, price, draw time and message timings.
#[derive(Debug, Clone)]
pub struct LotteryConfig {
    pub starting_credits: u32,
    pub ticket_price: u32,
    pub draw_time: NaiveTime,
    /// How long a validation warning stays up.
    pub message_ttl: Duration,
    /// Length of the purchase confirmation animation.
    pub confirmation_window: Duration,
    /// Quick-pick seed. Random when unset.
    pub seed: Option<u64>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            starting_credits: 500,
            ticket_price: 25,
            draw_time: countdown::DEFAULT_DRAW_TIME,
            message_ttl: Duration::from_secs(3),
            confirmation_window: Duration::from_secs(2),
            seed: None,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(theme) => theme,
        Err(err) => {
            tracing::warn!(%err, "Theme not loaded, using default");
            theme::Theme::default()
        }
    };
    let config = LotteryConfig {
        starting_credits: args.credits,
        draw_time: args.draw_time,
        seed: args.seed,
        ..LotteryConfig::default()
    };
    tracing::info!(?config, "Starting");
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Logs go to a file only; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(std::sync::Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

fn parse_draw_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM ({e})"))
}

/// Number-pick lottery in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "jackpot-tui",
    version,
    about = "Pick 10 of 20 numbers and buy a ticket before the daily draw.",
    long_about = "Jackpot TUI is a single-screen number lottery.\n\n\
        Click balls to pick exactly 10 of the numbers 1-20, then buy a ticket. A countdown \
        shows the time left until the next draw.\n\n\
        CONTROLS:\n  Mouse       Hover and click balls and buttons\n  \
        Arrows/hjkl Move cursor   Space      Toggle ball\n  \
        5           Quick 5       0 / t      Quick 10\n  \
        Enter / b   Buy ticket    r          Reset\n  \
        q / Esc     Quit"
)]
pub struct Args {
    /// Starting balance in KES.
    #[arg(long, default_value = "500", value_name = "KES")]
    pub credits: u32,

    /// Local time of the daily draw.
    #[arg(long, default_value = "17:00", value_name = "HH:MM", value_parser = parse_draw_time)]
    pub draw_time: NaiveTime,

    /// Seed for quick picks (repeatable sessions).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Target render frames per second while animating.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Disable the message fade-in.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (RUST_LOG filters, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
