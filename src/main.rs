//! candytui: match-three candy puzzle in the terminal.

mod app;
mod input;
mod logging;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use candytui::GameConfig;
use clap::{Parser, ValueEnum};
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        swap_rate: args.swap_rate,
        fall_rate: args.fall_rate,
        fade_step: args.fade_step,
        colors: args.colors,
        seed: args.seed,
    };
    config.validate().context("invalid game options")?;
    info!(?config, "starting");
    let mut app = App::new(config, theme, args.frame_rate)?;
    app.run()?;
    Ok(())
}

/// Match-three candy puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "candytui",
    version,
    about = "Match-three candy puzzle in the terminal. Swap neighbours to line up three or more of a colour.",
    long_about = "candytui is a terminal match-three puzzle.\n\n\
        Select a candy, then an adjacent one, to swap them. A swap that lines up three or more \
        candies of one colour in a row or column clears them; candies above fall down and new ones \
        drop in, which can set off further matches. A swap that matches nothing is undone. The game \
        ends when no swap on the board can make a match.\n\n\
        CONTROLS:\n  Mouse click   Select / swap      Arrows or hjkl  Move cursor\n  Enter/Space   Select / swap      ?               Hint\n  r             Restart (game over) q / Esc         Quit"
)]
pub struct Args {
    /// RNG seed for the board and refills (random when omitted; the seed is shown in the sidebar).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Number of candy colours in play (3..=6). Fewer colours means more matches.
    #[arg(long, default_value = "6", value_name = "N")]
    pub colors: u8,

    /// Fraction of the remaining distance a swapping candy covers per frame (0.01..=1).
    #[arg(long, default_value = "0.3", value_name = "RATE")]
    pub swap_rate: f32,

    /// Fraction of the remaining distance a falling candy covers per frame (0.01..=1, at most swap rate).
    #[arg(long, default_value = "0.25", value_name = "RATE")]
    pub fall_rate: f32,

    /// Opacity (out of 255) a matched candy loses per frame while disappearing.
    #[arg(long, default_value = "15", value_name = "STEP")]
    pub fade_step: u8,

    /// Frames (engine ticks) per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,
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
