use clap::{Parser, Subcommand, ValueEnum};
use hutcam::engine::ViewMode;
use hutcam::model::{DayKey, Period};

#[derive(Parser, Debug)]
#[command(name = "hutcam")]
#[command(about = "Hutcam snapshot viewer CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one day's snapshot index and print it grouped by period
    Day(DayArgs),
    /// Open the viewer at a position and step through the sequence
    Walk(WalkArgs),
    /// Show the latest snapshot per camera and how stale it is
    Latest,
}

#[derive(clap::Args, Debug)]
pub struct DayArgs {
    /// Day to list (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<DayKey>,
}

#[derive(clap::Args, Debug)]
pub struct WalkArgs {
    /// Day to open at (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<DayKey>,

    /// Period to open at
    #[arg(long, default_value = "early")]
    pub period: Period,

    /// Camera index within the period
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Number of steps to take after opening
    #[arg(long, default_value_t = 1)]
    pub steps: u32,

    /// Step backward instead of forward
    #[arg(long)]
    pub back: bool,

    /// Browsing context to run in
    #[arg(long, value_enum, default_value_t = ModeArg::History)]
    pub mode: ModeArg,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    Latest,
    History,
}

impl From<ModeArg> for ViewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Latest => ViewMode::Latest,
            ModeArg::History => ViewMode::History,
        }
    }
}
