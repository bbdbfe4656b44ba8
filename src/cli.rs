//! CLI argument parsing via clap.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use termino::command::ColorRequest;
use termino::dispatch::RunMode;
use termino::locator::InstallKind;

/// Change Windows Terminal profile colors from the command line.
#[derive(Debug, Parser)]
#[command(name = "termino", version)]
pub struct Args {
    /// Apply commands here or hand them to a running `termino daemon`.
    #[arg(long = "mode", value_enum, global = true)]
    pub mode: Option<RunMode>,

    /// Which Windows Terminal installation to edit.
    #[arg(long = "install", value_enum, global = true)]
    pub install: Option<InstallKind>,

    /// Path to settings.json (implies `--install explicit` unless another
    /// install kind is given).
    #[arg(long = "settings", global = true)]
    pub settings: Option<PathBuf>,

    /// Path to config file (default: ./termino.toml or ~/.config/termino/termino.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set colors of the default profile.
    Set(SetArgs),
    /// Undoes the previous N commands. If N is not specified, only the most
    /// recent command is undone.
    Undo {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Show the colors of every profile.
    Get,
    /// Work on one profile: by `name:`, `guid:`, `index:`, a bare index, a GUID or a name.
    Profile {
        selector: String,
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Own the settings file and execute commands sent with `--mode out-of-process`.
    Daemon {
        /// Address to listen on (default: `[daemon].address` from config).
        #[arg(long = "listen")]
        listen: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Show this profile's colors.
    Get,
    /// Set this profile's colors.
    Set(SetArgs),
}

#[derive(Debug, Clone, clap::Args)]
#[command(group(
    ArgGroup::new("colors")
        .required(true)
        .multiple(true)
        .args(["tab_color", "background", "foreground"])
))]
pub struct SetArgs {
    /// Sets the tab color
    #[arg(short = 't', long = "tab-color", value_name = "COLOR")]
    pub tab_color: Option<String>,

    /// Sets the background color of the window or pane
    #[arg(short = 'b', long = "background", value_name = "COLOR")]
    pub background: Option<String>,

    /// Sets foreground color of the window or pane
    #[arg(short = 'f', long = "foreground", value_name = "COLOR")]
    pub foreground: Option<String>,

    /// Apply all given colors as one command (undone together).
    #[arg(long = "atomic")]
    pub atomic: bool,
}

impl SetArgs {
    pub fn color_request(&self) -> ColorRequest {
        ColorRequest {
            tab_color: self.tab_color.clone(),
            background: self.background.clone(),
            foreground: self.foreground.clone(),
        }
    }
}
