//! wizado-waybar: add the wizado status module to a Waybar config

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use wizado_waybar::waybar::placement::FlatList;
use wizado_waybar::waybar::{PlacementPolicy, MODULE_ID};

mod commands;

#[derive(Parser)]
#[command(name = "wizado-waybar")]
#[command(about = "Add the wizado module to your Waybar config", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the module into the bar layout and write its definition
    Patch {
        /// Waybar config file (default: ~/.config/waybar/config.jsonc, then config)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Show the patched config without writing it
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Copy the original config to <file>.bak-<timestamp> first
        #[arg(long)]
        backup: bool,

        /// Restart Waybar after writing
        #[arg(long)]
        reload: bool,

        /// Never use a drawer group, always a flat module list
        #[arg(long)]
        no_drawer: bool,

        /// Flat list used when there is no drawer group
        #[arg(long, value_enum, default_value = "right")]
        list: FlatList,

        /// Place after the Omarchy menu button in modules-left
        #[arg(long, conflicts_with_all = ["no_drawer", "list"])]
        omarchy_left: bool,

        /// Module identifier
        #[arg(long, default_value = MODULE_ID)]
        module: String,

        /// Terminal prefix for the click action (detected if omitted)
        #[arg(long)]
        terminal: Option<String>,

        /// Menu program opened on click
        #[arg(long)]
        menu: Option<PathBuf>,

        /// Status command polled by Waybar
        #[arg(long)]
        exec: Option<String>,

        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show where the module currently sits
    Show {
        /// Waybar config file (default: ~/.config/waybar/config.jsonc, then config)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Module identifier
        #[arg(long, default_value = MODULE_ID)]
        module: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the terminal command prefix the click action will use
    Terminal {
        /// List every known terminal and whether it is installed
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Patch {
            config,
            dry_run,
            backup,
            reload,
            no_drawer,
            list,
            omarchy_left,
            module,
            terminal,
            menu,
            exec,
            interval,
        } => {
            if dry_run {
                println!("{}", "(DRY-RUN MODE - no changes will be made)".blue());
            }

            let policy = if omarchy_left {
                PlacementPolicy::omarchy_left()
            } else {
                PlacementPolicy {
                    use_drawer: !no_drawer,
                    fallback_list: list,
                    ..PlacementPolicy::default()
                }
            };

            let options = commands::patch::PatchOptions {
                config,
                module_id: module,
                policy,
                terminal,
                menu,
                exec,
                interval,
                dry_run,
                backup,
                reload,
            };
            commands::patch::execute(&options)?;
        }

        Commands::Show {
            config,
            module,
            json,
        } => {
            commands::show::execute(config.as_deref(), &module, json)?;
        }

        Commands::Terminal { verbose } => {
            commands::terminal::execute(verbose);
        }
    }

    Ok(())
}
