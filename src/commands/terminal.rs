//! Terminal command - Show which terminal the click action will use

use owo_colors::OwoColorize;

use wizado_waybar::terminal::{detect_terminal, exec_flag, find_in_path, TERMINALS};

/// Execute the terminal command
pub fn execute(verbose: bool) {
    if verbose {
        for name in TERMINALS {
            match find_in_path(name) {
                Some(path) => println!(
                    "  {} {} ({} {})",
                    "✓".green(),
                    path.display(),
                    name,
                    exec_flag(name)
                ),
                None => println!("  {} {}", "✗".dimmed(), name.dimmed()),
            }
        }
        println!();
    }

    println!("{}", detect_terminal());
}
