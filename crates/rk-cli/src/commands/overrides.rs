//! Overrides command implementation

use colored::Colorize;
use rk_override::Overrides;

use crate::cli::OverrideArgs;
use crate::error::Result;

/// Run the overrides command
pub fn run_overrides(args: &OverrideArgs) -> Result<()> {
    let (loader, sources) = super::prepare(args);
    let (env, flags) = loader.collect(&sources);

    print_source(
        &format!("Environment ({}_*)", loader.env_prefix()),
        &env,
    );
    println!();
    print_source("Flags (--rkset)", &flags);
    Ok(())
}

fn print_source(title: &str, overrides: &Overrides) {
    println!("{}", title.bold());

    if overrides.is_empty() {
        println!("  {}", "none".dimmed());
        return;
    }

    for entry in overrides.entries() {
        println!("  {} {}", "from".dimmed(), entry);
    }
    for assignment in overrides.assignments() {
        println!(
            "  {} = {}",
            assignment.path.to_string().cyan(),
            assignment.value.green()
        );
    }
    if let Some(error) = overrides.error() {
        for failure in &error.errors {
            println!("  {} {}", "skipped:".yellow().bold(), failure);
        }
    }
}
