//! Render command implementation

use std::path::Path;

use colored::Colorize;
use rk_boot::{Rendered, read_local_file};
use rk_override::MergeReport;

use crate::cli::OverrideArgs;
use crate::error::Result;

/// Run the render command
pub fn run_render(file: &Path, args: &OverrideArgs, preserve_case: bool, json: bool) -> Result<()> {
    let raw = read_local_file(file)?;
    let (loader, sources) = super::prepare(args);
    let loaded = loader
        .lowercase_keys(!preserve_case)
        .load_tree(&raw, &sources)?;

    for overrides in [&loaded.env, &loaded.flags] {
        if let Some(error) = overrides.error() {
            warn(&error.to_string());
        }
    }
    report_discards("environment", &loaded.env_report);
    report_discards("flag", &loaded.flag_report);

    let rendered = Rendered(&loaded.tree);
    let output = if json {
        serde_json::to_string_pretty(&rendered)?
    } else {
        serde_yaml::to_string(&rendered)?
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn report_discards(source: &str, report: &MergeReport) {
    for discarded in &report.discarded {
        warn(&format!(
            "{source} override '{}' ignored: {}",
            discarded.path, discarded.reason
        ));
    }
}

fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
