//! Command implementations for rk-cli

pub mod overrides;
pub mod render;

pub use overrides::run_overrides;
pub use render::run_render;

use rk_boot::{BootLoader, OverrideSources};

use crate::cli::OverrideArgs;

/// Build a loader and the override sources for one invocation.
///
/// Flag values come from the parsed command line rather than a raw argument
/// scan, so `--rkset` is only recognised where clap accepts it.
fn prepare(args: &OverrideArgs) -> (BootLoader, OverrideSources) {
    let loader = BootLoader::new().with_env_prefix(&args.env_prefix);
    let sources = OverrideSources::new()
        .with_process_env()
        .with_flags(args.rkset.iter().cloned());
    (loader, sources)
}
