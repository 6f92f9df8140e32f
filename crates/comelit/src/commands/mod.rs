//! Command dispatch: bridges CLI args -> core clients -> output formatting.

pub mod bridge;
pub mod vedo;

use comelit_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Bridge(args) => bridge::handle(args, global, cfg).await,
        Command::Vedo(args) => vedo::handle(args, global, cfg).await,
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
