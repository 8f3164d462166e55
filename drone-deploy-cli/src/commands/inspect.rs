//! Inspect command - show how the selected files would be uploaded.

use clap::Args;
use drone_deploy::upload::TracingSink;

use super::common::{resolve_selection, SelectionArgs};
use crate::error::CliError;

/// Arguments for the inspect command.
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let config = resolve_selection(&args.selection)?;
    let plan = drone_deploy::inspect(&config, &TracingSink)?;

    println!(
        "{} artifact(s), policy {}",
        plan.artifacts.len(),
        plan.forest.policy()
    );
    print!("{}", plan.describe());
    Ok(())
}
