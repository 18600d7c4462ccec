use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use timeblock_core::recurrence::resolve;
use timeblock_core::store::commit_series;
use timeblock_core::{MemoryStore, RecurrenceScope, Series, SeriesMutation, SeriesMutationCommand, TaskDefinition};

use super::{print_json, read_json, CmdResult};

#[derive(Subcommand)]
pub enum RecurrenceAction {
    /// Turn a scoped edit or delete into series commands
    Resolve {
        /// JSON file with the series
        #[arg(long)]
        series: PathBuf,
        /// Occurrence date the user acted on
        #[arg(long)]
        anchor: NaiveDate,
        /// only-this, this-and-future or all
        #[arg(long)]
        scope: RecurrenceScope,
        /// Delete instead of edit
        #[arg(long, conflicts_with = "edit", required_unless_present = "edit")]
        delete: bool,
        /// JSON file with the edited task definition
        #[arg(long)]
        edit: Option<PathBuf>,
    },
    /// Apply resolved commands to a store snapshot, all or nothing
    Apply {
        /// JSON store snapshot, rewritten on success
        #[arg(long)]
        store: PathBuf,
        /// JSON file with the commands from `resolve`
        #[arg(long)]
        commands: PathBuf,
    },
}

pub fn run(action: RecurrenceAction) -> CmdResult {
    match action {
        RecurrenceAction::Resolve {
            series,
            anchor,
            scope,
            delete,
            edit,
        } => {
            let series: Series = read_json(&series)?;
            let mutation = match edit {
                Some(path) if !delete => SeriesMutation::Edit(read_json::<TaskDefinition>(&path)?),
                _ => SeriesMutation::Delete,
            };
            let commands = resolve(&series, anchor, scope, mutation)?;
            print_json(&commands)?;
        }
        RecurrenceAction::Apply { store: path, commands } => {
            let mut store: MemoryStore = read_json(&path)?;
            let commands: Vec<SeriesMutationCommand> = read_json(&commands)?;
            commit_series(&mut store, &commands)?;
            std::fs::write(&path, serde_json::to_string_pretty(&store)?)?;
            println!("applied {} command(s)", commands.len());
        }
    }
    Ok(())
}
