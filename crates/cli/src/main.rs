use anyhow::Result;
use clap::{Parser, Subcommand};
use sched_boundary::commands::{classify_command, explain_command, symbols_command, InputArgs};

/// Subsystem boundary classifier CLI.
///
/// This CLI is a thin wrapper around `boundary-core` (exposed in code as
/// `boundary_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "sched-boundary",
    version,
    about = "Classify subsystem functions for live replacement",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every subsystem function and write the boundary artifacts.
    ///
    /// This will:
    /// - Load `sched_boundary.yaml` and every `*.sched_boundary` record.
    /// - Reconcile them against the linked binary's symbol table.
    /// - Write `sched_boundary_extract.yaml`, `tainted_functions` and
    ///   `interface_fn_ptrs`, or nothing at all if any step fails.
    Classify {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory for the artifacts, relative to the root. Defaults to the root.
        #[arg(long)]
        out_dir: Option<String>,

        /// Emit the summary as JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show which categories a function landed in, and why.
    Explain {
        #[command(flatten)]
        inputs: InputArgs,

        /// Function name as it appears in metadata.
        name: String,

        /// Restrict to the function declared in this file.
        #[arg(long)]
        file: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List subsystem functions found in the linked binary, with local positions.
    Symbols {
        #[command(flatten)]
        inputs: InputArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Classify { inputs, out_dir, json } => {
            classify_command(&inputs, out_dir.as_deref(), json)?
        }
        Command::Explain { inputs, name, file, json } => {
            explain_command(&inputs, &name, file.as_deref(), json)?
        }
        Command::Symbols { inputs, json } => symbols_command(&inputs, json)?,
    }

    Ok(())
}
