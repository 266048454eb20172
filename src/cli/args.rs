use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reqgate",
    about = "Check ordered requirements manifests before they reach the install gate.",
    version
)]
pub struct Cli {
    /// Print compiled operator.json and exit.
    #[arg(long, global = true)]
    pub describe: bool,

    /// Print reqgate.v0 JSON Schema and exit.
    #[arg(long, global = true)]
    pub schema: bool,

    /// Suppress witness ledger recording.
    #[arg(long, global = true)]
    pub no_witness: bool,

    /// JSON config file.
    #[arg(long, global = true, env = "REQGATE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a manifest: syntax, duplicates, constraints, license notes.
    Check {
        /// Path to the requirements manifest.
        manifest: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Require a trailing license comment on every requirement.
        #[arg(long)]
        require_license: bool,

        /// Do not report duplicate package names.
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// List requirement entries in file order.
    List {
        /// Path to the requirements manifest.
        manifest: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Deterministically diff two manifests.
    Diff {
        /// First manifest.
        a: PathBuf,

        /// Second manifest.
        b: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Query witness ledger.
    Witness {
        #[command(subcommand)]
        command: WitnessCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum WitnessCommand {
    /// Show all witness records.
    Query {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the last witness record.
    Last {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Count witness records.
    Count {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
