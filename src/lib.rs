pub mod check;
pub mod cli;
pub mod config;
pub mod diff;
pub mod list;
pub mod logging;
pub mod manifest;
pub mod operator;
pub mod refusal;
pub mod schema;
pub mod specifier;
pub mod witness;

use std::path::Path;

use clap::Parser;
use log::warn;
use serde_json::json;

use check::CheckOptions;
use cli::{Cli, Command, CommandResult, ExitCode, WitnessCommand};
use config::Config;
use refusal::{RefusalCode, RefusalEnvelope};

/// Run the reqgate CLI and return an exit code.
pub fn run() -> u8 {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // --describe short-circuits before input validation.
    if cli.describe {
        let op = operator::operator_json();
        println!(
            "{}",
            serde_json::to_string_pretty(&op).expect("operator json serialization cannot fail")
        );
        return ExitCode::Success.into();
    }

    // --schema short-circuits before input validation.
    if cli.schema {
        let s = schema::reqgate_schema();
        println!(
            "{}",
            serde_json::to_string_pretty(&s).expect("schema serialization cannot fail")
        );
        return ExitCode::Success.into();
    }

    let Some(command) = cli.command else {
        eprintln!("reqgate: no command provided. Try --help.");
        return ExitCode::Refusal.into();
    };

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let envelope = RefusalEnvelope::new(
                RefusalCode::Config,
                Some(e.to_string()),
                cli.config
                    .as_ref()
                    .map(|p| json!({ "path": p.display().to_string() })),
            );
            return refuse_config(command, &envelope, cli.no_witness);
        }
    };

    let witness_path = config.witness_path();

    let (name, result, outcome) = match command {
        Command::Check {
            manifest,
            json,
            require_license,
            allow_duplicates,
        } => {
            let options = CheckOptions {
                require_license: require_license || config.require_license,
                allow_duplicates: allow_duplicates || config.allow_duplicates,
            };
            let result = check::execute_check(&manifest, json, &options);
            let outcome = result.outcome("OK", "INVALID");
            ("check", result, outcome)
        }
        Command::List { manifest, json } => {
            let result = list::execute_list(&manifest, json);
            let outcome = result.outcome("OK", "OK");
            ("list", result, outcome)
        }
        Command::Diff { a, b, json } => {
            let result = diff::execute_diff(&a, &b, json);
            let outcome = result.outcome("NO_CHANGES", "CHANGES");
            ("diff", result, outcome)
        }
        // Witness query subcommands do NOT record witness.
        Command::Witness { command } => return dispatch_witness(command, &witness_path),
    };

    if !cli.no_witness {
        record_witness(&witness_path, name, outcome, &result);
    }
    println!("{}", result.output);
    result.exit_code
}

/// Render an `E_CONFIG` refusal the way the requested command renders its
/// own refusals. The ledger falls back to `REQGATE_WITNESS` or the home path.
fn refuse_config(command: Command, envelope: &RefusalEnvelope, no_witness: bool) -> u8 {
    let (name, output) = match command {
        Command::Check { json, .. } => {
            let reason = serde_json::to_value(&envelope.refusal)
                .expect("refusal detail serialization cannot fail");
            ("check", check::CheckReport::refusal(reason).render(json))
        }
        Command::List { json, .. } => ("list", envelope.render("list", json)),
        Command::Diff { json, .. } => ("diff", envelope.render("diff", json)),
        Command::Witness { command } => {
            let json = match command {
                WitnessCommand::Query { json }
                | WitnessCommand::Last { json }
                | WitnessCommand::Count { json } => json,
            };
            println!("{}", envelope.render("witness", json));
            return ExitCode::Refusal.into();
        }
    };

    let result = CommandResult::new(output, ExitCode::Refusal.into(), None);
    if !no_witness {
        record_witness(&Config::default().witness_path(), name, "REFUSAL", &result);
    }
    println!("{}", result.output);
    result.exit_code
}

fn record_witness(path: &Path, command: &str, outcome: &str, result: &CommandResult) {
    let record = witness::WitnessRecord::new(command, outcome, result.manifest_id.clone());
    if let Err(e) = witness::append_witness(path, &record) {
        warn!("witness append to {} failed: {e}", path.display());
    }
}

fn dispatch_witness(command: WitnessCommand, path: &Path) -> u8 {
    let output = match command {
        WitnessCommand::Query { json } => witness::query::execute_query(path, json),
        WitnessCommand::Last { json } => witness::query::execute_last(path, json),
        WitnessCommand::Count { json } => witness::query::execute_count(path, json),
    };
    println!("{output}");
    ExitCode::Success.into()
}
