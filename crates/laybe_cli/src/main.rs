//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `laybe_core` linkage, configuration and database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use laybe_core::db::migrations::current_user_version;
use laybe_core::db::open_db_with_config;
use laybe_core::{
    init_logging_from_config, ArgumentSortField, CoreConfig, GraphService, PageRequest,
    PropositionSortField,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("laybe_core ping={}", laybe_core::ping());
    println!("laybe_core version={}", laybe_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("laybe_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if init_logging_from_config(&config)? {
        log::info!("event=cli_start module=cli status=ok");
    }

    let conn = open_db_with_config(&config).map_err(|err| err.to_string())?;
    let schema_version = current_user_version(&conn).map_err(|err| err.to_string())?;
    let service = GraphService::try_new(&conn).map_err(|err| err.to_string())?;

    let propositions = service
        .list_propositions(&PageRequest::<PropositionSortField>::new(0, 1))
        .map_err(|err| err.to_string())?;
    let arguments = service
        .list_arguments(&PageRequest::<ArgumentSortField>::new(0, 1))
        .map_err(|err| err.to_string())?;

    let location = config
        .db_path
        .as_deref()
        .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string());
    println!("laybe_core db={location} schema_version={schema_version}");
    println!(
        "laybe_core propositions={} arguments={}",
        propositions.total_count, arguments.total_count
    );
    Ok(())
}
