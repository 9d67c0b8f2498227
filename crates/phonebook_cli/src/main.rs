//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `phonebook_core` linkage, configuration and database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use phonebook_core::db::open_db;
use phonebook_core::{init_logging, CoreConfig, Executor};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("phonebook_core ping={}", phonebook_core::ping());
    println!("phonebook_core version={}", phonebook_core::core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("db open failed ({}): {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    println!("db path={}", config.db_path.display());

    let executor = Executor::new(&conn);
    for table in ["users", "contacts"] {
        match executor.fetch_one::<(i64,)>(&format!("SELECT COUNT(*) FROM {table};"), &[]) {
            Ok((count,)) => println!("{table} count={count}"),
            Err(err) => {
                log::error!("event=cli_probe module=cli status=error table={table} error={err}");
                eprintln!("{table} probe failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
