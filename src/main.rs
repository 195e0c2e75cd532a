use std::process::ExitCode;

use zentra_smoke::cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    match cli::run_cli().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::output::print_failure(&err);
            ExitCode::FAILURE
        }
    }
}
