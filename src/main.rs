use std::process::ExitCode;
use tabular_etl::cli;

fn main() -> ExitCode {
    match cli::cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
