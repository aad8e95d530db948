use std::process::ExitCode;

fn main() -> ExitCode {
    ledgerdesk::init();
    match ledgerdesk::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "shell terminated");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
