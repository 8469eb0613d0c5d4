use std::process::ExitCode;

fn main() -> ExitCode {
    match protosmith::cli::run_cli() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
