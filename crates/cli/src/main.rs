use std::process::ExitCode;

fn main() -> ExitCode {
    salespulse_cli::run()
}
