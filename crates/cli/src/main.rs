use std::process::ExitCode;

fn main() -> ExitCode {
    souschef_cli::run()
}
