use std::process::ExitCode;

fn main() -> ExitCode {
    gitray::cli::run()
}
