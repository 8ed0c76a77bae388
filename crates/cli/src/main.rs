use std::process::ExitCode;

fn main() -> ExitCode {
    leasey_cli::init_logging();
    leasey_cli::run()
}
