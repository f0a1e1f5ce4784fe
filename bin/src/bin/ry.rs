use clap::Parser;
use ry_bin::{run, Cli};
use ry_log::LogConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match ry_log::init(LogConfig {
        log_file: cli.log_file.clone(),
        stdout: Some(false),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(&cli, &mut stdout) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
