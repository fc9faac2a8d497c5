use clap::Parser;
use runway_wind::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    if let Err(error) = runtime.block_on(cli::run(args)) {
        eprintln!("Error: {:#}", error);
        if let Some(domain_error) = error.downcast_ref::<runway_wind::RunwayWindError>() {
            eprintln!("{}", domain_error.user_message());
        }
        process::exit(1);
    }
}
