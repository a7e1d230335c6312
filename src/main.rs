use clap::Parser;

use greenroom::adapter::inbound::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
