use std::io::IsTerminal;

use clap::Parser;
use fraudwatch::adapter::inbound::cli::command::{Cli, ColorChoice};
use fraudwatch::adapter::inbound::cli::{self, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let args = Cli::parse();

    let color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal(),
    };
    output::configure(output::OutputConfig::new(args.json, args.quiet).with_color(color));

    if let Err(e) = cli::execute(&args).await {
        output::error(&e.user_message());
        std::process::exit(1);
    }
}
