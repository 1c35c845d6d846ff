use clap::Parser;
use folio_chat::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Chat => cli::chat::run().await,
        Command::Ask(args) => cli::chat::ask(args).await,
        Command::Usage => cli::store::usage().await,
        Command::Clear => cli::store::clear().await,
    }
}
