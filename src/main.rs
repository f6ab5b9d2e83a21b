use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = edgemgmt::cli::Cli::parse();
    if let Err(e) = edgemgmt::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
