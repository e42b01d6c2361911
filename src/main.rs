use clap::Parser;
use slak::cli::{self, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .init();

    if let Err(err) = cli::run(config).await {
        cli::die(1, &format!("slak: {err}"));
    }
}
