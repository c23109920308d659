pub mod apple;
pub mod canonical;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod report;
pub mod setops;
pub mod spotify;
pub mod youtube;

use clap::Parser;

pub async fn run() -> anyhow::Result<()> {
    cli::run(cli::Cli::parse()).await
}
