use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::BufReader;

use review_qa::core::config::{AppConfig, AppPaths};
use review_qa::qa::{run_repl, warm_model};
use review_qa::rag::{build_vector_store, StoreParams};
use review_qa::state::AppState;

enum Command {
    Ask,
    Build,
}

fn parse_command() -> anyhow::Result<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(Command::Ask),
        [cmd] if cmd == "build" => Ok(Command::Build),
        _ => bail!("usage: review-qa [build]"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = parse_command()?;
    let (paths, loaded) = AppState::load_config(Arc::new(AppPaths::new()))?;
    review_qa::logging::init(&paths);
    review_qa::logging::emit_startup_warnings(&loaded.warnings);
    let config = loaded.config;

    match command {
        Command::Build => build(&paths, &config).await,
        Command::Ask => ask(paths, config).await,
    }
}

async fn build(paths: &AppPaths, config: &AppConfig) -> anyhow::Result<()> {
    let params = StoreParams::from_config(config, paths);
    if params.store_exists() {
        println!("Vector store exists. Nothing to do.");
        return Ok(());
    }

    println!("No vector store found. Building from CSV (this may take time)...");
    let llm = AppState::build_provider(config)?;
    build_vector_store(&params, llm.as_ref())
        .await
        .context("Failed to build vector store")?;
    println!("Build complete.");
    Ok(())
}

async fn ask(paths: Arc<AppPaths>, config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::initialize(paths, config).await?;

    if state.config.warmup.enabled {
        warm_model(
            state.llm.clone(),
            &state.config.llm.model,
            state.config.warmup.grace_period(),
        )
        .await;
    }

    let mut session = state.session();
    let stdin = BufReader::new(tokio::io::stdin());
    run_repl(&mut session, stdin, tokio::io::stdout())
        .await
        .context("Terminal I/O failed")?;

    Ok(())
}
