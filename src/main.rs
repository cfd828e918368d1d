//! # Production Engine — Binário
//!
//! ```bash
//! # Servidor HTTP (porta 3000 por padrão)
//! cargo run
//!
//! # Demonstração com os conjuntos embutidos
//! cargo run -- demo
//!
//! # Logs detalhados (cada regra disparada)
//! RUST_LOG=debug cargo run -- demo
//! ```
//!
//! O servidor lê regras e fatos de `PRODUCTION_KNOWLEDGE`
//! (padrão `data/knowledge.json`); sem o arquivo, usa a base de animais embutida.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use production_engine::config::ServerConfig;
use production_engine::datasets;
use production_engine::inference::{backchain_to_goal_tree, forward_chain};
use production_engine::loader;
use production_engine::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controla o nível; padrão "info".
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().nth(1).as_deref() == Some("demo") {
        return demo();
    }

    let config = ServerConfig::from_env();
    tracing::info!(addr = %config.addr, knowledge = %config.knowledge_path.display(), "Production Engine — Starting...");

    let knowledge = loader::load_knowledge(&config.knowledge_path)?;
    let state = AppState::new(knowledge, config.engine.clone())?;

    // Valida o conhecimento de boot rodando o fecho uma vez.
    let report = state.reasoner.read().closure()?;
    tracing::info!(facts = report.facts.len(), derived = report.derived, "Conhecimento pronto");

    let app = web::create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("Server running at http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Roda os cenários embutidos e imprime os resultados.
fn demo() -> Result<()> {
    let transitive = [datasets::transitive_rule()?];
    let poker = forward_chain(&transitive, &datasets::poker_data())?;
    println!("poker: {} facts", poker.len());

    let family = datasets::family_rules()?;
    let simpsons = forward_chain(&family, &datasets::simpsons_data())?;
    println!("simpsons: {} facts", simpsons.len());

    let black = forward_chain(&family, &datasets::black_family_data())?;
    let cousins: Vec<&String> = black.iter().filter(|f| f.contains("cousin")).collect();
    println!("black family cousins: {}", cousins.len());
    for cousin in cousins {
        println!("  {cousin}");
    }

    let zookeeper = datasets::zookeeper_rules()?;
    let tree = backchain_to_goal_tree(&zookeeper, "opus is a penguin");
    println!("goal tree: {tree}");

    Ok(())
}
