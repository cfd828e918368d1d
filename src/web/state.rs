//! # Estado da Aplicação Web
//!
//! ```text
//! AppState
//!  ├── reasoner: Arc<RwLock<Reasoner>>   sessão atual (regras + fatos base)
//!  ├── baseline: Arc<Knowledge>          conhecimento carregado no boot
//!  └── engine:   EngineConfig            usado ao recriar a sessão (/reset)
//! ```
//!
//! Consultas pegam um read lock apenas pelo tempo de clonar a sessão;
//! o encadeamento roda fora do lock (veja `handlers::with_snapshot`).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::loader::Knowledge;
use crate::reasoner::Reasoner;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Sessão de consultas, protegida por `RwLock`.
    pub reasoner: Arc<RwLock<Reasoner>>,
    /// Conhecimento original, restaurado por `POST /reset`.
    pub baseline: Arc<Knowledge>,
    pub engine: EngineConfig,
}

impl AppState {
    /// Cria o estado a partir do conhecimento carregado.
    pub fn new(baseline: Knowledge, engine: EngineConfig) -> Result<Self, EngineError> {
        let reasoner = baseline.to_reasoner(engine.clone())?;
        Ok(Self {
            reasoner: Arc::new(RwLock::new(reasoner)),
            baseline: Arc::new(baseline),
            engine,
        })
    }
}
