//! # Handlers HTTP — Os Endpoints do Motor
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`]. Todas as respostas são JSON.
//!
//! | Handler | Método | Rota | Retorno |
//! |---------|--------|------|---------|
//! | `status` | GET | `/status` | contagem de regras e fatos |
//! | `list_facts` | GET | `/facts` | fatos base |
//! | `assert_fact` | POST | `/facts` | fato adicionado? |
//! | `list_rules` | GET | `/rules` | regras |
//! | `add_rule` | POST | `/rules` | regra validada (201) |
//! | `forward` | POST | `/forward` | fecho + estatísticas |
//! | `ask` | POST | `/ask` | resultado da consulta + mensagem |
//! | `backchain` | POST | `/backchain` | árvore de objetivos |
//! | `reset` | POST | `/reset` | volta ao conhecimento do boot |
//!
//! ## Erros
//!
//! Erros do motor viram `{ "error": "..." }` com status 400, exceto
//! [`EngineError::ResourceExhausted`] e [`EngineError::SearchExhausted`] (422).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::core::{Condition, FactSet, Rule};
use crate::error::EngineError;
use crate::reasoner::{QueryOutcome, Reasoner};

/// Erro devolvido pelos handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("background task failed: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Engine(EngineError::ResourceExhausted { .. } | EngineError::SearchExhausted { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Engine(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self, status = %status, "Requisição rejeitada");
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Resposta de `/status` e `/reset`.
#[derive(Serialize)]
pub struct StatusResponse {
    pub rules: usize,
    pub facts: usize,
}

#[derive(Deserialize)]
pub struct FactRequest {
    pub fact: String,
}

#[derive(Serialize)]
pub struct AssertResponse {
    pub fact: String,
    /// `false` quando o fato já existia.
    pub added: bool,
}

/// Corpo de `POST /rules` — aceita `antecedent`/`consequent` ou `if`/`then`.
#[derive(Deserialize)]
pub struct RuleRequest {
    #[serde(alias = "if")]
    pub antecedent: Condition,
    #[serde(alias = "then")]
    pub consequent: String,
}

#[derive(Serialize)]
pub struct ForwardResponse {
    /// Fatos base seguidos dos derivados.
    pub facts: FactSet,
    pub derived: usize,
    pub sweeps: usize,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub outcome: QueryOutcome,
    /// Versão legível do resultado (ex: `Results: penguin, whale`).
    pub message: String,
}

#[derive(Deserialize)]
pub struct BackchainRequest {
    pub hypothesis: String,
}

#[derive(Serialize)]
pub struct BackchainResponse {
    pub hypothesis: String,
    pub tree: Condition,
    /// Árvore renderizada, ex: `(opus is a bird OR opus has feathers)`.
    pub rendered: String,
}

/// Executa `job` sobre uma cópia da sessão, fora do runtime async.
///
/// O read lock é liberado antes do trabalho começar.
async fn with_snapshot<T, F>(state: &AppState, job: F) -> Result<T, ApiError>
where
    F: FnOnce(Reasoner) -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    let snapshot = state.reasoner.read().clone();
    let result = tokio::task::spawn_blocking(move || job(snapshot))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(result?)
}

fn status_of(reasoner: &Reasoner) -> StatusResponse {
    StatusResponse {
        rules: reasoner.rules().len(),
        facts: reasoner.facts().len(),
    }
}

/// GET `/status`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(status_of(&state.reasoner.read()))
}

/// GET `/facts` — apenas os fatos base, na ordem de inserção.
pub async fn list_facts(State(state): State<AppState>) -> Json<FactSet> {
    Json(state.reasoner.read().facts().clone())
}

/// POST `/facts` — afirma um fato ground.
pub async fn assert_fact(
    State(state): State<AppState>,
    Json(req): Json<FactRequest>,
) -> Result<Json<AssertResponse>, ApiError> {
    let added = state.reasoner.write().assert_fact(req.fact.as_str())?;
    tracing::info!(fact = %req.fact, added, "Fato afirmado");
    Ok(Json(AssertResponse {
        fact: req.fact,
        added,
    }))
}

/// GET `/rules`
pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.reasoner.read().rules().to_vec())
}

/// POST `/rules` — valida e adiciona uma regra.
pub async fn add_rule(
    State(state): State<AppState>,
    Json(req): Json<RuleRequest>,
) -> Result<(StatusCode, Json<Rule>), ApiError> {
    let rule = Rule::new(req.antecedent, req.consequent).map_err(EngineError::from)?;
    tracing::info!(rule = %rule, "Regra adicionada");
    state.reasoner.write().add_rule(rule.clone());
    Ok((StatusCode::CREATED, Json(rule)))
}

/// POST `/forward` — fecho completo dos fatos base.
pub async fn forward(State(state): State<AppState>) -> Result<Json<ForwardResponse>, ApiError> {
    let report = with_snapshot(&state, |reasoner| reasoner.closure()).await?;
    Ok(Json(ForwardResponse {
        facts: report.facts,
        derived: report.derived,
        sweeps: report.sweeps,
    }))
}

/// POST `/ask` — pertinência (consulta ground) ou busca por padrão.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = req.query.clone();
    let outcome = with_snapshot(&state, move |reasoner| reasoner.ask(&query)).await?;
    Ok(Json(QueryResponse {
        query: req.query,
        message: outcome.to_string(),
        outcome,
    }))
}

/// POST `/backchain` — árvore de objetivos para uma hipótese.
pub async fn backchain(
    State(state): State<AppState>,
    Json(req): Json<BackchainRequest>,
) -> Result<Json<BackchainResponse>, ApiError> {
    let hypothesis = req.hypothesis.clone();
    let tree = with_snapshot(&state, move |reasoner| Ok(reasoner.explain(&hypothesis))).await?;
    Ok(Json(BackchainResponse {
        hypothesis: req.hypothesis,
        rendered: tree.to_string(),
        tree,
    }))
}

/// POST `/reset` — descarta regras e fatos adicionados desde o boot.
pub async fn reset(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let fresh = state.baseline.to_reasoner(state.engine.clone())?;
    let status = status_of(&fresh);
    *state.reasoner.write() = fresh;
    tracing::info!(rules = status.rules, facts = status.facts, "Sessão reiniciada");
    Ok(Json(status))
}
