//! # Módulo Web — Interface HTTP do Motor
//!
//! Expõe o [`Reasoner`](crate::reasoner::Reasoner) para colaboradores
//! externos (por exemplo, um front-end que traduz perguntas em linguagem
//! natural para consultas lógicas). O contrato é deliberadamente estreito:
//! o motor só recebe padrões e fatos bem formados.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Colaborador externo (NL → consulta lógica)              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                               │
//! │  ├── GET  /status     → contagens                       │
//! │  ├── GET  /facts      → fatos base                      │
//! │  ├── POST /facts      → afirma fato                     │
//! │  ├── GET  /rules      → regras                          │
//! │  ├── POST /rules      → adiciona regra                  │
//! │  ├── POST /forward    → encadeamento para frente        │
//! │  ├── POST /ask        → consulta (fato ou padrão)       │
//! │  ├── POST /backchain  → árvore de objetivos             │
//! │  └── POST /reset      → restaura conhecimento do boot   │
//! ├─────────────────────────────────────────────────────────┤
//! │ tower_http: TraceLayer + CorsLayer                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas do motor.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/facts", get(handlers::list_facts).post(handlers::assert_fact))
        .route("/rules", get(handlers::list_rules).post(handlers::add_rule))
        .route("/forward", post(handlers::forward))
        .route("/ask", post(handlers::ask))
        .route("/backchain", post(handlers::backchain))
        .route("/reset", post(handlers::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::EngineConfig;
    use crate::datasets;

    fn app() -> Router {
        let knowledge = datasets::animal_knowledge().unwrap();
        create_router(AppState::new(knowledge, EngineConfig::default()).unwrap())
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = call(app(), "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "rules": 5, "facts": 19 }));
    }

    #[tokio::test]
    async fn test_ask_fact_and_pattern() {
        let (status, body) = call(app(), "POST", "/ask", Some(json!({ "query": "diving_bird penguin" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], json!({ "kind": "fact", "holds": true }));
        assert_eq!(body["message"], "True - fact found in knowledge base");

        let (_, body) = call(app(), "POST", "/ask", Some(json!({ "query": "can_fly (?x)" }))).await;
        assert_eq!(body["message"], "Results: robin, eagle");
        assert_eq!(body["outcome"]["bindings"][0], json!({ "x": "robin" }));
    }

    #[tokio::test]
    async fn test_backchain() {
        let (status, body) = call(app(), "POST", "/backchain", Some(json!({ "hypothesis": "bird opus" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rendered"], "(bird opus OR has_feathers opus)");
        assert_eq!(body["tree"], json!({ "or": ["bird opus", "has_feathers opus"] }));
    }

    #[tokio::test]
    async fn test_invalid_rule_is_rejected() {
        let rule = json!({ "if": "bird (?x)", "then": "eats (?x) (?y)" });
        let (status, body) = call(app(), "POST", "/rules", Some(rule)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not bound"));
    }

    /// Regra e fato adicionados aparecem no fecho; /reset os descarta
    #[tokio::test]
    async fn test_mutation_and_reset() {
        let app = app();
        let rule = json!({ "if": { "and": ["fish (?x)", "can_swim (?x)"] }, "then": "swimmer (?x)" });
        let (status, _) = call(app.clone(), "POST", "/rules", Some(rule)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = call(app.clone(), "POST", "/facts", Some(json!({ "fact": "can_swim shark" }))).await;
        assert_eq!(body["added"], true);

        let (_, body) = call(app.clone(), "POST", "/forward", None).await;
        let facts = body["facts"].as_array().unwrap();
        assert!(facts.contains(&json!("swimmer shark")));
        assert!(facts.contains(&json!("swimmer salmon")));

        let (_, body) = call(app.clone(), "POST", "/reset", None).await;
        assert_eq!(body, json!({ "rules": 5, "facts": 19 }));
    }

    #[tokio::test]
    async fn test_non_ground_fact_is_rejected() {
        let (status, _) = call(app(), "POST", "/facts", Some(json!({ "fact": "bird (?x)" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resource_exhaustion_status() {
        let knowledge = datasets::animal_knowledge().unwrap();
        let engine = EngineConfig {
            max_facts: 20,
            ..EngineConfig::default()
        };
        let app = create_router(AppState::new(knowledge, engine).unwrap());
        let (status, _) = call(app, "POST", "/forward", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_binding_limit_status() {
        let knowledge = datasets::animal_knowledge().unwrap();
        let engine = EngineConfig {
            max_bindings: 2,
            ..EngineConfig::default()
        };
        let app = create_router(AppState::new(knowledge, engine).unwrap());
        let (status, body) = call(app, "POST", "/forward", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("bindings"));
    }
}
