//! # Production Engine — Motor de Inferência Simbólica
//!
//! Motor de regras de produção sobre fatos textuais:
//!
//! - **Encadeamento para frente**: deriva todos os fatos implicados pelas
//!   regras até o ponto fixo ([`inference::forward_chain`])
//! - **Encadeamento para trás**: constrói a árvore de alternativas para
//!   provar ou assumir uma hipótese ([`inference::backchain_to_goal_tree`])
//!
//! ## Camadas
//!
//! ```text
//! core        padrões, bindings, conectivos, regras, fatos
//!   └── inference   forward / backward
//!         └── reasoner    consultas (fato ou padrão) sobre o fecho
//!               └── web         API HTTP (axum)
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! use production_engine::core::{Condition, Rule};
//! use production_engine::inference::forward_chain;
//!
//! let rule = Rule::new(
//!     Condition::and(["(?x) beats (?y)", "(?y) beats (?z)"]),
//!     "(?x) beats (?z)",
//! )
//! .unwrap();
//!
//! let facts = forward_chain(&[rule], &["a beats b", "b beats c"]).unwrap();
//! assert_eq!(facts, vec!["a beats b", "b beats c", "a beats c"]);
//! ```

pub mod config;
pub mod core;
pub mod datasets;
pub mod error;
pub mod inference;
pub mod loader;
pub mod reasoner;
pub mod web;

pub use error::{EngineError, RuleError};
