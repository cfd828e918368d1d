//! # Módulo Inference — Motores de Encadeamento
//!
//! Os dois motores consomem o mesmo modelo de padrões e a mesma árvore de
//! conectivos de [`crate::core`], mas são independentes entre si:
//!
//! | Motor | Entrada | Saída |
//! |-------|---------|-------|
//! | [`forward`] | regras + fatos | todos os fatos implicados (ponto fixo) |
//! | [`backward`] | regras + hipótese | árvore `OR`/`AND`/`NOT` de alternativas |
//!
//! Ambos são síncronos, reentrantes e não guardam estado entre chamadas.

/// Encadeamento para frente (derivação até o ponto fixo).
pub mod forward;

/// Encadeamento para trás (árvore de objetivos).
pub mod backward;

pub use backward::backchain_to_goal_tree;
pub use forward::{forward_chain, ChainReport, ForwardChainer};
