//! # Módulo Core — Tipos Fundamentais do Motor
//!
//! Tudo no motor de produção gira em torno destes tipos:
//!
//! - [`Token`] / [`Bindings`] — padrões tokenizados e substituições de variáveis
//! - [`Condition`] — árvore de conectivos (`AND`, `OR`, `NOT`, padrão)
//! - [`Rule`] — antecedente + consequente, validados na construção
//! - [`FactSet`] — fatos ground, ordenados e sem duplicatas
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use production_engine::core::{match_pattern, populate, Condition, Rule};
//!
//! let rule = Rule::new(
//!     Condition::and(["(?x) beats (?y)", "(?y) beats (?z)"]),
//!     "(?x) beats (?z)",
//! )
//! .unwrap();
//!
//! let b = match_pattern("(?x) beats (?y)", "flush beats straight").unwrap();
//! assert_eq!(populate(rule.consequent(), &b), "flush beats (?z)");
//! ```

/// Sub-módulo com tokens, [`Bindings`], `match` e `populate`.
pub mod pattern;

/// Sub-módulo com a árvore de conectivos [`Condition`].
pub mod condition;

/// Sub-módulo com [`Rule`] e sua validação.
pub mod rule;

/// Sub-módulo com a base de fatos [`FactSet`].
pub mod fact_set;

// Re-exports para conveniência — permite usar `crate::core::Rule` diretamente.
pub use condition::Condition;
pub use fact_set::FactSet;
pub use pattern::{
    is_ground, match_pattern, match_with, normalize, populate, tokenize, variables, Bindings,
    Token,
};
pub use rule::Rule;
