//! # Erros do Motor de Produção
//!
//! Dois grupos de erro, separados pelo momento em que aparecem:
//!
//! | Tipo | Quando | Exemplo |
//! |------|--------|---------|
//! | [`RuleError`] | construção da regra | consequente usa `(?z)` que o antecedente não liga |
//! | [`EngineError`] | execução | limite de fatos ou de bindings excedido, fato com variáveis |
//!
//! A falha de um casamento de padrão **não** é erro: é `None` em
//! [`match_pattern`](crate::core::match_pattern) e apenas poda um ramo da busca.

use thiserror::Error;

/// Regra mal definida, detectada em [`Rule::new`](crate::core::Rule::new).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// O consequente menciona variáveis que nem todo caminho do antecedente liga.
    #[error("consequent `{consequent}` uses variables not bound by the antecedent: {}", .variables.join(", "))]
    UnboundConsequent {
        consequent: String,
        variables: Vec<String>,
    },

    /// Um `NOT` usa variáveis ainda não ligadas pelas cláusulas positivas anteriores.
    #[error("negated clause `{clause}` uses variables not bound by preceding clauses: {}", .variables.join(", "))]
    UnboundNegation { clause: String, variables: Vec<String> },
}

/// Erros de execução dos motores e da fachada [`Reasoner`](crate::reasoner::Reasoner).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidRule(#[from] RuleError),

    /// `NOT` avaliado com variáveis ainda livres (ordem das cláusulas incorreta).
    #[error("negated clause `{clause}` still has unbound variables at evaluation time")]
    UnboundNegation { clause: String },

    /// Tentativa de afirmar um fato que contém variáveis.
    #[error("fact `{fact}` is not ground")]
    NotGround { fact: String },

    /// O conjunto de fatos ultrapassou o limite configurado.
    #[error("fact set exceeded the limit of {limit} facts")]
    ResourceExhausted { limit: usize },

    /// O join de uma regra gerou bindings demais em uma única varredura.
    #[error("rule `{rule}` produced more than {limit} bindings in one sweep")]
    SearchExhausted { rule: String, limit: usize },
}
