//! # Rule — Regras de Produção
//!
//! Uma [`Rule`] liga um **antecedente** (uma [`Condition`]) a um
//! **consequente** (um único padrão):
//!
//! ```text
//! IF (parent (?p) (?x) AND parent (?p) (?y) AND NOT (self (?x) (?y)))
//! THEN sibling (?x) (?y)
//! ```
//!
//! ## Validação
//!
//! Regras são validadas na construção ([`Rule::new`]) e na desserialização.
//! Duas situações são rejeitadas com [`RuleError`]:
//!
//! 1. O consequente usa uma variável que o antecedente não liga em **todos**
//!    os caminhos. Um `OR` liga apenas as variáveis comuns a todas as alternativas.
//! 2. Um `NOT` usa uma variável que nenhuma cláusula positiva anterior ligou
//!    (a negação por falha só faz sentido sobre um padrão ground).
//!
//! Assim uma regra inválida nunca chega aos motores e nunca produz fatos
//! com variáveis soltas.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::pattern;
use crate::error::RuleError;

/// Regra de produção validada. Imutável depois de construída.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct Rule {
    antecedent: Condition,
    consequent: String,
}

/// Forma "crua" usada pelo serde antes da validação.
#[derive(Deserialize)]
struct RawRule {
    #[serde(alias = "if")]
    antecedent: Condition,
    #[serde(alias = "then")]
    consequent: String,
}

impl TryFrom<RawRule> for Rule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        Rule::new(raw.antecedent, raw.consequent)
    }
}

impl Rule {
    /// Cria uma regra, validando o escopo das variáveis.
    ///
    /// # Erros
    ///
    /// - [`RuleError::UnboundConsequent`] — variável do consequente não ligada
    /// - [`RuleError::UnboundNegation`] — `NOT` antes das cláusulas que ligam suas variáveis
    pub fn new(
        antecedent: impl Into<Condition>,
        consequent: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let antecedent = antecedent.into();
        let consequent = consequent.into();

        let bound = bind_scope(&antecedent, &BTreeSet::new())?;
        let unbound: Vec<String> = pattern::variables(&consequent)
            .difference(&bound)
            .cloned()
            .collect();
        if !unbound.is_empty() {
            return Err(RuleError::UnboundConsequent {
                consequent,
                variables: unbound,
            });
        }

        Ok(Self {
            antecedent,
            consequent,
        })
    }

    pub fn antecedent(&self) -> &Condition {
        &self.antecedent
    }

    pub fn consequent(&self) -> &str {
        &self.consequent
    }
}

/// Variáveis garantidamente ligadas depois de satisfazer `cond`,
/// partindo das variáveis já ligadas em `bound`.
fn bind_scope(cond: &Condition, bound: &BTreeSet<String>) -> Result<BTreeSet<String>, RuleError> {
    match cond {
        Condition::Pattern(p) => {
            let mut scope = bound.clone();
            scope.extend(pattern::variables(p));
            Ok(scope)
        }
        Condition::And(children) => {
            let mut scope = bound.clone();
            for child in children {
                scope = bind_scope(child, &scope)?;
            }
            Ok(scope)
        }
        Condition::Or(children) => {
            let mut common: Option<BTreeSet<String>> = None;
            for child in children {
                let scope = bind_scope(child, bound)?;
                common = Some(match common {
                    None => scope,
                    Some(prev) => prev.intersection(&scope).cloned().collect(),
                });
            }
            Ok(common.unwrap_or_else(|| bound.clone()))
        }
        Condition::Not(inner) => {
            let free: Vec<String> = inner.variables().difference(bound).cloned().collect();
            if !free.is_empty() {
                return Err(RuleError::UnboundNegation {
                    clause: inner.to_string(),
                    variables: free,
                });
            }
            Ok(bound.clone())
        }
    }
}

/// Formato `IF <antecedente> THEN <consequente>`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {}", self.antecedent, self.consequent)
    }
}
