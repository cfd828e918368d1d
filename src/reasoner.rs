//! # Reasoner — Fachada de Consultas
//!
//! O [`Reasoner`] é o ponto de contato entre o motor e quem o consulta
//! (a camada web, um front-end de linguagem natural, a CLI de demonstração).
//! Ele guarda as regras e os fatos **base** de uma sessão e responde a
//! dois tipos de pergunta:
//!
//! ```text
//! ask("bird robin")        → fato ground: pertence ao fecho dos fatos?
//! ask("can_swim (?x)")     → padrão: quais bindings o fecho satisfaz?
//! explain("opus is a bird") → árvore de objetivos (encadeamento para trás)
//! ```
//!
//! O fecho (encadeamento para frente) é recalculado a cada consulta — não
//! há cache entre chamadas, então o resultado sempre reflete as regras e
//! fatos atuais.

use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::core::{is_ground, match_pattern, normalize, Bindings, Condition, FactSet, Rule};
use crate::error::EngineError;
use crate::inference::{backchain_to_goal_tree, ChainReport, ForwardChainer};

/// Resultado de [`Reasoner::ask`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Consulta vazia.
    NoQuery,
    /// Consulta ground: teste exato de pertinência no fecho.
    Fact { holds: bool },
    /// Consulta com variáveis: um binding por fato do fecho que casa.
    Pattern { bindings: Vec<Bindings> },
}

/// Mensagens no formato exibido ao usuário final.
impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::NoQuery => write!(f, "No query extracted"),
            QueryOutcome::Fact { holds: true } => write!(f, "True - fact found in knowledge base"),
            QueryOutcome::Fact { holds: false } => write!(f, "False - not found in knowledge base"),
            QueryOutcome::Pattern { bindings } if bindings.is_empty() => write!(f, "No matches found"),
            QueryOutcome::Pattern { bindings } => {
                let rendered: Vec<String> = bindings
                    .iter()
                    .map(|b| match (b.len(), b.iter().next()) {
                        (1, Some((_, value))) => value.to_string(),
                        _ => b.to_string(),
                    })
                    .collect();
                write!(f, "Results: {}", rendered.join(", "))
            }
        }
    }
}

/// Sessão de consultas sobre um conjunto de regras e fatos.
#[derive(Clone, Debug, Default)]
pub struct Reasoner {
    rules: Vec<Rule>,
    facts: FactSet,
    config: EngineConfig,
}

impl Reasoner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            rules: Vec::new(),
            facts: FactSet::new(),
            config,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Fatos base (sem os derivados).
    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    pub fn add_rule(&mut self, rule: Rule) {
        tracing::debug!(rule = %rule, "Reasoner: regra adicionada");
        self.rules.push(rule);
    }

    /// Afirma um fato base. Retorna `true` se o fato era novo.
    ///
    /// # Erros
    ///
    /// [`EngineError::NotGround`] se o fato contiver variáveis.
    pub fn assert_fact(&mut self, fact: impl Into<String>) -> Result<bool, EngineError> {
        let fact = fact.into();
        if !is_ground(&fact) {
            return Err(EngineError::NotGround { fact });
        }
        Ok(self.facts.insert(normalize(&fact)))
    }

    /// Fecho dos fatos base sob as regras atuais.
    pub fn closure(&self) -> Result<ChainReport, EngineError> {
        ForwardChainer::new(self.config.clone()).run(&self.rules, self.facts.clone())
    }

    /// Responde a uma consulta contra o fecho dos fatos.
    pub fn ask(&self, query: &str) -> Result<QueryOutcome, EngineError> {
        let query = normalize(query);
        if query.is_empty() {
            return Ok(QueryOutcome::NoQuery);
        }

        let closure = self.closure()?;
        let outcome = if is_ground(&query) {
            QueryOutcome::Fact {
                holds: closure.facts.contains(&query),
            }
        } else {
            QueryOutcome::Pattern {
                bindings: closure
                    .facts
                    .iter()
                    .filter_map(|fact| match_pattern(&query, fact))
                    .collect(),
            }
        };
        tracing::info!(query = %query, outcome = %outcome, "Consulta respondida");
        Ok(outcome)
    }

    /// Árvore de objetivos para `hypothesis`.
    pub fn explain(&self, hypothesis: &str) -> Condition {
        backchain_to_goal_tree(&self.rules, &normalize(hypothesis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;

    fn animals() -> Reasoner {
        datasets::animal_knowledge()
            .unwrap()
            .to_reasoner(EngineConfig::default())
            .unwrap()
    }

    #[test]
    fn test_ask_ground_fact() {
        let reasoner = animals();
        assert_eq!(reasoner.ask("bird robin").unwrap(), QueryOutcome::Fact { holds: true });
        assert_eq!(reasoner.ask("bird dog").unwrap(), QueryOutcome::Fact { holds: false });
    }

    /// Fatos derivados também respondem à consulta
    #[test]
    fn test_ask_derived_fact() {
        let reasoner = animals();
        assert_eq!(reasoner.ask("flightless  penguin").unwrap(), QueryOutcome::Fact { holds: true });
        assert_eq!(reasoner.ask("warm_blooded whale").unwrap().to_string(), "True - fact found in knowledge base");
    }

    #[test]
    fn test_ask_pattern() {
        let reasoner = animals();
        let outcome = reasoner.ask("can_swim (?x)").unwrap();
        assert_eq!(outcome.to_string(), "Results: penguin, whale, salmon");
        assert_eq!(reasoner.ask("can_fly (?x) (?y)").unwrap().to_string(), "No matches found");
    }

    #[test]
    fn test_ask_empty_query() {
        assert_eq!(animals().ask("   ").unwrap(), QueryOutcome::NoQuery);
        assert_eq!(QueryOutcome::NoQuery.to_string(), "No query extracted");
    }

    #[test]
    fn test_multi_variable_results() {
        let mut reasoner = Reasoner::default();
        reasoner.assert_fact("eats cat fish").unwrap();
        let outcome = reasoner.ask("eats (?who) (?what)").unwrap();
        assert_eq!(outcome.to_string(), "Results: {what: fish, who: cat}");
    }

    #[test]
    fn test_assert_rejects_variables() {
        let mut reasoner = Reasoner::default();
        assert!(reasoner.assert_fact("bird (?x)").is_err());
        assert_eq!(reasoner.assert_fact("bird   tweety"), Ok(true));
        assert_eq!(reasoner.assert_fact("bird tweety"), Ok(false));
    }

    #[test]
    fn test_explain() {
        let mut reasoner = Reasoner::default();
        for rule in datasets::zookeeper_rules().unwrap() {
            reasoner.add_rule(rule);
        }
        let tree = reasoner.explain("opus is a vertebrate");
        let first = tree.children().next().and_then(Condition::as_pattern);
        assert_eq!(first, Some("opus is a vertebrate"));
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(QueryOutcome::Fact { holds: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "fact", "holds": true }));
    }
}
