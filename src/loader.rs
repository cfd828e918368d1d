//! # Loader — Leitura do Arquivo de Conhecimento
//!
//! Lê regras e fatos de um arquivo JSON (padrão `data/knowledge.json`):
//!
//! ```json
//! {
//!   "rules": [
//!     { "if": "has_feathers (?x)", "then": "bird (?x)" },
//!     { "if": { "and": ["bird (?x)", { "not": "can_fly (?x)" }] }, "then": "flightless (?x)" }
//!   ],
//!   "facts": ["has_feathers penguin", "can_swim penguin"]
//! }
//! ```
//!
//! As regras passam pela mesma validação de [`Rule::new`](crate::core::Rule::new),
//! então um arquivo com regra inválida falha no carregamento.
//!
//! O arquivo é **apenas entrada**: nada derivado é gravado de volta.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::{FactSet, Rule};
use crate::datasets;
use crate::error::EngineError;
use crate::reasoner::Reasoner;

/// Regras e fatos iniciais de uma sessão.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Knowledge {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub facts: FactSet,
}

impl Knowledge {
    /// Monta um [`Reasoner`] com estas regras e fatos.
    ///
    /// # Erros
    ///
    /// [`EngineError::NotGround`] se algum fato contiver variáveis.
    pub fn to_reasoner(&self, config: EngineConfig) -> Result<Reasoner, EngineError> {
        let mut reasoner = Reasoner::new(config);
        for rule in &self.rules {
            reasoner.add_rule(rule.clone());
        }
        for fact in &self.facts {
            reasoner.assert_fact(fact.as_str())?;
        }
        Ok(reasoner)
    }
}

/// Carrega o conhecimento de `path`, ou a base de animais embutida se o
/// arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas não puder ser lido, não for JSON
/// válido, ou contiver regras inválidas.
pub fn load_knowledge(path: &Path) -> Result<Knowledge> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Arquivo de conhecimento não encontrado, usando base embutida");
        return Ok(datasets::animal_knowledge()?);
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let knowledge: Knowledge = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rules = knowledge.rules.len(),
        facts = knowledge.facts.len(),
        "Conhecimento carregado"
    );
    Ok(knowledge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("production-engine-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let kb = load_knowledge(Path::new("/nonexistent/knowledge.json")).unwrap();
        assert_eq!(kb.rules.len(), datasets::animal_rules().unwrap().len());
        assert!(kb.facts.contains("bird robin"));
    }

    #[test]
    fn test_load_valid_file() {
        let path = temp_file(
            "valid.json",
            r#"{
                "rules": [{ "if": { "and": ["bird (?x)", { "not": "can_fly (?x)" }] }, "then": "flightless (?x)" }],
                "facts": ["bird penguin", "bird robin", "can_fly robin"]
            }"#,
        );
        let kb = load_knowledge(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(kb.rules.len(), 1);
        assert_eq!(kb.facts.len(), 3);

        let reasoner = kb.to_reasoner(EngineConfig::default()).unwrap();
        let closure = reasoner.closure().unwrap();
        assert!(closure.facts.contains("flightless penguin"));
        assert!(!closure.facts.contains("flightless robin"));
    }

    #[test]
    fn test_invalid_rule_fails_to_load() {
        let path = temp_file(
            "invalid.json",
            r#"{ "rules": [{ "if": "bird (?x)", "then": "eats (?x) (?y)" }], "facts": [] }"#,
        );
        let result = load_knowledge(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_non_ground_fact_is_rejected() {
        let kb = Knowledge {
            rules: vec![],
            facts: ["bird (?x)"].into_iter().collect(),
        };
        assert!(matches!(
            kb.to_reasoner(EngineConfig::default()),
            Err(EngineError::NotGround { .. })
        ));
    }
}
