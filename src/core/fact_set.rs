//! # FactSet — Base de Fatos Ordenada
//!
//! O [`FactSet`] armazena os fatos (padrões ground) conhecidos pelo motor.
//!
//! ## Armazenamento
//!
//! - **Fatos**: `Vec<String>` — preserva a ordem de inserção (saída determinística)
//! - **Índice**: `HashSet<String>` — teste de pertinência O(1)
//!
//! A semântica é de **conjunto** sobre sequências de tokens: todo fato é
//! normalizado (tokens separados por um único espaço) ao entrar e ao ser
//! consultado, então `"a  beats b"` e `"a beats b"` são o mesmo fato.
//! Fatos nunca são removidos durante o encadeamento para frente — a base
//! só cresce.
//!
//! ## Serialização
//!
//! Serializado como um array JSON simples. O índice é reconstruído
//! automaticamente na desserialização (via `From<Vec<String>>`).
//!
//! ## Exemplo
//!
//! ```rust
//! use production_engine::core::FactSet;
//!
//! let mut facts: FactSet = ["person bart", "person lisa"].into_iter().collect();
//! assert!(!facts.insert("person bart".to_string())); // duplicado
//! assert!(facts.insert("parent marge bart".to_string()));
//! assert_eq!(facts.len(), 3);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::pattern::normalize;

/// Conjunto de fatos com ordem de inserção preservada.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FactSet {
    /// Fatos na ordem em que foram inseridos.
    facts: Vec<String>,
    /// Índice de pertinência, espelho de `facts`.
    index: HashSet<String>,
}

impl FactSet {
    /// Cria um conjunto vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere um fato (normalizado), se ainda não existir.
    ///
    /// Retorna `true` quando o fato é novo.
    pub fn insert(&mut self, fact: String) -> bool {
        let fact = if is_normalized(&fact) { fact } else { normalize(&fact) };
        if self.index.contains(&fact) {
            return false;
        }
        tracing::trace!(fact = %fact, "FactSet: fato armazenado");
        self.index.insert(fact.clone());
        self.facts.push(fact);
        true
    }

    pub fn contains(&self, fact: &str) -> bool {
        if is_normalized(fact) {
            self.index.contains(fact)
        } else {
            self.index.contains(&normalize(fact))
        }
    }

    /// Fatos na ordem de inserção.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.facts.iter()
    }

    /// Visão em slice, útil para iteração paralela.
    pub fn as_slice(&self) -> &[String] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Consome o conjunto devolvendo os fatos em ordem.
    pub fn into_vec(self) -> Vec<String> {
        self.facts
    }
}

/// `true` se `fact` já está na forma de [`normalize`].
fn is_normalized(fact: &str) -> bool {
    !fact.starts_with(' ')
        && !fact.ends_with(' ')
        && !fact.contains("  ")
        && !fact.chars().any(|c| c.is_whitespace() && c != ' ')
}

impl From<Vec<String>> for FactSet {
    fn from(facts: Vec<String>) -> Self {
        facts.into_iter().collect()
    }
}

impl From<FactSet> for Vec<String> {
    fn from(set: FactSet) -> Self {
        set.facts
    }
}

impl<S: Into<String>> FromIterator<S> for FactSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FactSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for FactSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for fact in iter {
            self.insert(fact.into());
        }
    }
}

impl<'a> IntoIterator for &'a FactSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Duplicados são ignorados e a ordem de inserção é preservada
    #[test]
    fn test_set_semantics_and_order() {
        let mut set: FactSet = ["b beats c", "a beats b", "b beats c"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.insert("a beats c".to_string()));
        assert!(!set.insert("a beats b".to_string()));
        assert_eq!(set.into_vec(), vec!["b beats c", "a beats b", "a beats c"]);
    }

    /// Espaços extras não criam um fato novo
    #[test]
    fn test_whitespace_is_normalized() {
        let mut set: FactSet = ["a  beats b", " b beats\tc "].into_iter().collect();
        assert_eq!(set.as_slice(), ["a beats b", "b beats c"]);
        assert!(!set.insert("a beats b".to_string()));
        assert!(set.contains("a beats  b"));
        assert!(set.contains("b beats c"));
        assert!(!set.contains("a beats"));
    }

    /// O índice volta a funcionar depois de passar por JSON
    #[test]
    fn test_json_rebuilds_index() {
        let json = r#"["person bart", "person lisa", "person bart"]"#;
        let set: FactSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("person lisa"));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["person bart","person lisa"]"#);
    }
}
