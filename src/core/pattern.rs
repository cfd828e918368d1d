//! # Pattern — Padrões, Tokens e Bindings
//!
//! Um **padrão** é uma sequência de tokens separados por espaço. Cada token é
//! um **literal** (casa apenas consigo mesmo) ou uma **variável** no formato
//! `(?nome)`, que casa com qualquer token literal.
//!
//! Um **fato** é simplesmente um padrão sem variáveis.
//!
//! ## Operações
//!
//! | Função | Entrada | Saída |
//! |--------|---------|-------|
//! | [`match_pattern`] | padrão + fato | `Some(Bindings)` ou `None` |
//! | [`match_with`] | padrão + fato + bindings parciais | bindings estendidos |
//! | [`populate`] | padrão + bindings | padrão instanciado |
//!
//! ## Exemplo
//!
//! ```text
//! match_pattern("(?x) beats (?y)", "flush beats straight")
//!   → { x: "flush", y: "straight" }
//!
//! populate("(?y) loses to (?x)", { x: "flush", y: "straight" })
//!   → "straight loses to flush"
//! ```
//!
//! Todas as funções são puras: nenhuma altera os argumentos recebidos.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Reconhece um token de variável: `(?x)`, `(?px)`, `(?animal_1)`.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\?([A-Za-z_][A-Za-z0-9_-]*)\)$").expect("invalid regex")
});

/// Um token de um padrão ou fato.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Token literal — casa apenas com um token idêntico (case-sensitive).
    Literal(&'a str),
    /// Variável — guarda apenas o nome, sem o marcador `(? )`.
    Variable(&'a str),
}

/// Classifica um único token.
fn classify(raw: &str) -> Token<'_> {
    match VARIABLE.captures(raw).and_then(|c| c.get(1)) {
        Some(name) => Token::Variable(name.as_str()),
        None => Token::Literal(raw),
    }
}

/// Quebra um padrão em tokens (separação por whitespace).
pub fn tokenize(pattern: &str) -> impl Iterator<Item = Token<'_>> {
    pattern.split_whitespace().map(classify)
}

/// Conjunto de variáveis distintas de um padrão.
pub fn variables(pattern: &str) -> BTreeSet<String> {
    tokenize(pattern)
        .filter_map(|t| match t {
            Token::Variable(name) => Some(name.to_string()),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Forma canônica do texto: tokens separados por um único espaço.
pub fn normalize(pattern: &str) -> String {
    pattern.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `true` se o padrão não contém variáveis (ou seja, é um fato).
pub fn is_ground(pattern: &str) -> bool {
    tokenize(pattern).all(|t| matches!(t, Token::Literal(_)))
}

/// Mapeamento variável → literal produzido por um casamento bem-sucedido.
///
/// Os bindings são imutáveis depois de produzidos: estender um binding
/// ([`Bindings::with`], [`match_with`]) sempre devolve um **novo** mapa, de modo
/// que ramos diferentes da busca podem compartilhar o mesmo prefixo sem
/// interferência.
///
/// A ordem de iteração é alfabética pelo nome da variável (`BTreeMap`),
/// o que torna a saída JSON e os logs determinísticos.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, String>);

impl Bindings {
    /// Bindings vazios.
    pub fn new() -> Self {
        Self::default()
    }

    /// Valor associado a uma variável, se houver.
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    /// Cópia destes bindings com `variable` associada a `value`.
    ///
    /// Retorna `None` se a variável já estiver associada a outro literal.
    pub fn with(&self, variable: &str, value: &str) -> Option<Bindings> {
        match self.get(variable) {
            Some(bound) if bound != value => None,
            Some(_) => Some(self.clone()),
            None => {
                let mut next = self.clone();
                next.0.insert(variable.to_string(), value.to_string());
                Some(next)
            }
        }
    }

    /// Número de variáveis associadas.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pares `(variável, literal)` em ordem alfabética.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Bindings(iter.into_iter().collect())
    }
}

/// Formato `{x: flush, y: straight}`.
impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}

/// Casa `pattern` contra `fact` partindo de bindings vazios.
///
/// Veja [`match_with`] para as regras de casamento.
pub fn match_pattern(pattern: &str, fact: &str) -> Option<Bindings> {
    match_with(pattern, fact, &Bindings::new())
}

/// Casa `pattern` contra `fact`, estendendo os bindings parciais `base`.
///
/// ## Regras
///
/// 1. Número de tokens diferente → falha imediata
/// 2. Literal do padrão deve ser **idêntico** ao token do fato
/// 3. Variável já associada deve casar com o mesmo literal; senão, associa
///
/// O segundo argumento é tratado sempre como sequência de literais, mesmo que
/// contenha algo parecido com `(?x)`. É isso que permite casar o consequente
/// de uma regra contra uma hipótese no encadeamento para trás.
///
/// `base` nunca é modificado.
pub fn match_with(pattern: &str, fact: &str, base: &Bindings) -> Option<Bindings> {
    let pattern_tokens: Vec<Token<'_>> = tokenize(pattern).collect();
    let fact_tokens: Vec<&str> = fact.split_whitespace().collect();
    if pattern_tokens.len() != fact_tokens.len() {
        return None;
    }

    let mut bindings = base.clone();
    for (token, value) in pattern_tokens.into_iter().zip(fact_tokens) {
        match token {
            Token::Literal(lit) => {
                if lit != value {
                    return None;
                }
            }
            Token::Variable(name) => match bindings.get(name) {
                Some(bound) if bound != value => return None,
                Some(_) => {}
                None => {
                    bindings.0.insert(name.to_string(), value.to_string());
                }
            },
        }
    }
    Some(bindings)
}

/// Substitui as variáveis de `pattern` pelos valores em `bindings`.
///
/// Variáveis sem binding permanecem como estão (`(?x)`), para que templates
/// parcialmente instanciados ainda possam ser exibidos ou casados.
pub fn populate(pattern: &str, bindings: &Bindings) -> String {
    pattern
        .split_whitespace()
        .map(|raw| match classify(raw) {
            Token::Variable(name) => bindings.get(name).unwrap_or(raw),
            Token::Literal(lit) => lit,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
