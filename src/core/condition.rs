//! # Condition — Árvore de Conectivos Lógicos
//!
//! Uma [`Condition`] é o antecedente de uma regra ou um nó da árvore de
//! objetivos do encadeamento para trás. É um tipo fechado com quatro variantes:
//!
//! ```text
//! Condition
//!   ├── Pattern("(?x) has feathers")     folha
//!   ├── And([...])                       conjunção ordenada
//!   ├── Or([...])                        disjunção ordenada
//!   └── Not(Box<...>)                    negação (exatamente um filho)
//! ```
//!
//! A ordem dos filhos é preservada em todas as operações: o motor de
//! encadeamento para frente avalia as cláusulas da esquerda para a direita,
//! e a árvore de objetivos exibe as alternativas na ordem das regras.
//!
//! ## Simplificação
//!
//! Os dois motores constroem árvores compondo resultados recursivos e acabam
//! introduzindo invólucros triviais (`OR` de uma alternativa, `AND` de um
//! subobjetivo). [`Condition::simplify`] remove esses invólucros e achata
//! conectivos aninhados do mesmo tipo:
//!
//! ```text
//! OR(a, OR(b, AND(c)))   →   OR(a, b, c)
//! AND(x)                 →   x
//! NOT(AND(x))            →   NOT(x)          (o NOT nunca é removido)
//! ```
//!
//! ## Formato JSON
//!
//! ```json
//! { "and": ["parent (?p) (?x)", "parent (?p) (?y)", { "not": "self (?x) (?y)" }] }
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern::{self, Bindings};

/// Condição lógica: padrão simples ou conectivo sobre outras condições.
///
/// A igualdade é estrutural — dois nós são iguais se têm o mesmo tipo e os
/// mesmos filhos na mesma ordem.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Conjunção ordenada.
    And(Vec<Condition>),
    /// Disjunção ordenada.
    Or(Vec<Condition>),
    /// Negação por falha.
    Not(Box<Condition>),
    /// Padrão (folha). Em JSON é uma string simples.
    #[serde(untagged)]
    Pattern(String),
}

impl Condition {
    /// Conjunção dos itens, na ordem dada.
    pub fn and<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::And(items.into_iter().map(Into::into).collect())
    }

    /// Disjunção dos itens, na ordem dada.
    pub fn or<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::Or(items.into_iter().map(Into::into).collect())
    }

    pub fn not(inner: impl Into<Condition>) -> Self {
        Condition::Not(Box::new(inner.into()))
    }

    /// Filhos diretos, na ordem original. Folhas não têm filhos.
    pub fn children(&self) -> std::slice::Iter<'_, Condition> {
        match self {
            Condition::And(children) | Condition::Or(children) => children.iter(),
            Condition::Not(inner) => std::slice::from_ref(inner.as_ref()).iter(),
            Condition::Pattern(_) => (&[]).iter(),
        }
    }

    /// Texto do padrão, se esta condição for uma folha.
    pub fn as_pattern(&self) -> Option<&str> {
        match self {
            Condition::Pattern(p) => Some(p),
            _ => None,
        }
    }

    /// Todas as variáveis mencionadas em qualquer ponto da árvore.
    pub fn variables(&self) -> BTreeSet<String> {
        match self {
            Condition::Pattern(p) => pattern::variables(p),
            _ => self.children().flat_map(Condition::variables).collect(),
        }
    }

    /// Substitui os bindings em todas as folhas, preservando a estrutura.
    pub fn populate(&self, bindings: &Bindings) -> Condition {
        match self {
            Condition::Pattern(p) => Condition::Pattern(pattern::populate(p, bindings)),
            Condition::And(children) => {
                Condition::And(children.iter().map(|c| c.populate(bindings)).collect())
            }
            Condition::Or(children) => {
                Condition::Or(children.iter().map(|c| c.populate(bindings)).collect())
            }
            Condition::Not(inner) => Condition::Not(Box::new(inner.populate(bindings))),
        }
    }

    /// Forma canônica da árvore (pós-ordem).
    ///
    /// - conectivo com um único filho → o próprio filho
    /// - filho do mesmo tipo que o pai → seus filhos são inseridos no lugar
    /// - `NOT` nunca é removido nem absorvido pelo pai
    ///
    /// `simplify` é idempotente: `t.simplify().simplify() == t.simplify()`.
    pub fn simplify(&self) -> Condition {
        match self {
            Condition::Pattern(_) => self.clone(),
            Condition::Not(inner) => Condition::Not(Box::new(inner.simplify())),
            Condition::And(children) => collapse(children, true),
            Condition::Or(children) => collapse(children, false),
        }
    }
}

/// Simplifica os filhos de um AND (`is_and`) ou OR e achata o resultado.
///
/// Cada filho já simplificado não contém conectivos do próprio tipo como
/// filhos diretos, então uma única passada de achatamento chega ao ponto fixo.
fn collapse(children: &[Condition], is_and: bool) -> Condition {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match (child.simplify(), is_and) {
            (Condition::And(grand), true) => flat.extend(grand),
            (Condition::Or(grand), false) => flat.extend(grand),
            (other, _) => flat.push(other),
        }
    }

    if flat.len() == 1 {
        return flat.remove(0);
    }
    if is_and {
        Condition::And(flat)
    } else {
        Condition::Or(flat)
    }
}

impl From<&str> for Condition {
    fn from(p: &str) -> Self {
        Condition::Pattern(p.to_string())
    }
}

impl From<String> for Condition {
    fn from(p: String) -> Self {
        Condition::Pattern(p)
    }
}

/// Renderização legível: `(A AND (B OR C))`, `NOT (A)`.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Pattern(p) => write!(f, "{p}"),
            Condition::Not(inner) => match inner.as_ref() {
                Condition::Pattern(p) => write!(f, "NOT ({p})"),
                other => write!(f, "NOT {other}"),
            },
            Condition::And(children) => write_joined(f, children, "AND"),
            Condition::Or(children) => write_joined(f, children, "OR"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Condition], op: &str) -> fmt::Result {
    if children.is_empty() {
        return write!(f, "({op})");
    }
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Condition {
        Condition::from(s)
    }

    #[test]
    fn test_single_child_is_unwrapped() {
        assert_eq!(Condition::and(["a"]).simplify(), p("a"));
        assert_eq!(Condition::or([Condition::and([Condition::or(["a"])])]).simplify(), p("a"));
    }

    #[test]
    fn test_same_kind_is_flattened_in_place() {
        let tree = Condition::or([
            p("a"),
            Condition::or([p("b"), Condition::or(["c", "d"])]),
            p("e"),
        ]);
        assert_eq!(tree.simplify(), Condition::or(["a", "b", "c", "d", "e"]));
    }

    /// AND dentro de OR não é achatado
    #[test]
    fn test_different_kind_is_kept() {
        let tree = Condition::or([p("a"), Condition::and(["b", "c"])]);
        assert_eq!(tree.simplify(), tree);
    }

    /// Um AND de um único OR vira o OR, que então é achatado no OR pai
    #[test]
    fn test_unwrap_then_flatten() {
        let tree = Condition::or([p("a"), Condition::and([Condition::or(["b", "c"])])]);
        assert_eq!(tree.simplify(), Condition::or(["a", "b", "c"]));
    }

    #[test]
    fn test_not_is_never_absorbed() {
        let tree = Condition::and([Condition::not(Condition::and(["x"]))]);
        assert_eq!(tree.simplify(), Condition::not("x"));

        let nested = Condition::not(Condition::not("y"));
        assert_eq!(nested.simplify(), nested);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let trees = [
            Condition::or([
                p("h"),
                Condition::and([Condition::or(["a", "b"]), Condition::and(["c"]), p("d")]),
                Condition::or([Condition::not(Condition::or(["e"]))]),
            ]),
            Condition::and(Vec::<Condition>::new()),
            Condition::not(Condition::and([Condition::and(["a", "b"]), p("c")])),
        ];
        for tree in trees {
            let once = tree.simplify();
            assert_eq!(once.simplify(), once);
        }
    }

    #[test]
    fn test_populate_preserves_structure() {
        let tree = Condition::and([p("parent (?p) (?x)"), Condition::not("self (?x) (?y)")]);
        let b = Bindings::new().with("x", "bart").unwrap().with("y", "lisa").unwrap();
        assert_eq!(
            tree.populate(&b),
            Condition::and([p("parent (?p) bart"), Condition::not("self bart lisa")])
        );
    }

    #[test]
    fn test_children_order() {
        let tree = Condition::and(["a", "b", "c"]);
        let names: Vec<_> = tree.children().filter_map(Condition::as_pattern).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(Condition::not("z").children().count(), 1);
        assert_eq!(p("z").children().count(), 0);
    }

    #[test]
    fn test_display() {
        let tree = Condition::and([p("A"), Condition::or(["B", "C"]), Condition::not("D")]);
        assert_eq!(tree.to_string(), "(A AND (B OR C) AND NOT (D))");
    }

    #[test]
    fn test_json_shape() {
        let tree = Condition::and([p("parent (?p) (?x)"), Condition::not("self (?x) (?x)")]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "and": ["parent (?p) (?x)", { "not": "self (?x) (?x)" }] })
        );
        let back: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
