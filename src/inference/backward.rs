//! # Encadeamento para Trás — Árvore de Objetivos
//!
//! A partir de uma **hipótese**, constrói a árvore `OR` de todas as formas
//! de prová-la ou simplesmente assumi-la como dada.
//!
//! ## Algoritmo
//!
//! ```text
//! objetivo(H):
//!   alternativas ← [H]                       "H pode simplesmente ser um fato"
//!   para cada regra cujo consequente casa com H:
//!     A ← populate(antecedente, bindings)
//!     alternativas += expandir(A)
//!   retorna simplify(OR(alternativas))
//!
//! expandir(padrão)   = objetivo(padrão)
//! expandir(AND/OR)   = mesmo conectivo sobre expandir(filho)
//! expandir(NOT x)    = NOT x                  (negação fica opaca)
//! ```
//!
//! ## Exemplo
//!
//! ```text
//! regras: (?x) has feathers → (?x) is a bird
//! objetivo("opus is a bird") = (opus is a bird OR opus has feathers)
//! ```
//!
//! ## Ciclos
//!
//! Hipóteses que já estão sendo expandidas na pilha atual não são
//! expandidas de novo: a revisita vira uma folha. Sem isso, regras como
//! `A ← B` e `B ← A` levariam a uma recursão infinita.
//!
//! Não há memoização: cada chamada recalcula a árvore inteira.

use crate::core::{match_pattern, Condition, Rule};

/// Constrói a árvore de objetivos (já simplificada) para `hypothesis`.
pub fn backchain_to_goal_tree(rules: &[Rule], hypothesis: &str) -> Condition {
    let mut stack = Vec::new();
    let tree = goal(rules, hypothesis, &mut stack);
    tracing::debug!(hypothesis, tree = %tree, "Árvore de objetivos construída");
    tree
}

/// Estado "provar ou assumir H". `stack` guarda as hipóteses em expansão.
fn goal(rules: &[Rule], hypothesis: &str, stack: &mut Vec<String>) -> Condition {
    if stack.iter().any(|h| h == hypothesis) {
        tracing::trace!(hypothesis, "Hipótese já em expansão, mantida como folha");
        return Condition::from(hypothesis);
    }
    stack.push(hypothesis.to_string());

    let mut alternatives = vec![Condition::from(hypothesis)];
    for rule in rules {
        let Some(bindings) = match_pattern(rule.consequent(), hypothesis) else {
            continue;
        };
        let instantiated = rule.antecedent().populate(&bindings);
        tracing::trace!(hypothesis, antecedent = %instantiated, "Regra aplicável");
        alternatives.push(expand(rules, &instantiated, stack));
    }

    stack.pop();
    Condition::Or(alternatives).simplify()
}

fn expand(rules: &[Rule], cond: &Condition, stack: &mut Vec<String>) -> Condition {
    match cond {
        Condition::Pattern(p) => goal(rules, p, stack),
        Condition::And(children) => {
            Condition::And(children.iter().map(|c| expand(rules, c, stack)).collect())
        }
        Condition::Or(children) => {
            Condition::Or(children.iter().map(|c| expand(rules, c, stack)).collect())
        }
        Condition::Not(_) => cond.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;

    fn p(s: &str) -> Condition {
        Condition::from(s)
    }

    #[test]
    fn test_reduced_leaf() {
        let rules = vec![Rule::new("(?x) has feathers", "(?x) is a bird").unwrap()];
        let tree = backchain_to_goal_tree(&rules, "opus is a bird");
        assert_eq!(tree, Condition::or(["opus is a bird", "opus has feathers"]));
    }

    /// Nenhuma regra aplicável → a própria hipótese
    #[test]
    fn test_no_matching_rule() {
        let rules = datasets::zookeeper_rules().unwrap();
        assert_eq!(backchain_to_goal_tree(&rules, "opus swims"), p("opus swims"));
    }

    #[test]
    fn test_zookeeper_penguin() {
        let rules = datasets::zookeeper_rules().unwrap();
        let tree = backchain_to_goal_tree(&rules, "opus is a penguin");
        let expected = Condition::or([
            p("opus is a penguin"),
            Condition::and([
                Condition::or([
                    p("opus is a bird"),
                    p("opus has feathers"),
                    Condition::and(["opus flies", "opus lays eggs"]),
                ]),
                p("opus does not fly"),
                p("opus swims"),
                p("opus has black and white color"),
            ]),
        ]);
        assert_eq!(tree, expected);
        assert_eq!(
            tree.to_string(),
            "(opus is a penguin OR ((opus is a bird OR opus has feathers OR (opus flies AND opus lays eggs)) \
             AND opus does not fly AND opus swims AND opus has black and white color))"
        );
    }

    /// NOT permanece como folha opaca
    #[test]
    fn test_negation_is_not_expanded() {
        let rules = vec![
            Rule::new("(?x) has wings", "(?x) flies").unwrap(),
            Rule::new(
                Condition::and([p("(?x) is a bird"), Condition::not("(?x) flies")]),
                "(?x) is flightless",
            )
            .unwrap(),
        ];
        let tree = backchain_to_goal_tree(&rules, "opus is flightless");
        assert_eq!(
            tree,
            Condition::or([
                p("opus is flightless"),
                Condition::and([p("opus is a bird"), Condition::not("opus flies")]),
            ])
        );
    }

    /// Antecedente que é só um NOT vira uma alternativa opaca
    #[test]
    fn test_bare_negation_antecedent() {
        let rules = vec![Rule::new(Condition::not("it rains"), "the grass is dry").unwrap()];
        let tree = backchain_to_goal_tree(&rules, "the grass is dry");
        assert_eq!(
            tree,
            Condition::or([p("the grass is dry"), Condition::not("it rains")])
        );
        assert_eq!(tree.to_string(), "(the grass is dry OR NOT (it rains))");
    }

    /// Antecedente OR gera um OR que é achatado na lista de alternativas
    #[test]
    fn test_or_antecedent_is_flattened() {
        let rules = vec![Rule::new(Condition::or(["(?x) barks", "(?x) wags"]), "(?x) is a dog").unwrap()];
        let tree = backchain_to_goal_tree(&rules, "rex is a dog");
        assert_eq!(tree, Condition::or(["rex is a dog", "rex barks", "rex wags"]));
    }

    #[test]
    fn test_cycle_terminates() {
        let rules = vec![
            Rule::new("(?x) is smiling", "(?x) is happy").unwrap(),
            Rule::new("(?x) is happy", "(?x) is smiling").unwrap(),
        ];
        let tree = backchain_to_goal_tree(&rules, "bob is happy");
        assert_eq!(
            tree,
            Condition::or(["bob is happy", "bob is smiling", "bob is happy"])
        );
    }

    /// A regra transitiva reintroduz variáveis livres; a guarda de ciclo garante término
    #[test]
    fn test_transitive_rule_terminates() {
        let rules = vec![datasets::transitive_rule().unwrap()];
        let tree = backchain_to_goal_tree(&rules, "a beats c");
        let first = tree.children().next().cloned();
        assert_eq!(first, Some(p("a beats c")));
        assert_eq!(tree.simplify(), tree);
    }
}
