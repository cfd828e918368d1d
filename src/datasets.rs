//! # Datasets — Conhecimento Embutido
//!
//! Regras e fatos de demonstração usados pelo binário (`production-engine demo`),
//! pelos testes e como base padrão do servidor quando nenhum arquivo de
//! conhecimento é encontrado.
//!
//! | Conjunto | Regras | Uso |
//! |----------|--------|-----|
//! | [`poker_data`] | [`transitive_rule`] | fecho transitivo de "beats" |
//! | [`simpsons_data`], [`black_family_data`] | [`family_rules`] | parentesco com `NOT` |
//! | — | [`zookeeper_rules`] | árvore de objetivos ("opus is a penguin") |
//! | [`animal_knowledge`] | regras sobre animais | base padrão do servidor |

use crate::core::{Condition, FactSet, Rule};
use crate::error::RuleError;
use crate::loader::Knowledge;

/// `x beats y` e `y beats z` ⇒ `x beats z`.
pub fn transitive_rule() -> Result<Rule, RuleError> {
    Rule::new(
        Condition::and(["(?x) beats (?y)", "(?y) beats (?z)"]),
        "(?x) beats (?z)",
    )
}

/// Regras de parentesco. A ordem importa: `self` é derivado antes de `sibling`,
/// e `sibling` antes de `cousin`.
pub fn family_rules() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new("person (?x)", "self (?x) (?x)")?,
        Rule::new("parent (?x) (?y)", "child (?y) (?x)")?,
        Rule::new(
            Condition::and([
                Condition::from("parent (?p) (?x)"),
                Condition::from("parent (?p) (?y)"),
                Condition::not("self (?x) (?y)"),
            ]),
            "sibling (?x) (?y)",
        )?,
        Rule::new(
            Condition::and(["parent (?x) (?z)", "parent (?z) (?y)"]),
            "grandparent (?x) (?y)",
        )?,
        Rule::new("grandparent (?x) (?y)", "grandchild (?y) (?x)")?,
        Rule::new(
            Condition::and([
                Condition::from("parent (?px) (?x)"),
                Condition::from("parent (?py) (?y)"),
                Condition::from("sibling (?px) (?py)"),
                Condition::not("sibling (?x) (?y)"),
            ]),
            "cousin (?x) (?y)",
        )?,
    ])
}

/// Regras do zoológico — classificação de aves.
pub fn zookeeper_rules() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new("(?x) is a bird", "(?x) is a vertebrate")?,
        Rule::new("(?x) has feathers", "(?x) is a bird")?,
        Rule::new(Condition::and(["(?x) flies", "(?x) lays eggs"]), "(?x) is a bird")?,
        Rule::new(
            Condition::and([
                "(?x) is a bird",
                "(?x) does not fly",
                "(?x) swims",
                "(?x) has black and white color",
            ]),
            "(?x) is a penguin",
        )?,
    ])
}

pub fn poker_data() -> Vec<&'static str> {
    vec![
        "two-pair beats pair",
        "three-of-a-kind beats two-pair",
        "straight beats three-of-a-kind",
        "flush beats straight",
        "full-house beats flush",
        "straight-flush beats full-house",
    ]
}

pub fn simpsons_data() -> Vec<&'static str> {
    vec![
        "person bart",
        "person lisa",
        "person maggie",
        "person marge",
        "person homer",
        "person abe",
        "person mona",
        "parent marge bart",
        "parent marge lisa",
        "parent marge maggie",
        "parent homer bart",
        "parent homer lisa",
        "parent homer maggie",
        "parent abe homer",
        "parent mona homer",
    ]
}

pub fn black_family_data() -> Vec<&'static str> {
    vec![
        "person sirius",
        "person regulus",
        "person bellatrix",
        "person andromeda",
        "person narcissa",
        "person nymphadora",
        "person draco",
        "person orion",
        "person walburga",
        "person cygnus",
        "person druella",
        "parent orion sirius",
        "parent orion regulus",
        "parent walburga sirius",
        "parent walburga regulus",
        "parent cygnus bellatrix",
        "parent cygnus andromeda",
        "parent cygnus narcissa",
        "parent druella bellatrix",
        "parent druella andromeda",
        "parent druella narcissa",
        "parent andromeda nymphadora",
        "parent narcissa draco",
    ]
}

/// Base de animais, no formato `predicado entidade`.
pub fn animal_facts() -> Vec<&'static str> {
    vec![
        "bird robin",
        "bird penguin",
        "bird eagle",
        "mammal dog",
        "mammal cat",
        "mammal whale",
        "fish salmon",
        "fish shark",
        "can_fly robin",
        "can_fly eagle",
        "can_swim penguin",
        "can_swim whale",
        "can_swim salmon",
        "has_feathers robin",
        "has_feathers penguin",
        "has_feathers eagle",
        "warm_blooded robin",
        "warm_blooded penguin",
        "warm_blooded dog",
    ]
}

pub fn animal_rules() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new("has_feathers (?x)", "bird (?x)")?,
        Rule::new("mammal (?x)", "warm_blooded (?x)")?,
        Rule::new(Condition::or(["bird (?x)", "mammal (?x)", "fish (?x)"]), "vertebrate (?x)")?,
        Rule::new(
            Condition::and([Condition::from("bird (?x)"), Condition::not("can_fly (?x)")]),
            "flightless (?x)",
        )?,
        Rule::new(
            Condition::and(["bird (?x)", "can_swim (?x)"]),
            "diving_bird (?x)",
        )?,
    ])
}

/// Base padrão do servidor: [`animal_rules`] + [`animal_facts`].
pub fn animal_knowledge() -> Result<Knowledge, RuleError> {
    Ok(Knowledge {
        rules: animal_rules()?,
        facts: animal_facts().into_iter().collect::<FactSet>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_are_valid() {
        assert!(transitive_rule().is_ok());
        assert_eq!(family_rules().unwrap().len(), 6);
        assert_eq!(zookeeper_rules().unwrap().len(), 4);
        assert_eq!(animal_rules().unwrap().len(), 5);
    }

    #[test]
    fn test_animal_knowledge_has_no_duplicates() {
        let kb = animal_knowledge().unwrap();
        assert_eq!(kb.facts.len(), animal_facts().len());
    }
}
