//! # Encadeamento para Frente
//!
//! Deriva **todos** os fatos implicados pelas regras, aplicando-as
//! repetidamente até que uma varredura completa não produza nada novo
//! (ponto fixo).
//!
//! ## Algoritmo
//!
//! ```text
//! repita:
//!   para cada regra (na ordem dada):
//!     snapshot ← fatos atuais
//!     para cada binding que satisfaz o antecedente no snapshot:
//!       candidato ← populate(consequente, binding)
//!     adiciona os candidatos inéditos (ordem de descoberta)
//! até que a varredura não adicione nenhum fato
//! ```
//!
//! Cada regra enxerga os fatos derivados pelas regras anteriores da mesma
//! varredura. É isso que permite que `person (?x) → self (?x) (?x)` alimente,
//! na mesma passada, o guarda `NOT (self (?x) (?y))` da regra de irmãos.
//!
//! ## Satisfação do Antecedente
//!
//! | Condição | Estratégia |
//! |----------|------------|
//! | padrão | seleção: tenta casar com cada fato |
//! | `AND` | join com backtracking, cláusulas da esquerda para a direita |
//! | `OR` | união dos bindings de cada alternativa (duplicados mantidos) |
//! | `NOT` | negação por falha sobre o padrão já instanciado |
//!
//! ## Paralelismo
//!
//! Com [`EngineConfig::parallel`], a primeira cláusula do join de cada regra
//! é distribuída entre as threads do rayon. Os resultados são coletados na
//! ordem dos fatos, então a saída é idêntica à da execução sequencial.
//!
//! ## Terminação
//!
//! O universo de fatos ground é finito (vocabulário e aridade finitos) e a
//! base só cresce, então o laço termina. Ainda assim, regras podem gerar
//! combinações demais. Dois limites protegem o motor:
//!
//! | Limite | Conta | Erro |
//! |--------|-------|------|
//! | [`EngineConfig::max_facts`] | fatos na base | [`EngineError::ResourceExhausted`] |
//! | [`EngineConfig::max_bindings`] | bindings do join de uma regra, por varredura | [`EngineError::SearchExhausted`] |
//!
//! Os bindings são consumidos à medida que a busca os produz: só os
//! consequentes inéditos ficam em memória, nunca a lista completa do join.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::core::{match_with, populate, Bindings, Condition, FactSet, Rule};
use crate::error::EngineError;

/// Resultado de uma execução do encadeamento para frente.
#[derive(Clone, Debug)]
pub struct ChainReport {
    /// Fatos originais (ordem de entrada) seguidos dos derivados (ordem de descoberta).
    pub facts: FactSet,
    /// Quantos fatos foram derivados.
    pub derived: usize,
    /// Número de varreduras, incluindo a última (que não adiciona nada).
    pub sweeps: usize,
}

/// Motor de encadeamento para frente — sem estado além da configuração.
#[derive(Clone, Debug, Default)]
pub struct ForwardChainer {
    config: EngineConfig,
}

impl ForwardChainer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Calcula o ponto fixo de `facts` sob `rules`.
    ///
    /// # Erros
    ///
    /// - [`EngineError::ResourceExhausted`] — limite de fatos excedido
    /// - [`EngineError::SearchExhausted`] — uma regra gerou bindings demais
    /// - [`EngineError::UnboundNegation`] — `NOT` avaliado com variáveis livres
    pub fn run(&self, rules: &[Rule], mut facts: FactSet) -> Result<ChainReport, EngineError> {
        let limit = self.config.max_facts;
        if facts.len() > limit {
            return Err(EngineError::ResourceExhausted { limit });
        }

        let initial = facts.len();
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut added = 0;

            for rule in rules {
                let candidates = self.fire(rule, &facts)?;
                let mut fresh = 0;
                for fact in candidates.into_vec() {
                    if facts.contains(&fact) {
                        continue;
                    }
                    if facts.len() >= limit {
                        tracing::warn!(limit, rule = %rule, "Limite de fatos atingido");
                        return Err(EngineError::ResourceExhausted { limit });
                    }
                    facts.insert(fact);
                    fresh += 1;
                }
                if fresh > 0 {
                    tracing::debug!(rule = %rule, sweep = sweeps, derived = fresh, "Regra disparada");
                }
                added += fresh;
            }

            if added == 0 {
                break;
            }
        }

        let derived = facts.len() - initial;
        tracing::info!(
            rules = rules.len(),
            sweeps,
            derived,
            total = facts.len(),
            "Encadeamento para frente concluído"
        );
        Ok(ChainReport {
            facts,
            derived,
            sweeps,
        })
    }

    /// Consequentes inéditos de uma regra contra um snapshot dos fatos,
    /// sem duplicados e na ordem de descoberta.
    ///
    /// Com `parallel`, a primeira cláusula de um `AND` é distribuída entre
    /// as threads do rayon; cada ramo coleta seus candidatos e os ramos são
    /// concatenados na ordem dos fatos.
    fn fire(&self, rule: &Rule, facts: &FactSet) -> Result<FactSet, EngineError> {
        let search = Search::new(facts, Some(rule), self.config.max_bindings);
        let consequent = rule.consequent();

        if self.config.parallel {
            if let Condition::And(clauses) = rule.antecedent() {
                if let Some((Condition::Pattern(first), rest)) = clauses.split_first() {
                    let empty = Bindings::new();
                    let branches: Vec<FactSet> = facts
                        .as_slice()
                        .par_iter()
                        .filter_map(|fact| match_with(first, fact, &empty))
                        .map(|partial| {
                            search.charge()?;
                            search.candidates(consequent, rest, &partial)
                        })
                        .collect::<Result<_, _>>()?;
                    return Ok(branches.into_iter().flat_map(FactSet::into_vec).collect());
                }
            }
        }

        search.candidates(consequent, std::slice::from_ref(rule.antecedent()), &Bindings::new())
    }
}

/// Encadeamento para frente com a configuração padrão.
///
/// Retorna os fatos originais (normalizados) seguidos dos derivados.
pub fn forward_chain<S: AsRef<str>>(rules: &[Rule], facts: &[S]) -> Result<Vec<String>, EngineError> {
    let set: FactSet = facts.iter().map(|f| f.as_ref().to_string()).collect();
    let report = ForwardChainer::default().run(rules, set)?;
    Ok(report.facts.into_vec())
}

/// Todos os bindings que estendem `bindings` e satisfazem `cond` em `facts`.
pub fn solve(cond: &Condition, facts: &FactSet, bindings: &Bindings) -> Result<Vec<Bindings>, EngineError> {
    let search = Search::new(facts, None, usize::MAX);
    let mut out = Vec::new();
    search.each(cond, bindings, &mut |b: &Bindings| {
        out.push(b.clone());
        Ok(())
    })?;
    Ok(out)
}

/// Recebe cada binding produzido pela busca.
type Emit<'e> = dyn FnMut(&Bindings) -> Result<(), EngineError> + 'e;

/// Busca com backtracking sobre um snapshot dos fatos.
///
/// Cada cláusula casada consome uma unidade do orçamento `limit`; o
/// contador é atômico para ser compartilhado pelos ramos paralelos.
struct Search<'a> {
    facts: &'a FactSet,
    rule: Option<&'a Rule>,
    produced: AtomicUsize,
    limit: usize,
}

impl<'a> Search<'a> {
    fn new(facts: &'a FactSet, rule: Option<&'a Rule>, limit: usize) -> Self {
        Self {
            facts,
            rule,
            produced: AtomicUsize::new(0),
            limit,
        }
    }

    fn charge(&self) -> Result<(), EngineError> {
        let before = self.produced.fetch_add(1, Ordering::Relaxed);
        if before < self.limit {
            return Ok(());
        }
        let rule = self.rule.map(ToString::to_string).unwrap_or_default();
        if before == self.limit {
            tracing::warn!(limit = self.limit, rule = %rule, "Limite de bindings atingido");
        }
        Err(EngineError::SearchExhausted {
            rule,
            limit: self.limit,
        })
    }

    /// Consequentes ainda ausentes do snapshot, um por binding completo de `clauses`.
    fn candidates(&self, consequent: &str, clauses: &[Condition], start: &Bindings) -> Result<FactSet, EngineError> {
        let mut found = FactSet::new();
        self.each_all(clauses, start, &mut |b: &Bindings| {
            let fact = populate(consequent, b);
            if !self.facts.contains(&fact) {
                found.insert(fact);
            }
            Ok(())
        })?;
        Ok(found)
    }

    /// Emite cada binding que estende `bindings` e satisfaz `cond`.
    ///
    /// | Condição | Estratégia |
    /// |----------|------------|
    /// | padrão | seleção sobre todos os fatos |
    /// | `AND` | join da esquerda para a direita |
    /// | `OR` | cada alternativa em ordem (duplicados mantidos) |
    /// | `NOT` | negação por falha |
    fn each(&self, cond: &Condition, bindings: &Bindings, emit: &mut Emit<'_>) -> Result<(), EngineError> {
        match cond {
            Condition::Pattern(p) => {
                for fact in self.facts {
                    if let Some(extended) = match_with(p, fact, bindings) {
                        self.charge()?;
                        emit(&extended)?;
                    }
                }
                Ok(())
            }
            Condition::And(clauses) => self.each_all(clauses, bindings, emit),
            Condition::Or(alternatives) => {
                for alt in alternatives {
                    self.each(alt, bindings, emit)?;
                }
                Ok(())
            }
            Condition::Not(inner) => {
                if self.holds(inner, bindings)? {
                    Ok(())
                } else {
                    emit(bindings)
                }
            }
        }
    }

    /// Join com backtracking: cada binding parcial da primeira cláusula
    /// é propagado para as demais.
    fn each_all(&self, clauses: &[Condition], bindings: &Bindings, emit: &mut Emit<'_>) -> Result<(), EngineError> {
        let Some((first, rest)) = clauses.split_first() else {
            return emit(bindings);
        };
        self.each(first, bindings, &mut |partial: &Bindings| {
            self.each_all(rest, partial, &mut *emit)
        })
    }

    /// `true` se a condição negada, já instanciada, vale nos fatos atuais.
    fn holds(&self, inner: &Condition, bindings: &Bindings) -> Result<bool, EngineError> {
        let ground = inner.populate(bindings);
        if !ground.variables().is_empty() {
            return Err(EngineError::UnboundNegation {
                clause: ground.to_string(),
            });
        }
        if let Condition::Pattern(p) = &ground {
            return Ok(self.facts.contains(p));
        }

        let mut found = false;
        self.each(&ground, &Bindings::new(), &mut |_: &Bindings| {
            found = true;
            Ok(())
        })?;
        Ok(found)
    }
}
