//! # Configuração
//!
//! Parâmetros do motor ([`EngineConfig`]) e do servidor ([`ServerConfig`]).
//! O servidor lê tudo de variáveis de ambiente, com defaults sensatos:
//!
//! | Variável | Default | Efeito |
//! |----------|---------|--------|
//! | `PRODUCTION_ADDR` | `0.0.0.0:3000` | endereço de bind do servidor |
//! | `PRODUCTION_KNOWLEDGE` | `data/knowledge.json` | arquivo de regras e fatos |
//! | `PRODUCTION_MAX_FACTS` | `100000` | limite de fatos no encadeamento |
//! | `PRODUCTION_MAX_BINDINGS` | `1000000` | limite de bindings por regra e varredura |
//! | `PRODUCTION_PARALLEL` | `true` | join paralelo com rayon |
//! | `RUST_LOG` | `info` | nível de log (tracing) |
//!
//! Valores inválidos são registrados com `warn` e substituídos pelo default.

use std::path::PathBuf;
use std::str::FromStr;

/// Limite padrão de fatos por encadeamento.
pub const DEFAULT_MAX_FACTS: usize = 100_000;

/// Limite padrão de bindings (parciais e completos) gerados por uma regra em uma varredura.
pub const DEFAULT_MAX_BINDINGS: usize = 1_000_000;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_KNOWLEDGE_PATH: &str = "data/knowledge.json";

/// Parâmetros do encadeamento para frente.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Número máximo de fatos (originais + derivados) antes de abortar com
    /// [`EngineError::ResourceExhausted`](crate::error::EngineError::ResourceExhausted).
    pub max_facts: usize,
    /// Número máximo de bindings que o join de uma regra pode produzir em uma
    /// varredura, contando cada cláusula casada. Acima disso:
    /// [`EngineError::SearchExhausted`](crate::error::EngineError::SearchExhausted).
    pub max_bindings: usize,
    /// Distribui a primeira cláusula de cada join entre as threads do rayon.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_facts: DEFAULT_MAX_FACTS,
            max_bindings: DEFAULT_MAX_BINDINGS,
            parallel: true,
        }
    }
}

/// Configuração do binário (servidor HTTP).
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub knowledge_path: PathBuf,
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Lê a configuração das variáveis de ambiente.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Mesmo que [`from_env`](Self::from_env), com uma fonte de variáveis injetável.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();
        Self {
            addr: lookup("PRODUCTION_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            knowledge_path: lookup("PRODUCTION_KNOWLEDGE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_PATH)),
            engine: EngineConfig {
                max_facts: parse_or(&lookup, "PRODUCTION_MAX_FACTS", defaults.max_facts),
                max_bindings: parse_or(&lookup, "PRODUCTION_MAX_BINDINGS", defaults.max_bindings),
                parallel: parse_or(&lookup, "PRODUCTION_PARALLEL", defaults.parallel),
            },
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Valor de configuração inválido, usando default");
            default
        }),
    }
}
