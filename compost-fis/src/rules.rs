//! Base de regras declarativas
//!
//! Cada regra é uma conjunção de seleções de termo por variável que implica
//! exatamente um termo de saída. A ordem das regras não tem semântica.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};
use crate::types::Variable;

/// `SE variável é termo E ... ENTÃO saída é termo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub when: BTreeMap<Variable, String>,
    pub then: String,
}

impl Rule {
    pub fn new(when: &[(Variable, &str)], then: &str) -> Self {
        Self {
            when: when.iter().map(|(v, t)| (*v, t.to_string())).collect(),
            then: then.to_string(),
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.when.keys().copied()
    }
}

/// Regras regulares mais regras de segurança opcionais
///
/// Regras regulares exigem todas as suas variáveis em cada chamada.
/// Regras de segurança são puladas quando alguma variável está ausente.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBase {
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety: Vec<Rule>,
}

impl RuleBase {
    pub fn new(rules: Vec<Rule>) -> FisResult<Self> {
        Self::with_safety(rules, Vec::new())
    }

    pub fn with_safety(rules: Vec<Rule>, safety: Vec<Rule>) -> FisResult<Self> {
        let base = Self { rules, safety };
        base.validate()?;
        Ok(base)
    }

    /// Valida a forma das regras; termos são conferidos contra o catálogo
    /// na construção do motor
    pub fn validate(&self) -> FisResult<()> {
        if self.rules.is_empty() {
            return Err(FisError::Configuration("rule base is empty".into()));
        }

        for (i, rule) in self.rules.iter().chain(&self.safety).enumerate() {
            if rule.when.is_empty() {
                return Err(FisError::Configuration(format!("rule {i} has no antecedents")));
            }
            if rule.then.trim().is_empty() {
                return Err(FisError::Configuration(format!("rule {i} has no consequent")));
            }
        }

        Ok(())
    }

    /// Base de referência com 16 regras (acidez, temperatura, umidade)
    pub fn standard() -> Self {
        use Variable::{Acidity as Ph, Humidity as Hum, Temperature as Temp};

        let r = |ph: &str, temp: &str, hum: &str, then: &str| {
            Rule::new(&[(Ph, ph), (Temp, temp), (Hum, hum)], then)
        };

        Self {
            rules: vec![
                r("acidic", "cold", "wet", "poor"),
                r("acidic", "hot", "dry", "poor"),
                r("alkaline", "cold", "wet", "poor"),
                r("alkaline", "hot", "dry", "poor"),
                r("acidic", "ideal", "wet", "poor"),
                r("alkaline", "ideal", "wet", "poor"),
                r("acidic", "ideal", "moderate", "moderate"),
                r("alkaline", "ideal", "moderate", "moderate"),
                r("neutral", "cold", "moderate", "moderate"),
                r("neutral", "ideal", "wet", "moderate"),
                r("neutral", "hot", "dry", "moderate"),
                r("acidic", "hot", "moderate", "moderate"),
                r("neutral", "ideal", "dry", "good"),
                r("neutral", "hot", "moderate", "good"),
                r("neutral", "cold", "moderate", "good"),
                r("neutral", "ideal", "moderate", "excellent"),
            ],
            safety: Vec::new(),
        }
    }

    /// Base padrão com vetos de amônia alta e odor pungente
    pub fn standard_with_safety() -> Self {
        Self {
            safety: vec![
                Rule::new(&[(Variable::Ammonia, "high")], "poor"),
                Rule::new(&[(Variable::Odor, "pungent")], "poor"),
            ],
            ..Self::standard()
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len() + self.safety.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.safety.is_empty()
    }

    /// Variáveis exigidas em toda chamada (referenciadas por regras regulares)
    pub fn required_variables(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self.rules.iter().flat_map(Rule::variables).collect();
        vars.sort();
        vars.dedup();
        vars
    }
}
