//! Catálogo de termos linguísticos
//!
//! Tabela fixa de termos por variável de entrada e por variável de saída.
//! Termos de saída carregam um "centroide" representativo, aproximação de
//! projeto usada apenas como peso na defuzzificação.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};
use crate::membership::MembershipFn;
use crate::types::Variable;

/// Termo de uma variável de entrada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTerm {
    pub name: String,
    pub membership: MembershipFn,
}

/// Variável de entrada e seus termos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputVariable {
    pub variable: Variable,
    /// Domínio declarado; padrão de [`Variable::domain`] quando omitido
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    pub terms: Vec<InputTerm>,
}

impl InputVariable {
    pub fn new(variable: Variable, terms: Vec<InputTerm>) -> Self {
        Self { variable, domain: None, terms }
    }

    pub fn domain(&self) -> (f64, f64) {
        match self.domain {
            Some([lo, hi]) => (lo, hi),
            None => self.variable.domain(),
        }
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }
}

/// Termo da variável de saída
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTerm {
    pub name: String,
    pub membership: MembershipFn,
    pub centroid: f64,
}

/// Variável de saída (score de qualidade)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariable {
    pub name: String,
    pub domain: [f64; 2],
    pub terms: Vec<OutputTerm>,
}

impl OutputVariable {
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }
}

/// Catálogo completo, somente leitura após a construção
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCatalog {
    pub inputs: Vec<InputVariable>,
    pub output: OutputVariable,
}

fn input(name: &str, membership: MembershipFn) -> InputTerm {
    InputTerm { name: name.to_string(), membership }
}

fn output(name: &str, membership: MembershipFn, centroid: f64) -> OutputTerm {
    OutputTerm { name: name.to_string(), membership, centroid }
}

impl TermCatalog {
    /// Constrói e valida o catálogo
    pub fn new(inputs: Vec<InputVariable>, output: OutputVariable) -> FisResult<Self> {
        let catalog = Self { inputs, output };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Tabelas de referência: temperatura, umidade e acidez → qualidade
    pub fn standard() -> Self {
        use MembershipFn as Mf;

        Self {
            inputs: vec![
                InputVariable::new(
                    Variable::Temperature,
                    vec![
                        input("cold", Mf::trapezoidal(0.0, 0.0, 20.0, 30.0)),
                        input("ideal", Mf::triangular(30.0, 40.0, 50.0)),
                        input("hot", Mf::trapezoidal(50.0, 60.0, 100.0, 100.0)),
                    ],
                ),
                InputVariable::new(
                    Variable::Humidity,
                    vec![
                        input("dry", Mf::trapezoidal(0.0, 0.0, 30.0, 40.0)),
                        input("moderate", Mf::triangular(40.0, 45.0, 50.0)),
                        input("wet", Mf::trapezoidal(50.0, 60.0, 80.0, 100.0)),
                    ],
                ),
                InputVariable::new(
                    Variable::Acidity,
                    vec![
                        input("acidic", Mf::trapezoidal(0.0, 0.0, 5.0, 6.0)),
                        input("neutral", Mf::triangular(6.0, 6.75, 7.5)),
                        input("alkaline", Mf::trapezoidal(7.0, 8.0, 14.0, 14.0)),
                    ],
                ),
            ],
            output: OutputVariable {
                name: "quality".to_string(),
                domain: [0.0, 100.0],
                terms: vec![
                    output("poor", Mf::trapezoidal(0.0, 0.0, 30.0, 50.0), 20.0),
                    output("moderate", Mf::triangular(40.0, 60.0, 80.0), 60.0),
                    output("good", Mf::triangular(70.0, 85.0, 95.0), 85.0),
                    output("excellent", Mf::trapezoidal(90.0, 95.0, 100.0, 100.0), 96.0),
                ],
            },
        }
    }

    /// Catálogo padrão acrescido dos termos de segurança (amônia e odor)
    pub fn standard_with_safety() -> Self {
        use MembershipFn as Mf;

        let mut catalog = Self::standard();
        catalog.inputs.push(InputVariable::new(
            Variable::Ammonia,
            vec![input("high", Mf::trapezoidal(25.0, 30.0, 1000.0, 1000.0))],
        ));
        catalog.inputs.push(InputVariable::new(
            Variable::Odor,
            vec![input("pungent", Mf::trapezoidal(6.0, 8.0, 10.0, 10.0))],
        ));
        catalog
    }

    /// Verifica unicidade de nomes, ordenação dos pontos e centroides
    pub fn validate(&self) -> FisResult<()> {
        if self.inputs.is_empty() {
            return Err(FisError::Configuration("catalog has no input variables".into()));
        }

        let mut seen = HashSet::new();
        for var in &self.inputs {
            if !seen.insert(var.variable) {
                return Err(FisError::Configuration(format!(
                    "input variable '{}' declared twice",
                    var.variable
                )));
            }

            let (lo, hi) = var.domain();
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(FisError::Configuration(format!(
                    "invalid domain [{lo}, {hi}] for '{}'",
                    var.variable
                )));
            }

            if var.terms.is_empty() {
                return Err(FisError::Configuration(format!(
                    "input variable '{}' has no terms",
                    var.variable
                )));
            }

            let mut names = HashSet::new();
            for term in &var.terms {
                if !names.insert(term.name.as_str()) {
                    return Err(FisError::Configuration(format!(
                        "term '{}' declared twice for '{}'",
                        term.name, var.variable
                    )));
                }
                term.membership
                    .validate(&format!("{}.{}", var.variable, term.name))?;
            }
        }

        let [lo, hi] = self.output.domain;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(FisError::Configuration(format!(
                "invalid domain [{lo}, {hi}] for output '{}'",
                self.output.name
            )));
        }

        if self.output.terms.is_empty() {
            return Err(FisError::Configuration(format!(
                "output '{}' has no terms",
                self.output.name
            )));
        }

        let mut names = HashSet::new();
        for term in &self.output.terms {
            if !names.insert(term.name.as_str()) {
                return Err(FisError::Configuration(format!(
                    "output term '{}' declared twice",
                    term.name
                )));
            }
            term.membership
                .validate(&format!("{}.{}", self.output.name, term.name))?;

            if !(lo..=hi).contains(&term.centroid) {
                return Err(FisError::Configuration(format!(
                    "centroid {} of '{}' lies outside [{lo}, {hi}]",
                    term.centroid, term.name
                )));
            }
        }

        Ok(())
    }

    pub fn input(&self, variable: Variable) -> Option<&InputVariable> {
        self.inputs.iter().find(|v| v.variable == variable)
    }

    pub(crate) fn input_index(&self, variable: Variable) -> Option<usize> {
        self.inputs.iter().position(|v| v.variable == variable)
    }

    /// Grau de pertinência de `x` no termo `term` da variável
    pub fn degree(&self, variable: Variable, term: &str, x: f64) -> Option<f64> {
        let var = self.input(variable)?;
        let idx = var.term_index(term)?;
        Some(var.terms[idx].membership.degree(x))
    }
}
