//! Documento de configuração do motor (compost.toml / compost.json)
//!
//! Descreve variáveis, termos, regras e método de defuzzificação. A carga
//! valida tudo de uma vez e devolve erros de configuração; um documento
//! aceito sempre produz um motor utilizável.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{InputVariable, OutputVariable, TermCatalog};
use crate::defuzz::DefuzzMethod;
use crate::engine::InferenceEngine;
use crate::error::{FisError, FisResult};
use crate::rules::{Rule, RuleBase};

/// Nomes procurados por [`FisConfig::find_and_load`], em ordem
pub const CONFIG_FILE_NAMES: [&str; 2] = ["compost.toml", "compost.json"];

/// Configuração completa de um sistema de inferência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FisConfig {
    #[serde(default)]
    pub defuzzification: DefuzzMethod,

    pub inputs: Vec<InputVariable>,

    pub output: OutputVariable,

    pub rules: Vec<Rule>,

    /// Regras de veto, puladas quando a variável não é fornecida
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_rules: Vec<Rule>,
}

/// Formato do documento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Deduz o formato pela extensão; TOML por padrão
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl FisConfig {
    /// Tabelas de referência
    pub fn standard() -> Self {
        Self::from_parts(TermCatalog::standard(), RuleBase::standard(), DefuzzMethod::default())
    }

    /// Tabelas de referência com vetos de amônia e odor
    pub fn standard_with_safety() -> Self {
        Self::from_parts(
            TermCatalog::standard_with_safety(),
            RuleBase::standard_with_safety(),
            DefuzzMethod::default(),
        )
    }

    /// Acrescenta os vetos padrão de amônia e odor a uma configuração qualquer
    ///
    /// Variáveis e termos ausentes são copiados das tabelas de referência;
    /// regras já presentes não são duplicadas. O termo de saída `poor` precisa
    /// existir, senão [`FisConfig::build`] falha com `UndefinedTerm`.
    pub fn with_standard_safety(mut self) -> Self {
        let reference = TermCatalog::standard_with_safety();
        let safety = RuleBase::standard_with_safety().safety;

        for rule in &safety {
            for variable in rule.when.keys() {
                let Some(source) = reference.inputs.iter().find(|v| v.variable == *variable) else {
                    continue;
                };
                match self.inputs.iter_mut().find(|v| v.variable == *variable) {
                    Some(existing) => {
                        for term in &source.terms {
                            if existing.term_index(&term.name).is_none() {
                                existing.terms.push(term.clone());
                            }
                        }
                    }
                    None => self.inputs.push(source.clone()),
                }
            }
        }

        for rule in safety {
            if !self.safety_rules.contains(&rule) {
                self.safety_rules.push(rule);
            }
        }
        self
    }

    pub fn from_parts(catalog: TermCatalog, rules: RuleBase, defuzzification: DefuzzMethod) -> Self {
        Self {
            defuzzification,
            inputs: catalog.inputs,
            output: catalog.output,
            rules: rules.rules,
            safety_rules: rules.safety,
        }
    }

    pub fn from_toml_str(content: &str) -> FisResult<Self> {
        toml::from_str(content).map_err(|e| FisError::Parse(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn from_json_str(content: &str) -> FisResult<Self> {
        serde_json::from_str(content).map_err(|e| FisError::Parse(format!("Failed to parse JSON config: {}", e)))
    }

    pub fn from_str_as(content: &str, format: ConfigFormat) -> FisResult<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml_str(content),
            ConfigFormat::Json => Self::from_json_str(content),
        }
    }

    /// Carrega de arquivo; o formato vem da extensão
    pub fn from_file(path: &Path) -> FisResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FisError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_str_as(&content, ConfigFormat::from_path(path))
    }

    /// Procura `compost.toml` (ou `compost.json`) subindo a partir de `start_dir`
    pub fn find_and_load(start_dir: &Path) -> FisResult<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    let config = Self::from_file(&candidate)?;
                    return Ok(Some((config, candidate)));
                }
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    pub fn to_toml_string(&self) -> FisResult<String> {
        toml::to_string_pretty(self).map_err(|e| FisError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn to_json_string(&self) -> FisResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FisError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Valida e separa em catálogo, regras e método
    pub fn into_parts(self) -> FisResult<(TermCatalog, RuleBase, DefuzzMethod)> {
        let catalog = TermCatalog::new(self.inputs, self.output)?;
        let rules = RuleBase::with_safety(self.rules, self.safety_rules)?;
        self.defuzzification.validate()?;
        Ok((catalog, rules, self.defuzzification))
    }

    /// Constrói o motor; todo erro de configuração aparece aqui
    pub fn build(self) -> FisResult<InferenceEngine> {
        let (catalog, rules, method) = self.into_parts()?;
        InferenceEngine::with_method(catalog, rules, method)
    }
}

impl Default for FisConfig {
    fn default() -> Self {
        Self::standard()
    }
}
