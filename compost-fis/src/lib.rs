//! # compost-fis — Inferência fuzzy de maturidade do composto
//!
//! Converte medições contínuas do ambiente de compostagem (temperatura,
//! umidade, pH e, opcionalmente, amônia e odor) em um score de qualidade
//! [0, 100] e um rótulo categórico, usando um controlador Mamdani.
//!
//! ## Pipeline
//!
//! 1. **Fuzzificação**: cada leitura vira graus de pertinência por termo
//! 2. **Regras**: conjunção por mínimo
//! 3. **Agregação**: disjunção por máximo entre regras do mesmo termo
//! 4. **Defuzzificação**: média dos centroides ponderada pelas forças
//! 5. **Rótulo**: Poor ≤ 45 < Moderate ≤ 75 < Good ≤ 92 < Excellent
//!
//! Quando nenhuma regra dispara o resultado é `Undetermined` com score 0,
//! distinto de um `Poor` genuíno.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use compost_fis::{InferenceEngine, Measurements, QualityLabel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = InferenceEngine::standard()?;
//! let result = engine.infer(&Measurements::standard(40.0, 45.0, 6.75))?;
//!
//! assert_eq!(result.label, QualityLabel::Excellent);
//! assert!((result.score - 96.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Módulos
//!
//! - [`membership`] - Funções de pertinência
//! - [`catalog`] - Catálogo de termos
//! - [`rules`] - Base de regras
//! - [`engine`] - Motor de inferência
//! - [`defuzz`] - Métodos de defuzzificação
//! - [`config`] - Documentos TOML/JSON
//! - [`types`] - Leituras, rótulos e resultado
//! - [`error`] - Tratamento de erros

pub mod catalog;
pub mod config;
pub mod defuzz;
pub mod engine;
pub mod error;
pub mod membership;
pub mod rules;
pub mod types;

pub use catalog::{InputTerm, InputVariable, OutputTerm, OutputVariable, TermCatalog};
pub use config::{ConfigFormat, FisConfig, CONFIG_FILE_NAMES};
pub use defuzz::DefuzzMethod;
pub use engine::{InferenceEngine, SAFETY_SCORE_CAP};
pub use error::{FisError, FisResult};
pub use membership::{trapezoidal, triangular, MembershipFn};
pub use rules::{Rule, RuleBase};
pub use types::{Fuzzification, InferenceResult, Measurements, OdorLevel, QualityLabel, Variable};
