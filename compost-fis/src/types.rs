//! Tipos de dados do motor: variáveis medidas, leituras e resultado

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};

/// Variável contínua medida no ambiente de compostagem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    /// Temperatura em °C
    Temperature,
    /// Umidade relativa do material (%)
    Humidity,
    /// Acidez (pH)
    Acidity,
    /// Amônia em ppm
    Ammonia,
    /// Intensidade de odor (ordinal como real, ver [`OdorLevel`])
    Odor,
}

impl Variable {
    pub const ALL: [Variable; 5] = [
        Variable::Temperature,
        Variable::Humidity,
        Variable::Acidity,
        Variable::Ammonia,
        Variable::Odor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::Humidity => "humidity",
            Variable::Acidity => "acidity",
            Variable::Ammonia => "ammonia",
            Variable::Odor => "odor",
        }
    }

    /// Faixa típica do domínio (mín, máx)
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Variable::Temperature => (0.0, 100.0),
            Variable::Humidity => (0.0, 100.0),
            Variable::Acidity => (0.0, 14.0),
            Variable::Ammonia => (0.0, 1000.0),
            Variable::Odor => (0.0, 10.0),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Temperature => "°C",
            Variable::Humidity => "%",
            Variable::Acidity => "pH",
            Variable::Ammonia => "ppm",
            Variable::Odor => "",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(Variable::Temperature),
            "humidity" | "moisture" => Ok(Variable::Humidity),
            "acidity" | "ph" => Ok(Variable::Acidity),
            "ammonia" | "nh3" => Ok(Variable::Ammonia),
            "odor" | "odour" => Ok(Variable::Odor),
            other => Err(FisError::UnknownVariable(other.to_string())),
        }
    }
}

/// Nível de odor reportado pelo nariz eletrônico ou pelo operador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OdorLevel {
    /// Cheiro de terra
    Earthy,
    /// Cheiro perceptível, levemente pungente
    Noticeable,
    /// Podre, pungente
    Putrid,
}

impl OdorLevel {
    /// Valor ordinal consumido pelo motor
    pub fn value(&self) -> f64 {
        match self {
            OdorLevel::Earthy => 1.5,
            OdorLevel::Noticeable => 5.0,
            OdorLevel::Putrid => 9.0,
        }
    }
}

impl FromStr for OdorLevel {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earthy" | "none" | "1" => Ok(OdorLevel::Earthy),
            "noticeable" | "mild" | "2" => Ok(OdorLevel::Noticeable),
            "putrid" | "rotten" | "3" => Ok(OdorLevel::Putrid),
            other => Err(FisError::Configuration(format!("unknown odor level '{other}'"))),
        }
    }
}

/// Leituras de uma chamada de inferência (variável → valor)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurements(BTreeMap<Variable, f64>);

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leituras das três variáveis do motor padrão
    pub fn standard(temperature: f64, humidity: f64, acidity: f64) -> Self {
        Self::new()
            .with(Variable::Temperature, temperature)
            .with(Variable::Humidity, humidity)
            .with(Variable::Acidity, acidity)
    }

    /// Constrói a partir de pares (nome, valor), aceitando apelidos como "ph"
    pub fn from_named<'a, I>(pairs: I) -> FisResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        pairs
            .into_iter()
            .map(|(name, value)| -> FisResult<(Variable, f64)> { Ok((name.parse::<Variable>()?, value)) })
            .collect()
    }

    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.0.insert(variable, value);
        self
    }

    pub fn with_odor(self, odor: OdorLevel) -> Self {
        self.with(Variable::Odor, odor.value())
    }

    pub fn set(&mut self, variable: Variable, value: f64) {
        self.0.insert(variable, value);
    }

    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.0.get(&variable).copied()
    }

    pub fn contains(&self, variable: Variable) -> bool {
        self.0.contains_key(&variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.0.iter().map(|(v, x)| (*v, *x))
    }
}

impl FromIterator<(Variable, f64)> for Measurements {
    fn from_iter<T: IntoIterator<Item = (Variable, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rótulo de qualidade do composto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    Poor,
    Moderate,
    Good,
    Excellent,
    /// Nenhuma regra disparou; não confundir com `Poor`
    Undetermined,
}

impl QualityLabel {
    /// Faixas ascendentes com limite superior inclusivo: 45, 75, 92
    pub fn from_score(score: f64) -> Self {
        if score <= 45.0 {
            QualityLabel::Poor
        } else if score <= 75.0 {
            QualityLabel::Moderate
        } else if score <= 92.0 {
            QualityLabel::Good
        } else {
            QualityLabel::Excellent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Poor => "Poor",
            QualityLabel::Moderate => "Moderate",
            QualityLabel::Good => "Good",
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Undetermined => "Undetermined",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graus de pertinência de uma chamada, por variável e termo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fuzzification {
    pub degrees: BTreeMap<Variable, BTreeMap<String, f64>>,
}

impl Fuzzification {
    pub fn degree(&self, variable: Variable, term: &str) -> Option<f64> {
        self.degrees.get(&variable)?.get(term).copied()
    }

    /// Termo de maior grau para a variável
    pub fn dominant(&self, variable: Variable) -> Option<(&str, f64)> {
        self.degrees
            .get(&variable)?
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(t, mu)| (t.as_str(), *mu))
    }
}

/// Resultado de uma inferência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Score defuzzificado [0, 100]
    pub score: f64,
    pub label: QualityLabel,
    /// Força agregada por termo de saída (0 quando nenhuma regra conclui o termo)
    pub firing_strengths: BTreeMap<String, f64>,
    /// Uma regra de segurança disparou: rótulo forçado a `Poor` e score limitado
    #[serde(default)]
    pub vetoed: bool,
}

impl InferenceResult {
    pub fn is_undetermined(&self) -> bool {
        self.label == QualityLabel::Undetermined
    }

    pub fn strength(&self, term: &str) -> f64 {
        self.firing_strengths.get(term).copied().unwrap_or(0.0)
    }
}
