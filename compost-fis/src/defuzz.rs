//! Defuzzificação da saída agregada

use serde::{Deserialize, Serialize};

use crate::catalog::OutputVariable;
use crate::error::{FisError, FisResult};

/// Método de defuzzificação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DefuzzMethod {
    /// `Σ(força·centroide) / Σ(força)` sobre os centroides fixos dos termos
    #[default]
    WeightedCentroids,
    /// Centro de gravidade discreto: corta cada forma na sua força, une por
    /// máximo e amostra `samples` pontos do domínio de saída
    DiscreteCentroid { samples: usize },
}

impl DefuzzMethod {
    pub fn validate(&self) -> FisResult<()> {
        match *self {
            DefuzzMethod::DiscreteCentroid { samples } if samples < 2 => Err(
                FisError::Configuration(format!("discrete centroid needs at least 2 samples, got {samples}")),
            ),
            _ => Ok(()),
        }
    }

    /// Score crisp para as forças agregadas (uma por termo de saída, na ordem
    /// do catálogo); `None` quando nenhuma força é positiva
    pub fn defuzzify(&self, output: &OutputVariable, strengths: &[f64]) -> Option<f64> {
        match *self {
            DefuzzMethod::WeightedCentroids => weighted_centroids(output, strengths),
            DefuzzMethod::DiscreteCentroid { samples } => discrete_centroid(output, strengths, samples),
        }
    }
}

fn weighted_centroids(output: &OutputVariable, strengths: &[f64]) -> Option<f64> {
    let (num, den) = output
        .terms
        .iter()
        .zip(strengths)
        .filter(|(_, s)| **s > 0.0)
        .fold((0.0_f64, 0.0_f64), |(num, den), (term, s)| (num + s * term.centroid, den + s));

    (den > 0.0).then(|| num / den)
}

fn discrete_centroid(output: &OutputVariable, strengths: &[f64], samples: usize) -> Option<f64> {
    if !strengths.iter().any(|s| *s > 0.0) {
        return None;
    }

    let [lo, hi] = output.domain;
    let step = (hi - lo) / (samples - 1) as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for i in 0..samples {
        let x = lo + step * i as f64;
        let mu = output
            .terms
            .iter()
            .zip(strengths)
            .map(|(term, s)| s.min(term.membership.degree(x)))
            .fold(0.0, f64::max);
        num += x * mu;
        den += mu;
    }

    (den > 0.0).then(|| num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TermCatalog;

    #[test]
    fn test_weighted_single_term() {
        let out = TermCatalog::standard().output;
        let score = DefuzzMethod::WeightedCentroids.defuzzify(&out, &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(score, Some(96.0));
    }

    #[test]
    fn test_weighted_mix() {
        let out = TermCatalog::standard().output;
        // (0.5·20 + 0.5·60) / 1.0
        let score = DefuzzMethod::WeightedCentroids
            .defuzzify(&out, &[0.5, 0.5, 0.0, 0.0])
            .unwrap();
        assert!((score - 40.0).abs() < 1e-12);

        // a escala das forças não altera o score
        let scaled = DefuzzMethod::WeightedCentroids
            .defuzzify(&out, &[0.1, 0.1, 0.0, 0.0])
            .unwrap();
        assert!((scaled - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_is_none() {
        let out = TermCatalog::standard().output;
        assert_eq!(DefuzzMethod::WeightedCentroids.defuzzify(&out, &[0.0; 4]), None);
        assert_eq!(
            DefuzzMethod::DiscreteCentroid { samples: 101 }.defuzzify(&out, &[0.0; 4]),
            None
        );
    }

    #[test]
    fn test_discrete_centroid_excellent() {
        let out = TermCatalog::standard().output;
        let score = DefuzzMethod::DiscreteCentroid { samples: 101 }
            .defuzzify(&out, &[0.0, 0.0, 0.0, 1.0])
            .unwrap();
        // forma (90, 95, 100, 100): centro de gravidade entre 95 e 97
        assert!(score > 95.0 && score < 97.0, "score = {score}");
    }

    #[test]
    fn test_discrete_needs_samples() {
        assert!(DefuzzMethod::DiscreteCentroid { samples: 1 }.validate().is_err());
        assert!(DefuzzMethod::DiscreteCentroid { samples: 101 }.validate().is_ok());
        assert!(DefuzzMethod::default().validate().is_ok());
    }

    #[test]
    fn test_method_serde() {
        let json = serde_json::to_string(&DefuzzMethod::DiscreteCentroid { samples: 101 }).unwrap();
        assert_eq!(json, r#"{"method":"discrete_centroid","samples":101}"#);
        let back: DefuzzMethod = serde_json::from_str(r#"{"method":"weighted_centroids"}"#).unwrap();
        assert_eq!(back, DefuzzMethod::WeightedCentroids);
    }
}
