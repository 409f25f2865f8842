//! Funções de pertinência (triangular e trapezoidal)
//!
//! Ambas são puras e totais: qualquer `x` real produz um grau em [0, 1].
//! Parametrizações degeneradas (`a == b` ou `c == d`) formam "ombros"
//! abertos que saturam em 1 na borda do domínio. O teste do pico/platô tem
//! precedência sobre o teste de suporte, então `trapezoidal(0, 0, 0, 30, 40)`
//! vale 1.

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};

/// Grau de pertinência triangular com `a <= b <= c`
pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    if x == b {
        return 1.0;
    }
    if x <= a || x >= c {
        return 0.0;
    }
    if x < b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

/// Grau de pertinência trapezoidal com `a <= b <= c <= d`
pub fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    if b <= x && x <= c {
        return 1.0;
    }
    if x <= a || x >= d {
        return 0.0;
    }
    if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

/// Forma de um termo linguístico
///
/// Serializa como `{ shape = "triangular", points = [30.0, 40.0, 50.0] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "points", rename_all = "lowercase")]
pub enum MembershipFn {
    Triangular([f64; 3]),
    Trapezoidal([f64; 4]),
}

impl MembershipFn {
    pub const fn triangular(a: f64, b: f64, c: f64) -> Self {
        MembershipFn::Triangular([a, b, c])
    }

    pub const fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFn::Trapezoidal([a, b, c, d])
    }

    /// Avalia o grau de pertinência em `x`
    #[inline]
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            MembershipFn::Triangular([a, b, c]) => triangular(x, a, b, c),
            MembershipFn::Trapezoidal([a, b, c, d]) => trapezoidal(x, a, b, c, d),
        }
    }

    /// Pontos de quebra na ordem declarada
    pub fn points(&self) -> &[f64] {
        match self {
            MembershipFn::Triangular(p) => p,
            MembershipFn::Trapezoidal(p) => p,
        }
    }

    /// Verifica se os pontos são finitos e não decrescentes
    pub fn validate(&self, term: &str) -> FisResult<()> {
        let points = self.points();

        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(FisError::InvalidMembership {
                term: term.to_string(),
                reason: format!("breakpoint {bad} is not finite"),
            });
        }

        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(FisError::InvalidMembership {
                term: term.to_string(),
                reason: format!("breakpoints {points:?} must be non-decreasing"),
            });
        }

        Ok(())
    }
}
