//! Leitura de lotes de medições (array JSON ou JSON lines)
//!
//! Cada objeto é um mapa `nome → valor`; nomes aceitam os mesmos apelidos de
//! [`Variable`](compost_fis::Variable) (`ph`, `moisture`, ...). Campos não
//! numéricos como `timestamp` são ignorados.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use compost_fis::{Measurements, Variable};
use serde_json::Value;

/// Uma leitura do lote com o número da linha (ou posição no array, base 1)
#[derive(Debug)]
pub struct Reading {
    pub line: usize,
    pub measurements: Result<Measurements>,
}

/// Converte um objeto JSON em medições
pub fn measurements_from_value(value: &Value) -> Result<Measurements> {
    let Value::Object(map) = value else {
        bail!("expected a JSON object, got {}", value);
    };

    let mut out = Measurements::new();
    for (key, field) in map {
        let Some(number) = field.as_f64() else {
            continue;
        };
        match key.parse::<Variable>() {
            Ok(variable) => out.set(variable, number),
            Err(_) => tracing::debug!(name = %key, "ignoring unknown numeric field"),
        }
    }
    Ok(out)
}

/// Interpreta o conteúdo como array JSON ou, se não for, como JSON lines
pub fn parse_batch(content: &str) -> Result<Vec<Reading>> {
    let trimmed = content.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed).context("invalid JSON array")?;
        return Ok(values
            .iter()
            .enumerate()
            .map(|(i, v)| Reading {
                line: i + 1,
                measurements: measurements_from_value(v),
            })
            .collect());
    }

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| Reading {
            line: i + 1,
            measurements: serde_json::from_str::<Value>(l)
                .with_context(|| format!("invalid JSON on line {}", i + 1))
                .and_then(|v| measurements_from_value(&v)),
        })
        .collect())
}

/// Medições a partir dos argumentos de linha de comando
pub fn measurements_from_args(pairs: BTreeMap<Variable, Option<f64>>) -> Measurements {
    pairs
        .into_iter()
        .filter_map(|(v, x)| x.map(|x| (v, x)))
        .collect()
}
