//! Motor de inferência Mamdani
//!
//! Fuzzificação → avaliação das regras (E = mínimo) → agregação (OU = máximo)
//! → defuzzificação → rótulo. O motor não guarda estado entre chamadas: o
//! catálogo e as regras são validados e compilados uma vez na construção e
//! depois apenas lidos, então clones do motor podem ser usados em qualquer
//! número de threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::catalog::TermCatalog;
use crate::defuzz::DefuzzMethod;
use crate::error::{FisError, FisResult};
use crate::rules::{Rule, RuleBase};
use crate::types::{Fuzzification, InferenceResult, Measurements, QualityLabel, Variable};

/// Teto do score quando um veto de segurança dispara
pub const SAFETY_SCORE_CAP: f64 = 40.0;

/// Regra com termos resolvidos para índices do catálogo
#[derive(Debug, Clone)]
struct CompiledRule {
    /// (índice da variável de entrada, índice do termo)
    antecedents: Vec<(usize, usize)>,
    consequent: usize,
}

impl CompiledRule {
    fn compile(index: usize, rule: &Rule, catalog: &TermCatalog) -> FisResult<Self> {
        let undefined = |variable: &str, term: &str| FisError::UndefinedTerm {
            rule: index,
            variable: variable.to_string(),
            term: term.to_string(),
        };

        let antecedents = rule
            .when
            .iter()
            .map(|(variable, term)| -> FisResult<(usize, usize)> {
                let var_idx = catalog
                    .input_index(*variable)
                    .ok_or_else(|| undefined(variable.name(), term.as_str()))?;
                let term_idx = catalog.inputs[var_idx]
                    .term_index(term)
                    .ok_or_else(|| undefined(variable.name(), term.as_str()))?;
                Ok((var_idx, term_idx))
            })
            .collect::<FisResult<Vec<_>>>()?;

        let consequent = catalog
            .output
            .term_index(&rule.then)
            .ok_or_else(|| undefined(catalog.output.name.as_str(), rule.then.as_str()))?;

        Ok(Self { antecedents, consequent })
    }

    /// Força de disparo; `Err` com o índice da primeira variável ausente
    fn strength(&self, degrees: &[Option<Vec<f64>>]) -> Result<f64, usize> {
        self.antecedents.iter().try_fold(1.0_f64, |acc, &(v, t)| {
            degrees[v].as_ref().map(|mu| acc.min(mu[t])).ok_or(v)
        })
    }
}

#[derive(Debug)]
struct Inner {
    catalog: TermCatalog,
    rules: RuleBase,
    method: DefuzzMethod,
    compiled: Vec<CompiledRule>,
    safety: Vec<CompiledRule>,
    required: Vec<Variable>,
}

/// Motor de inferência imutável e compartilhável
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inner: Arc<Inner>,
}

impl InferenceEngine {
    /// Cria o motor com defuzzificação por centroides ponderados
    pub fn new(catalog: TermCatalog, rules: RuleBase) -> FisResult<Self> {
        Self::with_method(catalog, rules, DefuzzMethod::default())
    }

    /// Cria o motor com o método de defuzzificação informado
    ///
    /// Todos os erros de configuração aparecem aqui, nunca em [`infer`].
    ///
    /// [`infer`]: InferenceEngine::infer
    pub fn with_method(catalog: TermCatalog, rules: RuleBase, method: DefuzzMethod) -> FisResult<Self> {
        catalog.validate()?;
        rules.validate()?;
        method.validate()?;

        let compiled = rules
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| CompiledRule::compile(i, r, &catalog))
            .collect::<FisResult<Vec<_>>>()?;

        let offset = rules.rules.len();
        let safety = rules
            .safety
            .iter()
            .enumerate()
            .map(|(i, r)| CompiledRule::compile(offset + i, r, &catalog))
            .collect::<FisResult<Vec<_>>>()?;

        let required = rules.required_variables();

        debug!(
            inputs = catalog.inputs.len(),
            rules = compiled.len(),
            safety_rules = safety.len(),
            ?method,
            "inference engine ready"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                catalog,
                rules,
                method,
                compiled,
                safety,
                required,
            }),
        })
    }

    /// Motor de três entradas com as tabelas de referência
    pub fn standard() -> FisResult<Self> {
        Self::new(TermCatalog::standard(), RuleBase::standard())
    }

    /// Motor padrão com vetos de amônia e odor habilitados
    pub fn standard_with_safety() -> FisResult<Self> {
        Self::new(TermCatalog::standard_with_safety(), RuleBase::standard_with_safety())
    }

    pub fn catalog(&self) -> &TermCatalog {
        &self.inner.catalog
    }

    pub fn rules(&self) -> &RuleBase {
        &self.inner.rules
    }

    pub fn method(&self) -> DefuzzMethod {
        self.inner.method
    }

    /// Variáveis que toda chamada precisa fornecer
    pub fn required_inputs(&self) -> &[Variable] {
        &self.inner.required
    }

    /// Graus de pertinência das variáveis fornecidas e presentes no catálogo
    pub fn fuzzify(&self, measurements: &Measurements) -> Fuzzification {
        let degrees = self
            .inner
            .catalog
            .inputs
            .iter()
            .filter_map(|var| {
                let x = measurements.get(var.variable)?;
                let terms = var
                    .terms
                    .iter()
                    .map(|t| (t.name.clone(), t.membership.degree(x)))
                    .collect::<BTreeMap<_, _>>();
                Some((var.variable, terms))
            })
            .collect();

        Fuzzification { degrees }
    }

    /// Executa uma inferência completa
    ///
    /// Falha com [`FisError::MissingInput`] antes de qualquer cálculo se uma
    /// variável exigida pelas regras regulares estiver ausente. Variáveis
    /// extras são ignoradas, exceto pelas regras de segurança que as usam.
    pub fn infer(&self, measurements: &Measurements) -> FisResult<InferenceResult> {
        let inner = &*self.inner;

        if let Some(missing) = inner.required.iter().find(|v| !measurements.contains(**v)) {
            return Err(FisError::MissingInput(*missing));
        }

        // 1. Fuzzificação
        let degrees: Vec<Option<Vec<f64>>> = inner
            .catalog
            .inputs
            .iter()
            .map(|var| {
                measurements
                    .get(var.variable)
                    .map(|x| var.terms.iter().map(|t| t.membership.degree(x)).collect())
            })
            .collect();

        // 2–3. Regras (mínimo) e agregação (máximo)
        let mut aggregated = vec![0.0_f64; inner.catalog.output.terms.len()];

        for (i, rule) in inner.compiled.iter().enumerate() {
            let strength = rule
                .strength(&degrees)
                .map_err(|v| FisError::MissingInput(inner.catalog.inputs[v].variable))?;
            trace!(rule = i, strength, "rule evaluated");
            aggregated[rule.consequent] = aggregated[rule.consequent].max(strength);
        }

        let mut veto = 0.0_f64;
        for (i, rule) in inner.safety.iter().enumerate() {
            match rule.strength(&degrees) {
                Ok(strength) => {
                    trace!(safety_rule = i, strength, "safety rule evaluated");
                    aggregated[rule.consequent] = aggregated[rule.consequent].max(strength);
                    veto = veto.max(strength);
                }
                Err(_) => trace!(safety_rule = i, "safety rule skipped, input absent"),
            }
        }

        // 4–5. Defuzzificação e rótulo
        let (mut score, mut label) = match inner.method.defuzzify(&inner.catalog.output, &aggregated) {
            Some(score) => (score, QualityLabel::from_score(score)),
            None => (0.0, QualityLabel::Undetermined),
        };

        // Veto de segurança: qualquer regra de segurança disparada força Poor
        let vetoed = veto > 0.0;
        if vetoed {
            score = score.min(SAFETY_SCORE_CAP);
            label = QualityLabel::Poor;
            debug!(veto, score, "safety veto applied");
        }

        if label == QualityLabel::Undetermined {
            warn!("no rule fired, result undetermined");
        }

        let firing_strengths = inner
            .catalog
            .output
            .terms
            .iter()
            .zip(&aggregated)
            .map(|(t, s)| (t.name.clone(), *s))
            .collect();

        debug!(score, %label, "inference complete");

        Ok(InferenceResult {
            score,
            label,
            firing_strengths,
            vetoed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipFn;
    use crate::types::OdorLevel;

    fn engine() -> InferenceEngine {
        InferenceEngine::standard().unwrap()
    }

    #[test]
    fn test_optimal_conditions_are_excellent() {
        let result = engine().infer(&Measurements::standard(40.0, 45.0, 6.75)).unwrap();
        assert_eq!(result.strength("excellent"), 1.0);
        assert!((result.score - 96.0).abs() < 1e-9);
        assert_eq!(result.label, QualityLabel::Excellent);
    }

    #[test]
    fn test_hot_dry_acidic_is_poor() {
        let result = engine().infer(&Measurements::standard(80.0, 20.0, 4.0)).unwrap();
        assert_eq!(result.strength("poor"), 1.0);
        assert!(result.score <= 45.0);
        assert_eq!(result.label, QualityLabel::Poor);
    }

    #[test]
    fn test_firing_strength_is_minimum_of_memberships() {
        let engine = engine();
        let catalog = engine.catalog();

        // 100% está no pé direito do trapézio "wet", então o mínimo é 0
        let m = Measurements::standard(45.0, 100.0, 3.0);
        let expected = [
            catalog.degree(Variable::Acidity, "acidic", 3.0).unwrap(),
            catalog.degree(Variable::Temperature, "ideal", 45.0).unwrap(),
            catalog.degree(Variable::Humidity, "wet", 100.0).unwrap(),
        ]
        .into_iter()
        .fold(1.0, f64::min);
        let result = engine.infer(&m).unwrap();
        assert_eq!(result.strength("poor"), expected);
        assert_eq!(expected, 0.0);
        assert!(result.is_undetermined());

        // Dentro do platô de "wet" a regra dispara em min(1, 0.5, 1)
        let result = engine.infer(&Measurements::standard(45.0, 70.0, 3.0)).unwrap();
        assert!((result.strength("poor") - 0.5).abs() < 1e-12);
        assert_eq!(result.score, 20.0);
        assert_eq!(result.label, QualityLabel::Poor);
    }

    #[test]
    fn test_missing_input_fails_fast() {
        let m = Measurements::new()
            .with(Variable::Temperature, 40.0)
            .with(Variable::Humidity, 45.0);
        assert_eq!(engine().infer(&m), Err(FisError::MissingInput(Variable::Acidity)));
    }

    #[test]
    fn test_no_rule_matches_is_undetermined() {
        // neutro + frio + seco não é coberto por nenhuma regra
        let result = engine().infer(&Measurements::standard(10.0, 10.0, 6.75)).unwrap();
        assert_eq!(result.label, QualityLabel::Undetermined);
        assert_eq!(result.score, 0.0);
        assert!(result.firing_strengths.values().all(|s| *s == 0.0));
        assert_eq!(result.firing_strengths.len(), 4);
    }

    #[test]
    fn test_extra_inputs_ignored_by_standard_engine() {
        let base = engine().infer(&Measurements::standard(40.0, 45.0, 6.75)).unwrap();
        let extended = engine()
            .infer(
                &Measurements::standard(40.0, 45.0, 6.75)
                    .with(Variable::Ammonia, 500.0)
                    .with(Variable::Odor, 9.0),
            )
            .unwrap();
        assert_eq!(base, extended);
    }

    #[test]
    fn test_undefined_term_rejected_at_construction() {
        let mut rules = RuleBase::standard();
        rules.rules.push(Rule::new(&[(Variable::Temperature, "warm")], "good"));
        let err = InferenceEngine::new(TermCatalog::standard(), rules).unwrap_err();
        assert_eq!(
            err,
            FisError::UndefinedTerm {
                rule: 16,
                variable: "temperature".into(),
                term: "warm".into()
            }
        );
    }

    #[test]
    fn test_undefined_variable_and_consequent_rejected() {
        let rules = RuleBase::new(vec![Rule::new(&[(Variable::Ammonia, "high")], "poor")]).unwrap();
        assert!(InferenceEngine::new(TermCatalog::standard(), rules).is_err());

        let rules = RuleBase::new(vec![Rule::new(&[(Variable::Acidity, "neutral")], "superb")]).unwrap();
        let err = InferenceEngine::new(TermCatalog::standard(), rules).unwrap_err();
        assert!(matches!(err, FisError::UndefinedTerm { ref term, .. } if term == "superb"));
    }

    #[test]
    fn test_invalid_catalog_rejected_at_construction() {
        let mut catalog = TermCatalog::standard();
        catalog.inputs[0].terms[0].membership = MembershipFn::trapezoidal(30.0, 20.0, 0.0, 0.0);
        let err = InferenceEngine::new(catalog, RuleBase::standard()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_required_inputs() {
        assert_eq!(
            engine().required_inputs(),
            &[Variable::Temperature, Variable::Humidity, Variable::Acidity]
        );
    }

    #[test]
    fn test_fuzzify_reports_present_variables() {
        let f = engine().fuzzify(&Measurements::standard(35.0, 45.0, 6.75).with(Variable::Ammonia, 40.0));
        assert_eq!(f.degree(Variable::Temperature, "ideal"), Some(0.5));
        assert_eq!(f.degree(Variable::Humidity, "moderate"), Some(1.0));
        assert_eq!(f.dominant(Variable::Acidity), Some(("neutral", 1.0)));
        // amônia não pertence ao catálogo padrão
        assert!(!f.degrees.contains_key(&Variable::Ammonia));
    }

    #[test]
    fn test_safety_rules_veto() {
        let engine = InferenceEngine::standard_with_safety().unwrap();

        let clean = engine.infer(&Measurements::standard(40.0, 45.0, 6.75)).unwrap();
        assert_eq!(clean.label, QualityLabel::Excellent);
        assert!(!clean.vetoed);

        // Odor podre sob condições ideais: média seria 58, o veto força Poor ≤ 40
        let putrid = engine
            .infer(&Measurements::standard(40.0, 45.0, 6.75).with_odor(OdorLevel::Putrid))
            .unwrap();
        assert_eq!(putrid.strength("poor"), 1.0);
        assert_eq!(putrid.strength("excellent"), 1.0);
        assert!(putrid.vetoed);
        assert_eq!(putrid.label, QualityLabel::Poor);
        assert_eq!(putrid.score, SAFETY_SCORE_CAP);

        let ammonia = engine
            .infer(&Measurements::standard(40.0, 45.0, 6.75).with(Variable::Ammonia, 200.0))
            .unwrap();
        assert!(ammonia.vetoed);
        assert_eq!(ammonia.label, QualityLabel::Poor);
        assert!(ammonia.score <= 40.0);

        let partial = engine
            .infer(&Measurements::standard(80.0, 20.0, 7.0).with(Variable::Ammonia, 27.5))
            .unwrap();
        assert!((partial.strength("poor") - 0.5).abs() < 1e-12);
        assert_eq!(partial.label, QualityLabel::Poor);
    }

    #[test]
    fn test_safety_veto_keeps_lower_score() {
        let engine = InferenceEngine::standard_with_safety().unwrap();
        // Poor genuíno (20) fica abaixo do teto e não sobe
        let r = engine
            .infer(&Measurements::standard(80.0, 20.0, 4.0).with_odor(OdorLevel::Putrid))
            .unwrap();
        assert!(r.vetoed);
        assert_eq!(r.score, 20.0);
        assert_eq!(r.label, QualityLabel::Poor);
    }

    #[test]
    fn test_safety_rule_at_zero_does_not_veto() {
        let engine = InferenceEngine::standard_with_safety().unwrap();
        let r = engine
            .infer(
                &Measurements::standard(40.0, 45.0, 6.75)
                    .with(Variable::Ammonia, 10.0)
                    .with_odor(OdorLevel::Earthy),
            )
            .unwrap();
        assert!(!r.vetoed);
        assert_eq!(r.label, QualityLabel::Excellent);
    }

    #[test]
    fn test_discrete_centroid_method() {
        let engine = InferenceEngine::with_method(
            TermCatalog::standard(),
            RuleBase::standard(),
            DefuzzMethod::DiscreteCentroid { samples: 101 },
        )
        .unwrap();
        let result = engine.infer(&Measurements::standard(40.0, 45.0, 6.75)).unwrap();
        assert_eq!(result.label, QualityLabel::Excellent);
        assert!((result.score - 96.375).abs() < 1e-9);
    }
}
