//! Constraint evaluation modules
//!
//! Observability of a target is decided by a set of independent, pure
//! predicates evaluated at a list of sample instants. The verdict is the
//! logical AND over the full (constraint × instant) matrix.

pub mod altitude;
pub mod core;
pub mod declination;
pub mod magnitude;
pub mod twilight;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;
use crate::utils::config::DEFAULT_MIN_ALTITUDE_DEG;

// Re-export main types
pub use self::altitude::AltitudeConfig;
pub use self::core::{
    track_violations, ConstraintConfig, ConstraintEvaluator, ConstraintResult,
    ConstraintViolation, ObservabilityVerdict,
};
pub use self::declination::DeclinationRangeConfig;
pub use self::magnitude::BrightnessCeilingConfig;
pub use self::twilight::{NightDarknessConfig, TwilightKind};

/// Serializable description of one constraint, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintSpec {
    MinAltitude(AltitudeConfig),
    NightDarkness(NightDarknessConfig),
    DeclinationRange(DeclinationRangeConfig),
    BrightnessCeiling(BrightnessCeilingConfig),
}

impl ConstraintSpec {
    fn config(&self) -> &dyn ConstraintConfig {
        match self {
            ConstraintSpec::MinAltitude(c) => c,
            ConstraintSpec::NightDarkness(c) => c,
            ConstraintSpec::DeclinationRange(c) => c,
            ConstraintSpec::BrightnessCeiling(c) => c,
        }
    }

    pub fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator> {
        self.config().to_evaluator()
    }

    /// Civil twilight plus a 30° altitude floor
    pub fn default_set() -> Vec<ConstraintSpec> {
        vec![
            ConstraintSpec::NightDarkness(NightDarknessConfig {
                twilight: TwilightKind::Civil,
            }),
            ConstraintSpec::MinAltitude(AltitudeConfig::minimum(DEFAULT_MIN_ALTITUDE_DEG)),
        ]
    }
}

/// Ordered collection of constraint evaluators
#[derive(Default)]
pub struct ConstraintSet {
    evaluators: Vec<Box<dyn ConstraintEvaluator>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[ConstraintSpec]) -> Self {
        ConstraintSet {
            evaluators: specs.iter().map(ConstraintSpec::to_evaluator).collect(),
        }
    }

    /// Append any evaluator, including ones defined outside this crate
    pub fn with(mut self, evaluator: Box<dyn ConstraintEvaluator>) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    /// Evaluate every constraint at every instant
    ///
    /// Only the given instants are checked; nothing between them is sampled.
    pub fn evaluate(
        &self,
        site: &Site,
        target: &SkyTarget,
        instants: &[Epoch],
    ) -> Result<ObservabilityVerdict> {
        let results = self
            .evaluators
            .iter()
            .map(|e| e.evaluate(site, target, instants))
            .collect::<Result<Vec<_>>>()?;
        Ok(ObservabilityVerdict::from_results(results, instants))
    }
}

impl std::fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
