//! Core constraint types: configuration/evaluator traits, per-constraint
//! results and the aggregate observability verdict.

use std::fmt;

use hifitime::Epoch;
use ndarray::Array2;

use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;

/// A contiguous run of sample instants where a constraint is violated
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintViolation {
    /// First violating sample
    pub start_time: Epoch,
    /// Last violating sample
    pub end_time: Epoch,
    /// Maximum severity of violation in this window (0.0 = just violated, 1.0+ = severe)
    pub max_severity: f64,
    /// Human-readable description of the violation
    pub description: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConstraintViolation(start='{}', end='{}', max_severity={:.3}, description='{}')",
            self.start_time, self.end_time, self.max_severity, self.description
        )
    }
}

/// Result of evaluating one constraint at a list of instants
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintResult {
    /// Violation windows, in time order
    pub violations: Vec<ConstraintViolation>,
    /// Per-instant pass/fail, aligned with `times`
    pub satisfied: Vec<bool>,
    /// Whether the constraint held at every instant
    pub all_satisfied: bool,
    pub constraint_name: String,
    pub times: Vec<Epoch>,
}

impl ConstraintResult {
    pub fn new(
        violations: Vec<ConstraintViolation>,
        satisfied: Vec<bool>,
        constraint_name: String,
        times: Vec<Epoch>,
    ) -> Self {
        let all_satisfied = satisfied.iter().all(|&ok| ok);
        ConstraintResult {
            violations,
            satisfied,
            all_satisfied,
            constraint_name,
            times,
        }
    }

    /// Whether the constraint held at `time`, if `time` was evaluated
    pub fn in_constraint(&self, time: &Epoch) -> Option<bool> {
        self.times
            .iter()
            .position(|t| t == time)
            .map(|idx| self.satisfied[idx])
    }
}

/// Configuration for one constraint kind
///
/// Serializable so constraint sets can live in TOML/JSON files.
pub trait ConstraintConfig: fmt::Debug + Send + Sync {
    /// Create a constraint evaluator from this configuration
    fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator>;

    /// Serialize to JSON
    fn to_json(&self) -> String;
}

/// A pure predicate over (site, target, instant)
///
/// Implementations must not keep state between calls.
pub trait ConstraintEvaluator: Send + Sync {
    /// Whether the constraint holds at one instant, with a severity in [0, 1]
    /// that is meaningful only when it does not hold
    fn check(&self, site: &Site, target: &SkyTarget, time: &Epoch) -> Result<(bool, f64)>;

    /// Describe a violation at `time` for reports and logs
    fn describe(&self, site: &Site, target: &SkyTarget, time: &Epoch) -> String;

    /// Get constraint name
    fn name(&self) -> String;

    /// Evaluate the constraint at every instant in `times`
    fn evaluate(&self, site: &Site, target: &SkyTarget, times: &[Epoch]) -> Result<ConstraintResult> {
        let mut outcomes = Vec::with_capacity(times.len());
        for time in times {
            outcomes.push(self.check(site, target, time)?);
        }

        let violations = track_violations(times, &outcomes, |i| {
            self.describe(site, target, &times[i])
        });
        let satisfied = outcomes.iter().map(|(ok, _)| *ok).collect();

        Ok(ConstraintResult::new(
            violations,
            satisfied,
            self.name(),
            times.to_vec(),
        ))
    }
}

/// Group consecutive violated samples into windows
///
/// `outcomes[i]` is `(satisfied, severity)` at `times[i]`; `describe` is
/// called with the index of the first sample of each window.
pub fn track_violations<F>(
    times: &[Epoch],
    outcomes: &[(bool, f64)],
    describe: F,
) -> Vec<ConstraintViolation>
where
    F: Fn(usize) -> String,
{
    let mut violations = Vec::new();
    let mut current_violation: Option<(usize, f64)> = None;

    for (i, &(satisfied, severity)) in outcomes.iter().enumerate() {
        if !satisfied {
            current_violation = match current_violation {
                Some((start_idx, max_sev)) => Some((start_idx, max_sev.max(severity))),
                None => Some((i, severity)),
            };
        } else if let Some((start_idx, max_severity)) = current_violation.take() {
            violations.push(ConstraintViolation {
                start_time: times[start_idx],
                end_time: times[i - 1],
                max_severity,
                description: describe(start_idx),
            });
        }
    }

    // Close any open violation at the end
    if let Some((start_idx, max_severity)) = current_violation {
        violations.push(ConstraintViolation {
            start_time: times[start_idx],
            end_time: times[times.len() - 1],
            max_severity,
            description: describe(start_idx),
        });
    }

    violations
}

/// Per-(constraint, instant) outcome of an observability check
#[derive(Clone, Debug, PartialEq)]
pub struct ObservabilityVerdict {
    /// Rows follow the constraint set order
    pub constraint_names: Vec<String>,
    /// Columns follow the sample instants
    pub times: Vec<Epoch>,
    /// `cells[[c, t]]` is true when constraint `c` holds at `times[t]`
    pub cells: Array2<bool>,
    /// Logical AND over every cell
    pub all_satisfied: bool,
    /// Per-constraint results, including violation windows
    pub results: Vec<ConstraintResult>,
}

impl ObservabilityVerdict {
    pub fn from_results(results: Vec<ConstraintResult>, times: &[Epoch]) -> Self {
        let mut cells = Array2::from_elem((results.len(), times.len()), true);
        for (c, result) in results.iter().enumerate() {
            for (t, &ok) in result.satisfied.iter().enumerate() {
                cells[[c, t]] = ok;
            }
        }
        let all_satisfied = cells.iter().all(|&ok| ok);
        ObservabilityVerdict {
            constraint_names: results.iter().map(|r| r.constraint_name.clone()).collect(),
            times: times.to_vec(),
            cells,
            all_satisfied,
            results,
        }
    }

    pub fn is_observable(&self) -> bool {
        self.all_satisfied
    }

    /// Whether every constraint held at sample `index`
    pub fn instant_satisfied(&self, index: usize) -> bool {
        self.cells.column(index).iter().all(|&ok| ok)
    }

    /// Names of constraints that failed at one or more instants
    pub fn failing_constraints(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.all_satisfied)
            .map(|r| r.constraint_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::epoch_from_jd;

    fn times(n: usize) -> Vec<Epoch> {
        (0..n).map(|i| epoch_from_jd(2459000.0 + i as f64)).collect()
    }

    #[test]
    fn test_track_violations_groups_runs() {
        let t = times(6);
        let outcomes = [
            (true, 0.0),
            (false, 0.2),
            (false, 0.7),
            (true, 0.0),
            (false, 0.1),
            (false, 0.3),
        ];
        let v = track_violations(&t, &outcomes, |i| format!("from {i}"));
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].start_time, t[1]);
        assert_eq!(v[0].end_time, t[2]);
        assert_eq!(v[0].max_severity, 0.7);
        assert_eq!(v[0].description, "from 1");
        assert_eq!(v[1].start_time, t[4]);
        assert_eq!(v[1].end_time, t[5]);
    }

    #[test]
    fn test_track_violations_all_ok() {
        let t = times(3);
        let outcomes = [(true, 0.0); 3];
        assert!(track_violations(&t, &outcomes, |_| String::new()).is_empty());
    }

    #[test]
    fn test_verdict_is_and_over_matrix() {
        let t = times(3);
        let ok = ConstraintResult::new(vec![], vec![true, true, true], "a".into(), t.clone());
        let mid_fail =
            ConstraintResult::new(vec![], vec![true, false, true], "b".into(), t.clone());

        let verdict = ObservabilityVerdict::from_results(vec![ok.clone(), mid_fail], &t);
        assert!(!verdict.is_observable());
        assert!(verdict.instant_satisfied(0));
        assert!(!verdict.instant_satisfied(1));
        assert_eq!(verdict.failing_constraints(), vec!["b"]);
        assert_eq!(verdict.cells.dim(), (2, 3));

        let verdict = ObservabilityVerdict::from_results(vec![ok], &t);
        assert!(verdict.is_observable());
        assert_eq!(verdict.results[0].in_constraint(&t[2]), Some(true));
    }
}
