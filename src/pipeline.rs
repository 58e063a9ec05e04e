//! Catalog planning: per-row outcomes, batch summaries and altitude curves
//!
//! Each catalog row goes through the same steps: parse, pre-filter, roll the
//! ephemeris forward to the window start, require the whole transit inside
//! the night window, then check the constraint set at ingress, mid and
//! egress. A row that fails any step becomes a [`RowOutcome::Skipped`] with
//! a reason; nothing a single row does can abort the batch.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{FixedOffset, NaiveDate};
use hifitime::Epoch;
use ndarray::Array1;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogRow};
use crate::config::ChartConfig;
use crate::constraints::{ConstraintSet, ObservabilityVerdict};
use crate::ephemeris::{EclipseEphemeris, TransitEvent};
use crate::error::{Result, TransitError};
use crate::night::{NightWindow, WindowPolicy};
use crate::site::Site;
use crate::target::{PreFilter, PreFilterRejection, SkyTarget};
use crate::utils::time_utils::{format_local, linspace, parse_clock, utc_instant};

/// Local clock format used in reports and chart labels
pub const LOCAL_TIME_FORMAT: &str = "%I:%M %P";

/// Label used in place of times when no transit falls in the night
pub const NO_TRANSIT_LABEL: &str = "No Transit Today";

/// Why a catalog row produced no record
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingField { field: &'static str },
    FieldParse { field: &'static str },
    InvalidEphemeris(String),
    DeclinationOutOfRange,
    MagnitudeMissing,
    TooFaint,
    OutOfNightWindow,
    /// Names of the constraints that failed at one or more sample instants
    NotObservable { failing: Vec<String> },
    /// The altitude transform rejected an instant
    EvaluationFailed(String),
}

impl SkipReason {
    /// Stable key used when counting skips
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingField { .. } => "missing_field",
            SkipReason::FieldParse { .. } => "field_parse",
            SkipReason::InvalidEphemeris(_) => "invalid_ephemeris",
            SkipReason::DeclinationOutOfRange => "declination_out_of_range",
            SkipReason::MagnitudeMissing => "magnitude_missing",
            SkipReason::TooFaint => "too_faint",
            SkipReason::OutOfNightWindow => "out_of_night_window",
            SkipReason::NotObservable { .. } => "not_observable",
            SkipReason::EvaluationFailed(_) => "evaluation_failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField { field } => write!(f, "missing column '{field}'"),
            SkipReason::FieldParse { field } => write!(f, "unparseable '{field}'"),
            SkipReason::InvalidEphemeris(msg) => write!(f, "invalid ephemeris: {msg}"),
            SkipReason::DeclinationOutOfRange => write!(f, "declination outside pointing limits"),
            SkipReason::MagnitudeMissing => write!(f, "no apparent magnitude"),
            SkipReason::TooFaint => write!(f, "fainter than the magnitude cutoff"),
            SkipReason::OutOfNightWindow => write!(f, "transit not inside the night window"),
            SkipReason::NotObservable { failing } => {
                write!(f, "not observable: {}", failing.join(", "))
            }
            SkipReason::EvaluationFailed(msg) => write!(f, "evaluation failed: {msg}"),
        }
    }
}

impl From<TransitError> for SkipReason {
    fn from(err: TransitError) -> Self {
        match err {
            TransitError::MissingField(field) => SkipReason::MissingField { field },
            TransitError::FieldParse { field, .. } => SkipReason::FieldParse { field },
            TransitError::InvalidEphemeris(msg) => SkipReason::InvalidEphemeris(msg),
            other => SkipReason::EvaluationFailed(other.to_string()),
        }
    }
}

impl From<PreFilterRejection> for SkipReason {
    fn from(rejection: PreFilterRejection) -> Self {
        match rejection {
            PreFilterRejection::DeclinationOutOfRange => SkipReason::DeclinationOutOfRange,
            PreFilterRejection::MagnitudeMissing => SkipReason::MagnitudeMissing,
            PreFilterRejection::TooFaint => SkipReason::TooFaint,
        }
    }
}

/// One line of the transit report
///
/// String fields echo the catalog text; the three times are local clock times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitRecord {
    #[serde(rename = "Planet Name")]
    pub name: String,
    #[serde(rename = "RA")]
    pub ra: String,
    #[serde(rename = "Dec")]
    pub dec: String,
    #[serde(rename = "vmag")]
    pub vmag: String,
    #[serde(rename = "Start Of Transit")]
    pub start: String,
    #[serde(rename = "Peak Of Transit")]
    pub peak: String,
    #[serde(rename = "End Of Transit")]
    pub end: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(skip)]
    pub event: TransitEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(TransitRecord),
    Skipped {
        row: usize,
        name: String,
        reason: SkipReason,
    },
}

impl RowOutcome {
    pub fn record(&self) -> Option<&TransitRecord> {
        match self {
            RowOutcome::Accepted(record) => Some(record),
            RowOutcome::Skipped { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            RowOutcome::Accepted(_) => None,
            RowOutcome::Skipped { reason, .. } => Some(reason),
        }
    }
}

/// Counts over one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut summary = BatchSummary {
            total_rows: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.skip_reason() {
                None => summary.accepted += 1,
                Some(reason) => {
                    summary.skipped += 1;
                    *summary.by_reason.entry(reason.label()).or_insert(0) += 1;
                }
            }
        }
        summary
    }

    pub fn count(&self, label: &str) -> usize {
        self.by_reason.get(label).copied().unwrap_or(0)
    }
}

/// Outcome of planning a whole catalog, in catalog row order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub window: NightWindow,
    pub outcomes: Vec<RowOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Accepted records in catalog order
    pub fn records(&self) -> impl Iterator<Item = &TransitRecord> {
        self.outcomes.iter().filter_map(RowOutcome::record)
    }
}

/// Sampled altitude of one target across one night
#[derive(Debug, Clone, PartialEq)]
pub struct AltitudeCurve {
    pub target: String,
    pub window: NightWindow,
    pub times: Vec<Epoch>,
    /// Altitude in degrees at each of `times`
    pub altitudes: Array1<f64>,
    /// `None` when the next mid-transit falls after sunrise
    pub transit: Option<TransitEvent>,
    pub altitude_limit: f64,
    /// Constraint verdict at ingress, mid and egress, when there is a transit
    pub verdict: Option<ObservabilityVerdict>,
}

impl AltitudeCurve {
    pub fn observable(&self) -> bool {
        self.verdict
            .as_ref()
            .map(ObservabilityVerdict::is_observable)
            .unwrap_or(false)
    }

    /// Start, peak and end labels in local time
    pub fn labels(&self, offset: &FixedOffset) -> [String; 3] {
        match &self.transit {
            Some(event) => event
                .sample_instants()
                .map(|t| format_local(&t, offset, LOCAL_TIME_FORMAT)),
            None => [
                NO_TRANSIT_LABEL.to_string(),
                NO_TRANSIT_LABEL.to_string(),
                NO_TRANSIT_LABEL.to_string(),
            ],
        }
    }

    /// Highest sampled altitude, or `None` for an empty curve
    pub fn peak_altitude(&self) -> Option<f64> {
        self.altitudes.iter().copied().reduce(f64::max)
    }
}

/// Site, pre-filter and constraint set, shared read-only by every row
#[derive(Debug)]
pub struct TransitPlanner {
    pub site: Site,
    pub prefilter: PreFilter,
    pub constraints: ConstraintSet,
    offset: FixedOffset,
}

impl TransitPlanner {
    pub fn new(site: Site, prefilter: PreFilter, constraints: ConstraintSet) -> Result<Self> {
        let offset = site.timezone()?;
        Ok(TransitPlanner {
            site,
            prefilter,
            constraints,
            offset,
        })
    }

    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    /// Render an instant in the site's local time
    pub fn local_time(&self, instant: &Epoch) -> String {
        format_local(instant, &self.offset, LOCAL_TIME_FORMAT)
    }

    /// Next transit after the window opens, kept only if fully inside the
    /// window and every constraint holds at ingress, mid and egress
    pub fn assess_event(
        &self,
        target: &SkyTarget,
        ephemeris: &EclipseEphemeris,
        window: &NightWindow,
    ) -> std::result::Result<TransitEvent, SkipReason> {
        let event = ephemeris.next_event(window.start)?;
        if !window.contains(&event) {
            return Err(SkipReason::OutOfNightWindow);
        }

        let verdict = self
            .constraints
            .evaluate(&self.site, target, &event.sample_instants())?;
        if !verdict.is_observable() {
            return Err(SkipReason::NotObservable {
                failing: verdict
                    .failing_constraints()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            });
        }
        Ok(event)
    }

    /// Pre-filter followed by [`TransitPlanner::assess_event`]
    pub fn assess(
        &self,
        target: &SkyTarget,
        ephemeris: &EclipseEphemeris,
        window: &NightWindow,
    ) -> std::result::Result<TransitEvent, SkipReason> {
        self.prefilter.check(target)?;
        self.assess_event(target, ephemeris, window)
    }

    fn accept_row(
        &self,
        row: &CatalogRow,
        window: &NightWindow,
    ) -> std::result::Result<TransitRecord, SkipReason> {
        let target = row.target()?;
        self.prefilter.check(&target)?;
        let ephemeris = row.ephemeris()?;
        let event = self.assess_event(&target, &ephemeris, window)?;

        let [start, peak, end] = event.sample_instants().map(|t| self.local_time(&t));
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(TransitRecord {
            name: target.name,
            ra: text(&row.ra),
            dec: text(&row.dec),
            vmag: text(&row.vmag),
            start,
            peak,
            end,
            period: text(&row.period),
            duration: text(&row.duration),
            event,
        })
    }

    pub fn process_row(&self, row: &CatalogRow, window: &NightWindow) -> RowOutcome {
        match self.accept_row(row, window) {
            Ok(record) => RowOutcome::Accepted(record),
            Err(reason) => {
                debug!(row = row.index, name = row.display_name(), %reason, "row skipped");
                RowOutcome::Skipped {
                    row: row.index,
                    name: row.display_name().to_string(),
                    reason,
                }
            }
        }
    }

    /// Plan every row against one window; outcomes keep catalog order
    pub fn plan_catalog(&self, catalog: &Catalog, window: &NightWindow) -> BatchReport {
        if !catalog.missing_columns.is_empty() {
            warn!(missing = ?catalog.missing_columns, "catalog lacks expected columns");
        }

        let outcomes: Vec<RowOutcome> = catalog
            .rows
            .iter()
            .map(|row| self.process_row(row, window))
            .collect();
        let summary = BatchSummary::from_outcomes(&outcomes);

        info!(
            total = summary.total_rows,
            accepted = summary.accepted,
            skipped = summary.skipped,
            by_reason = ?summary.by_reason,
            "catalog planned"
        );

        BatchReport {
            window: *window,
            outcomes,
            summary,
        }
    }

    /// Build the night window for `date` with `policy`, then plan the catalog
    pub fn plan_night(
        &self,
        catalog: &Catalog,
        policy: &WindowPolicy,
        date: NaiveDate,
    ) -> Result<BatchReport> {
        let window = policy.build(&self.site, date)?;
        debug!(start = %window.start, end = %window.end, "night window");
        Ok(self.plan_catalog(catalog, &window))
    }

    /// Altitude curve of `target` across `window` with the next transit after the window opens
    pub fn altitude_curve(
        &self,
        target: &SkyTarget,
        ephemeris: &EclipseEphemeris,
        window: &NightWindow,
        samples: usize,
        altitude_limit: f64,
    ) -> Result<AltitudeCurve> {
        let event = ephemeris.next_event(window.start)?;
        let transit = (event.mid < window.end).then_some(event);

        let times = linspace(window.start, window.end, samples);
        let altitudes = times
            .iter()
            .map(|t| self.site.altitude(target.ra_deg, target.dec_deg, t))
            .collect::<Result<Vec<f64>>>()?;

        let verdict = match &transit {
            Some(event) => Some(self.constraints.evaluate(
                &self.site,
                target,
                &event.sample_instants(),
            )?),
            None => None,
        };

        Ok(AltitudeCurve {
            target: target.name.clone(),
            window: *window,
            times,
            altitudes: Array1::from(altitudes),
            transit,
            altitude_limit,
            verdict,
        })
    }

    /// Chart data for one named target on the night that starts after
    /// the chart reference time on `date`.
    ///
    /// A name listed more than once is charted from its first row only.
    pub fn plan_target(
        &self,
        catalog: &Catalog,
        name: &str,
        date: NaiveDate,
        chart: &ChartConfig,
    ) -> Result<AltitudeCurve> {
        let mut matches = catalog.find_all(name);
        let row = matches
            .next()
            .ok_or_else(|| TransitError::TargetNotFound(name.to_string()))?;
        let duplicates = matches.count();
        if duplicates > 0 {
            debug!(
                target = name,
                row = row.index,
                duplicates,
                "name listed more than once, charting the first row"
            );
        }
        let target = row.target()?;
        let ephemeris = row.ephemeris()?;

        let reference = utc_instant(date, parse_clock(&chart.reference)?);
        let window = NightWindow::astronomical(&self.site, reference, chart.horizon_deg)?;
        let curve = self.altitude_curve(
            &target,
            &ephemeris,
            &window,
            chart.samples,
            chart.altitude_limit_deg,
        )?;

        info!(
            target = %curve.target,
            transit = curve.transit.is_some(),
            observable = curve.observable(),
            "chart planned"
        );
        Ok(curve)
    }
}
