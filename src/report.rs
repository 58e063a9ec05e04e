//! Report and chart writers
//!
//! The batch report is a CSV of [`TransitRecord`]s under the planner's column
//! headers. Chart data is written either as a two-column CSV for plotting or
//! as a JSON document that also carries the transit markers and verdict.

use std::io::Write;
use std::path::Path;

use chrono::FixedOffset;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::{AltitudeCurve, BatchReport, LOCAL_TIME_FORMAT};
use crate::utils::time_utils::{epoch_to_jd, format_local};

const CHART_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Write accepted records, in catalog order, as CSV
pub fn write_report<W: Write>(report: &BatchReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut wrote_any = false;
    for record in report.records() {
        wtr.serialize(record)?;
        wrote_any = true;
    }
    if !wrote_any {
        // serialize() emits headers lazily, so an empty report still gets them
        wtr.write_record([
            "Planet Name",
            "RA",
            "Dec",
            "vmag",
            "Start Of Transit",
            "Peak Of Transit",
            "End Of Transit",
            "Period",
            "Duration",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_report_file<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_report(report, file)
}

/// `time_local, altitude_deg` rows, one per curve sample
pub fn write_curve_csv<W: Write>(curve: &AltitudeCurve, offset: &FixedOffset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time_local", "altitude_deg"])?;
    for (time, altitude) in curve.times.iter().zip(curve.altitudes.iter()) {
        wtr.write_record([
            format_local(time, offset, CHART_TIME_FORMAT),
            format!("{altitude:.3}"),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct TransitMarkers {
    ingress_jd: f64,
    mid_jd: f64,
    egress_jd: f64,
}

#[derive(Serialize)]
struct CurveDocument<'a> {
    target: &'a str,
    sunset_jd: f64,
    sunrise_jd: f64,
    start: String,
    peak: String,
    end: String,
    altitude_limit_deg: f64,
    observable: bool,
    transit: Option<TransitMarkers>,
    failing_constraints: Vec<&'a str>,
    times_jd: Vec<f64>,
    times_local: Vec<String>,
    altitudes_deg: Vec<f64>,
}

impl<'a> CurveDocument<'a> {
    fn new(curve: &'a AltitudeCurve, offset: &FixedOffset) -> Self {
        let [start, peak, end] = curve.labels(offset);
        CurveDocument {
            target: &curve.target,
            sunset_jd: epoch_to_jd(&curve.window.start),
            sunrise_jd: epoch_to_jd(&curve.window.end),
            start,
            peak,
            end,
            altitude_limit_deg: curve.altitude_limit,
            observable: curve.observable(),
            transit: curve.transit.map(|ev| TransitMarkers {
                ingress_jd: epoch_to_jd(&ev.ingress),
                mid_jd: epoch_to_jd(&ev.mid),
                egress_jd: epoch_to_jd(&ev.egress),
            }),
            failing_constraints: curve
                .verdict
                .as_ref()
                .map(|v| v.failing_constraints())
                .unwrap_or_default(),
            times_jd: curve.times.iter().map(epoch_to_jd).collect(),
            times_local: curve
                .times
                .iter()
                .map(|t| format_local(t, offset, LOCAL_TIME_FORMAT))
                .collect(),
            altitudes_deg: curve.altitudes.to_vec(),
        }
    }
}

pub fn write_curve_json<W: Write>(curve: &AltitudeCurve, offset: &FixedOffset, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &CurveDocument::new(curve, offset))?;
    Ok(())
}
