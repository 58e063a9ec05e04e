//! Python bindings, built with `--features python`

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::error::TransitError;
use crate::pipeline::{RowOutcome, TransitPlanner};
use crate::utils::time_utils::{epoch_to_jd, parse_date};

impl From<TransitError> for PyErr {
    fn from(err: TransitError) -> PyErr {
        match err {
            TransitError::TargetNotFound(name) => PyKeyError::new_err(name),
            TransitError::Io(e) => PyErr::from(e),
            TransitError::InvalidDate(_)
            | TransitError::InvalidWindow(_)
            | TransitError::InvalidEphemeris(_)
            | TransitError::FieldParse { .. }
            | TransitError::MissingField(_)
            | TransitError::Config(_) => PyValueError::new_err(err.to_string()),
            other => PyRuntimeError::new_err(other.to_string()),
        }
    }
}

#[pyclass(name = "TransitPlanner")]
pub struct PyTransitPlanner {
    config: PlannerConfig,
    planner: TransitPlanner,
}

#[pymethods]
impl PyTransitPlanner {
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => PlannerConfig::from_file(path)?,
            None => PlannerConfig::default(),
        };
        let planner = config.planner()?;
        Ok(PyTransitPlanner { config, planner })
    }

    #[getter]
    fn site_name(&self) -> String {
        self.planner.site.name.clone()
    }

    #[getter]
    fn constraint_names(&self) -> Vec<String> {
        self.planner.constraints.names()
    }

    /// Plan a catalog for `date` (YYYY-MM-DD); returns (records, skip counts)
    fn plan<'py>(
        &self,
        py: Python<'py>,
        catalog_path: String,
        date: String,
    ) -> PyResult<(Vec<Bound<'py, PyDict>>, Bound<'py, PyDict>)> {
        let catalog = Catalog::from_path(&catalog_path)?;
        let date = parse_date(&date)?;
        let report = self.planner.plan_night(&catalog, &self.config.window, date)?;

        let mut records = Vec::with_capacity(report.summary.accepted);
        for outcome in &report.outcomes {
            if let RowOutcome::Accepted(r) = outcome {
                let d = PyDict::new(py);
                d.set_item("Planet Name", &r.name)?;
                d.set_item("RA", &r.ra)?;
                d.set_item("Dec", &r.dec)?;
                d.set_item("vmag", &r.vmag)?;
                d.set_item("Start Of Transit", &r.start)?;
                d.set_item("Peak Of Transit", &r.peak)?;
                d.set_item("End Of Transit", &r.end)?;
                d.set_item("Period", &r.period)?;
                d.set_item("Duration", &r.duration)?;
                d.set_item("mid_jd", epoch_to_jd(&r.event.mid))?;
                records.push(d);
            }
        }

        let skipped = PyDict::new(py);
        for (reason, count) in &report.summary.by_reason {
            skipped.set_item(*reason, *count)?;
        }
        Ok((records, skipped))
    }

    /// Altitude curve for one target: (times_jd, altitudes_deg, (ingress, mid, egress) or None, observable)
    #[allow(clippy::type_complexity)]
    fn chart<'py>(
        &self,
        py: Python<'py>,
        catalog_path: String,
        name: String,
        date: String,
    ) -> PyResult<(
        Vec<f64>,
        Bound<'py, PyArray1<f64>>,
        Option<(f64, f64, f64)>,
        bool,
    )> {
        let catalog = Catalog::from_path(&catalog_path)?;
        let date = parse_date(&date)?;
        let curve = self
            .planner
            .plan_target(&catalog, &name, date, &self.config.chart)?;

        let times = curve.times.iter().map(epoch_to_jd).collect();
        let transit = curve.transit.map(|ev| {
            (
                epoch_to_jd(&ev.ingress),
                epoch_to_jd(&ev.mid),
                epoch_to_jd(&ev.egress),
            )
        });
        let observable = curve.observable();
        Ok((times, curve.altitudes.into_pyarray(py), transit, observable))
    }
}

#[pymodule]
fn transit_ephem(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTransitPlanner>()?;
    Ok(())
}
