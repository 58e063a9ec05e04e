//! CSV catalog of transiting systems
//!
//! Columns are looked up by header name; extra columns are ignored. Each
//! row keeps its raw (trimmed) strings so reports can echo them verbatim.

use std::io::Read;
use std::path::Path;

use crate::ephemeris::EclipseEphemeris;
use crate::error::{Result, TransitError};
use crate::target::SkyTarget;
use crate::utils::sexagesimal::{parse_dec, parse_ra};

const COLUMNS: [&str; 7] = ["name", "RA", "Dec", "vmag", "epoch", "period", "duration"];

/// One raw catalog row; `None` marks a column absent from the file or the record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRow {
    /// Zero-based position in the file, header excluded
    pub index: usize,
    pub name: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub vmag: Option<String>,
    pub epoch: Option<String>,
    pub period: Option<String>,
    pub duration: Option<String>,
}

fn require<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(TransitError::MissingField(field))
}

fn parse_number(value: &Option<String>, field: &'static str) -> Result<f64> {
    let raw = require(value, field)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TransitError::FieldParse {
            field,
            value: raw.to_string(),
        })
}

impl CatalogRow {
    /// Display name, or an empty string when the column is missing
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Apparent magnitude with coerce semantics: blank or non-numeric is `None`
    pub fn vmag_value(&self) -> Option<f64> {
        self.vmag
            .as_deref()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| !v.is_nan())
    }

    /// Name, coordinates and magnitude
    pub fn target(&self) -> Result<SkyTarget> {
        let name = require(&self.name, "name")?;
        let ra_raw = require(&self.ra, "RA")?;
        let dec_raw = require(&self.dec, "Dec")?;
        // a missing vmag column is a missing field, a blank cell is just no magnitude
        require(&self.vmag, "vmag")?;

        let ra_deg = parse_ra(ra_raw).ok_or_else(|| TransitError::FieldParse {
            field: "RA",
            value: ra_raw.to_string(),
        })?;
        let dec_deg = parse_dec(dec_raw).ok_or_else(|| TransitError::FieldParse {
            field: "Dec",
            value: dec_raw.to_string(),
        })?;

        Ok(SkyTarget::new(name, ra_deg, dec_deg, self.vmag_value()))
    }

    /// Epoch (JD), period (days) and duration (hours)
    pub fn ephemeris(&self) -> Result<EclipseEphemeris> {
        let epoch_jd = parse_number(&self.epoch, "epoch")?;
        let period_days = parse_number(&self.period, "period")?;
        let duration_hours = parse_number(&self.duration, "duration")?;
        EclipseEphemeris::from_catalog_units(epoch_jd, period_days, duration_hours)
    }
}

/// All rows of a catalog file, in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub rows: Vec<CatalogRow>,
    /// Expected columns that the header did not contain
    pub missing_columns: Vec<&'static str>,
}

impl Catalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let positions: Vec<Option<usize>> = COLUMNS
            .iter()
            .map(|col| headers.iter().position(|h| h == col))
            .collect();
        let missing_columns = COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(col, _)| *col)
            .collect();

        let mut rows = Vec::new();
        // cells are decoded one by one so a stray non-UTF-8 byte spoils only its own field
        for (index, record) in rdr.byte_records().enumerate() {
            let record = record?;
            let cell = |i: usize| -> Option<String> {
                positions[i]
                    .and_then(|p| record.get(p))
                    .map(|raw| String::from_utf8_lossy(raw).into_owned())
            };
            rows.push(CatalogRow {
                index,
                name: cell(0),
                ra: cell(1),
                dec: cell(2),
                vmag: cell(3),
                epoch: cell(4),
                period: cell(5),
                duration: cell(6),
            });
        }

        Ok(Catalog {
            rows,
            missing_columns,
        })
    }

    /// Every row whose name matches `name` (trimmed) exactly, in file order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CatalogRow> + 'a {
        let name = name.trim();
        self.rows
            .iter()
            .filter(move |row| row.name.as_deref() == Some(name))
    }

    /// First row whose trimmed name matches exactly
    pub fn find<'a>(&'a self, name: &'a str) -> Option<&'a CatalogRow> {
        self.find_all(name).next()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name,RA,Dec,vmag,epoch,period,duration,extra
WASP-1 b, 00:20:40.08 ,+31:59:23.8,11.79,2459000.0,2.5199,3.7,x
Blank mag,01:00:00,+10:00:00,,2459000.0,1.5,2.0,y
Bad RA,xx:00:00,+10:00:00,12.0,2459000.0,1.5,2.0,z
";

    #[test]
    fn test_reads_rows_in_order_and_trims() {
        let cat = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(cat.len(), 3);
        assert!(cat.missing_columns.is_empty());
        assert_eq!(cat.rows[0].display_name(), "WASP-1 b");
        assert_eq!(cat.rows[0].ra.as_deref(), Some("00:20:40.08"));
        assert_eq!(cat.rows[2].index, 2);
    }

    #[test]
    fn test_target_parsing() {
        let cat = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        let t = cat.rows[0].target().unwrap();
        assert!((t.ra_deg - 5.167).abs() < 1e-3);
        assert!((t.dec_deg - 31.9899).abs() < 1e-3);
        assert_eq!(t.vmag, Some(11.79));

        assert_eq!(cat.rows[1].target().unwrap().vmag, None);
        assert_eq!(
            cat.rows[2].target(),
            Err(TransitError::FieldParse {
                field: "RA",
                value: "xx:00:00".into()
            })
        );
    }

    #[test]
    fn test_missing_column_reported_per_row() {
        let text = "name,RA,Dec,vmag,epoch,period\nA,01:00:00,+10:00:00,9,2459000.0,1.5\n";
        let cat = Catalog::from_reader(text.as_bytes()).unwrap();
        assert_eq!(cat.missing_columns, vec!["duration"]);
        assert_eq!(
            cat.rows[0].ephemeris().unwrap_err(),
            TransitError::MissingField("duration")
        );
    }

    #[test]
    fn test_ephemeris_parse_failures() {
        let mut row = CatalogRow {
            epoch: Some("2459000.0".into()),
            period: Some("abc".into()),
            duration: Some("2".into()),
            ..Default::default()
        };
        assert!(matches!(
            row.ephemeris(),
            Err(TransitError::FieldParse { field: "period", .. })
        ));
        row.period = Some("0".into());
        assert!(matches!(row.ephemeris(), Err(TransitError::InvalidEphemeris(_))));
    }

    #[test]
    fn test_non_utf8_row_does_not_drop_its_neighbours() {
        let mut bytes = b"name,RA,Dec,vmag,epoch,period,duration\n\
Good b,01:00:00,+10:00:00,9,2459000.0,1.5,2.0\n"
            .to_vec();
        bytes.extend_from_slice(b"Kepler-\xe9 b,01:00:00,+10:00:00,9,2459000.0,1.5,2.0\n");
        bytes.extend_from_slice(b"Good c,01:00:00,+10:00:00,9,2459000.0,1.5,2.0\n");

        let cat = Catalog::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.rows[0].display_name(), "Good b");
        assert_eq!(cat.rows[1].display_name(), "Kepler-\u{FFFD} b");
        assert_eq!(cat.rows[2].display_name(), "Good c");
        assert!(cat.rows[1].target().is_ok());
    }

    #[test]
    fn test_find_all_counts_duplicates() {
        let text = "name,RA,Dec,vmag,epoch,period,duration\n\
                    A,01:00:00,+10:00:00,9,2459000.0,1.5,2.0\n\
                    A,02:00:00,+10:00:00,9,2459000.0,1.5,2.0\n";
        let cat = Catalog::from_reader(text.as_bytes()).unwrap();
        assert_eq!(cat.find_all("A").count(), 2);
        assert_eq!(cat.find("A").unwrap().ra.as_deref(), Some("01:00:00"));
    }

    #[test]
    fn test_find_by_name() {
        let cat = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(cat.find(" Blank mag ").is_some());
        assert!(cat.find("Nope").is_none());
    }
}
