use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::TabularError;
use crate::pipeline::timestamp;
use crate::types::track::TrackPoint;

pub const LATITUDE: &str = "latitude_decimal";
pub const LONGITUDE: &str = "longitude_decimal";
pub const ELEVATION: &str = "elevation_meters";
pub const TIME_UTC: &str = "time_utc";
pub const TIME_SERIAL: &str = "time_excel";
pub const TIME_LOCAL: &str = "time_centralUSA";

/// Which derived time column a CSV export carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CsvLayout {
    /// Raw UTC text plus a spreadsheet day serial counted from `epoch`.
    SpreadsheetSerial { epoch: DateTime<Utc> },
    /// Wall-clock time in `zone` in place of the UTC text.
    LocalTime { zone: Tz },
}

impl CsvLayout {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::SpreadsheetSerial { .. } => {
                &[LATITUDE, LONGITUDE, ELEVATION, TIME_UTC, TIME_SERIAL]
            }
            CsvLayout::LocalTime { .. } => &[LATITUDE, LONGITUDE, ELEVATION, TIME_LOCAL],
        }
    }

    fn time_cells(
        &self,
        time: Option<&str>,
    ) -> Result<Vec<String>, crate::error::TimestampError> {
        match *self {
            CsvLayout::SpreadsheetSerial { epoch } => {
                let serial = timestamp::to_spreadsheet_serial(time, epoch)?;
                Ok(vec![
                    time.unwrap_or_default().to_string(),
                    optional_cell(serial),
                ])
            }
            CsvLayout::LocalTime { zone } => {
                Ok(vec![timestamp::to_local_time(time, zone)?.unwrap_or_default()])
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    pub rows: usize,
    /// Data row indices (zero-based) whose timestamp could not be converted;
    /// their derived cell is left empty.
    pub invalid_timestamps: Vec<usize>,
}

/// Writes one row per point, in input order, under a fixed header.
/// Absent values become empty cells.
pub fn write_csv<W: Write>(
    writer: W,
    points: &[TrackPoint],
    layout: &CsvLayout,
) -> Result<WriteSummary, TabularError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(layout.header())?;

    let mut summary = WriteSummary::default();
    for (idx, point) in points.iter().enumerate() {
        let mut record = vec![
            decimal_cell(point.latitude),
            decimal_cell(point.longitude),
            optional_cell(point.elevation),
        ];
        match layout.time_cells(point.time.as_deref()) {
            Ok(cells) => record.extend(cells),
            Err(_) => {
                summary.invalid_timestamps.push(idx);
                if let CsvLayout::SpreadsheetSerial { .. } = layout {
                    record.push(point.time.clone().unwrap_or_default());
                }
                record.push(String::new());
            }
        }
        writer.write_record(&record)?;
        summary.rows += 1;
    }
    writer.flush()?;
    Ok(summary)
}

pub fn write_csv_file(
    path: &Path,
    points: &[TrackPoint],
    layout: &CsvLayout,
) -> Result<WriteSummary, TabularError> {
    let file = File::create(path)?;
    write_csv(io::BufWriter::new(file), points, layout)
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(decimal_cell).unwrap_or_default()
}

/// Always carries a fractional part, so whole values read back as floats.
fn decimal_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "latitude_decimal")]
    latitude: Option<String>,
    #[serde(rename = "longitude_decimal")]
    longitude: Option<String>,
    #[serde(rename = "elevation_meters")]
    elevation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// One-based data row number, header excluded.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRead {
    /// Every point carries an elevation; time is not read back.
    pub points: Vec<TrackPoint>,
    pub skipped: Vec<SkippedRow>,
}

impl CsvRead {
    pub fn latitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.latitude).collect()
    }

    pub fn longitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.longitude).collect()
    }

    pub fn elevations(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.elevation).collect()
    }
}

/// Reads latitude, longitude and elevation by header name. Rows whose three
/// values are not all finite numbers are skipped, not fatal.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvRead, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut read = CsvRead::default();
    for (idx, result) in reader.deserialize::<Row>().enumerate() {
        let row_number = idx + 1;
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(TabularError::Csv(e)),
            Err(e) => {
                read.skipped.push(SkippedRow {
                    row: row_number,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        match parse_row(&row) {
            Ok(point) => read.points.push(point),
            Err(reason) => read.skipped.push(SkippedRow {
                row: row_number,
                reason,
            }),
        }
    }
    Ok(read)
}

pub fn read_csv_file(path: &Path) -> Result<CsvRead, TabularError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TabularError::FileNotFound(path.to_path_buf()),
        _ => TabularError::Io(e),
    })?;
    read_csv(io::BufReader::new(file))
}

fn parse_row(row: &Row) -> Result<TrackPoint, String> {
    let latitude = numeric_cell(LATITUDE, row.latitude.as_deref())?;
    let longitude = numeric_cell(LONGITUDE, row.longitude.as_deref())?;
    let elevation = numeric_cell(ELEVATION, row.elevation.as_deref())?;
    Ok(TrackPoint::new(latitude, longitude).with_elevation(elevation))
}

fn numeric_cell(column: &str, cell: Option<&str>) -> Result<f64, String> {
    let cell = cell.ok_or_else(|| format!("missing {column}"))?;
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("non-numeric {column} {cell:?}")),
    }
}
