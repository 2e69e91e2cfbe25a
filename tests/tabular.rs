use trailviz::error::TabularError;
use trailviz::pipeline::tabular::{self, CsvLayout};
use trailviz::pipeline::timestamp::spreadsheet_epoch;
use trailviz::types::track::TrackPoint;

const EPSILON: f64 = 1e-9;

fn sample_points() -> Vec<TrackPoint> {
    vec![
        TrackPoint::new(30.1, -97.7)
            .with_elevation(150.5)
            .with_time("2025-10-05T13:58:00Z"),
        TrackPoint::new(30.1005, -97.701).with_elevation(152.25),
        TrackPoint::new(30.101, -97.702).with_time("2025-10-05T13:58:20Z"),
    ]
}

fn write_to_string(points: &[TrackPoint], layout: &CsvLayout) -> String {
    let mut out = Vec::new();
    let summary = tabular::write_csv(&mut out, points, layout).expect("write");
    assert_eq!(summary.rows, points.len());
    String::from_utf8(out).expect("utf8")
}

#[test]
fn spreadsheet_layout_rows() {
    let text = write_to_string(
        &sample_points(),
        &CsvLayout::SpreadsheetSerial {
            epoch: spreadsheet_epoch(),
        },
    );
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "latitude_decimal,longitude_decimal,elevation_meters,time_utc,time_excel"
    );
    assert!(lines[1].starts_with("30.1,-97.7,150.5,2025-10-05T13:58:00Z,45935.58"));
    assert_eq!(lines[2], "30.1005,-97.701,152.25,,");
    assert!(lines[3].starts_with("30.101,-97.702,,2025-10-05T13:58:20Z,45935.58"));
    assert_eq!(lines.len(), 4);
}

#[test]
fn local_time_layout_rows() {
    let text = write_to_string(
        &sample_points(),
        &CsvLayout::LocalTime {
            zone: chrono_tz::America::Chicago,
        },
    );
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "latitude_decimal,longitude_decimal,elevation_meters,time_centralUSA"
    );
    assert_eq!(lines[1], "30.1,-97.7,150.5,2025-10-05 08:58:00");
    assert_eq!(lines[2], "30.1005,-97.701,152.25,");
    assert_eq!(lines[3], "30.101,-97.702,,2025-10-05 08:58:20");
}

#[test]
fn round_trip_preserves_complete_points() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("track.csv");
    let points = sample_points();
    tabular::write_csv_file(
        &path,
        &points,
        &CsvLayout::SpreadsheetSerial {
            epoch: spreadsheet_epoch(),
        },
    )
    .expect("write");

    let read = tabular::read_csv_file(&path).expect("read");
    let complete: Vec<&TrackPoint> = points.iter().filter(|p| p.elevation.is_some()).collect();

    assert_eq!(read.points.len(), complete.len());
    for (got, want) in read.points.iter().zip(complete) {
        assert!((got.latitude - want.latitude).abs() < EPSILON);
        assert!((got.longitude - want.longitude).abs() < EPSILON);
        assert!((got.elevation.expect("ele") - want.elevation.expect("ele")).abs() < EPSILON);
    }
    // Third point has no elevation and is skipped on read.
    assert_eq!(read.skipped.len(), 1);
    assert_eq!(read.skipped[0].row, 3);
}

#[test]
fn reader_uses_header_names_not_positions() {
    let csv = "elevation_meters,extra,longitude_decimal,latitude_decimal\n\
               100,x,-97.7,30.1\n\
               101,y,-97.8,30.2\n";
    let read = tabular::read_csv(csv.as_bytes()).expect("read");

    assert_eq!(read.latitudes(), vec![30.1, 30.2]);
    assert_eq!(read.longitudes(), vec![-97.7, -97.8]);
    assert_eq!(read.elevations(), vec![100.0, 101.0]);
}

#[test]
fn reader_skips_bad_rows_and_keeps_order() {
    let csv = "latitude_decimal,longitude_decimal,elevation_meters\n\
               1,2,3\n\
               oops,2,3\n\
               4,5,\n\
               7,8,9\n";
    let read = tabular::read_csv(csv.as_bytes()).expect("read");

    assert_eq!(read.latitudes(), vec![1.0, 7.0]);
    let rows: Vec<usize> = read.skipped.iter().map(|s| s.row).collect();
    assert_eq!(rows, vec![2, 3]);
}

#[test]
fn missing_column_skips_every_row() {
    let csv = "latitude_decimal,longitude_decimal\n1,2\n3,4\n";
    let read = tabular::read_csv(csv.as_bytes()).expect("read");

    assert!(read.points.is_empty());
    assert_eq!(read.skipped.len(), 2);
}

#[test]
fn missing_csv_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = tabular::read_csv_file(&dir.path().join("output.csv"));
    assert!(matches!(result, Err(TabularError::FileNotFound(_))));
}

#[test]
fn reader_skips_non_finite_values() {
    let csv = "latitude_decimal,longitude_decimal,elevation_meters\n\
               1,2,3\n\
               NaN,2,4\n\
               2,inf,5\n\
               3,4,-infinity\n\
               3,4,6\n";
    let read = tabular::read_csv(csv.as_bytes()).expect("read");

    assert_eq!(read.latitudes(), vec![1.0, 3.0]);
    assert!(read.points.iter().all(|p| p.latitude.is_finite()
        && p.longitude.is_finite()
        && p.elevation.is_some_and(f64::is_finite)));
    let rows: Vec<usize> = read.skipped.iter().map(|s| s.row).collect();
    assert_eq!(rows, vec![2, 3, 4]);
    assert!(read.skipped[0].reason.contains("latitude_decimal"));
}

#[test]
fn whole_values_are_written_as_floats() {
    let points = vec![TrackPoint::new(30.0, -97.0)
        .with_elevation(150.0)
        .with_time("1970-01-01T00:00:00Z")];
    let text = write_to_string(
        &points,
        &CsvLayout::SpreadsheetSerial {
            epoch: spreadsheet_epoch(),
        },
    );

    assert_eq!(
        text.lines().nth(1),
        Some("30.0,-97.0,150.0,1970-01-01T00:00:00Z,25569.0")
    );
}
