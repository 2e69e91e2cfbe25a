use std::io::Write;

use trailviz::error::ParseError;
use trailviz::pipeline::parse;
use trailviz::types::track::{SkipReason, TrackPoint};

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Hawk's Cave</name><trkseg>
    <trkpt lat="30.1000" lon="-97.7000"><ele>150.5</ele><time>2025-10-05T13:58:00Z</time></trkpt>
    <trkpt lat="30.1005" lon="-97.7010"><ele>152.0</ele><time>2025-10-05T13:58:10Z</time></trkpt>
    <trkpt lat="30.1010"><ele>153.0</ele></trkpt>
    <trkpt lat="30.1015" lon="-97.7030"></trkpt>
  </trkseg></trk>
</gpx>"#
}

#[test]
fn extracts_points_in_document_order() {
    let extraction = parse::extract(sample_gpx().as_bytes()).expect("parse");

    assert_eq!(
        extraction.points,
        vec![
            TrackPoint::new(30.1, -97.7)
                .with_elevation(150.5)
                .with_time("2025-10-05T13:58:00Z"),
            TrackPoint::new(30.1005, -97.701)
                .with_elevation(152.0)
                .with_time("2025-10-05T13:58:10Z"),
            TrackPoint::new(30.1015, -97.703),
        ]
    );
}

#[test]
fn point_missing_lon_is_skipped_once_and_others_survive() {
    let extraction = parse::extract(sample_gpx().as_bytes()).expect("parse");

    assert_eq!(extraction.points.len(), 3);
    assert_eq!(extraction.skipped.len(), 1);
    assert_eq!(extraction.skipped[0].index, 2);
    assert_eq!(
        extraction.skipped[0].reason,
        SkipReason::MissingAttribute("lon")
    );
}

#[test]
fn absent_elevation_and_time_stay_absent() {
    let extraction = parse::extract(sample_gpx().as_bytes()).expect("parse");
    let last = extraction.points.last().expect("point");

    assert_eq!(last.elevation, None);
    assert_eq!(last.time, None);
}

#[test]
fn zero_elevation_is_distinct_from_missing() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1"><trk><trkseg>
        <trkpt lat="0" lon="0"><ele>0</ele></trkpt>
    </trkseg></trk></gpx>"#;
    let extraction = parse::extract(xml.as_bytes()).expect("parse");

    assert_eq!(extraction.points[0].elevation, Some(0.0));
}

#[test]
fn point_count_is_trkpt_count_minus_missing_coordinates() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1">
      <trk><trkseg>
        <trkpt lat="1" lon="1"/>
        <trkpt lon="2"/>
        <trkpt lat="3"/>
        <trkpt/>
        <trkpt lat="abc" lon="5"/>
      </trkseg></trk>
      <trk><trkseg><trkpt lat="6" lon="6"/></trkseg></trk>
    </gpx>"#;
    let extraction = parse::extract(xml.as_bytes()).expect("parse");

    assert_eq!(extraction.points.len(), 2);
    assert_eq!(extraction.skipped.len(), 4);
    assert_eq!(
        extraction.skipped[3].reason,
        SkipReason::InvalidAttribute {
            attribute: "lat",
            value: "abc".to_string()
        }
    );
}

#[test]
fn points_in_foreign_namespace_are_ignored() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1" xmlns:o="urn:other">
      <trk><trkseg>
        <trkpt lat="1" lon="1"/>
        <o:trkpt lat="2" lon="2"/>
      </trkseg></trk>
    </gpx>"#;
    let extraction = parse::extract(xml.as_bytes()).expect("parse");

    assert_eq!(extraction.points, vec![TrackPoint::new(1.0, 1.0)]);
    assert!(extraction.skipped.is_empty());
}

#[test]
fn prefixed_gpx_namespace_is_recognised() {
    let xml = r#"<g:gpx xmlns:g="http://www.topografix.com/GPX/1/1">
      <g:trk><g:trkseg>
        <g:trkpt lat="1" lon="2"><g:ele>3</g:ele><g:time>2025-01-01T00:00:00Z</g:time></g:trkpt>
      </g:trkseg></g:trk>
    </g:gpx>"#;
    let extraction = parse::extract(xml.as_bytes()).expect("parse");

    assert_eq!(
        extraction.points,
        vec![TrackPoint::new(1.0, 2.0)
            .with_elevation(3.0)
            .with_time("2025-01-01T00:00:00Z")]
    );
}

#[test]
fn malformed_document_aborts_extraction() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1"><trk><trkseg>
        <trkpt lat="1" lon="1"></trkseg></trk></gpx>"#;

    assert!(matches!(
        parse::extract(xml.as_bytes()),
        Err(ParseError::MalformedDocument(_))
    ));
}

#[test]
fn truncated_document_aborts_extraction() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1"><trk><trkseg>
        <trkpt lat="1" lon="1"/>"#;

    assert!(matches!(
        parse::extract(xml.as_bytes()),
        Err(ParseError::MalformedDocument(_))
    ));
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.gpx");

    match parse::parse_file(&path) {
        Err(ParseError::FileNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn parse_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(sample_gpx().as_bytes()).expect("write");

    let extraction = parse::parse_file(file.path()).expect("parse");
    assert_eq!(extraction.points.len(), 3);
}
