use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::ParseError;
use crate::types::track::{Extraction, SkipReason, SkippedPoint, TrackPoint};

pub const GPX_NAMESPACE: &[u8] = b"http://www.topografix.com/GPX/1/1";

#[derive(Clone, Copy)]
enum Field {
    Elevation,
    Time,
}

/// A `trkpt` whose end tag has not been reached yet.
struct OpenPoint {
    depth: usize,
    index: usize,
    coordinates: Result<(f64, f64), SkipReason>,
    elevation: Option<f64>,
    time: Option<String>,
    field: Option<(Field, String)>,
}

impl OpenPoint {
    fn close_field(&mut self) {
        let Some((field, text)) = self.field.take() else {
            return;
        };
        let text = text.trim();
        match field {
            Field::Elevation => {
                self.elevation = text.parse::<f64>().ok().filter(|v| v.is_finite());
            }
            Field::Time => {
                self.time = (!text.is_empty()).then(|| text.to_string());
            }
        }
    }

    fn finish(self, extraction: &mut Extraction) {
        match self.coordinates {
            Ok((latitude, longitude)) => extraction.points.push(TrackPoint {
                latitude,
                longitude,
                elevation: self.elevation,
                time: self.time,
            }),
            Err(reason) => extraction.skipped.push(SkippedPoint {
                index: self.index,
                reason,
            }),
        }
    }
}

/// Extracts every `trkpt` of a GPX 1.1 document, at any depth, in document
/// order. Points with a missing or non-numeric `lat`/`lon` are recorded in
/// [`Extraction::skipped`] instead of failing the document. Elements in
/// no namespace are accepted as GPX too.
pub fn extract(bytes: &[u8]) -> Result<Extraction, ParseError> {
    let mut reader = NsReader::from_reader(bytes);

    let mut extraction = Extraction::default();
    let mut open: Option<OpenPoint> = None;
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut trkpt_count = 0usize;
    let mut buf = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf).map_err(malformed)?;
        let in_gpx = is_gpx(&ns);

        match event {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                let local = e.local_name();
                if let Some(point) = open.as_mut() {
                    if in_gpx && depth == point.depth + 1 {
                        point.field = match local.as_ref() {
                            b"ele" => Some((Field::Elevation, String::new())),
                            b"time" => Some((Field::Time, String::new())),
                            _ => None,
                        };
                    }
                } else if in_gpx && local.as_ref() == b"trkpt" {
                    open = Some(open_point(&e, depth, trkpt_count)?);
                    trkpt_count += 1;
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if open.is_none() && in_gpx && e.local_name().as_ref() == b"trkpt" {
                    open_point(&e, depth + 1, trkpt_count)?.finish(&mut extraction);
                    trkpt_count += 1;
                }
            }
            Event::Text(e) => {
                if let Some((_, text)) = open_field(&mut open, depth) {
                    let unescaped = e.unescape().map_err(malformed)?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some((_, text)) = open_field(&mut open, depth) {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(ParseError::MalformedDocument(
                        "unmatched closing tag".to_string(),
                    ));
                }
                match open.as_ref().map(|point| point.depth) {
                    Some(point_depth) if depth == point_depth + 1 => {
                        if let Some(point) = open.as_mut() {
                            point.close_field();
                        }
                    }
                    Some(point_depth) if depth == point_depth => {
                        if let Some(point) = open.take() {
                            point.finish(&mut extraction);
                        }
                    }
                    _ => {}
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(ParseError::MalformedDocument(
            "no root element found".to_string(),
        ));
    }
    if depth > 0 {
        return Err(ParseError::MalformedDocument(format!(
            "document ended with {depth} unclosed element(s)"
        )));
    }

    Ok(extraction)
}

fn is_gpx(ns: &ResolveResult<'_>) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == GPX_NAMESPACE,
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

fn open_field(open: &mut Option<OpenPoint>, depth: usize) -> Option<&mut (Field, String)> {
    open.as_mut()
        .filter(|point| depth == point.depth + 1)
        .and_then(|point| point.field.as_mut())
}

fn open_point(e: &BytesStart<'_>, depth: usize, index: usize) -> Result<OpenPoint, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
        if attr.key.prefix().is_some() {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(value.into_owned()),
            b"lon" => lon = Some(value.into_owned()),
            _ => {}
        }
    }

    let coordinates = coordinate("lat", lat).and_then(|lat| Ok((lat, coordinate("lon", lon)?)));

    Ok(OpenPoint {
        depth,
        index,
        coordinates,
        elevation: None,
        time: None,
        field: None,
    })
}

fn coordinate(attribute: &'static str, raw: Option<String>) -> Result<f64, SkipReason> {
    let raw = raw.ok_or(SkipReason::MissingAttribute(attribute))?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SkipReason::InvalidAttribute {
            attribute,
            value: raw,
        }),
    }
}

fn malformed(error: quick_xml::Error) -> ParseError {
    ParseError::MalformedDocument(error.to_string())
}
