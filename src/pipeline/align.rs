use crate::types::track::{AlignedPoint, AlignedTrack, Track};

/// Shifts each track so its own first point sits at the origin. Empty
/// tracks are dropped; the rest keep their input order.
pub fn align_tracks(tracks: &[Track]) -> Vec<AlignedTrack> {
    tracks.iter().filter_map(align_track).collect()
}

/// `None` for an empty track.
///
/// When the first point has no elevation there is nothing to anchor the
/// elevation axis to, so every aligned elevation is `None`. Points that
/// individually lack elevation stay `None` as well.
pub fn align_track(track: &Track) -> Option<AlignedTrack> {
    let origin = track.points.first()?;

    let points = track
        .points
        .iter()
        .map(|p| AlignedPoint {
            latitude: p.latitude - origin.latitude,
            longitude: p.longitude - origin.longitude,
            elevation: match (p.elevation, origin.elevation) {
                (Some(elevation), Some(origin)) => Some(elevation - origin),
                _ => None,
            },
        })
        .collect();

    Some(AlignedTrack {
        name: track.name.clone(),
        points,
    })
}
