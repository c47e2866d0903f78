//! Marker extraction for composition and layer marker tracks.

use serde::Serialize;

use super::attrs::FieldValue;
use crate::host::{HostObject, MarkerTrack};

/// One marker. Every field is present; failed reads carry the error sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSnapshot {
    pub time: FieldValue,
    /// 1-based key index on the track.
    pub index: usize,
    pub comment: FieldValue,
    pub chapter: FieldValue,
    pub url: FieldValue,
    pub frame_target: FieldValue,
    pub cue_point_name: FieldValue,
    pub duration: FieldValue,
    pub label: FieldValue,
    pub protected_region: FieldValue,
}

impl MarkerSnapshot {
    fn read(time: FieldValue, index: usize, marker: &dyn HostObject) -> Self {
        let field = |name: &str| FieldValue::required(marker.read(name));
        Self {
            time,
            index,
            comment: field("comment"),
            chapter: field("chapter"),
            url: field("url"),
            frame_target: field("frameTarget"),
            cue_point_name: field("cuePointName"),
            duration: field("duration"),
            label: field("label"),
            protected_region: field("protectedRegion"),
        }
    }

    /// Marker whose value object could not be read at all.
    fn failed(time: FieldValue, index: usize, message: &str) -> Self {
        let err = || FieldValue::Error(message.to_string());
        Self {
            time,
            index,
            comment: err(),
            chapter: err(),
            url: err(),
            frame_target: err(),
            cue_point_name: err(),
            duration: err(),
            label: err(),
            protected_region: err(),
        }
    }
}

/// Extract the markers of a track in key order; empty when there is no track.
pub fn extract_markers(track: Option<&dyn MarkerTrack>) -> Vec<MarkerSnapshot> {
    let Some(track) = track else {
        return Vec::new();
    };
    (1..=track.num_keys())
        .map(|index| {
            let time = FieldValue::from_result(track.key_time(index));
            match track.key_value(index) {
                Ok(marker) => MarkerSnapshot::read(time, index, marker),
                Err(e) => {
                    log::debug!("marker {} unreadable: {}", index, e);
                    MarkerSnapshot::failed(time, index, e.message())
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemMarker, MemMarkerTrack};
    use serde_json::json;

    const MARKER_FIELDS: &[&str] = &[
        "comment",
        "chapter",
        "url",
        "frameTarget",
        "cuePointName",
        "duration",
        "label",
        "protectedRegion",
    ];

    fn track() -> MemMarkerTrack {
        MemMarkerTrack::new()
            .with_marker(
                MemMarker::new(0.5)
                    .with("comment", "intro")
                    .with("duration", 1.0)
                    .with("chapter", ""),
            )
            .with_marker(MemMarker::new(2.0).with_failure("url", "Invalid marker"))
            .with_marker(MemMarker::failing(4.0, "Marker value unavailable"))
    }

    #[test]
    fn test_absent_track() {
        assert!(extract_markers(None).is_empty());
        assert!(extract_markers(Some(&MemMarkerTrack::new())).is_empty());
    }

    #[test]
    fn test_fields_guarded_independently() {
        let track = track();
        let markers = extract_markers(Some(&track));
        assert_eq!(markers.len(), 3);

        let first = serde_json::to_value(&markers[0]).unwrap();
        assert_eq!(first["time"], 0.5);
        assert_eq!(first["index"], 1);
        assert_eq!(first["comment"], "intro");
        assert_eq!(first["duration"], 1);
        // Never set on the marker: undefined, not null
        assert_eq!(first["label"], json!({"_undefined": true}));

        assert_eq!(markers[1].url, FieldValue::Error("Invalid marker".into()));
        assert_eq!(markers[1].time, FieldValue::Value(json!(2)));
    }

    #[test]
    fn test_unreadable_value_object() {
        let track = track();
        let marker = serde_json::to_value(&extract_markers(Some(&track))[2]).unwrap();
        assert_eq!(marker["time"], 4);
        for name in MARKER_FIELDS {
            assert_eq!(marker[*name], json!({"_error": "Marker value unavailable"}));
        }
    }
}
