use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::detection::{BoundingBox, Detection, DetectionResult};
use crate::error::DetectionError;

/// Body returned by the detection endpoint:
/// `{ "detections": [{ id, label, confidence, bbox? }], "elapsedMillis": n }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectionResponse {
    detections: Vec<Detection>,
    #[serde(default)]
    elapsed_millis: Option<f64>,
}

/// Parses and validates an endpoint response, then applies the client-side
/// confidence floor. `measured` is used when the server reports no timing.
pub fn decode_response(
    body: &[u8],
    measured: Duration,
    confidence_floor: f64,
) -> Result<DetectionResult, DetectionError> {
    let response: DetectionResponse =
        serde_json::from_slice(body).map_err(|e| DetectionError::Decode(e.to_string()))?;

    let mut seen = HashSet::with_capacity(response.detections.len());
    for detection in &response.detections {
        validate_detection(detection)?;
        if !seen.insert(detection.id.as_str()) {
            return Err(DetectionError::Decode(format!(
                "duplicate detection id '{}'",
                detection.id
            )));
        }
    }

    let elapsed = match response.elapsed_millis {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Duration::try_from_secs_f64(ms / 1000.0)
            .map_err(|e| DetectionError::Decode(format!("elapsedMillis {} is out of range: {}", ms, e)))?,
        Some(ms) => {
            return Err(DetectionError::Decode(format!(
                "elapsedMillis must be a non-negative number, got {}",
                ms
            )))
        }
        None => measured,
    };

    Ok(DetectionResult::new(response.detections, elapsed).retain_above(confidence_floor))
}

fn validate_detection(detection: &Detection) -> Result<(), DetectionError> {
    let c = detection.confidence;
    if !c.is_finite() || !(0.0..=1.0).contains(&c) {
        return Err(DetectionError::Decode(format!(
            "confidence {} of detection '{}' is outside [0, 1]",
            c, detection.id
        )));
    }
    if let Some(bbox) = &detection.bounding_box {
        validate_bounding_box(&detection.id, bbox)?;
    }
    Ok(())
}

fn validate_bounding_box(id: &str, bbox: &BoundingBox) -> Result<(), DetectionError> {
    let finite = [bbox.x, bbox.y, bbox.width, bbox.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || bbox.width < 0.0 || bbox.height < 0.0 {
        return Err(DetectionError::Decode(format!(
            "bounding box of detection '{}' is invalid",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FINDINGS: &str = r#"{
        "detections": [
            {"id": "1", "label": "Suspicious Mass", "confidence": 0.85,
             "bbox": {"x": 120, "y": 80, "width": 60, "height": 45}},
            {"id": "2", "label": "Nodule", "confidence": 0.72}
        ],
        "elapsedMillis": 412
    }"#;

    #[test]
    fn test_decode_preserves_order_and_timing() {
        let result = decode_response(TWO_FINDINGS.as_bytes(), Duration::from_secs(9), 0.0).unwrap();
        assert_eq!(result.detections.len(), 2);
        assert_eq!(result.detections[0].label, "Suspicious Mass");
        assert_eq!(result.detections[1].label, "Nodule");
        assert_eq!(result.elapsed_millis(), 412);
        assert!(result.detections[0].bounding_box.is_some());
        assert!(result.detections[1].bounding_box.is_none());
    }

    #[test]
    fn test_decode_falls_back_to_measured_time() {
        let body = br#"{"detections": []}"#;
        let result = decode_response(body, Duration::from_millis(250), 0.0).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.elapsed_millis(), 250);
    }

    #[test]
    fn test_decode_applies_confidence_floor() {
        let result = decode_response(TWO_FINDINGS.as_bytes(), Duration::ZERO, 0.8).unwrap();
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.detections[0].id, "1");
    }

    #[test]
    fn test_decode_rejects_out_of_range_confidence() {
        let body = br#"{"detections": [{"id": "1", "label": "Mass", "confidence": 1.2}], "elapsedMillis": 3}"#;
        let err = decode_response(body, Duration::ZERO, 0.0).unwrap_err();
        assert!(matches!(err, DetectionError::Decode(msg) if msg.contains("outside [0, 1]")));

        let negative = br#"{"detections": [{"id": "1", "label": "Mass", "confidence": -0.1}]}"#;
        assert!(decode_response(negative, Duration::ZERO, 0.0).is_err());
    }

    #[test]
    fn test_decode_rejects_schema_mismatch() {
        for body in [
            "not json",
            r#"{"results": []}"#,
            r#"{"detections": [{"id": "1", "confidence": 0.5}]}"#,
            r#"{"detections": [{"id": "1", "label": "Mass", "confidence": "high"}]}"#,
        ] {
            let err = decode_response(body.as_bytes(), Duration::ZERO, 0.0).unwrap_err();
            assert!(matches!(err, DetectionError::Decode(_)));
        }
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let body = br#"{"detections": [
            {"id": "1", "label": "Mass", "confidence": 0.5},
            {"id": "1", "label": "Nodule", "confidence": 0.6}
        ]}"#;
        let err = decode_response(body, Duration::ZERO, 0.0).unwrap_err();
        assert!(matches!(err, DetectionError::Decode(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_decode_rejects_negative_box_and_elapsed() {
        let bad_box = br#"{"detections": [{"id": "1", "label": "Mass", "confidence": 0.5,
            "bbox": {"x": 0, "y": 0, "width": -4, "height": 2}}]}"#;
        assert!(decode_response(bad_box, Duration::ZERO, 0.0).is_err());

        let bad_elapsed = br#"{"detections": [], "elapsedMillis": -1}"#;
        assert!(decode_response(bad_elapsed, Duration::ZERO, 0.0).is_err());
    }

    #[test]
    fn test_decode_rejects_overflowing_elapsed() {
        let body = br#"{"detections": [], "elapsedMillis": 1e30}"#;
        let err = decode_response(body, Duration::ZERO, 0.0).unwrap_err();
        assert!(matches!(err, DetectionError::Decode(msg) if msg.contains("out of range")));
    }
}
