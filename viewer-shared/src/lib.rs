//! Shared types for the frame viewer and its stats stub server.
//!
//! This crate contains the serialization types for the stub's JSON routes and
//! the HTTP client used to reach them. Field names on the wire are camelCase
//! to match what browser clients of the stub expect.

pub mod http_client;
pub mod viewer_client;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processed-frame metadata from the stub's `GET /api/frame` route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameInfo {
    /// Capture time, serialized as an ISO-8601 string
    pub timestamp: DateTime<Utc>,
    /// Encoded frame payload (a placeholder string in the synthetic pipeline)
    pub frame_data: String,
    pub width: u32,
    pub height: u32,
}

/// Reason a [`FrameInfo`] payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameValidationError {
    #[error("frame has zero-sized dimensions {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("frame payload is empty")]
    EmptyPayload,
}

impl FrameInfo {
    /// Check that the frame can be displayed: both dimensions positive and a
    /// non-empty payload.
    pub fn validate(&self) -> Result<(), FrameValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameValidationError::EmptyDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.frame_data.is_empty() {
            return Err(FrameValidationError::EmptyPayload);
        }
        Ok(())
    }
}

/// Processing statistics from the stub's `GET /api/stats` route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub fps: f64,
    /// Per-frame processing time in whole milliseconds
    pub processing_time: u32,
    /// Resolution as `"{width}x{height}"`
    #[serde(alias = "resolution")]
    pub resolution_label: String,
}

/// Health check response from the stub's `GET /health` route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthInfo {
    pub status: String,
    pub service: String,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameInfo {
        FrameInfo {
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00.250Z")
                .unwrap()
                .with_timezone(&Utc),
            frame_data: "base64-encoded-frame-data-placeholder".to_string(),
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_frame_info_wire_names() {
        let json = serde_json::to_value(sample_frame()).unwrap();
        assert_eq!(json["frameData"], "base64-encoded-frame-data-placeholder");
        assert_eq!(json["width"], 640);
        assert_eq!(json["height"], 480);
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.starts_with("2024-05-01T12:00:00.250"));
    }

    #[test]
    fn test_frame_validation() {
        assert!(sample_frame().validate().is_ok());

        let mut frame = sample_frame();
        frame.height = 0;
        assert_eq!(
            frame.validate(),
            Err(FrameValidationError::EmptyDimensions {
                width: 640,
                height: 0
            })
        );

        let mut frame = sample_frame();
        frame.frame_data.clear();
        assert_eq!(frame.validate(), Err(FrameValidationError::EmptyPayload));
    }

    #[test]
    fn test_pipeline_stats_accepts_short_resolution_key() {
        let stats: PipelineStats =
            serde_json::from_str(r#"{"fps": 22.5, "processingTime": 31, "resolution": "640x480"}"#)
                .unwrap();
        assert_eq!(stats.resolution_label, "640x480");
        assert_eq!(stats.processing_time, 31);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["resolutionLabel"], "640x480");
        assert_eq!(json["processingTime"], 31);
    }
}
