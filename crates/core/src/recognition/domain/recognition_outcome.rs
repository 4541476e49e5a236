use serde::{Deserialize, Serialize};

use crate::shared::face_location::FaceLocationRect;

/// Result of one recognize call, stored exactly as the service sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    pub face_detected: bool,
    #[serde(default)]
    pub recognized: bool,
    #[serde(default)]
    pub name: Option<String>,
    /// In `[0, 1]`.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub num_landmarks: Option<u32>,
    /// Native pixel space of the submitted still.
    #[serde(default)]
    pub face_location: Option<FaceLocationRect>,
}

impl RecognitionOutcome {
    pub fn no_face() -> Self {
        Self {
            face_detected: false,
            recognized: false,
            name: None,
            confidence: None,
            num_landmarks: None,
            face_location: None,
        }
    }

    /// Confidence as a percentage, e.g. `0.87` → `87.0`.
    pub fn confidence_percent(&self) -> Option<f64> {
        self.confidence.map(|c| c * 100.0)
    }
}

/// Body of a successful register call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReply {
    pub message: String,
}
