use facecam_core::camera::domain::camera_device::DeviceInfo;
use facecam_core::recognition::domain::recognition_outcome::RecognitionOutcome;
use facecam_core::shared::face_location::OverlayRect;
use facecam_core::shared::status_message::{MessageKind, StatusMessage};
use facecam_core::ui::ui_state_machine::{Phase, UiSnapshot};

pub const HELP: &str = "\
Commands:
  devices              list cameras
  facing <front|back>  choose the camera (camera must be stopped)
  start | stop         start or stop the camera
  register             open the registration form
  name <text>          enter the name to register
  submit | cancel      submit or close the registration form
  recognize            recognize the current frame
  display <WxH>        set the display size the overlay is mapped to
  overlay <path>       save the current frame with the face overlay
  status               show the current state
  help | quit";

pub fn status_line(message: &StatusMessage) -> String {
    let tag = match message.kind() {
        MessageKind::Success => "ok",
        MessageKind::Error => "error",
    };
    format!("[{tag}] {}", message.text())
}

/// Result fields the way the result panel lists them.
pub fn outcome_lines(outcome: &RecognitionOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "Face detected: {}",
        if outcome.face_detected { "yes" } else { "no" }
    )];
    if outcome.recognized {
        lines.push(format!(
            "Recognized: {}",
            outcome.name.as_deref().unwrap_or("-")
        ));
        if let Some(percent) = outcome.confidence_percent() {
            lines.push(format!("Confidence: {percent:.2}%"));
        }
    }
    if outcome.face_detected {
        lines.push(format!(
            "Landmarks: {}",
            outcome
                .num_landmarks
                .map_or_else(|| "-".to_string(), |n| n.to_string())
        ));
        if let Some(loc) = &outcome.face_location {
            lines.push(format!(
                "Face location: top={} left={} width={} height={}",
                loc.top, loc.left, loc.width, loc.height
            ));
        }
    }
    lines
}

pub fn overlay_line(rect: &OverlayRect) -> String {
    format!(
        "Overlay: top={:.1} left={:.1} width={:.1} height={:.1}",
        rect.top, rect.left, rect.width, rect.height
    )
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::CameraOff => "camera off",
        Phase::Idle => "idle",
        Phase::Registering => "registering",
        Phase::AwaitingRecognitionResult => "awaiting recognition result",
    }
}

pub fn device_line(device: &DeviceInfo) -> String {
    match device.facing {
        Some(facing) => format!("{} [{facing}] {}", device.device_id, device.label),
        None => format!("{} {}", device.device_id, device.label),
    }
}

pub fn snapshot_lines(snapshot: &UiSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("State: {}", phase_label(snapshot.phase)),
        format!(
            "Facing: {}{}",
            snapshot.facing_mode,
            if snapshot.facing_selector_enabled {
                ""
            } else {
                " (locked while camera runs)"
            }
        ),
    ];
    if let Some(name) = &snapshot.register_name {
        lines.push(format!("Name: '{name}'"));
    }
    if let Some(message) = &snapshot.status {
        lines.push(status_line(message));
    }
    if let Some(outcome) = &snapshot.outcome {
        lines.extend(outcome_lines(outcome));
    }
    if let Some(rect) = &snapshot.overlay {
        lines.push(overlay_line(rect));
    }
    lines
}
