mod command;
mod render;
mod repl;
mod settings;

use std::process;
use std::sync::Arc;

use clap::Parser;

use facecam_core::camera::domain::facing_mode::FacingMode;
use facecam_core::camera::infrastructure::ffmpeg_camera::{CameraSource, FfmpegCameraDevice};
use facecam_core::camera::media_stream_controller::MediaStreamController;
use facecam_core::camera::video_element::VideoElement;
use facecam_core::capture::frame_capturer::FrameCapturer;
use facecam_core::capture::infrastructure::jpeg_still_encoder::JpegStillEncoder;
use facecam_core::recognition::infrastructure::http_recognition_service::HttpRecognitionService;
use facecam_core::recognition::infrastructure::thread_dispatcher::ThreadDispatcher;
use facecam_core::recognition::recognition_session::RecognitionSession;
use facecam_core::shared::geometry::DisplaySize;
use facecam_core::ui::ui_state_machine::UiStateMachine;

use settings::Settings;

/// Interactive face registration and recognition against a remote service.
///
/// Values not given on the command line come from the saved settings.
#[derive(Parser)]
#[command(name = "facecam")]
struct Cli {
    /// Base URL of the recognition service.
    #[arg(long)]
    server: Option<String>,

    /// Camera to start with: front or back.
    #[arg(long)]
    facing: Option<FacingMode>,

    /// ffmpeg input for the front camera (device path or file).
    #[arg(long)]
    front_source: Option<String>,

    /// ffmpeg input for the back camera (device path or file).
    #[arg(long)]
    back_source: Option<String>,

    /// ffmpeg input format, e.g. v4l2, avfoundation, dshow.
    #[arg(long)]
    input_format: Option<String>,

    /// Display size the overlay is mapped to, as WxH.
    #[arg(long)]
    display: Option<DisplaySize>,

    /// JPEG quality of submitted stills (1-100).
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// Write the resulting settings as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

impl Cli {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(server) = &self.server {
            settings.server_url = server.clone();
        }
        if let Some(facing) = self.facing {
            settings.facing = facing;
        }
        if let Some(source) = &self.front_source {
            settings.front_source = source.clone();
        }
        if let Some(source) = &self.back_source {
            settings.back_source = source.clone();
        }
        if let Some(format) = &self.input_format {
            settings.input_format = Some(format.clone());
        }
        if let Some(display) = self.display {
            settings.display_width = display.width;
            settings.display_height = display.height;
        }
        if let Some(quality) = self.jpeg_quality {
            settings.jpeg_quality = quality;
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut settings = Settings::load();
    cli.apply_to(&mut settings);
    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }

    let device = FfmpegCameraDevice::new(
        CameraSource::new(settings.front_source.clone(), settings.input_format.clone()),
        CameraSource::new(settings.back_source.clone(), settings.input_format.clone()),
    );
    let camera = MediaStreamController::new(
        Box::new(device),
        VideoElement::new(settings.display_size()),
    );
    let capturer = FrameCapturer::new(Box::new(JpegStillEncoder::new(settings.jpeg_quality)));
    let service = HttpRecognitionService::new(&settings.server_url)?;
    log::info!("Using recognition service at {}", service.base_url());
    let session = RecognitionSession::new(Arc::new(service), Box::new(ThreadDispatcher::new()));

    let mut ui = UiStateMachine::new(camera, capturer, session);
    ui.select_facing_mode(settings.facing);

    repl::run(&mut ui)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(q) = cli.jpeg_quality {
        if !(1..=100).contains(&q) {
            return Err(format!("JPEG quality must be between 1 and 100, got {q}").into());
        }
    }
    if let Some(server) = &cli.server {
        if server.trim().is_empty() {
            return Err("Server URL must not be empty".into());
        }
    }
    Ok(())
}
