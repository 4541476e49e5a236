use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::camera::domain::camera_device::{CameraDevice, DeviceInfo, DeviceKind};
use crate::camera::domain::facing_mode::FacingMode;
use crate::camera::domain::frame_source::FrameSource;
use crate::camera::domain::media_stream::MediaStream;
use crate::camera::infrastructure::latest_frame_stream::LatestFrameStream;
use crate::shared::frame::Frame;
use crate::shared::geometry::NativeSize;

/// Used when an input does not report its frame rate.
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Where a facing mode's frames come from: a capture device (`/dev/video0`,
/// `0:0`, `video=Integrated Camera`) or any ffmpeg-readable URL or file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraSource {
    pub input: String,
    /// ffmpeg input format (`v4l2`, `avfoundation`, `dshow`); `None` lets
    /// ffmpeg detect it.
    pub format: Option<String>,
}

impl CameraSource {
    pub fn new(input: impl Into<String>, format: Option<String>) -> Self {
        Self {
            input: input.into(),
            format,
        }
    }
}

/// Opens cameras through ffmpeg-next (libavdevice + libavcodec).
///
/// Each facing mode maps to one configured [`CameraSource`].
pub struct FfmpegCameraDevice {
    front: CameraSource,
    back: CameraSource,
}

impl FfmpegCameraDevice {
    pub fn new(front: CameraSource, back: CameraSource) -> Self {
        Self { front, back }
    }

    fn source(&self, facing: FacingMode) -> &CameraSource {
        match facing {
            FacingMode::Front => &self.front,
            FacingMode::Back => &self.back,
        }
    }
}

impl CameraDevice for FfmpegCameraDevice {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, Box<dyn std::error::Error>> {
        Ok(FacingMode::ALL
            .iter()
            .map(|&facing| {
                let source = self.source(facing);
                DeviceInfo {
                    device_id: source.input.clone(),
                    label: match &source.format {
                        Some(format) => format!("{} ({format})", source.input),
                        None => source.input.clone(),
                    },
                    kind: DeviceKind::VideoInput,
                    facing: Some(facing),
                }
            })
            .collect())
    }

    fn open(
        &mut self,
        facing: FacingMode,
    ) -> Result<Box<dyn MediaStream>, Box<dyn std::error::Error>> {
        let source = FfmpegFrameSource::open(self.source(facing))?;
        Ok(Box::new(LatestFrameStream::spawn(source)))
    }
}

/// Decoding state of an open input; dropping it closes the device.
struct OpenInput {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
}

/// Decodes one ffmpeg input to RGB24 frames, in order.
///
/// File inputs loop back to the start on end of stream and are paced at
/// their frame rate so they behave like a continuous feed.
pub struct FfmpegFrameSource {
    label: String,
    input: OpenInput,
    size: NativeSize,
    loop_on_eof: bool,
    frame_interval: Duration,
    last_frame_at: Option<Instant>,
    frame_index: usize,
}

// Safety: the source is moved into its reader thread and only touched
// there; ffmpeg contexts are moved, not shared.
unsafe impl Send for FfmpegFrameSource {}

impl FfmpegFrameSource {
    pub fn open(source: &CameraSource) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = open_input(source)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;
        let video_stream_index = stream.index();
        let frame_interval = frame_interval(stream.avg_frame_rate());

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!("Opened camera input {} ({width}x{height})", source.input);
        Ok(Self {
            label: source.input.clone(),
            input: OpenInput {
                ictx,
                decoder,
                scaler,
                video_stream_index,
            },
            size: NativeSize::new(width, height),
            loop_on_eof: source.format.is_none() && Path::new(&source.input).is_file(),
            frame_interval,
            last_frame_at: None,
            frame_index: 0,
        })
    }

    fn decode_next(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let input = &mut self.input;
        let size = self.size;

        let mut frame = try_receive(input, size, self.frame_index)?;
        while frame.is_none() {
            let Some((stream, packet)) = input.ictx.packets().next() else {
                let _ = input.decoder.send_eof();
                frame = try_receive(input, size, self.frame_index)?;
                break;
            };
            if stream.index() != input.video_stream_index {
                continue;
            }
            if input.decoder.send_packet(&packet).is_err() {
                continue;
            }
            frame = try_receive(input, size, self.frame_index)?;
        }

        if frame.is_some() {
            self.frame_index += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.input.ictx.seek(0, ..)?;
        self.input.decoder.flush();
        log::debug!("Looping {} back to start", self.label);
        Ok(())
    }

    /// Holds file inputs to their frame rate; devices are paced by the driver.
    fn pace(&mut self) {
        if !self.loop_on_eof {
            return;
        }
        if let Some(last) = self.last_frame_at {
            let due = last + self.frame_interval;
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.last_frame_at = Some(Instant::now());
    }
}

impl FrameSource for FfmpegFrameSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn native_size(&self) -> NativeSize {
        self.size
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut frame = self.decode_next()?;
        if frame.is_none() && self.loop_on_eof {
            self.rewind()?;
            frame = self.decode_next()?;
        }
        if frame.is_some() {
            self.pace();
        }
        Ok(frame)
    }
}

fn frame_interval(rate: ffmpeg_next::Rational) -> Duration {
    let fps = f64::from(rate);
    if fps.is_finite() && fps > 0.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        DEFAULT_FRAME_INTERVAL
    }
}

fn open_input(
    source: &CameraSource,
) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
    let Some(format_name) = source.format.as_deref() else {
        return Ok(ffmpeg_next::format::input(&source.input)?);
    };

    ffmpeg_next::device::register_all();
    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name() == format_name)
        .ok_or_else(|| format!("unknown camera input format '{format_name}'"))?;

    let ctx = ffmpeg_next::format::open_with(
        &source.input,
        &ffmpeg_next::format::format::Format::Input(format),
        ffmpeg_next::Dictionary::new(),
    )?;
    Ok(ctx.input())
}

fn try_receive(
    input: &mut OpenInput,
    size: NativeSize,
    index: usize,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if input.decoder.receive_frame(&mut decoded).is_err() {
        return Ok(None);
    }
    let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
    input.scaler.run(&decoded, &mut rgb_frame)?;

    let pixels = extract_rgb_pixels(&rgb_frame, size.width, size.height);
    Ok(Some(Frame::new(pixels, size.width, size.height, 3, index)))
}

/// Packs an RGB24 frame row by row, dropping any stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
