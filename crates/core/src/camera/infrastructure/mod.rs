pub mod ffmpeg_camera;
pub mod latest_frame_stream;
