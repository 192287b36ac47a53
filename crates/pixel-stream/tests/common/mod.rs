#![allow(dead_code)]

use pixel_stream::{ColorSpace, FormatDescriptor, FrameMetadata, PixelHandler, PixelStreamError};
use std::time::Duration;

/// Handler that records every hook call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<&'static str>,
    pub len: usize,
    pub frames: Vec<FrameMetadata>,
    pub frame_bytes: Vec<usize>,
    pub current: usize,
    pub delay: Option<Duration>,
    pub output_color_space: Option<ColorSpace>,
    pub seen_format: Option<FormatDescriptor>,
    pub fail_end_frame_at: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// `ops` with consecutive `write_pixels` entries folded into one.
    pub fn folded_ops(&self) -> Vec<&'static str> {
        let mut folded: Vec<&'static str> = Vec::new();
        for &op in &self.ops {
            if op == "write_pixels" && folded.last() == Some(&"write_pixels") {
                continue;
            }
            folded.push(op);
        }
        folded
    }
}

impl PixelHandler for Recorder {
    async fn start(&mut self, format: &mut FormatDescriptor) -> Result<(), PixelStreamError> {
        self.seen_format = Some(format.clone());
        if let Some(color_space) = self.output_color_space {
            format.color_space = color_space;
        }
        self.ops.push("start");
        self.pause().await;
        Ok(())
    }

    async fn start_frame(&mut self, frame: &FrameMetadata) -> Result<(), PixelStreamError> {
        self.frames.push(frame.clone());
        self.ops.push("start_frame");
        self.pause().await;
        Ok(())
    }

    async fn write_pixels(&mut self, data: &[u8]) -> Result<(), PixelStreamError> {
        self.len += data.len();
        self.current += data.len();
        self.ops.push("write_pixels");
        self.pause().await;
        Ok(())
    }

    async fn end_frame(&mut self) -> Result<(), PixelStreamError> {
        self.ops.push("end_frame");
        self.frame_bytes.push(self.current);
        self.current = 0;
        if self.fail_end_frame_at == Some(self.frame_bytes.len()) {
            return Err(PixelStreamError::hook("disk full"));
        }
        self.pause().await;
        Ok(())
    }

    async fn end(&mut self) -> Result<(), PixelStreamError> {
        self.ops.push("end");
        self.pause().await;
        Ok(())
    }
}

/// Handler that relies on every default hook, including the pixel one.
#[derive(Debug, Default)]
pub struct NoPixels;

impl PixelHandler for NoPixels {}

/// Expected folded hook order for `frames` complete frames.
pub fn expected_ops(frames: usize) -> Vec<&'static str> {
    let mut ops = vec!["start"];
    for _ in 0..frames {
        ops.extend(["start_frame", "write_pixels", "end_frame"]);
    }
    ops.push("end");
    ops
}
