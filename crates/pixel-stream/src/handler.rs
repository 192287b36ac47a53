use crate::{FormatDescriptor, FrameMetadata, PixelStreamError};

/// Codec behavior plugged into a `PixelStream`.
///
/// The stream calls the hooks in this order, whatever the chunking of its input:
/// `start`, then per frame `start_frame`, `write_pixels` one or more times and
/// `end_frame`, and finally `end`. The stream waits for each hook to complete before
/// moving on, so hooks may await timers or I/O.
///
/// Returning an error from any hook halts the stream.
#[allow(async_fn_in_trait)]
pub trait PixelHandler {
    /// Called once before the first frame.
    ///
    /// `format` is the live output format; changes made here are what downstream
    /// stages see. Frame sizes keep using the input format.
    async fn start(&mut self, format: &mut FormatDescriptor) -> Result<(), PixelStreamError> {
        let _ = format;
        Ok(())
    }

    /// Called at the start of each frame with its metadata.
    async fn start_frame(&mut self, frame: &FrameMetadata) -> Result<(), PixelStreamError> {
        let _ = frame;
        Ok(())
    }

    /// Called with consecutive slices of the current frame's pixel bytes.
    ///
    /// There is no useful default: handlers that leave this out fail with
    /// `PixelStreamError::Unimplemented` as soon as a frame carries bytes.
    async fn write_pixels(&mut self, data: &[u8]) -> Result<(), PixelStreamError> {
        let _ = data;
        Err(PixelStreamError::Unimplemented("No pixel-data handler"))
    }

    /// Called after the last byte of each frame.
    async fn end_frame(&mut self) -> Result<(), PixelStreamError> {
        Ok(())
    }

    /// Called once when the input ends.
    async fn end(&mut self) -> Result<(), PixelStreamError> {
        Ok(())
    }
}
