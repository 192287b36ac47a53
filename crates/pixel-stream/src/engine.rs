use crate::frame::FrameQueue;
use crate::output::Publisher;
use crate::{
    ColorSpace, FormatDescriptor, FormatState, FormatUpdate, FrameMetadata, Outputs,
    PixelHandler, PixelStreamError, SourceEvent,
};
use futures_core::Stream;
use futures_util::StreamExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No bytes seen yet.
    Start,
    /// Between frames; the next chunk opens a frame.
    FrameStart,
    /// Inside a frame, waiting for more bytes.
    FrameData,
    /// Current frame is complete but `end_frame` has not run.
    FrameEnd,
    /// `end` ran; no more input is accepted.
    Finished,
    /// A hook failed or a call was cancelled mid-hook; no more input is accepted.
    Failed,
}

/// Re-segments a byte stream of concatenated raw frames and drives a `PixelHandler`.
///
/// Bytes may arrive in any chunking. The stream slices them into frames of exactly
/// `frame_size()` bytes and calls the handler at every boundary.
///
/// # Examples
///
/// ```
/// use pixel_stream::{PixelHandler, PixelStream, PixelStreamError};
///
/// struct Count(usize);
///
/// impl PixelHandler for Count {
///     async fn write_pixels(&mut self, data: &[u8]) -> Result<(), PixelStreamError> {
///         self.0 += data.len();
///         Ok(())
///     }
/// }
///
/// async fn example() -> Result<(), PixelStreamError> {
///     let mut stream = PixelStream::with_size(Count(0), 10, 10);
///     for _ in 0..10 {
///         stream.write(&[0u8; 30]).await?;
///     }
///     stream.end().await?;
///     assert_eq!(stream.handler().0, 300);
///     Ok(())
/// }
/// ```
pub struct PixelStream<H> {
    handler: H,
    format: FormatState,
    frames: FrameQueue,
    state: EngineState,
    baseline_size: usize,
    frame_size: usize,
    consumed: usize,
    piped: bool,
    // set while hooks run; still set afterwards means the call was cancelled
    in_flight: bool,
    publisher: Publisher,
    outputs: Option<Outputs>,
}

impl<H> std::fmt::Debug for PixelStream<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelStream")
            .field("format", self.format.live())
            .field("state", &self.state)
            .field("frame_size", &self.frame_size)
            .field("consumed", &self.consumed)
            .field("pending_frames", &self.frames.len())
            .field("piped", &self.piped)
            .finish()
    }
}

impl<H: PixelHandler> PixelStream<H> {
    /// Create a stream with a 0x0 `rgb` format, to be filled in by an upstream source.
    pub fn new(handler: H) -> Self {
        Self::from_format(handler, FormatDescriptor::default())
    }

    /// Create a stream for frames of a fixed size in `rgb`.
    pub fn with_size(handler: H, width: u32, height: u32) -> Self {
        let format = FormatDescriptor {
            width,
            height,
            ..FormatDescriptor::default()
        };
        Self::from_format(handler, format)
    }

    /// Create a stream from option fields.
    ///
    /// Recognized options are `width`, `height` and `colorSpace`; any other field is kept
    /// in the format for downstream stages.
    ///
    /// # Errors
    ///
    /// Returns `PixelStreamError::UnknownColorSpace` if the color space is not in the table.
    pub fn with_options(handler: H, options: FormatUpdate) -> Result<Self, PixelStreamError> {
        let mut format = FormatDescriptor::default();
        format.apply(&options)?;
        Ok(Self::from_format(handler, format))
    }

    /// Create a stream from a size plus option fields. Options override the size.
    pub fn with_size_and_options(
        handler: H,
        width: u32,
        height: u32,
        options: FormatUpdate,
    ) -> Result<Self, PixelStreamError> {
        let mut format = FormatDescriptor {
            width,
            height,
            ..FormatDescriptor::default()
        };
        format.apply(&options)?;
        Ok(Self::from_format(handler, format))
    }

    pub fn from_format(handler: H, format: FormatDescriptor) -> Self {
        let (publisher, outputs) = Publisher::new();
        Self {
            handler,
            format: FormatState::new(format),
            frames: FrameQueue::default(),
            state: EngineState::Start,
            baseline_size: 0,
            frame_size: 0,
            consumed: 0,
            piped: false,
            in_flight: false,
            publisher,
            outputs: Some(outputs),
        }
    }

    /// Take the downstream channels. Returns `None` after the first call.
    pub fn outputs(&mut self) -> Option<Outputs> {
        self.outputs.take()
    }

    /// Queue metadata for a frame that has not started yet.
    pub fn add_frame(&mut self, frame: FrameMetadata) {
        self.frames.push(frame);
    }

    /// Merge format fields into the live descriptor.
    ///
    /// Before the first chunk this also decides the size of the frames.
    pub fn apply_format(&mut self, update: &FormatUpdate) -> Result<(), PixelStreamError> {
        self.format.apply(update)?;
        log::debug!(
            "pixel stream: format updated to {}x{} {} (revision {})",
            self.format.live().width,
            self.format.live().height,
            self.format.live().color_space,
            self.format.revision()
        );
        Ok(())
    }

    /// Feed the next chunk of bytes.
    ///
    /// Returns once every hook triggered by the chunk has completed. After an error, or
    /// if the returned future is dropped before completing, the stream is halted and
    /// every later call returns `PixelStreamError::Halted`.
    pub async fn write(&mut self, data: &[u8]) -> Result<(), PixelStreamError> {
        self.ensure_open()?;
        self.in_flight = true;
        let result = self.consume(data).await;
        self.in_flight = false;
        self.fail_on_error(result)
    }

    /// Signal the end of input and run the handler's `end` hook.
    pub async fn end(&mut self) -> Result<(), PixelStreamError> {
        self.ensure_open()?;
        if self.state == EngineState::FrameData && self.consumed > 0 {
            log::warn!(
                "pixel stream: input ended inside a frame ({} of {} bytes)",
                self.consumed,
                self.frame_size
            );
        }
        self.in_flight = true;
        let result = self.handler.end().await;
        self.in_flight = false;
        let result = self.fail_on_error(result);
        if result.is_ok() {
            self.state = EngineState::Finished;
            log::debug!("pixel stream: finished");
        }
        result
    }

    /// Drive the stream from an upstream source until it is exhausted, then end it.
    ///
    /// A stream can be piped from one source only; later calls return
    /// `PixelStreamError::AlreadyPiped`.
    pub async fn pipe<S>(&mut self, source: S) -> Result<(), PixelStreamError>
    where
        S: Stream<Item = SourceEvent>,
    {
        if self.piped {
            return Err(PixelStreamError::AlreadyPiped);
        }
        self.piped = true;

        let mut source = std::pin::pin!(source);
        while let Some(event) = source.next().await {
            self.handle_event(event).await?;
        }
        self.end().await
    }

    /// Apply a single source event. An invalid format announcement halts the stream.
    pub async fn handle_event(&mut self, event: SourceEvent) -> Result<(), PixelStreamError> {
        match event {
            SourceEvent::Format(update) => {
                self.ensure_open()?;
                let result = self.apply_format(&update);
                self.fail_on_error(result)
            }
            SourceEvent::Frame(frame) => {
                self.add_frame(frame);
                Ok(())
            }
            SourceEvent::Data(bytes) => self.write(&bytes).await,
        }
    }

    fn ensure_open(&mut self) -> Result<(), PixelStreamError> {
        if self.in_flight {
            log::warn!("pixel stream: halted, previous call cancelled in {:?}", self.state);
            self.in_flight = false;
            self.state = EngineState::Failed;
        }
        match self.state {
            EngineState::Failed => Err(PixelStreamError::Halted),
            EngineState::Finished => Err(PixelStreamError::Closed),
            _ => Ok(()),
        }
    }

    fn fail_on_error<T>(&mut self, result: Result<T, PixelStreamError>) -> Result<T, PixelStreamError> {
        if let Err(err) = &result {
            log::warn!("pixel stream: halted in {:?}: {}", self.state, err);
            self.state = EngineState::Failed;
        }
        result
    }

    async fn consume(&mut self, mut data: &[u8]) -> Result<(), PixelStreamError> {
        loop {
            match self.state {
                EngineState::Start => {
                    self.begin().await?;
                    self.state = EngineState::FrameStart;
                }
                EngineState::FrameStart => {
                    self.begin_frame().await?;
                    self.state = EngineState::FrameData;
                }
                EngineState::FrameData => {
                    if data.is_empty() {
                        return Ok(());
                    }

                    if self.frame_size == 0 {
                        log::warn!(
                            "pixel stream: zero-sized frame, dropping {} bytes",
                            data.len()
                        );
                        data = &[];
                        self.state = EngineState::FrameEnd;
                        continue;
                    }

                    let wanted = self.frame_size - self.consumed;
                    let (chunk, rest) = data.split_at(wanted.min(data.len()));
                    self.handler.write_pixels(chunk).await?;

                    self.consumed += chunk.len();
                    if self.consumed == self.frame_size {
                        self.state = EngineState::FrameEnd;
                    }
                    data = rest;
                }
                EngineState::FrameEnd => {
                    self.handler.end_frame().await?;
                    log::trace!("pixel stream: frame complete ({} bytes)", self.consumed);

                    self.consumed = 0;
                    self.state = EngineState::FrameStart;
                    if data.is_empty() {
                        return Ok(());
                    }
                }
                EngineState::Finished | EngineState::Failed => {
                    unreachable!("consume called on a closed stream")
                }
            }
        }
    }

    async fn begin(&mut self) -> Result<(), PixelStreamError> {
        let input = self.format.freeze();
        self.baseline_size = input.frame_size()?;
        log::debug!(
            "pixel stream: start {}x{} {} ({} bytes per frame)",
            input.width,
            input.height,
            input.color_space,
            self.baseline_size
        );

        let before = self.format.live().clone();
        self.handler.start(self.format.live_mut()).await?;
        if *self.format.live() != before {
            self.format.touch();
        }
        self.publisher.publish_format(self.format.live());
        Ok(())
    }

    async fn begin_frame(&mut self) -> Result<(), PixelStreamError> {
        let frame = self.frames.next();

        // explicit frame sizes use the input color space, even if `start` changed the output
        self.frame_size = match frame.dimensions() {
            Some((width, height)) => self.input_color_space().frame_size(width, height)?,
            None => self.baseline_size,
        };
        log::trace!("pixel stream: frame start ({} bytes)", self.frame_size);

        self.handler.start_frame(&frame).await?;
        self.publisher.publish_frame(&frame);
        Ok(())
    }

    fn input_color_space(&self) -> ColorSpace {
        self.format
            .input()
            .unwrap_or(self.format.live())
            .color_space
    }

    /// The live format, including changes made by the `start` hook.
    pub fn format(&self) -> &FormatDescriptor {
        self.format.live()
    }

    /// The format frozen when the first chunk arrived.
    pub fn input_format(&self) -> Option<&FormatDescriptor> {
        self.format.input()
    }

    /// Number of changes to the live format: merged updates, plus one if the `start`
    /// hook modified it.
    pub fn revision(&self) -> u64 {
        self.format.revision()
    }

    /// Byte size of the current (or most recent) frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Bytes of the current frame seen so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Current state. Reports `Failed` after a cancelled `write` or `end`.
    pub fn state(&self) -> EngineState {
        if self.in_flight {
            return EngineState::Failed;
        }
        self.state
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}
