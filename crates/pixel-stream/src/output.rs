use crate::{FormatDescriptor, FrameMetadata, SourceEvent};
use futures_core::Stream;
use futures_util::StreamExt;
use futures_util::stream;
use tokio::sync::{mpsc, oneshot};

/// Receiving side of what a `PixelStream` announces to downstream consumers.
#[derive(Debug)]
pub struct Outputs {
    /// Resolved output format, sent once after the `start` hook succeeds.
    pub format: oneshot::Receiver<FormatDescriptor>,
    /// Metadata of each frame, sent after its `start_frame` hook succeeds.
    pub frames: mpsc::UnboundedReceiver<FrameMetadata>,
}

impl Outputs {
    /// Replay the announcements as source events for a downstream stage.
    ///
    /// Yields the format first (skipped if the stream never started), then every frame
    /// until the producing stream is dropped.
    pub fn into_source_events(self) -> impl Stream<Item = SourceEvent> {
        let format = stream::once(self.format)
            .filter_map(|format| async move { format.ok().map(|f| SourceEvent::Format(f.into())) });
        let frames = stream::unfold(self.frames, |mut frames| async move {
            frames.recv().await.map(|frame| (SourceEvent::Frame(frame), frames))
        });
        format.chain(frames)
    }
}

/// Sending side kept by the stream.
#[derive(Debug)]
pub(crate) struct Publisher {
    format: Option<oneshot::Sender<FormatDescriptor>>,
    frames: mpsc::UnboundedSender<FrameMetadata>,
}

impl Publisher {
    pub(crate) fn new() -> (Self, Outputs) {
        let (format_tx, format_rx) = oneshot::channel();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let publisher = Self {
            format: Some(format_tx),
            frames: frames_tx,
        };
        let outputs = Outputs {
            format: format_rx,
            frames: frames_rx,
        };
        (publisher, outputs)
    }

    pub(crate) fn publish_format(&mut self, format: &FormatDescriptor) {
        if let Some(sender) = self.format.take() {
            // nobody listening is fine
            let _ = sender.send(format.clone());
        }
    }

    pub(crate) fn publish_frame(&self, frame: &FrameMetadata) {
        let _ = self.frames.send(frame.clone());
    }
}
