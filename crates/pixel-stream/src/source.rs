use crate::{FormatUpdate, FrameMetadata};

/// One item produced by an upstream source.
///
/// Sources may announce a format and frame metadata before or between byte chunks;
/// a `PixelStream` applies them in the order they arrive.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// Format fields to merge into the stream's descriptor.
    Format(FormatUpdate),
    /// Metadata for the next frame that has not started yet.
    Frame(FrameMetadata),
    /// Raw pixel bytes in arbitrary chunking.
    Data(Vec<u8>),
}

impl SourceEvent {
    pub fn data(bytes: impl Into<Vec<u8>>) -> Self {
        SourceEvent::Data(bytes.into())
    }
}

impl From<FormatUpdate> for SourceEvent {
    fn from(update: FormatUpdate) -> Self {
        SourceEvent::Format(update)
    }
}

impl From<FrameMetadata> for SourceEvent {
    fn from(frame: FrameMetadata) -> Self {
        SourceEvent::Frame(frame)
    }
}
