use crate::PixelStreamError;
use crate::format::{HEIGHT_KEY, WIDTH_KEY};
use serde_json::{Map, Value};
use std::collections::VecDeque;

/// Caller-defined description of one frame in the stream.
///
/// The engine only looks at `width` and `height`; everything else is passed through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameMetadata(Map<String, Value>);

impl FrameMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata carrying an explicit frame size.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new().with(WIDTH_KEY, width).with(HEIGHT_KEY, height)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit `(width, height)` of this frame.
    ///
    /// Only reported when both are present as positive integers.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let width = positive(self.0.get(WIDTH_KEY)?)?;
        let height = positive(self.0.get(HEIGHT_KEY)?)?;
        Some((width, height))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for FrameMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for FrameMetadata {
    type Error = PixelStreamError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PixelStreamError::InvalidFormat(format!(
                "frame metadata must be a JSON object, got {other}"
            ))),
        }
    }
}

fn positive(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

/// FIFO of metadata for frames whose bytes have not started yet.
#[derive(Debug, Default)]
pub(crate) struct FrameQueue {
    pending: VecDeque<FrameMetadata>,
}

impl FrameQueue {
    pub(crate) fn push(&mut self, frame: FrameMetadata) {
        self.pending.push_back(frame);
    }

    /// Next metadata, or an empty object when nothing was queued.
    pub(crate) fn next(&mut self) -> FrameMetadata {
        self.pending.pop_front().unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dimensions_need_both() {
        assert_eq!(FrameMetadata::sized(100, 100).dimensions(), Some((100, 100)));
        assert_eq!(FrameMetadata::new().with("width", 10).dimensions(), None);
        assert_eq!(FrameMetadata::sized(0, 10).dimensions(), None);
        assert_eq!(
            FrameMetadata::new().with("width", "10").with("height", 10).dimensions(),
            None
        );
    }

    #[test]
    fn test_try_from_json() {
        let frame = FrameMetadata::try_from(json!({ "index": 3 })).unwrap();
        assert_eq!(frame.get("index"), Some(&json!(3)));

        assert!(FrameMetadata::try_from(json!("frame")).is_err());
    }

    #[test]
    fn test_queue_synthesizes_empty_metadata() {
        let mut queue = FrameQueue::default();
        queue.push(FrameMetadata::new().with("index", 0));

        assert_eq!(queue.next().get("index"), Some(&json!(0)));
        assert!(queue.next().is_empty());
        assert_eq!(queue.len(), 0);
    }
}
