//! Frame segmentation for raw pixel streams.
//!
//! This crate provides `PixelStream`, a base for pipeline stages that process
//! concatenated raw frames (encoders, decoders, color converters). It takes bytes in
//! arbitrary chunks, cuts them at frame boundaries computed from the stream's format
//! and per-frame metadata, and calls a `PixelHandler` at every boundary.
//!
//! The stream never looks at pixel values. It also announces the resolved format and
//! each frame's metadata through `Outputs`, so stages can be chained.

pub mod colorspace;
pub mod engine;
pub mod error;
pub mod format;
pub mod frame;
pub mod handler;
pub mod output;
pub mod source;

pub use colorspace::ColorSpace;
pub use engine::{EngineState, PixelStream};
pub use error::PixelStreamError;
pub use format::{FormatDescriptor, FormatState, FormatUpdate};
pub use frame::FrameMetadata;
pub use handler::PixelHandler;
pub use output::Outputs;
pub use source::SourceEvent;
