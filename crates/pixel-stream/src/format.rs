use crate::{ColorSpace, PixelStreamError};
use serde_json::{Map, Value};

pub(crate) const WIDTH_KEY: &str = "width";
pub(crate) const HEIGHT_KEY: &str = "height";
pub(crate) const COLOR_SPACE_KEY: &str = "colorSpace";

/// Layout of the pixel bytes in a stream.
///
/// `extra` carries fields the engine never reads, preserved for downstream stages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormatDescriptor {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub extra: Map<String, Value>,
}

impl FormatDescriptor {
    pub fn new(width: u32, height: u32, color_space: ColorSpace) -> Self {
        Self {
            width,
            height,
            color_space,
            extra: Map::new(),
        }
    }

    /// Byte size of one frame in this format.
    pub fn frame_size(&self) -> Result<usize, PixelStreamError> {
        self.color_space.frame_size(self.width, self.height)
    }

    /// Get an extra field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Merge an update into this descriptor.
    ///
    /// Fields carried by the update overwrite the current ones, absent fields are left
    /// untouched. The descriptor is not modified if the update is invalid.
    pub fn apply(&mut self, update: &FormatUpdate) -> Result<(), PixelStreamError> {
        let mut merged = self.clone();
        if let Some(width) = update.width {
            merged.width = width;
        }
        if let Some(height) = update.height {
            merged.height = height;
        }
        if let Some(name) = &update.color_space {
            merged.color_space = name.parse()?;
        }
        for (name, value) in &update.extra {
            merged.set_field(name, value.clone())?;
        }
        *self = merged;
        Ok(())
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), PixelStreamError> {
        match name {
            WIDTH_KEY => self.width = dimension(name, &value)?,
            HEIGHT_KEY => self.height = dimension(name, &value)?,
            COLOR_SPACE_KEY => self.color_space = color_space_name(&value)?.parse()?,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Render as a JSON object using the `width`/`height`/`colorSpace` field names.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(WIDTH_KEY.to_string(), Value::from(self.width));
        object.insert(HEIGHT_KEY.to_string(), Value::from(self.height));
        object.insert(
            COLOR_SPACE_KEY.to_string(),
            Value::from(self.color_space.as_str()),
        );
        for (name, value) in &self.extra {
            object.insert(name.clone(), value.clone());
        }
        Value::Object(object)
    }

    pub fn from_json(value: &Value) -> Result<Self, PixelStreamError> {
        let mut format = FormatDescriptor::default();
        format.apply(&FormatUpdate::from_json(value)?)?;
        Ok(format)
    }
}

/// A partial format description.
///
/// Used as construction options for a `PixelStream` and for format announcements
/// from an upstream source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormatUpdate {
    width: Option<u32>,
    height: Option<u32>,
    color_space: Option<String>,
    extra: Map<String, Value>,
}

impl FormatUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the frame height in pixels.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the color space by name (e.g. "rgba"). Checked when the update is applied.
    pub fn with_color_space(mut self, name: impl Into<String>) -> Self {
        self.color_space = Some(name.into());
        self
    }

    /// Set an arbitrary field.
    ///
    /// `width`, `height` and `colorSpace` are validated and routed to their typed
    /// fields when the update is applied.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Parse a JSON object such as `{"width": 200, "height": 100, "colorSpace": "rgba"}`.
    pub fn from_json(value: &Value) -> Result<Self, PixelStreamError> {
        let object = value.as_object().ok_or_else(|| {
            PixelStreamError::InvalidFormat(format!("expected a JSON object, got {value}"))
        })?;

        let mut update = FormatUpdate::new();
        for (name, value) in object {
            match name.as_str() {
                WIDTH_KEY => update.width = Some(dimension(name, value)?),
                HEIGHT_KEY => update.height = Some(dimension(name, value)?),
                COLOR_SPACE_KEY => {
                    let name = color_space_name(value)?;
                    name.parse::<ColorSpace>()?;
                    update.color_space = Some(name.to_string());
                }
                _ => {
                    update.extra.insert(name.clone(), value.clone());
                }
            }
        }
        Ok(update)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PixelStreamError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn color_space(&self) -> Option<&str> {
        self.color_space.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.color_space.is_none()
            && self.extra.is_empty()
    }
}

impl From<FormatDescriptor> for FormatUpdate {
    fn from(format: FormatDescriptor) -> Self {
        Self {
            width: Some(format.width),
            height: Some(format.height),
            color_space: Some(format.color_space.as_str().to_string()),
            extra: format.extra,
        }
    }
}

/// Live descriptor plus the input snapshot frozen when the stream starts.
#[derive(Debug, Clone, Default)]
pub struct FormatState {
    live: FormatDescriptor,
    input: Option<FormatDescriptor>,
    revision: u64,
}

impl FormatState {
    pub fn new(live: FormatDescriptor) -> Self {
        Self {
            live,
            input: None,
            revision: 0,
        }
    }

    pub fn live(&self) -> &FormatDescriptor {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut FormatDescriptor {
        &mut self.live
    }

    /// The descriptor as it was when the stream started, if it has.
    pub fn input(&self) -> Option<&FormatDescriptor> {
        self.input.as_ref()
    }

    /// Number of changes to the live descriptor.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, update: &FormatUpdate) -> Result<(), PixelStreamError> {
        self.live.apply(update)?;
        self.revision += 1;
        Ok(())
    }

    /// Record a change made directly through `live_mut`.
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// Snapshot the live descriptor as the input format. Later calls keep the first snapshot.
    pub fn freeze(&mut self) -> &FormatDescriptor {
        self.input.get_or_insert_with(|| self.live.clone())
    }
}

fn dimension(name: &str, value: &Value) -> Result<u32, PixelStreamError> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            PixelStreamError::InvalidFormat(format!("{name} must be a non-negative integer, got {value}"))
        })
}

fn color_space_name(value: &Value) -> Result<&str, PixelStreamError> {
    value.as_str().ok_or_else(|| {
        PixelStreamError::InvalidFormat(format!("{COLOR_SPACE_KEY} must be a string, got {value}"))
    })
}
