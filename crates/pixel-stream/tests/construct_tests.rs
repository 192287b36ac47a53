mod common;

use common::Recorder;
use pixel_stream::{ColorSpace, FormatUpdate, PixelStream, PixelStreamError};
use serde_json::json;

#[test]
fn test_defaults() {
    let stream = PixelStream::new(Recorder::new());
    assert_eq!(
        stream.format().to_json(),
        json!({ "width": 0, "height": 0, "colorSpace": "rgb" })
    );
    assert!(stream.input_format().is_none());
}

#[test]
fn test_optional_width_and_height() {
    let stream = PixelStream::with_size(Recorder::new(), 100, 100);
    assert_eq!(
        stream.format().to_json(),
        json!({ "width": 100, "height": 100, "colorSpace": "rgb" })
    );
}

#[test]
fn test_color_space_option() {
    let options = FormatUpdate::new().with_color_space("rgba");
    let stream = PixelStream::with_options(Recorder::new(), options).unwrap();
    assert_eq!(
        stream.format().to_json(),
        json!({ "width": 0, "height": 0, "colorSpace": "rgba" })
    );
}

#[test]
fn test_keeps_other_options() {
    let options = FormatUpdate::from_json(&json!({ "foo": 2, "bar": "hi" })).unwrap();
    let stream = PixelStream::with_options(Recorder::new(), options).unwrap();
    assert_eq!(
        stream.format().to_json(),
        json!({ "width": 0, "height": 0, "colorSpace": "rgb", "foo": 2, "bar": "hi" })
    );
}

#[test]
fn test_size_and_options() {
    let options = FormatUpdate::new().with_color_space("rgba");
    let stream =
        PixelStream::with_size_and_options(Recorder::new(), 100, 100, options).unwrap();
    assert_eq!(
        stream.format().to_json(),
        json!({ "width": 100, "height": 100, "colorSpace": "rgba" })
    );
}

#[test]
fn test_options_from_json_string() {
    let options =
        FormatUpdate::from_json_str(r#"{"width": 4, "height": 2, "colorSpace": "cmyk"}"#)
            .unwrap();
    let stream = PixelStream::with_options(Recorder::new(), options).unwrap();
    assert_eq!(stream.format().frame_size().unwrap(), 4 * 2 * 4);
}

#[test]
fn test_unknown_color_space_fails_fast() {
    let options = FormatUpdate::new().with_color_space("yuv420");
    let result = PixelStream::with_options(Recorder::new(), options);
    assert!(matches!(
        result,
        Err(PixelStreamError::UnknownColorSpace(name)) if name == "yuv420"
    ));

    let result = FormatUpdate::from_json(&json!({ "colorSpace": "hsv" }));
    assert!(matches!(result, Err(PixelStreamError::UnknownColorSpace(_))));
}

#[tokio::test]
async fn test_computes_frame_size() {
    let mut stream = PixelStream::with_size(Recorder::new(), 100, 100);
    stream.write(&vec![0u8; 100 * 100 * 3 * 2]).await.unwrap();
    stream.end().await.unwrap();

    assert_eq!(stream.frame_size(), 100 * 100 * 3);
    assert_eq!(stream.handler().frame_bytes, vec![30000, 30000]);
}

#[tokio::test]
async fn test_computes_frame_size_for_another_color_space() {
    let options = FormatUpdate::new().with_color_space("graya");
    let mut stream =
        PixelStream::with_size_and_options(Recorder::new(), 100, 100, options).unwrap();
    stream.write(&vec![0u8; 100 * 100 * 2 * 2]).await.unwrap();
    stream.end().await.unwrap();

    assert_eq!(stream.frame_size(), 20000);
    assert_eq!(stream.input_format().unwrap().color_space, ColorSpace::Graya);
}

#[tokio::test]
async fn test_frame_size_for_every_color_space() {
    for color_space in ColorSpace::ALL {
        let options = FormatUpdate::new().with_color_space(color_space.as_str());
        let mut stream =
            PixelStream::with_size_and_options(Recorder::new(), 7, 3, options).unwrap();
        stream.write(&[0u8; 1]).await.unwrap();

        assert_eq!(stream.frame_size(), 7 * 3 * color_space.components());
    }
}
