#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn blank() -> Surface {
    Surface::new(280, 280).expect("surface")
}

fn is_black(surface: &Surface, x: u32, y: u32) -> bool {
    surface.pixel(x, y) == Some([0, 0, 0, 255])
}

fn decode_png(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
    let decoder = png::Decoder::new(bytes);
    let mut reader = decoder.read_info().expect("png header");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("png frame");
    buf.truncate(info.buffer_size());
    (info, buf)
}

// =============================================================
// Construction and clear
// =============================================================

#[test]
fn new_surface_is_opaque_white() {
    let surface = blank();
    assert!(surface.is_blank());
    assert_eq!(surface.as_rgba().len(), 280 * 280 * 4);
    assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(279, 279), Some([255, 255, 255, 255]));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(matches!(Surface::new(0, 10), Err(SurfaceError::EmptyDimensions { width: 0, height: 10 })));
    assert!(matches!(Surface::new(10, 0), Err(SurfaceError::EmptyDimensions { .. })));
}

#[test]
fn oversized_dimensions_are_rejected_without_allocating() {
    assert!(matches!(
        Surface::new(u32::MAX, u32::MAX),
        Err(SurfaceError::TooLarge { width: u32::MAX, height: u32::MAX })
    ));
    assert!(matches!(Surface::new(MAX_SURFACE_EDGE_PX + 1, 1), Err(SurfaceError::TooLarge { .. })));
    assert!(matches!(Surface::new(1, MAX_SURFACE_EDGE_PX + 1), Err(SurfaceError::TooLarge { .. })));
}

#[test]
fn largest_edge_is_accepted() {
    let surface = Surface::new(MAX_SURFACE_EDGE_PX, 1).expect("surface");
    assert_eq!(surface.width(), MAX_SURFACE_EDGE_PX);
    assert!(surface.is_blank());
}

#[test]
fn clear_removes_all_strokes() {
    let mut surface = blank();
    let style = StrokeStyle::default();
    surface.draw_segment(pt(10.0, 10.0), pt(200.0, 250.0), &style);
    surface.draw_segment(pt(0.0, 279.0), pt(279.0, 0.0), &style);
    assert!(!surface.is_blank());

    surface.clear();
    assert!(surface.is_blank());
    assert!(surface.as_rgba().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn clear_is_idempotent() {
    let mut surface = blank();
    surface.clear();
    surface.clear();
    assert!(surface.is_blank());
}

#[test]
fn pixel_outside_surface_is_none() {
    let surface = blank();
    assert_eq!(surface.pixel(280, 0), None);
    assert_eq!(surface.pixel(0, 280), None);
}

// =============================================================
// Stroke rasterization
// =============================================================

#[test]
fn segment_endpoints_and_midpoint_are_solid_black() {
    let mut surface = blank();
    surface.draw_segment(pt(50.0, 50.0), pt(150.0, 50.0), &StrokeStyle::default());
    assert!(is_black(&surface, 50, 50));
    assert!(is_black(&surface, 100, 50));
    assert!(is_black(&surface, 150, 50));
}

#[test]
fn segment_has_stroke_width_thickness() {
    let mut surface = blank();
    surface.draw_segment(pt(50.0, 100.0), pt(150.0, 100.0), &StrokeStyle::default());
    // Radius 10 around y=100: rows 90..=109 are fully covered.
    assert!(is_black(&surface, 100, 91));
    assert!(is_black(&surface, 100, 108));
    assert_eq!(surface.pixel(100, 80), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(100, 120), Some([255, 255, 255, 255]));
}

#[test]
fn segment_has_round_caps() {
    let mut surface = blank();
    surface.draw_segment(pt(100.0, 100.0), pt(150.0, 100.0), &StrokeStyle::default());
    // Just past the start cap along the axis is inked; the diagonal corner of
    // a square cap would not be.
    assert!(is_black(&surface, 92, 100));
    assert_eq!(surface.pixel(91, 91), Some([255, 255, 255, 255]));
}

#[test]
fn zero_length_segment_paints_a_dot() {
    let mut surface = blank();
    surface.draw_segment(pt(40.0, 40.0), pt(40.0, 40.0), &StrokeStyle::default());
    assert!(is_black(&surface, 40, 40));
    assert!(!surface.is_blank());
}

#[test]
fn antialiased_edge_is_grey_and_opaque() {
    let mut surface = blank();
    surface.draw_segment(pt(50.5, 100.5), pt(150.5, 100.5), &StrokeStyle::with_width(4.0));
    // Pixel centre at distance exactly 2.0 from the axis gets half coverage.
    let px = surface.pixel(100, 102).expect("pixel");
    assert!(px[0] > 0 && px[0] < 255, "expected grey, got {px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn segment_outside_surface_is_clipped() {
    let mut surface = blank();
    surface.draw_segment(pt(-100.0, -100.0), pt(-50.0, -50.0), &StrokeStyle::default());
    assert!(surface.is_blank());

    surface.draw_segment(pt(-20.0, 140.0), pt(300.0, 140.0), &StrokeStyle::default());
    assert!(is_black(&surface, 0, 140));
    assert!(is_black(&surface, 279, 140));
}

#[test]
fn stroke_serializes_as_point_array() {
    let stroke = Stroke { points: vec![pt(1.0, 2.0)] };
    let json = serde_json::to_value(&stroke).expect("serialize");
    assert_eq!(json, serde_json::json!([{ "x": 1.0, "y": 2.0 }]));
    let back: Stroke = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, stroke);
}

// =============================================================
// Style
// =============================================================

#[test]
fn default_style_is_thick_black() {
    let style = StrokeStyle::default();
    assert_eq!(style.width, 20.0);
    assert_eq!(style.css_color(), "#000000");
}

#[test]
fn with_width_clamps_to_minimum() {
    assert_eq!(StrokeStyle::with_width(0.0).width, 1.0);
    assert_eq!(StrokeStyle::with_width(12.0).width, 12.0);
}

// =============================================================
// Encoding
// =============================================================

#[test]
fn encode_png_round_trips_pixels() {
    let mut surface = Surface::new(32, 16).expect("surface");
    surface.draw_segment(pt(4.0, 8.0), pt(28.0, 8.0), &StrokeStyle::with_width(4.0));
    let bytes = surface.encode_png().expect("encode");
    assert!(bytes.starts_with(&protocol::data_uri::PNG_SIGNATURE));

    let (info, pixels) = decode_png(&bytes);
    assert_eq!((info.width, info.height), (32, 16));
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(pixels, surface.as_rgba());
}

#[test]
fn blank_surface_encodes_fully_opaque_white() {
    let bytes = blank().encode_png().expect("encode");
    let (_, pixels) = decode_png(&bytes);
    assert!(pixels.iter().all(|&b| b == 255));
}

#[test]
fn data_uri_is_accepted_by_request_validation() {
    let uri = blank().to_data_uri().expect("data uri");
    assert!(uri.starts_with("data:image/png;base64,"));
    let request = protocol::PredictRequest::new(uri, "cnn");
    assert!(request.validate().is_ok());
}
