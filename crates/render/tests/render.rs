use render::{OffscreenRenderer, RenderError, SceneView, Viewer};

fn view() -> SceneView {
    SceneView {
        table_center: [1.655, 0.3, 0.63625],
        table_half_extents: [0.3, 0.35, 0.02],
        eef: [1.55, 0.3, 0.9],
        obj: [1.5, 0.25, 0.68],
        goal: [1.6, 0.35, 0.8],
    }
}

/// A rendered frame has exactly `width * height * 3` bytes.
#[test]
fn frame_has_rgb_layout() {
    let renderer = OffscreenRenderer::new(96, 64);
    let frame = renderer.render(&view()).unwrap();
    assert_eq!(frame.width, 96);
    assert_eq!(frame.height, 64);
    assert_eq!(frame.pixels.len(), 96 * 64 * 3);
}

/// Dimension overrides apply to subsequent frames.
#[test]
fn dimension_override_is_honored() {
    let mut renderer = OffscreenRenderer::new(96, 64);
    renderer.set_dimensions(32, 48);
    let frame = renderer.render(&view()).unwrap();
    assert_eq!((frame.width, frame.height), (32, 48));
}

/// Zero-sized frames are rejected rather than silently produced.
#[test]
fn zero_dimensions_are_rejected() {
    let renderer = OffscreenRenderer::new(0, 64);
    assert!(matches!(renderer.render(&view()), Err(RenderError::EmptyFrame)));
}

/// The scene markers actually land in the image: the frame is not just the
/// background gradient.
#[test]
fn markers_are_drawn() {
    let renderer = OffscreenRenderer::new(128, 128);
    let with_scene = renderer.render(&view()).unwrap();
    // Markers behind the camera, degenerate table: nothing to draw.
    let empty = renderer
        .render(&SceneView {
            eef: [-10.0, -14.0, 9.0],
            obj: [-10.0, -14.0, 9.0],
            goal: [-10.0, -14.0, 9.0],
            table_center: view().table_center,
            table_half_extents: [0.0, 0.0, 0.0],
        })
        .unwrap();
    assert_ne!(with_scene.pixels, empty.pixels, "scene content should be visible");
}

/// The viewer keeps the last presented frame.
#[test]
fn viewer_retains_last_frame() {
    let mut viewer = Viewer::new(64, 64);
    assert!(viewer.last_frame().is_none());
    let frame = viewer.show(&view(), 64, 64).unwrap();
    assert_eq!(viewer.last_frame(), Some(&frame));
}
