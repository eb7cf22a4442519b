//! Offscreen software rasterizer.
//!
//! Produces small diagnostic frames of the workspace: the table slab, the
//! object, the end-effector and the current goal marker. The renderer is a
//! stand-in for a full rendering pipeline; it exists so episode runners can
//! dump what the policy is doing without a GPU.

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::frame::Frame;

/// Sky color at the top of the background gradient.
const SKY_TOP: [u8; 3] = [158, 178, 204];
/// Sky color at the bottom of the background gradient.
const SKY_BOTTOM: [u8; 3] = [214, 222, 233];
/// Table surface color.
const TABLE: [u8; 3] = [136, 98, 60];
/// End-effector marker color.
const EEF: [u8; 3] = [52, 56, 64];
/// Object marker color.
const OBJECT: [u8; 3] = [196, 70, 48];
/// Goal ring color.
const GOAL: [u8; 3] = [62, 148, 82];

/// Plain-data snapshot of everything the renderer draws.
///
/// Handed over by the environment layer each call so the renderer stays
/// independent of the simulation's internals.
#[derive(Debug, Clone, Copy)]
pub struct SceneView {
    pub table_center: [f32; 3],
    pub table_half_extents: [f32; 3],
    pub eef: [f32; 3],
    pub obj: [f32; 3],
    pub goal: [f32; 3],
}

/// Renders [`SceneView`] snapshots into RGB [`Frame`]s.
pub struct OffscreenRenderer {
    width: u32,
    height: u32,
}

impl OffscreenRenderer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Override the output dimensions for subsequent frames.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Produce one frame of the given scene.
    pub fn render(&self, view: &SceneView) -> Result<Frame, RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyFrame);
        }

        let mut frame = self.background();
        let center = Vec3::from_array(view.table_center);
        let camera = Camera::framing(center, self.width, self.height);
        let vp = camera.build_view_projection_matrix();
        let focal = self.height as f32 / (2.0 * (camera.fovy * 0.5).tan());

        self.draw_table(&mut frame, &vp, view);

        // Markers sorted far to near so closer ones paint over.
        let mut markers = [
            (view.goal, GOAL, 0.035, true),
            (view.obj, OBJECT, 0.03, false),
            (view.eef, EEF, 0.04, false),
        ];
        markers.sort_by(|a, b| {
            let da = camera.eye.distance(Vec3::from_array(a.0));
            let db = camera.eye.distance(Vec3::from_array(b.0));
            db.total_cmp(&da)
        });
        for (pos, color, world_radius, ring) in markers {
            if let Some((sx, sy, w)) = project(&vp, Vec3::from_array(pos), self.width, self.height)
            {
                let radius = (focal * world_radius / w).max(1.5);
                if ring {
                    draw_ring(&mut frame, sx, sy, radius, color);
                } else {
                    fill_circle(&mut frame, sx, sy, radius, color);
                }
            }
        }

        Ok(frame)
    }

    fn background(&self) -> Frame {
        let mut frame = Frame::filled(self.width, self.height, SKY_BOTTOM);
        for y in 0..self.height {
            let t = y as f32 / self.height.max(1) as f32;
            let color = [
                lerp_u8(SKY_TOP[0], SKY_BOTTOM[0], t),
                lerp_u8(SKY_TOP[1], SKY_BOTTOM[1], t),
                lerp_u8(SKY_TOP[2], SKY_BOTTOM[2], t),
            ];
            for x in 0..self.width {
                frame.put(x as i32, y as i32, color);
            }
        }
        frame
    }

    fn draw_table(&self, frame: &mut Frame, vp: &Mat4, view: &SceneView) {
        let c = Vec3::from_array(view.table_center);
        let h = Vec3::from_array(view.table_half_extents);
        let top = c.z + h.z;
        let corners = [
            Vec3::new(c.x - h.x, c.y - h.y, top),
            Vec3::new(c.x + h.x, c.y - h.y, top),
            Vec3::new(c.x + h.x, c.y + h.y, top),
            Vec3::new(c.x - h.x, c.y + h.y, top),
        ];
        let projected: Vec<_> = corners
            .iter()
            .map(|&p| project(vp, p, self.width, self.height))
            .collect();
        if let [Some(a), Some(b), Some(cc), Some(d)] = projected[..] {
            fill_triangle(frame, a, b, cc, TABLE);
            fill_triangle(frame, a, cc, d, TABLE);
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t) as u8
}

/// Project a world point to screen space. Returns `(x, y, clip_w)`, or
/// `None` when the point is behind the camera.
fn project(vp: &Mat4, p: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
    let clip = *vp * p.extend(1.0);
    if clip.w <= 0.01 {
        return None;
    }
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let sx = (ndc_x + 1.0) * 0.5 * width as f32;
    let sy = (1.0 - ndc_y) * 0.5 * height as f32;
    Some((sx, sy, clip.w))
}

fn edge(a: (f32, f32, f32), b: (f32, f32, f32), x: f32, y: f32) -> f32 {
    (b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0)
}

fn fill_triangle(
    frame: &mut Frame,
    a: (f32, f32, f32),
    b: (f32, f32, f32),
    c: (f32, f32, f32),
    color: [u8; 3],
) {
    let min_x = a.0.min(b.0).min(c.0).floor().max(0.0) as i32;
    let max_x = (a.0.max(b.0).max(c.0).ceil() as i32).min(frame.width as i32 - 1);
    let min_y = a.1.min(b.1).min(c.1).floor().max(0.0) as i32;
    let max_y = (a.1.max(b.1).max(c.1).ceil() as i32).min(frame.height as i32 - 1);
    let area = edge(a, b, c.0, c.1);
    if area.abs() < f32::EPSILON {
        return;
    }
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let w0 = edge(a, b, px, py) / area;
            let w1 = edge(b, c, px, py) / area;
            let w2 = edge(c, a, px, py) / area;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                frame.put(x, y, color);
            }
        }
    }
}

fn fill_circle(frame: &mut Frame, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
    let r2 = radius * radius;
    let min_x = (cx - radius).floor() as i32;
    let max_x = (cx + radius).ceil() as i32;
    let min_y = (cy - radius).floor() as i32;
    let max_y = (cy + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                frame.put(x, y, color);
            }
        }
    }
}

fn draw_ring(frame: &mut Frame, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
    let outer = radius * radius;
    let inner = (radius - 2.0).max(0.0).powi(2);
    let min_x = (cx - radius).floor() as i32;
    let max_x = (cx + radius).ceil() as i32;
    let min_y = (cy - radius).floor() as i32;
    let max_y = (cy + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d2 = dx * dx + dy * dy;
            if d2 <= outer && d2 >= inner {
                frame.put(x, y, color);
            }
        }
    }
}
