//! Flat-shaded bounding-box rasterizer with a depth test.
//!
//! Every surface is drawn as the screen-space rectangle covering its
//! projected world bounds, at the depth of its nearest face.

use crate::renderer::{CameraPose, FrameBuffer, ViewportConfig};
use crate::scene::{MaterialId, MaterialValue, SceneGraph};

const BACKGROUND: [u8; 4] = [0, 0, 0, 0];
const UNASSIGNED: [u8; 4] = [200, 200, 200, 255];
const COLOR_PROPERTIES: [&str; 2] = ["albedo_color", "color"];

pub(crate) fn rasterize(
    scene: &SceneGraph,
    viewport: &ViewportConfig,
    pose: &CameraPose,
    frame_number: u64,
) -> FrameBuffer {
    let width = viewport.width as usize;
    let height = viewport.height as usize;
    let mut color = BACKGROUND.repeat(width * height);
    let mut depth = vec![f32::INFINITY; width * height];

    let focal = (viewport.height as f32 / 2.0) / (viewport.fov_degrees.to_radians() / 2.0).tan();
    let center_x = viewport.width as f32 / 2.0;
    let center_y = viewport.height as f32 / 2.0;
    let view = pose.world_to_camera();

    scene.for_each_geometry(|_, geometry, world| {
        let Some(mesh) = geometry.mesh() else {
            return;
        };
        let to_camera = view.compose(world);

        for (index, surface) in mesh.surfaces.iter().enumerate() {
            let bounds = surface.bounds.transformed(&to_camera);
            // The camera looks down -Z; skip anything fully behind the near plane.
            if bounds.min.z > -viewport.near {
                continue;
            }
            let nearest = (-bounds.max.z).max(viewport.near);
            if nearest > viewport.far {
                continue;
            }

            let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
            let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
            for corner in bounds.corners() {
                let distance = (-corner.z).max(viewport.near);
                let x = center_x + focal * corner.x / distance;
                let y = center_y - focal * corner.y / distance;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }

            let x0 = (min_x.floor().max(0.0) as usize).min(width);
            let x1 = (max_x.ceil().max(0.0) as usize).min(width);
            let y0 = (min_y.floor().max(0.0) as usize).min(height);
            let y1 = (max_y.ceil().max(0.0) as usize).min(height);
            let rgba = surface_color(scene, geometry.effective_material(index));

            for y in y0..y1 {
                for x in x0..x1 {
                    let pixel = y * width + x;
                    if nearest < depth[pixel] {
                        depth[pixel] = nearest;
                        color[pixel * 4..pixel * 4 + 4].copy_from_slice(&rgba);
                    }
                }
            }
        }
    });

    FrameBuffer::from_rgba8(viewport.width, viewport.height, frame_number, color)
}

fn surface_color(scene: &SceneGraph, material: Option<MaterialId>) -> [u8; 4] {
    let Some(id) = material else {
        return UNASSIGNED;
    };
    let Some(material) = scene.materials.get(id) else {
        return UNASSIGNED;
    };

    let property = COLOR_PROPERTIES
        .iter()
        .find_map(|name| material.property(name));
    match property {
        Some(MaterialValue::Color([r, g, b, a])) => [to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a)],
        Some(MaterialValue::Vec3(v)) => [to_u8(v.x), to_u8(v.y), to_u8(v.z), 255],
        _ => palette(id),
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

// Distinct, stable colour per material id.
fn palette(id: MaterialId) -> [u8; 4] {
    let hash = id.0.wrapping_mul(0x9E37_79B9);
    [
        64 + (hash >> 24) as u8 % 192,
        64 + (hash >> 16) as u8 % 192,
        64 + (hash >> 8) as u8 % 192,
        255,
    ]
}
