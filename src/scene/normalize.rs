//! Centers an asset at the origin and scales its largest extent to 1.

use crate::error::NormalizationSkipped;
use crate::numerics::{Aabb, Transform, Vector3};
use crate::scene::graph::{Node, NodeKind};

/// Result of a successful normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Bounds measured before the root transform was rewritten.
    pub original_bounds: Aabb,
    pub scale: f32,
}

pub struct AssetNormalizer;

impl AssetNormalizer {
    /// Rewrites `root.transform` so the asset's bounds are centered on the
    /// origin with a largest dimension of 1.
    ///
    /// Bounds are measured in the root's local space, so any transform the
    /// root already carries is replaced rather than compounded. On
    /// [`NormalizationSkipped`] the root is left untouched.
    pub fn normalize(root: &mut Node) -> Result<Normalization, NormalizationSkipped> {
        let bounds = Self::local_bounds(root).ok_or(NormalizationSkipped::ZeroSize)?;
        if bounds.has_zero_size() {
            return Err(NormalizationSkipped::ZeroSize);
        }

        let max_dimension = bounds.size().max_element();
        if max_dimension <= 0.0 || !max_dimension.is_finite() {
            return Err(NormalizationSkipped::InvalidDimensions { max_dimension });
        }

        let scale = 1.0 / max_dimension;
        root.transform =
            Transform::from_translation_scale(-bounds.center() * scale, Vector3::splat(scale));

        Ok(Normalization {
            original_bounds: bounds,
            scale,
        })
    }

    /// Bounds of everything under `root`, ignoring the root's own transform.
    pub fn local_bounds(root: &Node) -> Option<Aabb> {
        subtree_bounds(root, &Transform::IDENTITY)
    }

    /// Bounds of everything under `root`, including the root's transform.
    pub fn world_bounds(root: &Node) -> Option<Aabb> {
        let world = if root.is_spatial() { root.transform } else { Transform::IDENTITY };
        subtree_bounds(root, &world)
    }
}

// A geometry node's own box is merged with its children's; child subtrees
// that measure zero size contribute nothing. Non-spatial nodes pass their
// parent's transform through, matching `Node::walk`.
fn subtree_bounds(node: &Node, world: &Transform) -> Option<Aabb> {
    let mut result = match &node.kind {
        NodeKind::Geometry(geometry) => geometry.local_aabb().map(|aabb| aabb.transformed(world)),
        NodeKind::Group | NodeKind::Other => None,
    };

    for child in &node.children {
        let child_world = if child.is_spatial() {
            world.compose(&child.transform)
        } else {
            *world
        };
        let Some(child_bounds) = subtree_bounds(child, &child_world) else {
            continue;
        };
        if child_bounds.has_zero_size() {
            continue;
        }
        result = Some(match result {
            Some(bounds) => bounds.merge(&child_bounds),
            None => child_bounds,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::{Mesh, SceneGraph, Surface};
    use crate::scene::material::MaterialLibrary;

    fn box_mesh(min: Vector3, max: Vector3) -> Mesh {
        Mesh::new(
            "box",
            vec![Surface {
                material: None,
                bounds: Aabb::new(min, max),
            }],
        )
    }

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_normalized_bounds_are_unit_and_centered() {
        let mut root = Node::group("asset")
            .with_child(
                Node::geometry("a", box_mesh(Vector3::new(2.0, 2.0, 2.0), Vector3::new(4.0, 3.0, 3.0)))
                    .with_transform(Transform::from_translation(Vector3::new(10.0, 0.0, 0.0))),
            )
            .with_child(Node::geometry("b", box_mesh(Vector3::new(2.0, 2.0, 2.0), Vector3::new(3.0, 6.0, 2.5))));

        let result = AssetNormalizer::normalize(&mut root).unwrap();
        assert!((result.scale - 1.0 / 12.0).abs() < 1e-6);

        let after = AssetNormalizer::world_bounds(&root).unwrap();
        assert_close(after.center(), Vector3::zero());
        assert!((after.size().max_element() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_existing_root_transform_is_replaced() {
        let mut root = Node::group("asset")
            .with_transform(Transform::from_translation_scale(Vector3::new(5.0, 5.0, 5.0), Vector3::splat(3.0)))
            .with_child(Node::geometry("a", box_mesh(Vector3::splat(1.0), Vector3::splat(3.0))));

        AssetNormalizer::normalize(&mut root).unwrap();
        let after = AssetNormalizer::world_bounds(&root).unwrap();
        assert_close(after.min, Vector3::splat(-0.5));
        assert_close(after.max, Vector3::splat(0.5));
    }

    #[test]
    fn test_zero_size_scene_is_skipped_untouched() {
        let original = Transform::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let mut root = Node::group("asset")
            .with_transform(original)
            .with_child(Node::geometry("point", box_mesh(Vector3::splat(1.0), Vector3::splat(1.0))));

        assert_eq!(AssetNormalizer::normalize(&mut root), Err(NormalizationSkipped::ZeroSize));
        assert_eq!(root.transform, original);

        let mut empty = Node::group("empty");
        assert_eq!(AssetNormalizer::normalize(&mut empty), Err(NormalizationSkipped::ZeroSize));
        assert_eq!(empty.transform, Transform::IDENTITY);
    }

    #[test]
    fn test_geometry_under_non_spatial_nodes_is_measured() {
        let root = Node::group("asset")
            .with_child(Node::geometry("a", box_mesh(Vector3::zero(), Vector3::one())))
            .with_child(
                Node::other("helper")
                    .with_transform(Transform::from_translation(Vector3::new(0.0, 50.0, 0.0)))
                    .with_child(Node::geometry("far", box_mesh(Vector3::splat(4.0), Vector3::splat(5.0)))),
            );

        let bounds = AssetNormalizer::local_bounds(&root).unwrap();
        assert_eq!(bounds, Aabb::new(Vector3::zero(), Vector3::splat(5.0)));
    }

    #[test]
    fn test_rendered_bounds_are_unit_after_normalize() {
        let gltf = Node::group("gltf")
            .with_child(Node::geometry("body", box_mesh(Vector3::zero(), Vector3::one())))
            .with_child(
                Node::other("anim").with_child(Node::geometry("handle", box_mesh(Vector3::splat(5.0), Vector3::splat(9.0)))),
            );
        let mut scene = SceneGraph::new(gltf, MaterialLibrary::new()).wrapped("asset_root");
        AssetNormalizer::normalize(&mut scene.root).unwrap();

        let mut rendered: Option<Aabb> = None;
        scene.for_each_geometry(|_, geometry, world| {
            let bounds = geometry.local_aabb().unwrap().transformed(world);
            rendered = Some(rendered.map_or(bounds, |acc| acc.merge(&bounds)));
        });
        let rendered = rendered.unwrap();
        assert_close(rendered.center(), Vector3::zero());
        assert!((rendered.size().max_element() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_geometry_bounds_include_children() {
        let root = Node::group("asset").with_child(
            Node::geometry("parent", box_mesh(Vector3::zero(), Vector3::one())).with_child(
                Node::geometry("child", box_mesh(Vector3::zero(), Vector3::one()))
                    .with_transform(Transform::from_translation(Vector3::new(0.0, 2.0, 0.0))),
            ),
        );

        let bounds = AssetNormalizer::local_bounds(&root).unwrap();
        assert_eq!(bounds, Aabb::new(Vector3::zero(), Vector3::new(1.0, 3.0, 1.0)));
    }
}
