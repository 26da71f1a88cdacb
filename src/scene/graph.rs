//! Scene graph: a tree of tagged nodes plus the material arena it references.

use crate::numerics::{Aabb, Transform};
use crate::scene::material::{MaterialId, MaterialLibrary};

/// One drawable surface of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Base material baked into the mesh. Never modified by overrides.
    pub material: Option<MaterialId>,
    /// Mesh-local bounds of this surface.
    pub bounds: Aabb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub surfaces: Vec<Surface>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, surfaces: Vec<Surface>) -> Self {
        Self {
            name: name.into(),
            surfaces,
        }
    }

    /// Union of all surface bounds, `None` for a mesh without surfaces.
    pub fn aabb(&self) -> Option<Aabb> {
        self.surfaces
            .iter()
            .map(|surface| surface.bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

/// A mesh placed in the scene, with one override slot per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInstance {
    mesh: Option<Mesh>,
    surface_overrides: Vec<Option<MaterialId>>,
}

impl GeometryInstance {
    pub fn new(mesh: Option<Mesh>) -> Self {
        let slots = mesh.as_ref().map_or(0, |mesh| mesh.surfaces.len());
        Self {
            mesh,
            surface_overrides: vec![None; slots],
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn surface_count(&self) -> usize {
        self.surface_overrides.len()
    }

    pub fn base_material(&self, surface: usize) -> Option<MaterialId> {
        self.mesh
            .as_ref()
            .and_then(|mesh| mesh.surfaces.get(surface))
            .and_then(|surface| surface.material)
    }

    pub fn surface_override(&self, surface: usize) -> Option<MaterialId> {
        self.surface_overrides.get(surface).copied().flatten()
    }

    /// Returns `false` when `surface` is out of range.
    pub fn set_surface_override(&mut self, surface: usize, material: Option<MaterialId>) -> bool {
        match self.surface_overrides.get_mut(surface) {
            Some(slot) => {
                *slot = material;
                true
            }
            None => false,
        }
    }

    /// The material a renderer should use: the override if set, else the base.
    pub fn effective_material(&self, surface: usize) -> Option<MaterialId> {
        self.surface_override(surface)
            .or_else(|| self.base_material(surface))
    }

    pub fn clear_overrides(&mut self) {
        self.surface_overrides.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn local_aabb(&self) -> Option<Aabb> {
        self.mesh.as_ref().and_then(Mesh::aabb)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Renderable node carrying a mesh.
    Geometry(GeometryInstance),
    /// Spatial node that only groups its children.
    Group,
    /// Non-spatial node (scripts, players, metadata holders). Its transform
    /// is ignored and it does not take part in bounds computation.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::IDENTITY,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn geometry(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, NodeKind::Geometry(GeometryInstance::new(Some(mesh))))
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Other)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn is_spatial(&self) -> bool {
        !matches!(self.kind, NodeKind::Other)
    }

    pub fn geometry_instance(&self) -> Option<&GeometryInstance> {
        match &self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Depth-first search by node name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Visits every node depth-first with its accumulated world transform.
    ///
    /// Non-spatial nodes pass their parent's transform through unchanged.
    pub fn walk<F>(&self, parent_world: &Transform, visit: &mut F)
    where
        F: FnMut(&Node, &Transform),
    {
        let world = if self.is_spatial() {
            parent_world.compose(&self.transform)
        } else {
            *parent_world
        };
        visit(self, &world);
        for child in &self.children {
            child.walk(&world, visit);
        }
    }

    /// Mutable pre-order traversal, without transforms.
    pub fn walk_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Node),
    {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// A loaded asset: the node tree and every material it references.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub root: Node,
    pub materials: MaterialLibrary,
}

impl SceneGraph {
    pub fn new(root: Node, materials: MaterialLibrary) -> Self {
        Self { root, materials }
    }

    /// Re-parents the current root under a fresh identity group node.
    pub fn wrapped(self, name: impl Into<String>) -> Self {
        Self {
            root: Node::group(name).with_child(self.root),
            materials: self.materials,
        }
    }

    /// Calls `visit` for every geometry node with its world transform.
    pub fn for_each_geometry<F>(&self, mut visit: F)
    where
        F: FnMut(&Node, &GeometryInstance, &Transform),
    {
        self.root.walk(&Transform::IDENTITY, &mut |node, world| {
            if let NodeKind::Geometry(geometry) = &node.kind {
                visit(node, geometry, world);
            }
        });
    }

    /// Drops every surface override, restoring the base materials.
    pub fn clear_overrides(&mut self) {
        self.root.walk_mut(&mut |node| {
            if let NodeKind::Geometry(geometry) = &mut node.kind {
                geometry.clear_overrides();
            }
        });
    }
}
