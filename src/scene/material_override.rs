//! Replaces surface materials with pass-specific duplicates of a template
//! shader material.
//!
//! Each distinct original material is duplicated once per call, and every
//! surface that referenced it receives that same duplicate.

use std::collections::{BTreeSet, HashMap};

use crate::scene::graph::{Node, NodeKind, SceneGraph};
use crate::scene::material::{Material, MaterialId, MaterialLibrary, ShaderMaterial};

/// Original material → its duplicate, scoped to a single override call.
#[derive(Debug, Default)]
pub struct MaterialOverrideCache {
    duplicates: HashMap<MaterialId, MaterialId>,
}

impl MaterialOverrideCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: MaterialId) -> Option<MaterialId> {
        self.duplicates.get(&original).copied()
    }

    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideReport {
    pub duplicates_created: usize,
    pub surfaces_overridden: usize,
    /// Surfaces without a base material, left as they were.
    pub surfaces_skipped: usize,
}

pub struct MaterialOverrideEngine<'a> {
    template: &'a ShaderMaterial,
    exposed: BTreeSet<&'a str>,
}

impl<'a> MaterialOverrideEngine<'a> {
    pub fn new(template: &'a ShaderMaterial) -> Self {
        let exposed = template
            .shader()
            .uniforms
            .iter()
            .map(String::as_str)
            .collect();
        Self { template, exposed }
    }

    /// Overrides every geometry surface in `scene` and returns what was done.
    pub fn apply(&self, scene: &mut SceneGraph) -> OverrideReport {
        let mut cache = MaterialOverrideCache::new();
        let mut report = OverrideReport::default();
        let SceneGraph { root, materials } = scene;
        self.override_node(root, materials, &mut cache, &mut report);
        report
    }

    fn override_node(
        &self,
        node: &mut Node,
        materials: &mut MaterialLibrary,
        cache: &mut MaterialOverrideCache,
        report: &mut OverrideReport,
    ) {
        if let NodeKind::Geometry(geometry) = &mut node.kind {
            for surface in 0..geometry.surface_count() {
                let Some(original) = geometry.base_material(surface) else {
                    report.surfaces_skipped += 1;
                    continue;
                };

                let duplicate = match cache.get(original) {
                    Some(duplicate) => duplicate,
                    None => {
                        let Some(source) = materials.get(original) else {
                            report.surfaces_skipped += 1;
                            continue;
                        };
                        let copy = self.duplicate_for(source);
                        let id = materials.insert(copy);
                        cache.duplicates.insert(original, id);
                        report.duplicates_created += 1;
                        id
                    }
                };

                geometry.set_surface_override(surface, Some(duplicate));
                report.surfaces_overridden += 1;
            }
        }

        for child in &mut node.children {
            self.override_node(child, materials, cache, report);
        }
    }

    /// Duplicates the template and copies every property of `source` whose
    /// name the template's shader exposes.
    fn duplicate_for(&self, source: &Material) -> ShaderMaterial {
        let mut copy = self.template.duplicate();
        for (name, value) in source.properties() {
            if self.exposed.contains(name) {
                copy.set_shader_parameter(name, value.clone());
            }
        }
        copy
    }
}

/// Convenience wrapper over [`MaterialOverrideEngine::apply`].
pub fn apply_override(scene: &mut SceneGraph, template: &ShaderMaterial) -> OverrideReport {
    MaterialOverrideEngine::new(template).apply(scene)
}
