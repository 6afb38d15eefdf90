//! CPU-side mesh representations: the raw model produced by the parser and
//! the flattened model produced by the builder.

use std::collections::HashMap;

use corelib::{Vec2, Vec3};

pub type Position = Vec3;
pub type Normal = Vec3;
pub type TexCoord = Vec2;

/// One vertex of a triangle. Indices are 0-based; `None` = not supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: Option<usize>,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceCorner {
    pub fn new(position: Option<usize>, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub corners: [FaceCorner; 3],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Which optional vertex streams a mesh carries. Decided once for the whole
/// mesh from its global pools, never per group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pub texcoords: bool,
    pub normals: bool,
}

/// Parsed OBJ contents: global attribute pools and named groups in the order
/// they were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
    pub name: String,
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub texcoords: Vec<TexCoord>,
    groups: Vec<Group>,
    lookup: HashMap<String, usize>,
}

impl RawMesh {
    /// Empty mesh with a default group named after the mesh, so faces that
    /// precede any `o`/`g` line have somewhere to go. That group is slot 0.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut mesh = Self {
            name: name.clone(),
            ..Self::default()
        };
        mesh.open_group(&name);
        mesh
    }

    /// Returns the slot of the group called `name`, creating it at the end
    /// if it does not exist yet.
    pub fn open_group(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.lookup.get(name) {
            return slot;
        }
        let slot = self.groups.len();
        self.groups.push(Group::new(name));
        self.lookup.insert(name.to_string(), slot);
        slot
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.lookup.get(name).map(|&slot| &self.groups[slot])
    }

    /// Appends a triangle to the group at `slot` (as returned by `open_group`).
    pub fn push_triangle(&mut self, slot: usize, triangle: Triangle) {
        self.groups[slot].triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }

    pub fn attributes(&self) -> AttributeSet {
        AttributeSet {
            texcoords: !self.texcoords.is_empty(),
            normals: !self.normals.is_empty(),
        }
    }
}

/// Index list of one non-empty group, referencing the flattened arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuiltGroup {
    pub name: String,
    pub indices: Vec<u32>,
}

/// Renderer-ready mesh. Attribute arrays are parallel (one entry per face
/// corner); `texcoords`/`normals` stay empty when `attributes` says so.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltMesh {
    pub name: String,
    pub attributes: AttributeSet,
    pub positions: Vec<Position>,
    pub texcoords: Vec<TexCoord>,
    pub normals: Vec<Normal>,
    pub groups: Vec<BuiltGroup>,
}

impl BuiltMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.indices.len() / 3).sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there is at least one submesh to draw.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.groups.is_empty()
    }
}
