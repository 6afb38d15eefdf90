//! Expands a [`RawMesh`] into per-corner vertex arrays with one dense
//! triangle-list index buffer per non-empty group.

use corelib::{Attribute, CoreError, CoreResult, Vec2, Vec3};

use crate::mesh::{BuiltGroup, BuiltMesh, Group, RawMesh};

/// Flatten `raw` into a [`BuiltMesh`].
///
/// Every face corner becomes its own vertex; nothing is shared within or
/// across groups, and indices keep counting across groups. Empty groups are
/// dropped. Texcoord/normal streams exist only if the file had any `vt`/`vn`
/// lines at all; corners that omit them get a zero vector.
pub fn flatten(raw: &RawMesh) -> CoreResult<BuiltMesh> {
    let attributes = raw.attributes();
    let corner_count = raw.triangle_count() * 3;
    if u32::try_from(corner_count).is_err() {
        return Err(CoreError::IndexOverflow(corner_count));
    }

    let mut built = BuiltMesh {
        name: raw.name.clone(),
        attributes,
        positions: Vec::with_capacity(corner_count),
        texcoords: Vec::with_capacity(if attributes.texcoords { corner_count } else { 0 }),
        normals: Vec::with_capacity(if attributes.normals { corner_count } else { 0 }),
        groups: Vec::new(),
    };

    for group in raw.groups().iter().filter(|g| !g.is_empty()) {
        let mut indices = Vec::with_capacity(group.triangles.len() * 3);

        for (tri_idx, triangle) in group.triangles.iter().enumerate() {
            for (corner_idx, corner) in triangle.corners.iter().enumerate() {
                let at = CornerAt {
                    group,
                    triangle: tri_idx,
                    corner: corner_idx,
                };

                built
                    .positions
                    .push(at.resolve(&raw.positions, corner.position, Attribute::Position)?);
                if attributes.texcoords {
                    built.texcoords.push(at.resolve_optional(
                        &raw.texcoords,
                        corner.texcoord,
                        Attribute::TexCoord,
                        Vec2::ZERO,
                    )?);
                }
                if attributes.normals {
                    built.normals.push(at.resolve_optional(
                        &raw.normals,
                        corner.normal,
                        Attribute::Normal,
                        Vec3::ZERO,
                    )?);
                }
                // Bounded by the corner_count check above.
                indices.push((built.positions.len() - 1) as u32);
            }
        }

        built.groups.push(BuiltGroup {
            name: group.name.clone(),
            indices,
        });
    }

    log::debug!(
        "Flattened '{}': {} vertices, {} submeshes (texcoords={}, normals={})",
        built.name,
        built.vertex_count(),
        built.group_count(),
        attributes.texcoords,
        attributes.normals
    );

    Ok(built)
}

/// Location of the corner being resolved, for error reporting.
struct CornerAt<'a> {
    group: &'a Group,
    triangle: usize,
    corner: usize,
}

impl CornerAt<'_> {
    fn resolve<T: Copy>(
        &self,
        pool: &[T],
        index: Option<usize>,
        attribute: Attribute,
    ) -> CoreResult<T> {
        index
            .and_then(|i| pool.get(i).copied())
            .ok_or_else(|| CoreError::MalformedReference {
                group: self.group.name.clone(),
                triangle: self.triangle,
                corner: self.corner,
                attribute,
                index,
                len: pool.len(),
            })
    }

    /// Omitted references resolve to `neutral`; supplied ones must be in range.
    fn resolve_optional<T: Copy>(
        &self,
        pool: &[T],
        index: Option<usize>,
        attribute: Attribute,
        neutral: T,
    ) -> CoreResult<T> {
        match index {
            Some(_) => self.resolve(pool, index, attribute),
            None => Ok(neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::parse_obj_str;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn single_triangle_positions_only() {
        let raw = parse_obj_str(TRIANGLE, "X").unwrap();
        let built = flatten(&raw).unwrap();

        assert_eq!(
            built.positions,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ]
        );
        assert!(!built.attributes.texcoords);
        assert!(!built.attributes.normals);
        assert!(built.texcoords.is_empty());
        assert!(built.normals.is_empty());
        assert_eq!(built.groups.len(), 1);
        assert_eq!(built.groups[0].name, "X");
        assert_eq!(built.groups[0].indices, vec![0, 1, 2]);
        assert!(built.is_valid());
    }

    #[test]
    fn indices_continue_across_groups() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\ng A\nf 1 2 3\ng B\nf 3 2 1\n";
        let built = flatten(&parse_obj_str(src, "X").unwrap()).unwrap();

        // The default group "X" received no faces and is dropped.
        let names: Vec<_> = built.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(built.groups[0].indices, vec![0, 1, 2]);
        assert_eq!(built.groups[1].indices, vec![3, 4, 5]);
        assert_eq!(built.positions[3], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn counts_match_triangles() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0 0
vt 1 1
vn 0 0 1
f 1/1/1 2/2/1 3/1/1
f 2/2/1 4/2/1 3/1/1
g side
f 1//1 2//1 4//1
g empty
";
        let raw = parse_obj_str(src, "m").unwrap();
        let built = flatten(&raw).unwrap();

        assert_eq!(built.triangle_count(), 3);
        assert_eq!(built.vertex_count(), 9);
        assert_eq!(built.texcoords.len(), 9);
        assert_eq!(built.normals.len(), 9);
        assert_eq!(built.group_count(), 2);
        assert_eq!(built.groups[0].indices.len(), 6);
        assert_eq!(built.groups[1].indices.len(), 3);

        let all: Vec<u32> = built.groups.iter().flat_map(|g| g.indices.clone()).collect();
        assert_eq!(all, (0..9).collect::<Vec<u32>>());
    }

    #[test]
    fn omitted_attributes_become_zero_not_slot_zero() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.25 0.75
vn 0 1 0
f 1/1/1 2/1/1 3/1/1
f 1 2 3
";
        let built = flatten(&parse_obj_str(src, "m").unwrap()).unwrap();
        assert_eq!(built.texcoords[0], Vec2::new(0.25, 0.75));
        assert_eq!(built.normals[0], Vec3::Y);
        assert_eq!(built.texcoords[3], Vec2::ZERO);
        assert_eq!(built.normals[5], Vec3::ZERO);
    }

    #[test]
    fn unused_streams_are_not_resolved() {
        // References to vt/vn that never exist are ignored when the file
        // has no such lines at all.
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/4/7 2/4/7 3/4/7\n";
        let built = flatten(&parse_obj_str(src, "m").unwrap()).unwrap();
        assert_eq!(built.vertex_count(), 3);
        assert!(built.normals.is_empty());
    }

    #[test]
    fn out_of_range_position_is_malformed_reference() {
        let src = "v 0 0 0\nv 1 0 0\ng hull\nf 1 2 3\n";
        let err = flatten(&parse_obj_str(src, "m").unwrap()).unwrap_err();
        match err {
            CoreError::MalformedReference {
                group,
                triangle,
                corner,
                attribute,
                index,
                len,
            } => {
                assert_eq!(group, "hull");
                assert_eq!(triangle, 0);
                assert_eq!(corner, 2);
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, Some(2));
                assert_eq!(len, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_position_index_is_malformed_reference() {
        let src = "v 0 0 0\nf 0 1 1\n";
        let err = flatten(&parse_obj_str(src, "m").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedReference {
                attribute: Attribute::Position,
                index: None,
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_normal_is_malformed_reference() {
        let src = "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//2\n";
        let err = flatten(&parse_obj_str(src, "m").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedReference {
                attribute: Attribute::Normal,
                index: Some(1),
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_texcoord_is_malformed_reference() {
        let src = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/3/1 1/1/1\n";
        let err = flatten(&parse_obj_str(src, "m").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedReference {
                attribute: Attribute::TexCoord,
                corner: 1,
                index: Some(2),
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn flatten_is_repeatable() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\ng A\nf 1//1 2//1 3//1\ng B\nf 1 3 2\n";
        let raw = parse_obj_str(src, "m").unwrap();
        let first = flatten(&raw).unwrap();
        let second = flatten(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mesh_without_faces_has_no_submeshes() {
        let built = flatten(&parse_obj_str("v 0 0 0\n", "m").unwrap()).unwrap();
        assert!(built.groups.is_empty());
        assert!(built.positions.is_empty());
        assert!(!built.is_valid());
    }
}
