//! Line-oriented OBJ parser producing a [`RawMesh`].
//!
//! Only `o`/`g`, `v`, `vt`, `vn` and triangular `f` lines are interpreted;
//! everything else (comments, `s`, `mtllib`, `usemtl`, ...) is skipped.
//! Bad numeric data never aborts the parse: it is logged and replaced by a
//! neutral value so the pools keep their indexing.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{CoreError, CoreResult, Vec2, Vec3};

use crate::mesh::{FaceCorner, RawMesh, Triangle};

/// Load an OBJ mesh from a file path. Failing to open the file is reported
/// as [`CoreError::SourceUnavailable`].
pub fn load_obj_from_path(path: impl AsRef<Path>, name: &str) -> CoreResult<RawMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CoreError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Parsing OBJ '{}' as mesh '{}'", path.display(), name);
    parse_obj(BufReader::new(file), name)
}

/// Convenience helper to parse an OBJ string literal.
pub fn parse_obj_str(contents: &str, name: &str) -> CoreResult<RawMesh> {
    parse_obj(io::Cursor::new(contents), name)
}

/// Parse OBJ text from any [`BufRead`]. Faces before the first `o`/`g` line
/// land in a group called `name`.
pub fn parse_obj<R: BufRead>(mut reader: R, name: &str) -> CoreResult<RawMesh> {
    let mut mesh = RawMesh::new(name);
    // `RawMesh::new` opened the default group in the first slot.
    let mut active = 0;
    let mut truncated_faces = 0usize;
    let mut buf = Vec::new();

    for line_no in 0.. {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| CoreError::Read {
                line: line_no + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        // Lossy decode: stray non-UTF-8 bytes only affect their own line.
        let line = String::from_utf8_lossy(&buf);
        log::trace!("OBJ line {}: '{}'", line_no + 1, line.trim_end());

        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "o" | "g" => {
                let group = parts.next().unwrap_or_default();
                if group.is_empty() {
                    log::warn!(
                        "Line {}: '{}' without a name, using anonymous group",
                        line_no + 1,
                        tag
                    );
                }
                active = mesh.open_group(group);
            }
            "v" => {
                let [x, y, z] = parse_components::<3>(&mut parts, line_no, tag);
                mesh.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_components::<2>(&mut parts, line_no, tag);
                mesh.texcoords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_components::<3>(&mut parts, line_no, tag);
                mesh.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let tokens: Vec<&str> = parts.collect();
                if tokens.len() < 3 {
                    log::warn!(
                        "Line {}: face with {} corner(s) skipped",
                        line_no + 1,
                        tokens.len()
                    );
                    continue;
                }
                if tokens.len() > 3 {
                    truncated_faces += 1;
                }

                let corner = |token: &str| {
                    parse_face_corner(
                        token,
                        mesh.positions.len(),
                        mesh.texcoords.len(),
                        mesh.normals.len(),
                    )
                };
                let triangle = Triangle {
                    corners: [corner(tokens[0]), corner(tokens[1]), corner(tokens[2])],
                };
                mesh.push_triangle(active, triangle);
            }
            _ => {
                // Ignore other directives (#/s/mtllib/usemtl/etc.)
            }
        }
    }

    if truncated_faces > 0 {
        log::debug!(
            "{} face(s) had more than 3 corners; only the first 3 were used",
            truncated_faces
        );
    }
    log::debug!(
        "OBJ '{}': {} positions, {} normals, {} texcoords, {} groups, {} triangles",
        mesh.name,
        mesh.positions.len(),
        mesh.normals.len(),
        mesh.texcoords.len(),
        mesh.groups().len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Reads `N` floats; missing or unparsable components become `0.0`.
fn parse_components<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    tag: &str,
) -> [f32; N] {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        match parts.next().map(str::parse::<f32>) {
            Some(Ok(value)) => *slot = value,
            Some(Err(err)) => log::warn!(
                "Line {}: '{}' component {} is not a number ({}), using 0",
                line_no + 1,
                tag,
                i + 1,
                err
            ),
            None => log::warn!(
                "Line {}: '{}' is missing component {}, using 0",
                line_no + 1,
                tag,
                i + 1
            ),
        }
    }
    out
}

/// Parses one face corner. Shapes are tried in order `v/vt/vn`, `v//vn`,
/// `v/vt`, `v`; the first that matches wins. A token matching none of them
/// yields a corner without a position.
pub(crate) fn parse_face_corner(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
) -> FaceCorner {
    let (v, vt, vn) = scan_corner(token);
    FaceCorner {
        position: v.and_then(|raw| resolve_index(raw, pos_count)),
        texcoord: vt.and_then(|raw| resolve_index(raw, tex_count)),
        normal: vn.and_then(|raw| resolve_index(raw, norm_count)),
    }
}

type RawCorner = (Option<i64>, Option<i64>, Option<i64>);

fn scan_corner(token: &str) -> RawCorner {
    // v/vt/vn
    if let Some((v, rest)) = scan_int(token) {
        if let Some(rest) = rest.strip_prefix('/') {
            if let Some((vt, rest)) = scan_int(rest) {
                if let Some((vn, _)) = rest.strip_prefix('/').and_then(scan_int) {
                    return (Some(v), Some(vt), Some(vn));
                }
            }
        }
    }

    // v//vn
    if let Some((v, rest)) = scan_int(token) {
        if let Some((vn, _)) = rest.strip_prefix("//").and_then(scan_int) {
            return (Some(v), None, Some(vn));
        }
    }

    // v/vt
    if let Some((v, rest)) = scan_int(token) {
        if let Some((vt, _)) = rest.strip_prefix('/').and_then(scan_int) {
            return (Some(v), Some(vt), None);
        }
    }

    // v
    match scan_int(token) {
        Some((v, _)) => (Some(v), None, None),
        None => (None, None, None),
    }
}

/// Reads a leading, optionally signed, decimal integer. Returns the value
/// and the unconsumed remainder.
fn scan_int(s: &str) -> Option<(i64, &str)> {
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = s[..end].parse::<i64>().ok()?;
    Some((value, &s[end..]))
}

/// 1-based (or negative, relative to the current pool length) OBJ index to
/// a 0-based one. `0` and relative indices before the pool start are absent.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    if raw > 0 {
        usize::try_from(raw - 1).ok()
    } else if raw < 0 {
        usize::try_from(raw.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    } else {
        None
    }
}
