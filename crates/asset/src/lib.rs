//! Asset loading/parsers.
//! OBJ text -> `RawMesh` (indexed pools + named groups) -> `BuiltMesh`
//! (flattened per-corner attributes + one index list per group).

pub mod flatten;
pub mod mesh;
pub mod obj;

pub use flatten::flatten;
pub use mesh::{AttributeSet, BuiltGroup, BuiltMesh, FaceCorner, Group, RawMesh, Triangle};
pub use obj::{load_obj_from_path, parse_obj, parse_obj_str};
