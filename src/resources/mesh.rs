//! OBJ loading for [`Mesh`].
//!
//! Only `v`, `vt`, `vn` and triangular `f` lines are read; every other
//! statement (objects, groups, smoothing, materials) is skipped. Buffers keep
//! the file order, so a face `f 1 3 4` becomes the triangle `[0, 2, 3]` and
//! vertices no face refers to are kept. Faces are not triangulated: anything
//! but a triangle is an error. Negative (relative) indices are not supported.

use std::{
    io::{BufRead, BufReader, Cursor},
    path::Path,
    str::SplitWhitespace,
};

use crate::{
    data_structures::mesh::{Mesh, Triangle},
    error::{Error, Result},
    math::{Vec2, Vec3, vec2, vec3},
    resources::load_string,
};

pub fn load_mesh(path: &Path, texture_name: Option<&str>) -> Result<Mesh> {
    let text = load_string(path)?;
    parse_obj(&text, texture_name)
}

pub fn parse_obj(text: &str, texture_name: Option<&str>) -> Result<Mesh> {
    read_obj(&mut BufReader::new(Cursor::new(text)), texture_name)
}

pub fn read_obj<R: BufRead>(reader: &mut R, texture_name: Option<&str>) -> Result<Mesh> {
    let mut verts: Vec<Vec3> = Vec::new();
    let mut uv_coords: Vec<Vec2> = Vec::new();
    let mut normal_count = 0;
    let mut triangles: Vec<Triangle> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| obj_error(i + 1, format!("unreadable line: {e}")))?;
        let mut at = ObjLine {
            line: i + 1,
            fields: line.split_whitespace(),
        };
        match at.fields.next() {
            Some("v") => {
                let [x, y, z] = at.floats()?;
                verts.push(vec3(x, y, z));
            }
            Some("vt") => {
                let [u, v] = at.floats()?;
                // OBJ puts v = 0 at the bottom of the image, textures are sampled top-down
                uv_coords.push(vec2(u, 1.0 - v));
            }
            Some("vn") => {
                at.floats::<3>()?;
                normal_count += 1;
            }
            Some("f") => {
                let tri = at.face(triangles.len())?;
                if let Some(n) = tri.normal.filter(|&n| n >= normal_count) {
                    return Err(Error::IndexOutOfRange {
                        what: "normal",
                        index: n,
                        len: normal_count,
                    });
                }
                triangles.push(tri);
            }
            _ => {}
        }
    }

    Mesh::from_parts(verts, uv_coords, triangles, texture_name.map(str::to_owned))
}

fn obj_error(line: usize, message: String) -> Error {
    Error::Obj { line, message }
}

struct ObjLine<'a> {
    line: usize,
    fields: SplitWhitespace<'a>,
}

impl ObjLine<'_> {
    /// Reads the next `N` numbers. Any further values (like a `w`) are ignored.
    fn floats<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut out = [0.0; N];
        for slot in &mut out {
            let field = self
                .fields
                .next()
                .ok_or_else(|| obj_error(self.line, format!("expected {N} numbers")))?;
            *slot = field
                .parse()
                .map_err(|_| obj_error(self.line, format!("invalid number '{field}'")))?;
        }
        Ok(out)
    }

    /// Parses `f i[/j[/k]] x3` into a triangle with 0-based indices.
    ///
    /// uv ids are kept only when all three corners carry one; the normal is
    /// the first corner's.
    fn face(&mut self, face: usize) -> Result<Triangle> {
        let line = self.line;
        let corners = self
            .fields
            .by_ref()
            .map(|field| parse_corner(line, field))
            .collect::<Result<Vec<_>>>()?;
        let [a, b, c] = corners[..] else {
            return Err(Error::NonTriangularFace {
                face,
                arity: corners.len() as u32,
            });
        };

        let mut tri = Triangle::new([a.0, b.0, c.0]);
        if let (Some(ua), Some(ub), Some(uc)) = (a.1, b.1, c.1) {
            tri = tri.with_uv_coords([ua, ub, uc]);
        }
        tri.normal = a.2;
        Ok(tri)
    }
}

type Corner = (usize, Option<usize>, Option<usize>);

fn parse_corner(line: usize, field: &str) -> Result<Corner> {
    let index = |part: &str| -> Result<Option<usize>> {
        if part.is_empty() {
            return Ok(None);
        }
        match part.parse::<usize>() {
            Ok(i) if i >= 1 => Ok(Some(i - 1)),
            _ => Err(obj_error(line, format!("invalid face index '{part}'"))),
        }
    };
    let mut parts = field.split('/');
    let vert = index(parts.next().unwrap_or_default())?
        .ok_or_else(|| obj_error(line, format!("face corner '{field}' has no vertex")))?;
    let uv = parts.next().map(index).transpose()?.flatten();
    let normal = parts.next().map(index).transpose()?.flatten();
    Ok((vert, uv, normal))
}
