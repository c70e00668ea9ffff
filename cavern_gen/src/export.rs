// Wavefront OBJ export.
//
// Writes the floor and wall meshes as two named objects (`o floor`,
// `o walls`) sharing one vertex list. OBJ indices are 1-based and global to
// the file, so wall faces are offset by the floor's vertex count.

use std::io::{self, Write};

use crate::mesh::MeshData;

/// Write `floor` and `walls` to `out` as OBJ text.
pub fn write_obj<W: Write>(out: &mut W, floor: &MeshData, walls: &MeshData) -> io::Result<()> {
    writeln!(out, "# cavern_gen")?;
    write_object(out, "floor", floor, 1)?;
    write_object(out, "walls", walls, floor.vertex_count() as u32 + 1)?;
    out.flush()
}

fn write_object<W: Write>(out: &mut W, name: &str, mesh: &MeshData, base: u32) -> io::Result<()> {
    writeln!(out, "o {name}")?;
    for [x, y, z] in &mesh.positions {
        writeln!(out, "v {x} {y} {z}")?;
    }
    for [a, b, c] in mesh.triangles() {
        writeln!(out, "f {} {} {}", a + base, b + base, c + base)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_triangle(offset: f32) -> MeshData {
        let mut mesh = MeshData::default();
        mesh.push_vertex([offset, 0.0, 0.0]);
        mesh.push_vertex([offset + 1.0, 0.0, 0.0]);
        mesh.push_vertex([offset, 0.0, 1.0]);
        mesh.push_triangle([0, 2, 1]);
        mesh
    }

    #[test]
    fn faces_are_one_based_and_walls_are_offset() {
        let mut buf = Vec::new();
        write_obj(&mut buf, &one_triangle(0.0), &one_triangle(5.0)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# cavern_gen",
                "o floor",
                "v 0 0 0",
                "v 1 0 0",
                "v 0 0 1",
                "f 1 3 2",
                "o walls",
                "v 5 0 0",
                "v 6 0 0",
                "v 5 0 1",
                "f 4 6 5",
            ]
        );
    }

    #[test]
    fn empty_meshes_still_name_both_objects() {
        let mut buf = Vec::new();
        write_obj(&mut buf, &MeshData::default(), &MeshData::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "# cavern_gen\no floor\no walls\n");
    }
}
