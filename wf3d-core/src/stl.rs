/// ASCII STL reader
///
/// Only `vertex <x> <y> <z>` lines carry information. Every other line
/// (`solid`, `facet normal`, `outer loop`, `endloop`, `endfacet`, `endsolid`,
/// blank lines, anything else) is skipped, and each run of three vertices
/// becomes one triangle.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{space0, space1},
    combinator::all_consuming,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle};
use crate::vector::Vector3H;

/// Streaming reader producing triangles from ASCII STL text.
///
/// Lines are read as raw bytes; bytes that are not valid UTF-8 never fail a
/// read, they only keep a line from matching as a vertex.
pub struct MeshReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
}

/// Vertices collected for the triangle being read.
enum Pending {
    Empty,
    One(Vector3H),
    Two(Vector3H, Vector3H),
}

impl Pending {
    fn count(&self) -> usize {
        match self {
            Pending::Empty => 0,
            Pending::One(..) => 1,
            Pending::Two(..) => 2,
        }
    }
}

impl<R: BufRead> MeshReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan forward to the next vertex line. `None` at end of input.
    pub fn read_vertex(&mut self) -> Result<Option<Vector3H>, MeshError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = String::from_utf8_lossy(&self.buf);
            if let Some(vertex) = parse_vertex_line(&text, self.line) {
                return Ok(Some(vertex));
            }
        }
    }

    /// Read the next three vertices as a triangle.
    ///
    /// Returns `None` when the input ends cleanly between triangles and an
    /// error when it ends after one or two vertices.
    pub fn read_triangle(&mut self) -> Result<Option<Triangle>, MeshError> {
        let mut pending = Pending::Empty;
        loop {
            pending = match (pending, self.read_vertex()?) {
                (Pending::Empty, None) => return Ok(None),
                (Pending::Empty, Some(v1)) => Pending::One(v1),
                (Pending::One(v1), Some(v2)) => Pending::Two(v1, v2),
                (Pending::Two(v1, v2), Some(v3)) => return Ok(Some(Triangle::new(v1, v2, v3))),
                (partial, None) => {
                    return Err(MeshError::IncompleteTriangle {
                        found: partial.count(),
                        line: self.line,
                    })
                }
            };
        }
    }

    /// Read every remaining triangle.
    ///
    /// With `normalize`, a non-empty mesh is centered on the origin and
    /// scaled so its longest bounding box edge is 1.
    pub fn read_mesh(&mut self, normalize: bool) -> Result<Mesh, MeshError> {
        let mut mesh = Mesh::new();
        while let Some(triangle) = self.read_triangle()? {
            mesh.add_triangle(triangle);
        }
        debug!("read {} triangles from {} lines", mesh.len(), self.line);

        if normalize && !mesh.is_empty() {
            Ok(mesh.fit_unit_box())
        } else {
            Ok(mesh)
        }
    }
}

impl<R: BufRead> Iterator for MeshReader<R> {
    type Item = Result<Triangle, MeshError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_triangle().transpose()
    }
}

/// Parse an in-memory ASCII STL document.
pub fn parse_ascii_stl(input: &str, normalize: bool) -> Result<Mesh, MeshError> {
    MeshReader::new(input.as_bytes()).read_mesh(normalize)
}

/// Open and parse an ASCII STL file.
pub fn load_mesh(path: impl AsRef<Path>, normalize: bool) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MeshError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading mesh from {}", path.display());
    MeshReader::new(BufReader::new(file)).read_mesh(normalize)
}

/// Coordinates of a `vertex` line, or `None` for any other line.
fn parse_vertex_line(line: &str, line_no: usize) -> Option<Vector3H> {
    let (_, (x, y, z)) = all_consuming(vertex_tokens)(line.trim()).ok()?;
    Some(Vector3H::new(
        coordinate(x, line_no),
        coordinate(y, line_no),
        coordinate(z, line_no),
    ))
}

fn vertex_tokens(input: &str) -> IResult<&str, (&str, &str, &str)> {
    preceded(tag("vertex"), terminated(tuple((token, token, token)), space0))(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(space1, is_not(" \t\r\n"))(input)
}

/// Leading number of `token`; a token without one reads as 0.
fn coordinate(token: &str, line_no: usize) -> f64 {
    match double::<&str, nom::error::Error<&str>>(token) {
        Ok((_, value)) => value,
        Err(_) => {
            warn!("line {line_no}: {token:?} is not a number, using 0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::{self, Read};

    const TWO_FACETS: &str = "solid Object01
  facet normal -1.583127e-002 1.253177e-001 9.919903e-001
    outer loop
      vertex -2.131976e+001 -1.033176e+001 3.937008e+001
      vertex -2.131976e+001 -5.408154e-001 3.813319e+001
      vertex -2.375467e+001 -8.484154e-001 3.813319e+001
    endloop
  endfacet
  facet normal -4.649920e-002 1.174435e-001 9.919903e-001
    outer loop
      vertex -2.131976e+001 -1.033176e+001 3.937008e+001
      vertex -2.375467e+001 -8.484154e-001 3.813319e+001
      vertex -2.603659e+001 -1.751890e+000 3.813319e+001
    endloop
  endfacet
endsolid Object01
";

    #[test]
    fn test_read_triangles_in_order() {
        let mut reader = MeshReader::new(TWO_FACETS.as_bytes());

        let t1 = reader.read_triangle().unwrap().unwrap();
        assert_eq!(t1.vertices[0], Vector3H::new(-21.31976, -10.33176, 39.37008));
        assert_eq!(t1.vertices[1], Vector3H::new(-21.31976, -0.5408154, 38.13319));
        assert_eq!(t1.vertices[2], Vector3H::new(-23.75467, -0.8484154, 38.13319));

        let t2 = reader.read_triangle().unwrap().unwrap();
        assert_eq!(t2.vertices[0], Vector3H::new(-21.31976, -10.33176, 39.37008));
        assert_eq!(t2.vertices[1], Vector3H::new(-23.75467, -0.8484154, 38.13319));
        assert_eq!(t2.vertices[2], Vector3H::new(-26.03659, -1.75189, 38.13319));

        assert!(reader.read_triangle().unwrap().is_none());
        assert!(reader.read_triangle().unwrap().is_none());
        assert_eq!(reader.line(), 16);
    }

    #[test]
    fn test_read_mesh_normalized() {
        let stl = "solid Object01
  facet normal -1.583127e-002 1.253177e-001 9.919903e-001
    outer loop
      vertex -2e+000 -2e+000 -2e+000
      vertex 0e+000 0e-000 0e+000
      vertex 0e+000 1e-000 0e+000
    endloop
  endfacet
endsolid Object01
";
        let mesh = parse_ascii_stl(stl, true).unwrap();
        assert_eq!(mesh.len(), 1);

        let [v1, v2, v3] = mesh.triangles[0].vertices;
        assert_abs_diff_eq!(v1, Vector3H::new(-1.0 / 3.0, -0.5, -1.0 / 3.0), epsilon = 1e-9);
        assert_abs_diff_eq!(v2, Vector3H::new(1.0 / 3.0, 1.0 / 6.0, 1.0 / 3.0), epsilon = 1e-9);
        assert_abs_diff_eq!(v3, Vector3H::new(1.0 / 3.0, 0.5, 1.0 / 3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_read_mesh_without_normalizing() {
        let mesh = parse_ascii_stl(TWO_FACETS, false).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[1].vertices[2], Vector3H::new(-26.03659, -1.75189, 38.13319));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_ascii_stl("", true).unwrap().is_empty());
        assert!(parse_ascii_stl("solid empty\nendsolid empty\n", true).unwrap().is_empty());
    }

    #[test]
    fn test_incomplete_triangle() {
        let one = "vertex 1 2 3\n";
        assert!(matches!(
            parse_ascii_stl(one, false),
            Err(MeshError::IncompleteTriangle { found: 1, line: 1 })
        ));

        let two = "solid x\nvertex 1 2 3\nvertex 4 5 6\nendsolid x\n";
        assert!(matches!(
            parse_ascii_stl(two, false),
            Err(MeshError::IncompleteTriangle { found: 2, line: 4 })
        ));

        let four = "vertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nvertex 1 1 1\n";
        let mut reader = MeshReader::new(four.as_bytes());
        assert!(reader.read_triangle().unwrap().is_some());
        assert!(matches!(
            reader.read_triangle(),
            Err(MeshError::IncompleteTriangle { found: 1, .. })
        ));
    }

    #[test]
    fn test_ignores_other_lines() {
        let stl = "\
# exported by hand
solid
\tvertex\t1 2 3   \r
vertex 4 5 6 7
vertex 8 9
vertexes 1 1 1
not a vertex 1 2 3

   vertex 4 5 6
  vertex 7 8 9
endsolid
";
        let mesh = parse_ascii_stl(stl, false).unwrap();
        assert_eq!(
            mesh.triangles,
            vec![Triangle::from_points([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]])]
        );
    }

    #[test]
    fn test_non_utf8_header_is_ignored() {
        let stl: &[u8] = b"solid Mod\xe8le\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendsolid\n";
        let mut reader = MeshReader::new(stl);
        let mesh = reader.read_mesh(false).unwrap();
        assert_eq!(
            mesh.triangles,
            vec![Triangle::from_points([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])]
        );
        assert_eq!(reader.line(), 5);
    }

    #[test]
    fn test_binary_junk_lines_are_ignored() {
        let stl: &[u8] = b"\xff\xfe\x00\x01junk\r\nvertex 1 2 3\n\x80\x81\x82\nvertex 4 5 6\nvertex 7 \xff 9\nvertex\xa0 9 9 9\n";
        let mesh = MeshReader::new(stl).read_mesh(false).unwrap();
        // the undecodable token reads as 0 like any other non-number
        assert_eq!(
            mesh.triangles,
            vec![Triangle::from_points([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 0.0, 9.0]])]
        );
    }

    #[test]
    fn test_unparsable_numbers_read_as_zero() {
        let stl = "vertex abc 1 2\nvertex 1.5e1 - x\nvertex 2.5mm 3 .5\n";
        let mesh = parse_ascii_stl(stl, false).unwrap();
        assert_eq!(
            mesh.triangles,
            vec![Triangle::from_points([[0.0, 1.0, 2.0], [15.0, 0.0, 0.0], [2.5, 3.0, 0.5]])]
        );
    }

    #[test]
    fn test_reader_as_iterator() {
        let triangles: Result<Vec<_>, _> = MeshReader::new(TWO_FACETS.as_bytes()).collect();
        assert_eq!(triangles.unwrap().len(), 2);

        let mut truncated = MeshReader::new("vertex 1 1 1\n".as_bytes());
        assert!(matches!(truncated.next(), Some(Err(MeshError::IncompleteTriangle { .. }))));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_io_errors_propagate() {
        let mut reader = MeshReader::new(BufReader::new(FailingReader));
        assert!(matches!(reader.read_mesh(false), Err(MeshError::Io(_))));
    }

    #[test]
    fn test_load_mesh() {
        let path = std::env::temp_dir().join(format!("wf3d-load-{}.stl", std::process::id()));
        std::fs::write(&path, TWO_FACETS).unwrap();
        let mesh = load_mesh(&path, false);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(mesh.unwrap().len(), 2);

        let missing = std::env::temp_dir().join("wf3d-definitely-missing.stl");
        assert!(matches!(load_mesh(&missing, true), Err(MeshError::Open { .. })));
    }
}
