use cgmath::Vector4;

pub type Point4 = Vector4<f32>;
pub type Color4 = Vector4<f32>;

/// Vertices drawn for the six faces, two triangles each.
pub const VERTICES: usize = 36;

#[rustfmt::skip]
pub const CORNERS: [Point4; 8] = [
    vec4(-0.5, -0.5,  0.5, 1.0),
    vec4(-0.5,  0.5,  0.5, 1.0),
    vec4( 0.5,  0.5,  0.5, 1.0),
    vec4( 0.5, -0.5,  0.5, 1.0),
    vec4(-0.5, -0.5, -0.5, 1.0),
    vec4(-0.5,  0.5, -0.5, 1.0),
    vec4( 0.5,  0.5, -0.5, 1.0),
    vec4( 0.5, -0.5, -0.5, 1.0),
];

#[rustfmt::skip]
pub const CORNER_COLORS: [Color4; 8] = [
    vec4(0.0, 0.0, 0.0, 1.0), // black
    vec4(1.0, 0.0, 0.0, 1.0), // red
    vec4(1.0, 1.0, 0.0, 1.0), // yellow
    vec4(0.0, 1.0, 0.0, 1.0), // green
    vec4(0.0, 0.0, 1.0, 1.0), // blue
    vec4(1.0, 0.0, 1.0, 1.0), // magenta
    vec4(1.0, 1.0, 1.0, 1.0), // white
    vec4(0.0, 1.0, 1.0, 1.0), // cyan
];

const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vector4<f32> {
    Vector4 { x, y, z, w }
}

/// Corner indices of each face, wound consistently.
pub const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [6, 5, 1, 2],
    [4, 5, 6, 7],
    [5, 4, 0, 1],
];

/// The unit cube as a triangle list with one color per vertex.
///
/// Positions and colors are kept in two parallel arrays so they can be
/// uploaded as two contiguous buffer regions.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    positions: Vec<Point4>,
    colors: Vec<Color4>,
}

impl Cube {
    pub fn new() -> Self {
        let mut cube = Self {
            positions: Vec::with_capacity(VERTICES),
            colors: Vec::with_capacity(VERTICES),
        };

        for [a, b, c, d] in FACES {
            cube.quad(a, b, c, d);
        }

        cube
    }

    /// Emits the quad `a b c d` as the triangles `a b c` and `a c d`.
    fn quad(&mut self, a: usize, b: usize, c: usize, d: usize) {
        for corner in [a, b, c, a, c, d] {
            self.positions.push(CORNERS[corner]);
            self.colors.push(CORNER_COLORS[corner]);
        }
    }

    pub fn positions(&self) -> &[Point4] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color4] {
        &self.colors
    }

    pub fn vertices(&self) -> usize {
        self.positions.len()
    }

    /// All positions followed by all colors, ready for a single buffer upload.
    pub fn vertex_data(&self) -> Vec<f32> {
        self.positions
            .iter()
            .chain(self.colors.iter())
            .flat_map(|v| [v.x, v.y, v.z, v.w])
            .collect()
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_of(p: &Point4) -> usize {
        CORNERS.iter().position(|c| c == p).unwrap()
    }

    #[test]
    fn cube_has_36_vertices() {
        let cube = Cube::new();

        assert_eq!(cube.vertices(), VERTICES);
        assert_eq!(cube.colors().len(), VERTICES);
    }

    #[test]
    fn first_face_is_split_along_a_c() {
        let cube = Cube::new();

        let corners = cube.positions()[..6]
            .iter()
            .map(corner_of)
            .collect::<Vec<_>>();

        assert_eq!(corners, vec![1, 0, 3, 1, 3, 2]);
    }

    #[test]
    fn colors_follow_positions() {
        let cube = Cube::new();

        for (p, c) in cube.positions().iter().zip(cube.colors()) {
            assert_eq!(*c, CORNER_COLORS[corner_of(p)]);
        }
    }

    #[test]
    fn each_group_of_six_stays_on_its_face() {
        let cube = Cube::new();

        for (face, group) in FACES.iter().zip(cube.positions().chunks(6)) {
            for p in group {
                assert!(face.contains(&corner_of(p)));
            }
        }
    }

    #[test]
    fn every_corner_is_used() {
        let cube = Cube::new();

        for corner in CORNERS {
            assert!(cube.positions().contains(&corner));
        }
    }

    #[test]
    fn vertex_data_is_planar() {
        let cube = Cube::new();
        let data = cube.vertex_data();

        assert_eq!(data.len(), VERTICES * 4 * 2);
        // corner 1 opens the position region, red opens the color region
        assert_eq!(&data[..4], &[-0.5, 0.5, 0.5, 1.0]);
        assert_eq!(&data[VERTICES * 4..VERTICES * 4 + 4], &[1.0, 0.0, 0.0, 1.0]);
        // last vertex is corner 1 of the final face
        assert_eq!(&data[VERTICES * 4 - 4..VERTICES * 4], &[-0.5, 0.5, 0.5, 1.0]);
    }
}
