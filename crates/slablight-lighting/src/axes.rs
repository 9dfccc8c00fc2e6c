use slablight_geom::Vec3;

/// Weights at or above this collapse onto a single axis.
pub const ON_AXIS_THRESHOLD: f32 = 0.99;

/// One of the six axis-aligned propagation directions.
///
/// Discriminants are the face indices; odd faces march toward increasing
/// coordinates, even faces toward decreasing ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

pub const FACE_NORMALS: [Vec3; 6] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 0 = X, 1 = Y, 2 = Z.
    #[inline]
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        FACE_NORMALS[self.index()]
    }

    /// +1 when marching toward increasing coordinates, -1 otherwise.
    #[inline]
    pub fn march_direction(self) -> i32 {
        if self.index() % 2 == 1 { 1 } else { -1 }
    }

    /// Face whose normal best matches `direction`.
    pub fn dominant(direction: Vec3) -> CubeFace {
        compute_major_axes(direction).dominant_face()
    }
}

/// Cube faces sorted by descending weight. Only the first two entries can
/// carry weight; when they do, the weights sum to 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MajorAxes {
    pub faces: [(CubeFace, f32); 6],
}

impl MajorAxes {
    #[inline]
    pub fn dominant_face(&self) -> CubeFace {
        self.faces[0].0
    }

    /// The (at most two) entries that need a propagation pass.
    pub fn active(&self) -> impl Iterator<Item = (CubeFace, f32)> + '_ {
        self.faces[..2].iter().copied().filter(|(_, w)| *w > 0.0)
    }

    /// Exact equality of the first two faces, ignoring weights.
    #[inline]
    pub fn same_faces(&self, other: &MajorAxes) -> bool {
        self.faces[0].0 == other.faces[0].0 && self.faces[1].0 == other.faces[1].0
    }

    pub fn weight_sum(&self) -> f32 {
        self.faces.iter().map(|(_, w)| w).sum()
    }
}

/// Splits `direction` across at most two cube faces.
///
/// Each face scores `max(dot(normal, direction), 0)^2`. The scores are sorted
/// descending with a stable sort, so ties keep face order
/// `+X, -X, +Y, -Y, +Z, -Z`. A leading score of at least
/// [`ON_AXIS_THRESHOLD`] becomes exactly 1, the runner-up gets the complement
/// and everything else is zeroed. A zero vector yields all-zero weights.
pub fn compute_major_axes(direction: Vec3) -> MajorAxes {
    let mut faces = CubeFace::ALL.map(|face| {
        let d = face.normal().dot(direction);
        (face, if d > 0.0 { d * d } else { 0.0 })
    });
    faces.sort_by(|a, b| b.1.total_cmp(&a.1));

    if faces[0].1 <= 0.0 {
        for entry in faces.iter_mut() {
            entry.1 = 0.0;
        }
        return MajorAxes { faces };
    }
    if faces[0].1 >= ON_AXIS_THRESHOLD {
        faces[0].1 = 1.0;
    }
    faces[1].1 = 1.0 - faces[0].1;
    for entry in faces[2..].iter_mut() {
        entry.1 = 0.0;
    }
    MajorAxes { faces }
}
