//! Linear maps over the first three spatial axes
//!
//! Maps are expressed from output coordinates to input coordinates, relative
//! to the volume centre, which is the direction a resampler needs.

/// Row-major 3x3 matrix
pub type Matrix3 = [[f64; 3]; 3];

const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Centre-relative linear map used for spatial augmentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    matrix: Matrix3,
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMap {
    /// Map that leaves every coordinate in place
    pub const fn identity() -> Self {
        Self { matrix: IDENTITY }
    }

    /// Wrap an explicit matrix
    pub const fn from_matrix(matrix: Matrix3) -> Self {
        Self { matrix }
    }

    /// Rotation by the given angles in degrees about axes 0, 1 and 2
    ///
    /// The rotations are composed in axis order.
    pub fn rotation(angles_degrees: [f64; 3]) -> Self {
        let [a, b, c] = angles_degrees.map(f64::to_radians);
        let (sa, ca) = a.sin_cos();
        let (sb, cb) = b.sin_cos();
        let (sc, cc) = c.sin_cos();

        let about_0 = Self::from_matrix([[1.0, 0.0, 0.0], [0.0, ca, -sa], [0.0, sa, ca]]);
        let about_1 = Self::from_matrix([[cb, 0.0, sb], [0.0, 1.0, 0.0], [-sb, 0.0, cb]]);
        let about_2 = Self::from_matrix([[cc, -sc, 0.0], [sc, cc, 0.0], [0.0, 0.0, 1.0]]);

        about_0.then(&about_1).then(&about_2)
    }

    /// Zoom by the given factor along each axis
    ///
    /// A factor above one magnifies, so input coordinates shrink towards the
    /// centre. Non-positive factors are treated as one.
    pub fn scaling(factors: [f64; 3]) -> Self {
        let [x, y, z] = factors.map(|factor| if factor > 0.0 { 1.0 / factor } else { 1.0 });
        Self::from_matrix([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, z]])
    }

    /// Compose two maps, applying `self` after `other`
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        let mut matrix = [[0.0; 3]; 3];
        for (row, lhs_row) in matrix.iter_mut().zip(&self.matrix) {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = lhs_row
                    .iter()
                    .zip(&other.matrix)
                    .map(|(&lhs, rhs_row)| lhs * rhs_row.get(j).copied().unwrap_or(0.0))
                    .sum();
            }
        }
        Self { matrix }
    }

    /// Map a centre-relative coordinate
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        self.matrix.map(|row| {
            row.iter()
                .zip(point)
                .map(|(&coefficient, value)| coefficient * value)
                .sum()
        })
    }

    /// Underlying matrix
    pub const fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Whether the map is the identity within floating point tolerance
    pub fn is_identity(&self) -> bool {
        self.matrix
            .iter()
            .flatten()
            .zip(IDENTITY.iter().flatten())
            .all(|(a, b)| (a - b).abs() < 1e-12)
    }
}
