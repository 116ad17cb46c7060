use rand::Rng;

/// An axis-aligned rectangle over the two partitioned axes (X and Z).
/// The vertical axis is never constrained by a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl Region {
    pub fn new(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Self {
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn mid_x(&self) -> f32 {
        self.min_x + self.width() / 2.0
    }

    pub fn mid_z(&self) -> f32 {
        self.min_z + self.depth() / 2.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.mid_x(), self.mid_z())
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        !(x < self.min_x || x > self.max_x || z < self.min_z || z > self.max_z)
    }

    /// The interior left after insetting every edge by `margin`.
    pub fn shrunk(&self, margin: f32) -> Region {
        Region {
            min_x: self.min_x + margin,
            min_z: self.min_z + margin,
            max_x: self.max_x - margin,
            max_z: self.max_z - margin,
        }
    }

    /// One quarter of this region. Index order: 0 = low-x/low-z,
    /// 1 = high-x/low-z, 2 = low-x/high-z, 3 = high-x/high-z.
    pub fn quadrant(&self, index: usize) -> Region {
        let half_w = self.width() / 2.0;
        let half_d = self.depth() / 2.0;
        let column = (index % 2) as f32;
        let row = (index / 2) as f32;
        Region {
            min_x: self.min_x + half_w * column,
            min_z: self.min_z + half_d * row,
            max_x: self.min_x + half_w * (column + 1.0),
            max_z: self.min_z + half_d * (row + 1.0),
        }
    }

    /// Which quadrant a point falls in, by midpoint comparison. X decides
    /// low/high, then Z, matching the `quadrant` index order.
    pub fn quadrant_index(&self, x: f32, z: f32) -> usize {
        let mut index = 0;
        if x >= self.mid_x() {
            index += 1;
        }
        if z >= self.mid_z() {
            index += 2;
        }
        index
    }

    /// A random point inside the region, inset from the edges. Used by scene
    /// setup and test populations.
    pub fn random_point_inside<R: Rng>(&self, inset: f32, rng: &mut R) -> (f32, f32) {
        (
            self.safe_randf32(rng, self.min_x + inset, self.max_x - inset),
            self.safe_randf32(rng, self.min_z + inset, self.max_z - inset),
        )
    }

    fn safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_z: 0.0,
            max_x: 0.0,
            max_z: 0.0,
        }
    }
}
