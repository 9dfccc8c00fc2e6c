/// Dense 3-D grid stored X-fastest, then Y, then Z (3-D texture layout).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3<T> {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub data: Vec<T>,
}

impl<T: Copy> Grid3<T> {
    pub fn filled(sx: usize, sy: usize, sz: usize, value: T) -> Self {
        Self {
            sx,
            sy,
            sz,
            data: vec![value; sx * sy * sz],
        }
    }

    pub fn from_fn(sx: usize, sy: usize, sz: usize, f: impl Fn(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(sx * sy * sz);
        for z in 0..sz {
            for y in 0..sy {
                for x in 0..sx {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { sx, sy, sz, data }
    }

    /// Wraps existing samples. A length mismatch is logged; short input is padded with `pad`, long input truncated.
    pub fn from_vec(sx: usize, sy: usize, sz: usize, data: Vec<T>, pad: T) -> Self {
        let mut d = data;
        let expect = sx * sy * sz;
        if d.len() != expect {
            log::warn!(
                "grid data has {} samples, expected {expect} for {sx}x{sy}x{sz}; {}",
                d.len(),
                if d.len() < expect { "padding" } else { "truncating" }
            );
            d.resize(expect, pad);
        }
        Self { sx, sy, sz, data: d }
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        [self.sx, self.sy, self.sz]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.sy + y) * self.sx + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.data[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let i = self.idx(x, y, z);
        self.data[i] = value;
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Z-slice `z` as a contiguous `sx * sy` slice.
    pub fn slice_z(&self, z: usize) -> &[T] {
        let n = self.sx * self.sy;
        &self.data[z * n..(z + 1) * n]
    }
}
