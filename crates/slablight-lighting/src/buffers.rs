//! 2-D accumulation buffers used in ping-pong fashion while marching.
//!
//! Each axis owns four same-sized buffers: `0/1` carry the light being added
//! or removed, `2/3` carry the added light of a fused change pass.

/// Single-channel 2-D float buffer, row-major.
#[derive(Clone, Debug, Default)]
pub struct SlabBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl SlabBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.data.clear();
            self.data.resize(width * height, 0.0);
        }
    }

    /// Texel fetch with border addressing.
    #[inline]
    pub fn texel(&self, x: isize, y: isize, border: f32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return border;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Bilinear sample at texel coordinates (texel centers at integers).
    pub fn sample_bilinear(&self, u: f32, v: f32, border: f32) -> f32 {
        if !u.is_finite() || !v.is_finite() {
            return border;
        }
        let x0 = u.floor();
        let y0 = v.floor();
        let tx = u - x0;
        let ty = v - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);
        let c00 = self.texel(x0, y0, border);
        let c10 = self.texel(x0 + 1, y0, border);
        let c01 = self.texel(x0, y0 + 1, border);
        let c11 = self.texel(x0 + 1, y0 + 1, border);
        let top = c00 + (c10 - c00) * tx;
        let bottom = c01 + (c11 - c01) * tx;
        top + (bottom - top) * ty
    }
}

/// The four buffers of one propagation axis.
#[derive(Clone, Debug, Default)]
pub struct AxisBuffers {
    pub buffers: [SlabBuffer; 4],
}

impl AxisBuffers {
    /// Resizes lazily; contents are unspecified until cleared.
    pub fn ensure(&mut self, width: usize, height: usize) {
        for b in self.buffers.iter_mut() {
            b.resize(width, height);
        }
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.buffers[0].width, self.buffers[0].height)
    }

    /// Read and write halves of the pair starting at `base` (0 or 2) for `parity`.
    pub fn ping_pong(&mut self, base: usize, parity: usize) -> (&SlabBuffer, &mut SlabBuffer) {
        let (first, second) = self.buffers[base..base + 2].split_at_mut(1);
        let (b0, b1) = (&mut first[0], &mut second[0]);
        if parity == 0 { (&*b0, b1) } else { (&*b1, b0) }
    }

    /// Both pairs at once for a fused pass: `(read_a, write_a, read_b, write_b)`.
    pub fn ping_pong_both(
        &mut self,
        parity: usize,
    ) -> (&SlabBuffer, &mut SlabBuffer, &SlabBuffer, &mut SlabBuffer) {
        let [b0, b1, b2, b3] = &mut self.buffers;
        if parity == 0 {
            (&*b0, b1, &*b2, b3)
        } else {
            (&*b1, b0, &*b3, b2)
        }
    }
}

/// Buffers for all three propagation axes, reused across operations.
#[derive(Clone, Debug, Default)]
pub struct SlabBufferSet {
    axes: [AxisBuffers; 3],
}

impl SlabBufferSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn for_axis(&mut self, axis: usize) -> &mut AxisBuffers {
        &mut self.axes[axis]
    }
}
