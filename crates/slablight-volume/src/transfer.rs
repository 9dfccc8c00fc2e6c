use std::error::Error;

/// Table resolution used when baking a curve.
pub const DEFAULT_TF_SAMPLES: usize = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn lerp(self, rhs: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (rhs.r - self.r) * t,
            self.g + (rhs.g - self.g) * t,
            self.b + (rhs.b - self.b) * t,
            self.a + (rhs.a - self.a) * t,
        )
    }
}

/// Piecewise-linear color/opacity curve over intensity.
#[derive(Clone, Debug, Default)]
pub struct ColorCurve {
    points: Vec<(f32, Rgba)>,
}

impl ColorCurve {
    pub fn new(points: Vec<(f32, Rgba)>) -> Result<Self, Box<dyn Error>> {
        if points.is_empty() {
            return Err("color curve needs at least one control point".into());
        }
        if points.iter().any(|(p, _)| !p.is_finite()) {
            return Err("color curve positions must be finite".into());
        }
        let mut points = points;
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { points })
    }

    /// Value at `position`, holding the end colors outside the control range.
    pub fn evaluate(&self, position: f32) -> Rgba {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if position <= first.0 {
            return first.1;
        }
        if position >= last.0 {
            return last.1;
        }
        let hi = self.points.partition_point(|(p, _)| *p <= position);
        let (p0, c0) = self.points[hi - 1];
        let (p1, c1) = self.points[hi];
        let span = p1 - p0;
        if span <= 0.0 {
            return c1;
        }
        c0.lerp(c1, (position - p0) / span)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CutMode {
    /// Hold the color found at the cutoff.
    #[default]
    Clamp,
    /// Fully transparent beyond the cutoff.
    Clear,
}

/// Window applied when baking a curve into a table.
///
/// Intensities below `cutoffs.0` or above `cutoffs.1` are handled by the
/// corresponding `CutMode`. Cutoffs are clamped into the intensity domain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TfRange {
    pub intensity_domain: (f32, f32),
    pub cutoffs: (f32, f32),
    pub low_cut: CutMode,
    pub high_cut: CutMode,
}

impl Default for TfRange {
    fn default() -> Self {
        Self {
            intensity_domain: (0.0, 1.0),
            cutoffs: (0.0, 1.0),
            low_cut: CutMode::Clamp,
            high_cut: CutMode::Clamp,
        }
    }
}

/// 1-D lookup from normalized intensity to color and opacity.
///
/// Sampling is linear between table entries with clamped addressing. Only
/// `a` is used by the monochrome light volume.
#[derive(Clone, Debug)]
pub struct TransferFunction {
    samples: Vec<Rgba>,
    domain: (f32, f32),
}

impl TransferFunction {
    pub fn from_samples(samples: Vec<Rgba>) -> Result<Self, Box<dyn Error>> {
        if samples.is_empty() {
            return Err("transfer function needs at least one sample".into());
        }
        Ok(Self {
            samples,
            domain: (0.0, 1.0),
        })
    }

    /// Same opacity for every intensity.
    pub fn constant_alpha(alpha: f32) -> Self {
        Self {
            samples: vec![Rgba::new(1.0, 1.0, 1.0, alpha.clamp(0.0, 1.0))],
            domain: (0.0, 1.0),
        }
    }

    /// Bakes `curve` over `range.intensity_domain` into a `resolution`-entry table.
    pub fn bake(curve: &ColorCurve, range: TfRange, resolution: usize) -> Result<Self, Box<dyn Error>> {
        let (lo, hi) = range.intensity_domain;
        let (c0, c1) = range.cutoffs;
        if ![lo, hi, c0, c1].iter().all(|v| v.is_finite()) {
            return Err(format!(
                "non-finite transfer function range: domain ({lo}, {hi}), cutoffs ({c0}, {c1})"
            )
            .into());
        }
        if resolution < 2 {
            return Err("transfer function resolution must be at least 2".into());
        }
        // Validate after clamping; a domain outside [0, 1] can collapse to a point.
        let lo = lo.clamp(0.0, 1.0);
        let hi = hi.clamp(0.0, 1.0);
        if hi <= lo {
            return Err(format!(
                "nonsense transfer function domain ({}, {}) clamps to ({lo}, {hi})",
                range.intensity_domain.0, range.intensity_domain.1
            )
            .into());
        }
        let c0 = c0.clamp(lo, hi);
        let c1 = c1.clamp(lo, hi);
        if c1 <= c0 {
            return Err(format!(
                "nonsense transfer function cutoffs ({}, {}) clamp to ({c0}, {c1}) in domain ({lo}, {hi})",
                range.cutoffs.0, range.cutoffs.1
            )
            .into());
        }

        let below = match range.low_cut {
            CutMode::Clamp => curve.evaluate(c0),
            CutMode::Clear => Rgba::TRANSPARENT,
        };
        let above = match range.high_cut {
            CutMode::Clamp => curve.evaluate(c1),
            CutMode::Clear => Rgba::TRANSPARENT,
        };
        let step = (hi - lo) / (resolution - 1) as f32;
        let samples = (0..resolution)
            .map(|i| {
                let position = lo + step * i as f32;
                if position < c0 {
                    below
                } else if position > c1 {
                    above
                } else {
                    curve.evaluate(position)
                }
            })
            .collect();
        log::debug!(
            "baked transfer function: {} samples over ({lo}, {hi}), cutoffs ({c0}, {c1})",
            resolution
        );
        Ok(Self {
            samples,
            domain: (lo, hi),
        })
    }

    #[inline]
    pub fn domain(&self) -> (f32, f32) {
        self.domain
    }

    #[inline]
    pub fn samples(&self) -> &[Rgba] {
        &self.samples
    }

    pub fn sample(&self, intensity: f32) -> Rgba {
        let (lo, hi) = self.domain;
        let t = ((intensity - lo) / (hi - lo)).clamp(0.0, 1.0);
        let n = self.samples.len();
        if n == 1 {
            return self.samples[0];
        }
        let pos = t * (n - 1) as f32;
        let i0 = (pos.floor() as usize).min(n - 1);
        let i1 = (i0 + 1).min(n - 1);
        self.samples[i0].lerp(self.samples[i1], pos - i0 as f32)
    }

    #[inline]
    pub fn alpha(&self, intensity: f32) -> f32 {
        self.sample(intensity).a
    }
}
