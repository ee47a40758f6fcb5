//! Pipeline stages and the append-only sequence that holds them.

/// A compiled pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorOp {
    /// 4x4 matrix + offset, row-major.
    Matrix {
        /// Row-major 4x4 matrix.
        matrix: [f32; 16],
        /// Offset added after the multiply.
        offset: [f32; 4],
    },
    /// 3D LUT with trilinear lookup.
    Lut3d {
        /// `size^3` entries, blue varying fastest.
        data: Vec<[f32; 3]>,
        /// Entries per axis.
        size: usize,
        /// Input domain minimum per channel.
        domain_min: [f32; 3],
        /// Input domain maximum per channel.
        domain_max: [f32; 3],
    },
}

impl ProcessorOp {
    /// Short stage name for logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Matrix { .. } => "matrix",
            Self::Lut3d { .. } => "lut3d",
        }
    }

    /// Checks that a LUT's table holds `size^3` entries. Matrices are always
    /// well formed.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::Matrix { .. } => true,
            Self::Lut3d { data, size, .. } => size.checked_pow(3) == Some(data.len()),
        }
    }

    /// Returns true if this operation is an identity (no-op).
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Matrix { matrix, offset } => {
                let identity = glam::Mat4::IDENTITY.to_cols_array();
                matrix.iter().zip(identity.iter()).all(|(a, b)| (a - b).abs() < 1e-6)
                    && offset.iter().all(|v| v.abs() < 1e-6)
            }
            Self::Lut3d { .. } => false,
        }
    }

    pub(crate) fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Matrix { matrix: m, offset: o } => [
                m[0] * rgb[0] + m[1] * rgb[1] + m[2] * rgb[2] + o[0],
                m[4] * rgb[0] + m[5] * rgb[1] + m[6] * rgb[2] + o[1],
                m[8] * rgb[0] + m[9] * rgb[1] + m[10] * rgb[2] + o[2],
            ],
            Self::Lut3d { data, size, domain_min, domain_max } => {
                lut3d_trilinear(data, *size, *domain_min, *domain_max, rgb)
            }
        }
    }
}

fn lut3d_trilinear(
    data: &[[f32; 3]],
    size: usize,
    domain_min: [f32; 3],
    domain_max: [f32; 3],
    rgb: [f32; 3],
) -> [f32; 3] {
    if size < 2 {
        return data.first().copied().unwrap_or(rgb);
    }
    // A table that does not hold size^3 entries is left out of the chain.
    if size.checked_pow(3) != Some(data.len()) {
        return rgb;
    }

    let n = (size - 1) as f32;
    let mut cell = [0usize; 3];
    let mut frac = [0.0f32; 3];
    for c in 0..3 {
        let t = ((rgb[c] - domain_min[c]) / (domain_max[c] - domain_min[c])).clamp(0.0, 1.0) * n;
        let i = (t.floor() as usize).min(size - 2);
        cell[c] = i;
        frac[c] = t - i as f32;
    }

    // Blue-fastest layout: idx = b + g*size + r*size^2
    let at = |r: usize, g: usize, b: usize| data[b + g * size + r * size * size];
    let [ri, gi, bi] = cell;
    let [rf, gf, bf] = frac;

    let mut out = [0.0f32; 3];
    for i in 0..3 {
        let c00 = at(ri, gi, bi)[i] * (1.0 - rf) + at(ri + 1, gi, bi)[i] * rf;
        let c01 = at(ri, gi, bi + 1)[i] * (1.0 - rf) + at(ri + 1, gi, bi + 1)[i] * rf;
        let c10 = at(ri, gi + 1, bi)[i] * (1.0 - rf) + at(ri + 1, gi + 1, bi)[i] * rf;
        let c11 = at(ri, gi + 1, bi + 1)[i] * (1.0 - rf) + at(ri + 1, gi + 1, bi + 1)[i] * rf;

        let c0 = c00 * (1.0 - gf) + c10 * gf;
        let c1 = c01 * (1.0 - gf) + c11 * gf;
        out[i] = c0 * (1.0 - bf) + c1 * bf;
    }
    out
}

/// Ordered, append-only op sequence.
///
/// Builders only ever add to the end; nothing already in the sequence is
/// removed or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpVec {
    ops: Vec<ProcessorOp>,
}

impl OpVec {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one op.
    #[inline]
    pub fn push(&mut self, op: ProcessorOp) {
        self.ops.push(op);
    }

    /// Moves every op of `block` onto the end, leaving `block` empty.
    pub fn append(&mut self, block: &mut OpVec) {
        self.ops.append(&mut block.ops);
    }

    /// Number of ops.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if there are no ops.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterates ops in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProcessorOp> {
        self.ops.iter()
    }

    /// Returns the ops as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[ProcessorOp] {
        &self.ops
    }

    /// Consumes the sequence.
    pub fn into_vec(self) -> Vec<ProcessorOp> {
        self.ops
    }
}

impl<'a> IntoIterator for &'a OpVec {
    type Item = &'a ProcessorOp;
    type IntoIter = std::slice::Iter<'a, ProcessorOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
