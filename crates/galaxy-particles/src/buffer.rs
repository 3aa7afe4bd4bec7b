//! Flat particle position storage

/// `3 × count` floats, `(x, y, z)` triples in local object space.
///
/// Only the distribution generator can build one; regenerating a layer
/// means building a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionBuffer {
    data: Vec<f32>,
}

impl PositionBuffer {
    pub(crate) fn from_vec(data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len() % 3, 0);
        Self { data }
    }

    /// Number of floats (three per particle)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of particles
    pub fn count(&self) -> usize {
        self.data.len() / 3
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterate `[x, y, z]` triples
    pub fn triples(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }
}
