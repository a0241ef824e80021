//! Frames and the `F`/`B` sequences (§3).

use super::cube::Cube;
use super::state::StateId;

/// A set of blocking cubes. Interpreted as the clause set `⋀ ¬cube`: a
/// frame over-approximates the set of states reachable in at most `i` steps
/// from init (forward mode), or able to reach bad in at most `i` steps
/// (backward mode).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    cubes: Vec<Cube>,
}

impl Frame {
    pub fn new() -> Self {
        Self { cubes: Vec::new() }
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn push(&mut self, cube: Cube) {
        self.cubes.push(cube);
    }

    pub fn extend(&mut self, other: Frame) {
        self.cubes.extend(other.cubes);
    }

    /// `true` if some cube in this frame is not subsumed by (implied by) any
    /// cube in `other` -- i.e. `self` is NOT a subset of the region `other`
    /// over-approximates. Used by the invariant check (§4.4): `F_i ⊆
    /// F_{i-1}` holds when every cube of `F_i` is already subsumed by some
    /// cube of `F_{i-1}`.
    pub fn has_cube_not_subsumed_by(&self, other: &Frame) -> bool {
        self.cubes
            .iter()
            .any(|c| !other.cubes.iter().any(|o| o.subsumes(c)))
    }
}

/// Ordered sequence of [`Frame`]s `F_0, F_1, ..., F_k`.
pub type Fsequence = Vec<Frame>;

/// Ordered sequence of frames of concrete counterexample-candidate states,
/// `B_0, B_1, ..., B_k`. Unlike `F`, each level holds [`StateId`]s rather
/// than cubes.
pub type Bsequence = Vec<Vec<StateId>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsumed_frame_has_no_uncovered_cube() {
        let mut narrow = Frame::new();
        narrow.push(Cube::new(vec![1, 2]));

        let mut wide = Frame::new();
        wide.push(Cube::new(vec![1]));

        assert!(!narrow.has_cube_not_subsumed_by(&wide));
        assert!(wide.has_cube_not_subsumed_by(&narrow));
    }
}
