//! Observation/action space contracts declared by the environment.

use ndarray::Array3;
use rand::Rng;

/// Byte-valued tensor space with uniform bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxSpace {
    pub low: u8,
    pub high: u8,
    shape: [usize; 3],
}

impl BoxSpace {
    pub fn new(low: u8, high: u8, shape: [usize; 3]) -> Self {
        assert!(low <= high, "low must not exceed high");
        Self { low, high, shape }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn contains(&self, value: &Array3<u8>) -> bool {
        value.shape() == self.shape
            && value.iter().all(|&v| v >= self.low && v <= self.high)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Array3<u8> {
        let (h, w, c) = (self.shape[0], self.shape[1], self.shape[2]);
        Array3::from_shape_fn((h, w, c), |_| rng.gen_range(self.low..=self.high))
    }
}

/// A fixed number of independent binary flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiBinary {
    pub n: usize,
}

impl MultiBinary {
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "MultiBinary must have at least 1 flag");
        Self { n }
    }

    pub fn contains(&self, value: &[u8]) -> bool {
        value.len() == self.n && value.iter().all(|&v| v <= 1)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        (0..self.n).map(|_| rng.gen_range(0..=1)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn box_space_bounds_and_shape() {
        let space = BoxSpace::new(0, 255, [84, 84, 1]);
        let mut rng = StdRng::seed_from_u64(0);
        let sample = space.sample(&mut rng);
        assert_eq!(sample.shape(), &[84, 84, 1]);
        assert!(space.contains(&sample));
        assert!(!space.contains(&Array3::zeros((84, 84, 3))));
    }

    #[test]
    fn multi_binary_membership() {
        let space = MultiBinary::new(12);
        assert!(space.contains(&[0; 12]));
        assert!(space.contains(&[1; 12]));
        assert!(!space.contains(&[0; 11]));
        assert!(!space.contains(&[2; 12]));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(space.contains(&space.sample(&mut rng)));
    }
}
