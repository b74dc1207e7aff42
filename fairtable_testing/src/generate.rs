//! Data generation utilities useful for testing and benchmarking.
use fairtable_core::Slot;
use rand::Rng;
use std::collections::HashSet;
use std::hash::Hash;

/// Provides capabilities to generate random values of the implementer-type.
pub trait Generate<R: Rng>: Sized {
    /// Parameters for data-generation specific for the type.
    type GenerateParams: Default;

    /// Generates a single random value of the type.
    fn generate(rng: &mut R, params: &Self::GenerateParams) -> Self;

    /// Generates a slice of **unique** random values of the type.
    ///
    /// The order is the order of generation, so a seeded `rng` gives reproducible data.
    fn generate_many(rng: &mut R, params: &Self::GenerateParams, size: usize) -> Box<[Self]>
    where
        Self: Hash + Eq + Clone,
    {
        let mut seen = HashSet::with_capacity(size);
        let mut values = Vec::with_capacity(size);
        while values.len() < size {
            let value = Self::generate(rng, params);
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        values.into_boxed_slice()
    }
}

/// Parameters for [`Generate`] implementations that generate numeric values.
pub struct NumParams<T> {
    min: T,
    max: T,
}

impl<T> NumParams<T> {
    /// Creates a new instance of [`NumParams`] with the specified minimum and maximum values.
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

macro_rules! impl_generate_num {
    ($($type:ty),*) => {
        $(
            impl Default for NumParams<$type> {
                fn default() -> Self {
                    Self { min: <$type>::MIN, max: <$type>::MAX }
                }
            }

            impl<R: Rng> Generate<R> for $type
            {
                type GenerateParams = NumParams<$type>;

                fn generate(rng: &mut R, params: &Self::GenerateParams) -> Self {
                    rng.random_range(params.min..=params.max)
                }
            }
        )*
    };
}

impl_generate_num!(u8, u16, u32, u64);

/// Parameters for [`Generate`] implementations that generate byte strings.
pub struct BytesParams {
    min_length: usize,
    max_length: usize,
}

impl BytesParams {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }
}

impl Default for BytesParams {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 64,
        }
    }
}

impl<R: Rng> Generate<R> for Vec<u8> {
    type GenerateParams = BytesParams;

    fn generate(rng: &mut R, params: &Self::GenerateParams) -> Self {
        let length = rng.random_range(params.min_length..=params.max_length);
        let mut bytes = vec![0; length];
        rng.fill_bytes(&mut bytes);
        bytes
    }
}

impl<R: Rng> Generate<R> for Box<[u8]> {
    type GenerateParams = BytesParams;

    fn generate(rng: &mut R, params: &Self::GenerateParams) -> Self {
        <Vec<u8> as Generate<R>>::generate(rng, params).into_boxed_slice()
    }
}

impl<R: Rng> Generate<R> for () {
    type GenerateParams = ();

    fn generate(_: &mut R, _: &Self::GenerateParams) -> Self {}
}

impl<const N: usize, R: Rng> Generate<R> for Slot<N> {
    type GenerateParams = ();

    fn generate(rng: &mut R, _: &Self::GenerateParams) -> Self {
        let mut bytes = [0; N];
        rng.fill_bytes(&mut bytes);
        Slot(bytes)
    }
}

/// Generates `size` entries with unique keys.
pub fn generate_entries<R, K, V>(rng: &mut R, size: usize) -> Vec<(K, V)>
where
    R: Rng,
    K: Generate<R> + Hash + Eq + Clone,
    V: Generate<R>,
{
    let keys = K::generate_many(rng, &K::GenerateParams::default(), size);
    keys.into_vec()
        .into_iter()
        .map(|key| {
            let value = V::generate(rng, &V::GenerateParams::default());
            (key, value)
        })
        .collect()
}

/// Provides capabilities to derive new random values by introducing minimal random changes.
///
/// Useful for generating random values that are very similar with each other.
pub trait Jitter<R: Rng>: Sized {
    fn jitter(&self, rng: &mut R) -> Option<Self>;
}

macro_rules! impl_jitter_num {
    ($($type:ty),*) => {
        $(
            impl<R: Rng> Jitter<R> for $type
            {
                fn jitter(&self, rng: &mut R) -> Option<Self> {
                    let bit_idx = rng.random_range(0..Self::BITS);
                    Some(*self ^ (1 << bit_idx))
                }
            }
        )*
    };
}

impl_jitter_num!(u8, u16, u32, u64);

impl<R: Rng> Jitter<R> for Vec<u8> {
    fn jitter(&self, rng: &mut R) -> Option<Self> {
        if self.is_empty() {
            return None;
        }
        let mut bytes = self.clone();
        let idx = rng.random_range(0..bytes.len());
        bytes[idx] = bytes[idx].jitter(rng)?;
        Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_many_is_unique_and_reproducible() {
        let params = NumParams::<u16>::new(0, 2000);
        let first = u16::generate_many(&mut ChaCha8Rng::seed_from_u64(3), &params, 1000);
        let second = u16::generate_many(&mut ChaCha8Rng::seed_from_u64(3), &params, 1000);
        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 1000);
    }

    #[test]
    fn test_bytes_respect_length_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let params = BytesParams::new(3, 9);
        for _ in 0..100 {
            let bytes = Vec::<u8>::generate(&mut rng, &params);
            assert!((3..=9).contains(&bytes.len()));
        }
    }

    #[test]
    fn test_jitter_flips_one_bit() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for value in [0u64, 1, u64::MAX, 0xdead_beef] {
            let jittered = value.jitter(&mut rng).unwrap();
            assert_eq!((value ^ jittered).count_ones(), 1);
        }
        assert_eq!(Vec::<u8>::new().jitter(&mut rng), None);
    }
}
