//! Pool sampling helpers shared by the mutators

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly pick one value from a pool
pub fn pick<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Option<&'a T> {
    pool.choose(rng)
}

/// Pick a value that differs from `current`, so the mutation is never a no-op.
///
/// Returns `None` when the pool holds nothing but the current value.
pub fn pick_different<'a, T, R>(pool: &'a [T], current: Option<&T>, rng: &mut R) -> Option<&'a T>
where
    T: PartialEq,
    R: Rng + ?Sized,
{
    let candidates: Vec<&T> = pool.iter().filter(|v| Some(*v) != current).collect();
    candidates.choose(rng).copied()
}

/// Uniform integer in `min..=max`, tolerating reversed bounds
pub fn between<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> u32 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_different_avoids_current() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = [4, 8, 12];
        for _ in 0..50 {
            let value = pick_different(&pool, Some(&8), &mut rng).unwrap();
            assert_ne!(*value, 8);
        }
        assert!(pick_different(&[8], Some(&8), &mut rng).is_none());
        assert!(pick(&Vec::<u32>::new(), &mut rng).is_none());
    }

    #[test]
    fn test_between_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(between(5, 5, &mut rng), 5);
        assert_eq!(between(9, 3, &mut rng), 9);
        for _ in 0..50 {
            let v = between(1, 3, &mut rng);
            assert!((1..=3).contains(&v));
        }
    }
}
