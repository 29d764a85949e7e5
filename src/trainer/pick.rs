//! Uniform random selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TrainerError};

/// Picks one item uniformly at random from an ordered, non-empty slice.
///
/// Each call is independent. Taking a slice rather than a set keeps the
/// position of the chosen item meaningful to the caller.
///
/// # Errors
///
/// Returns [`TrainerError::InvalidInput`] if `items` is empty.
pub fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Result<&'a T> {
    items
        .choose(rng)
        .ok_or_else(|| TrainerError::invalid("cannot pick from an empty list"))
}

/// Like [`pick`], but returns the chosen index alongside the item.
pub fn pick_indexed<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    rng: &mut R,
) -> Result<(usize, &'a T)> {
    if items.is_empty() {
        return Err(TrainerError::invalid("cannot pick from an empty list"));
    }
    let index = rng.gen_range(0..items.len());
    Ok((index, &items[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_empty_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(matches!(
            pick(&empty, &mut rng),
            Err(TrainerError::InvalidInput(_))
        ));
        assert!(pick_indexed(&empty, &mut rng).is_err());
    }

    #[test]
    fn test_pick_single() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(*pick(&["only"], &mut rng).unwrap(), "only");
        assert_eq!(pick_indexed(&["only"], &mut rng).unwrap(), (0, &"only"));
    }

    #[test]
    fn test_pick_covers_every_item() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = ['a', 'b', 'c', 'd'];
        let mut seen = [0usize; 4];
        for _ in 0..4000 {
            let (index, item) = pick_indexed(&items, &mut rng).unwrap();
            assert_eq!(items[index], *item);
            seen[index] += 1;
        }
        // Roughly uniform: each bucket near 1000
        for count in seen {
            assert!((800..1200).contains(&count), "count {}", count);
        }
    }

    #[test]
    fn test_pick_is_deterministic_for_seed() {
        let items: Vec<u32> = (0..50).collect();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| *pick(&items, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }
}
