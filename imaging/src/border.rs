//! Border index handling shared by the windowed filters.

/// Maps an out-of-range coordinate back into `0..len` by reflecting about
/// the image edge without repeating the edge sample (the `gfedcb|abcdefgh`
/// convention). In-range coordinates pass through.
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut r = index.rem_euclid(period);
    if r >= len as isize {
        r = period - r;
    }
    r as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_passes_through() {
        for i in 0..5 {
            assert_eq!(reflect_101(i, 5), i as usize);
        }
    }

    #[test]
    fn test_reflects_without_repeating_the_edge() {
        // len = 4: samples a b c d reflect as ... c b | a b c d | c b a ...
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-2, 4), 2);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(6, 4), 0);
    }

    #[test]
    fn test_wraps_far_out_of_range_coordinates() {
        // period for len = 3 is 4: indices cycle a b c b | a b c b ...
        assert_eq!(reflect_101(7, 3), 1);
        assert_eq!(reflect_101(-5, 3), 1);
    }

    #[test]
    fn test_degenerate_lengths_pin_to_zero() {
        assert_eq!(reflect_101(10, 1), 0);
        assert_eq!(reflect_101(-3, 1), 0);
        assert_eq!(reflect_101(0, 0), 0);
    }
}
