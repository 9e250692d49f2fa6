//! Tests for pyramid construction and termination
#[cfg(test)]
mod tests {
    use crate::{gradient, solid_with_holes};
    use patchfill::spatial::Pyramid;

    // Tests that an image without holes yields a single level
    // Verified by building from a hole-free gradient
    #[test]
    fn test_no_holes_single_level() {
        let pyramid = Pyramid::build(&gradient(32, 32), 2, 0.75);

        assert_eq!(pyramid.len(), 1);
        assert!(!pyramid.is_empty());
        assert_eq!(pyramid.finest(), pyramid.coarsest());
    }

    // Tests that reduction stops once the holes disappear
    // Verified with an 8x8 image whose 2x2 hole vanishes after one reduction
    #[test]
    fn test_stops_when_holes_vanish() {
        let image = solid_with_holes(8, 8, [100, 100, 100], &[(3, 3), (4, 3), (3, 4), (4, 4)]);
        let pyramid = Pyramid::build(&image, 1, 0.75);

        assert_eq!(pyramid.len(), 2);
        assert_eq!(pyramid.coarsest().map(|l| l.count_masked()), Some(0));
    }

    // Tests that reduction stops once a side reaches the patch radius
    // Verified with a fully masked 16x16 image at radius 1 (16, 8, 4, 2, 1)
    #[test]
    fn test_stops_at_radius() {
        let holes: Vec<(usize, usize)> = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .collect();
        let image = solid_with_holes(16, 16, [0, 0, 0], &holes);
        let pyramid = Pyramid::build(&image, 1, 0.75);

        let widths: Vec<usize> = pyramid.levels().iter().map(|l| l.width()).collect();
        assert_eq!(widths, vec![16, 8, 4, 2, 1]);
    }

    // Tests that each level halves the previous one
    // Verified by walking every adjacent level pair
    #[test]
    fn test_levels_halve() {
        let image = solid_with_holes(40, 24, [20, 30, 40], &[(20, 12), (21, 12)]);
        let pyramid = Pyramid::build(&image, 2, 0.75);

        for pair in pyramid.levels().windows(2) {
            let (finer, coarser) = (&pair[0], &pair[1]);
            assert_eq!(coarser.width(), finer.width() / 2);
            assert_eq!(coarser.height(), finer.height() / 2);
        }
        assert_eq!(pyramid.level(0), Some(&image));
        assert!(pyramid.level(pyramid.len()).is_none());
    }
}
