//! Tests for image and mask loading, previews and export

#[cfg(test)]
mod tests {
    use crate::solid_with_holes;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use patchfill::InpaintError;
    use patchfill::io::image::{
        HOLE_PREVIEW_COLOR, export_rgb, load_masked_image, mask_from_image, overlay_mask,
    };

    // Tests that only opaque black marks a known pixel
    // Verified with white, transparent black and dark gray pixels
    #[test]
    fn test_mask_from_image() {
        let mut mask = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        mask.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        mask.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        mask.put_pixel(1, 1, Rgba([1, 1, 1, 255]));

        let bits = mask_from_image(&mask);

        assert_eq!(bits.len(), 4);
        assert!(!bits[0]);
        assert!(bits[1] && bits[2] && bits[3]);
    }

    // Tests that holes are painted in the preview color
    // Verified by checking a hole and a known pixel
    #[test]
    fn test_overlay_mask() {
        let image = solid_with_holes(4, 3, [9, 9, 9], &[(1, 2), (3, 0)]);
        let preview = overlay_mask(&image);

        assert_eq!(preview.get_pixel(1, 2).0, HOLE_PREVIEW_COLOR);
        assert_eq!(preview.get_pixel(3, 0).0, HOLE_PREVIEW_COLOR);
        assert_eq!(preview.get_pixel(0, 0).0, [9, 9, 9]);
        assert_eq!(preview.get_pixel(2, 1).0, [9, 9, 9]);
        assert_eq!(
            preview.pixels().filter(|p| p.0 == HOLE_PREVIEW_COLOR).count(),
            2
        );
    }

    // Tests loading an image with its mask from disk
    // Verified by saving both and reading them back
    #[test]
    fn test_load_masked_image() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let image_path = dir.path().join("in.png");
        let mask_path = dir.path().join("in_mask.png");

        RgbImage::from_pixel(5, 4, Rgb([1, 2, 3]))
            .save(&image_path)
            .expect("Failed to save image");
        let mut mask = RgbImage::new(5, 4);
        mask.put_pixel(4, 3, Rgb([255, 255, 255]));
        mask.save(&mask_path).expect("Failed to save mask");

        let loaded = load_masked_image(&image_path, &mask_path).expect("Failed to load");

        assert_eq!((loaded.width(), loaded.height()), (5, 4));
        assert_eq!(loaded.count_masked(), 1);
        assert!(loaded.is_masked(4, 3));
        assert_eq!(loaded.pixel(0, 0), [1, 2, 3]);
    }

    // Tests that a mask of another size is rejected
    // Verified with a mask one column narrower
    #[test]
    fn test_load_rejects_mismatched_mask() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let image_path = dir.path().join("in.png");
        let mask_path = dir.path().join("in_mask.png");
        RgbImage::new(5, 4).save(&image_path).expect("Failed to save image");
        RgbImage::new(4, 4).save(&mask_path).expect("Failed to save mask");

        let result = load_masked_image(&image_path, &mask_path);

        assert!(matches!(
            result,
            Err(InpaintError::DimensionMismatch {
                image: (5, 4),
                mask: (4, 4)
            })
        ));
    }

    // Tests that a missing file is a load error naming the path
    // Verified with a path that was never written
    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("nothing.png");

        let result = load_masked_image(&missing, &missing);

        assert!(matches!(result, Err(InpaintError::ImageLoad { ref path, .. }) if *path == missing));
    }

    // Tests that export creates missing parent directories
    // Verified by writing into a nested path
    #[test]
    fn test_export_creates_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("a").join("b").join("out.png");

        export_rgb(&RgbImage::new(2, 2), &path).expect("Export should succeed");

        assert!(path.exists());
    }
}
