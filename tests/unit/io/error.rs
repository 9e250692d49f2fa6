//! Tests for error formatting, sources and conversions

#[cfg(test)]
mod tests {
    use patchfill::io::error::{InpaintError, invalid_parameter, io_error};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests the parameter error message format
    // Verified by changing the display template
    #[test]
    fn test_invalid_parameter_display() {
        let err = invalid_parameter("radius", &0, &"patch radius must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'radius' = '0': patch radius must be positive"
        );
        assert!(err.source().is_none());
    }

    // Tests that I/O errors convert and keep their source
    // Verified by converting a NotFound error
    #[test]
    fn test_io_error_conversion() {
        let err: InpaintError = std::io::Error::from(std::io::ErrorKind::NotFound).into();

        assert!(matches!(err, InpaintError::FileSystem { .. }));
        assert!(err.source().is_some());
    }

    // Tests the file system message names the path and operation
    // Verified by formatting a create failure
    #[test]
    fn test_file_system_display() {
        let err = InpaintError::FileSystem {
            path: PathBuf::from("out/x.png"),
            operation: "create file",
            source: std::io::Error::other("denied"),
        };
        let message = err.to_string();

        assert!(message.contains("create file"));
        assert!(message.contains("out/x.png"));
        assert!(message.contains("denied"));
    }

    // Tests the path helper used for CLI target errors
    // Verified by checking the reason is carried through
    #[test]
    fn test_io_error_helper() {
        let err = io_error("Target must be an image file or directory");
        assert!(matches!(
            err,
            InpaintError::InvalidParameter { parameter: "path", ref reason, .. }
                if reason == "Target must be an image file or directory"
        ));
    }
}
