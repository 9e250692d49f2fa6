//! Tests for per-file progress state tracking

#[cfg(test)]
mod tests {
    use patchfill::io::progress::{FileState, ProgressManager};
    use std::path::Path;

    // Tests that starting a file registers its name with empty progress
    // Verified by starting a file at a sparse index
    #[test]
    fn test_start_file() {
        let mut manager = ProgressManager::new();
        manager.initialize(3);
        manager.start_file(2, Path::new("dir/photo.png"));

        assert_eq!(
            manager.file_state(2),
            Some(&FileState {
                name: "photo.png".to_string(),
                ..FileState::default()
            })
        );
        assert_eq!(manager.file_state(0), Some(&FileState::default()));
        assert!(manager.file_state(3).is_none());
    }

    // Tests that advancing counts EM iterations without passing the total
    // Verified by advancing more times than the total allows
    #[test]
    fn test_advance_is_capped() {
        let mut manager = ProgressManager::new();
        manager.initialize(1);
        manager.start_file(0, Path::new("a.png"));
        manager.set_total(0, 2);

        manager.advance(0, 3);
        let state = manager.file_state(0).expect("State should exist");
        assert_eq!((state.level, state.completed), (3, 1));

        manager.advance(0, 2);
        manager.advance(0, 1);
        let state = manager.file_state(0).expect("State should exist");
        assert_eq!((state.level, state.completed, state.total), (1, 2, 2));
    }

    // Tests that completion marks the file done
    // Verified by checking the name prefix and full progress
    #[test]
    fn test_complete_file() {
        let mut manager = ProgressManager::default();
        manager.initialize(8);
        manager.start_file(0, Path::new("a.png"));
        manager.set_total(0, 6);
        manager.complete_file(0);

        let state = manager.file_state(0).expect("State should exist");
        assert_eq!(state.name, "✓ a.png");
        assert_eq!(state.completed, 6);
        manager.finish();
    }
}
