//! Keeps `tests/unit` a mirror of `src` and every test file non-empty

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    /// Harness roots wire modules together and hold shared fixtures
    const HARNESS_ROOTS: [&str; 2] = ["unit/main.rs", "meta/coverage.rs"];

    /// Relative paths of every `.rs` file and directory below `dir`
    fn mirror_paths(dir: &Path, base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(io::Error::other)?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.extend(mirror_paths(&path, base)?);
                paths.insert(relative);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                paths.insert(relative);
            }
        }

        Ok(paths)
    }

    fn is_wiring(path: &str) -> bool {
        path == "main.rs" || path == "lib.rs" || path.ends_with("mod.rs")
    }

    // Tests that every source file has a unit test file at the same path
    // Verified by adding a source file without a test counterpart
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src = mirror_paths(Path::new("src"), Path::new("src")).unwrap_or_default();
        let unit = mirror_paths(Path::new("tests/unit"), Path::new("tests/unit")).unwrap_or_default();
        assert!(!src.is_empty(), "src directory should not be empty");

        let missing: Vec<String> = src
            .iter()
            .filter(|path| !is_wiring(path) && !unit.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Tests that every unit test file mirrors an existing source file
    // Verified by leaving a test file behind after deleting its source
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src = mirror_paths(Path::new("src"), Path::new("src")).unwrap_or_default();
        let unit = mirror_paths(Path::new("tests/unit"), Path::new("tests/unit")).unwrap_or_default();

        let orphaned: Vec<String> = unit
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src.contains(*path))
            .map(|path| format!("  - tests/unit/{path} (no src/{path})"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source counterpart:\n{}",
            orphaned.join("\n")
        );
    }

    // Tests that every test file declares at least one test
    // Verified by removing the only test from a unit test file
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests = mirror_paths(Path::new("tests"), Path::new("tests")).unwrap_or_default();

        let empty: Vec<String> = tests
            .iter()
            .filter(|path| {
                Path::new(path).extension().is_some_and(|ext| ext == "rs")
                    && !path.ends_with("mod.rs")
                    && !HARNESS_ROOTS.contains(&path.as_str())
            })
            .filter(|path| {
                fs::read_to_string(Path::new("tests").join(path))
                    .is_ok_and(|content| !content.contains("#[test]"))
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
