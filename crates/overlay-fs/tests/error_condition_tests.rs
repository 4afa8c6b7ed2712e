//! Tests for output mutations under adverse filesystem conditions

#[cfg(unix)]
mod unix_tests {
    use overlay_fs::{Error, io};
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn copy_into_readonly_directory_is_copy_failed() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        fs::write(&src, "x").unwrap();
        let readonly = dir.path().join("readonly");
        fs::create_dir(&readonly).unwrap();
        fs::set_permissions(&readonly, Permissions::from_mode(0o555)).unwrap();

        let result = io::copy_file(&src, &readonly.join("dst.txt"));

        let _ = fs::set_permissions(&readonly, Permissions::from_mode(0o755));
        assert!(matches!(result, Err(Error::CopyFailed { .. })));
    }

    #[test]
    fn remove_from_readonly_directory_is_delete_failed() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();
        let file = parent.join("keep.txt");
        fs::write(&file, "x").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = io::remove_file(&file);

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));
        assert!(matches!(result, Err(Error::DeleteFailed { .. })));
        assert!(file.exists());
    }
}
