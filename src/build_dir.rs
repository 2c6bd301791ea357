//! Build-directory filesystem gate.
//!
//! Every destination path in the build output goes through
//! [`BuildDirectory::prepare_file`], which creates missing parent
//! directories and refuses to hand out a path that already exists. Any
//! filename collision between two images — usually a latent bug in ID
//! derivation — becomes an immediate build failure instead of a silent
//! overwrite.
//!
//! In dry-run mode nothing is written and the collision check is skipped
//! (there is nothing on disk to collide with), but path resolution and
//! directory layout proceed identically.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::urls::UrlPath;

#[derive(Error, Debug)]
pub enum BuildDirError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("destination already exists, probably a duplicate output: \"{}\"", .0.display())]
    DestinationExists(PathBuf),
}

/// Root of the build output plus the flags that change how files land in it.
#[derive(Debug)]
pub struct BuildDirectory {
    root: PathBuf,
    fast: bool,
    dry_run: bool,
}

impl BuildDirectory {
    pub fn new(root: impl Into<PathBuf>, fast: bool, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            fast,
            dry_run,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Delete the entire build directory.
    pub fn clean(&self) -> Result<(), BuildDirError> {
        if !self.dry_run && self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Ensure `dir_path` (relative) exists under the root; return its
    /// absolute path.
    pub fn prepare_directory(&self, dir_path: &Path) -> Result<PathBuf, BuildDirError> {
        debug_assert!(dir_path.is_relative());
        let path = self.root.join(dir_path);
        if !self.dry_run {
            std::fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    /// Resolve a relative file path under the root, creating its parent
    /// directory. Fails if the destination file already exists.
    pub fn prepare_file(&self, file_path: &Path) -> Result<PathBuf, BuildDirError> {
        debug_assert!(file_path.is_relative());
        let parent = file_path.parent().unwrap_or(Path::new(""));
        let abs_dir = self.prepare_directory(parent)?;
        let abs_file = abs_dir.join(file_path.file_name().unwrap_or_default());
        if !self.dry_run && abs_file.exists() {
            return Err(BuildDirError::DestinationExists(abs_file));
        }
        Ok(abs_file)
    }

    /// Publish a file that is a plain copy of `source_path` at `url`.
    ///
    /// Fast mode symlinks instead of copying — iteration speed over a
    /// self-contained output tree.
    pub fn build_file(&self, source_path: &Path, url: &UrlPath) -> Result<PathBuf, BuildDirError> {
        let dest = self.prepare_file(&url.fs_path())?;
        if self.dry_run {
            return Ok(dest);
        }
        if self.fast {
            let source = if source_path.is_absolute() {
                source_path.to_path_buf()
            } else {
                source_path.canonicalize()?
            };
            symlink_file(&source, &dest)?;
        } else {
            std::fs::copy(source_path, &dest)?;
        }
        Ok(dest)
    }

    /// Absolute filesystem location of a URL within the build directory.
    pub fn resolve_url(&self, url: &UrlPath) -> PathBuf {
        self.root.join(url.fs_path())
    }
}

#[cfg(unix)]
fn symlink_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(not(unix))]
fn symlink_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    // No portable symlink for regular files; fall back to a copy.
    std::fs::copy(source, dest).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prepare_file_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let dir = BuildDirectory::new(tmp.path().join("out"), false, false);

        let path = dir
            .prepare_file(Path::new("asset/image/banner/hero.jpg"))
            .unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn prepare_file_rejects_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let dir = BuildDirectory::new(tmp.path().join("out"), false, false);

        let path = dir.prepare_file(Path::new("asset/hero.jpg")).unwrap();
        std::fs::write(&path, b"first").unwrap();

        let err = dir.prepare_file(Path::new("asset/hero.jpg")).unwrap_err();
        assert!(matches!(err, BuildDirError::DestinationExists(_)));
        // First write is intact.
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn dry_run_writes_nothing_and_skips_collision_check() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let dir = BuildDirectory::new(&out, false, true);

        let path = dir.prepare_file(Path::new("asset/hero.jpg")).unwrap();
        assert_eq!(path, out.join("asset/hero.jpg"));
        assert!(!out.exists());

        // Same path twice is fine in dry-run mode.
        dir.prepare_file(Path::new("asset/hero.jpg")).unwrap();
    }

    #[test]
    fn build_file_copies_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        std::fs::write(&source, b"pixels").unwrap();
        let dir = BuildDirectory::new(tmp.path().join("out"), false, false);

        let url = UrlPath::new("/asset/image/hero.jpg");
        let dest = dir.build_file(&source, &url).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"pixels");
        assert_eq!(dest, dir.resolve_url(&url));
    }

    #[cfg(unix)]
    #[test]
    fn build_file_symlinks_in_fast_mode() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        std::fs::write(&source, b"pixels").unwrap();
        let dir = BuildDirectory::new(tmp.path().join("out"), true, false);

        let dest = dir
            .build_file(&source, &UrlPath::new("/asset/hero.jpg"))
            .unwrap();
        assert!(dest.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn build_file_twice_collides() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        std::fs::write(&source, b"pixels").unwrap();
        let dir = BuildDirectory::new(tmp.path().join("out"), false, false);

        let url = UrlPath::new("/asset/hero.jpg");
        dir.build_file(&source, &url).unwrap();
        assert!(matches!(
            dir.build_file(&source, &url),
            Err(BuildDirError::DestinationExists(_))
        ));
    }

    #[test]
    fn clean_removes_root() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let dir = BuildDirectory::new(&out, false, false);
        dir.prepare_directory(Path::new("asset")).unwrap();
        assert!(out.exists());

        dir.clean().unwrap();
        assert!(!out.exists());
    }
}
