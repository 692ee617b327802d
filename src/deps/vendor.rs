//! Copying a package into the project.
//!
//! The destination is always rebuilt from scratch: any previous copy is
//! removed first so files deleted upstream do not linger.

use crate::error::{VendorError, VendorResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Replace `dest` with a recursive copy of `source`.
pub fn copy_package(source: &Path, dest: &Path) -> VendorResult<()> {
    if overlapping(source, dest) {
        return Err(VendorError::Config(format!(
            "cannot vendor {} into {}: the directories overlap",
            source.display(),
            dest.display()
        )));
    }

    match dest.symlink_metadata() {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(dest).map_err(|e| VendorError::io_at("remove", dest, e))?
        }
        Ok(_) => fs::remove_file(dest).map_err(|e| VendorError::io_at("remove", dest, e))?,
        Err(_) => {}
    }

    copy_dir_all(source, dest)
}

// Recursive copy; symlinks are recreated rather than followed.
fn copy_dir_all(src: &Path, dst: &Path) -> VendorResult<()> {
    fs::create_dir_all(dst).map_err(|e| VendorError::io_at("create", dst, e))?;
    let entries = fs::read_dir(src).map_err(|e| VendorError::io_at("read", src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| VendorError::io_at("read", src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let ty = entry
            .file_type()
            .map_err(|e| VendorError::io_at("stat", &from, e))?;

        if ty.is_dir() {
            copy_dir_all(&from, &to)?;
        } else if ty.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| VendorError::io_at("copy", &from, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> VendorResult<()> {
    let target = fs::read_link(from).map_err(|e| VendorError::io_at("read link", from, e))?;
    std::os::unix::fs::symlink(&target, to).map_err(|e| VendorError::io_at("create link", to, e))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> VendorResult<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| VendorError::io_at("copy", from, e))
}

/// True when one path contains the other.
pub fn overlapping(a: &Path, b: &Path) -> bool {
    let a = absolute(a);
    let b = absolute(b);
    a.starts_with(&b) || b.starts_with(&a)
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
