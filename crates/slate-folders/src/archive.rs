//! Folder ⇄ archive conversion: a tar stream through a zstd encoder.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

const COMPRESSION_LEVEL: i32 = 3;

/// Compress the contents of `dir` into a single archive file at `dest`.
///
/// The archive is written to a `.tmp` sibling and renamed into place, so a
/// torn write never leaves a half-written file under the final name. `dir`
/// itself is left untouched; the caller removes it once this returns.
pub(crate) fn pack_dir(dir: &Path, dest: &Path) -> io::Result<()> {
    let tmp = tmp_path(dest);
    let result = write_archive(dir, &tmp).and_then(|()| fs::rename(&tmp, dest));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_archive(dir: &Path, dest: &Path) -> io::Result<()> {
    let file = File::create(dest)?;
    let encoder = zstd::Encoder::new(file, COMPRESSION_LEVEL)?;
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", dir)?;
    let encoder = builder.into_inner()?;
    let file = encoder.finish()?;
    file.sync_all()
}

/// Extract an archive produced by [`pack_dir`] into a fresh `dest` folder.
///
/// `dest` must not exist. A failed extraction removes the partial folder
/// so the archive stays the sole representation.
pub(crate) fn unpack_dir(archive: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(archive)?;
    let decoder = zstd::Decoder::new(file)?;
    let mut reader = tar::Archive::new(decoder);

    fs::create_dir(dest)?;
    let result = reader.unpack(dest);
    if result.is_err() {
        let _ = fs::remove_dir_all(dest);
    }
    result
}

fn tmp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_restores_contents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("plate.exr"), b"frame data").unwrap();
        fs::create_dir(src.join("renders")).unwrap();
        fs::write(src.join("renders").join("v001.png"), b"pixels").unwrap();

        let archive = dir.path().join("src.tar.zst");
        pack_dir(&src, &archive).unwrap();
        assert!(archive.is_file());

        let out = dir.path().join("out");
        unpack_dir(&archive, &out).unwrap();
        assert_eq!(fs::read(out.join("plate.exr")).unwrap(), b"frame data");
        assert_eq!(
            fs::read(out.join("renders").join("v001.png")).unwrap(),
            b"pixels"
        );
    }

    #[test]
    fn pack_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a"), b"x").unwrap();

        let archive = dir.path().join("src.tar.zst");
        pack_dir(&src, &archive).unwrap();
        assert!(!tmp_path(&archive).exists());
    }

    #[test]
    fn unpack_requires_fresh_dest() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a"), b"x").unwrap();
        let archive = dir.path().join("src.tar.zst");
        pack_dir(&src, &archive).unwrap();

        // `src` still exists, so extracting over it must fail.
        assert!(unpack_dir(&archive, &src).is_err());
    }
}
