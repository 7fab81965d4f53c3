//! Archive construction
//!
//! A `protos_archive` upload is a zip of every regular file under the input
//! directory, with entry names relative to that directory. A
//! `descriptor_set` upload is the descriptor-set file's bytes as-is.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Write};
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::{ArchiveKind, Config};
use crate::error::{PublishError, Result};

/// Build the payload for the configured archive kind
pub fn build_archive(cfg: &Config) -> Result<Vec<u8>> {
    match cfg.archive_kind {
        ArchiveKind::ProtosArchive => zip_dir(&cfg.input),
        ArchiveKind::DescriptorSet => read_descriptor_set(&cfg.input),
    }
}

/// Zip every regular file under `root` into an in-memory archive
///
/// Entry names are the file's path relative to `root`, joined with `/`.
/// Directories get no entry of their own and symlinks are neither followed
/// nor archived. The walk is sorted by file name so the same tree always
/// yields entries in the same order.
///
/// # Errors
/// Returns [`PublishError::Filesystem`] if the tree cannot be walked or a
/// file cannot be read into the archive.
pub fn zip_dir(root: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let mut entries = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            PublishError::filesystem(path, io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry_name(root, path);

        let mut file = File::open(path).map_err(|e| PublishError::filesystem(path, e))?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| PublishError::filesystem(path, zip_io(e)))?;
        io::copy(&mut file, &mut writer).map_err(|e| PublishError::filesystem(path, e))?;
        debug!(entry = %name, "added file to archive");
        entries += 1;
    }

    let buf = writer
        .finish()
        .map_err(|e| PublishError::filesystem(root, zip_io(e)))?
        .into_inner();

    if entries == 0 {
        warn!(dir = %root.display(), "no files found; archive is empty");
    }
    debug!(entries, bytes = buf.len(), "zip archive built");
    Ok(buf)
}

/// Read a precompiled descriptor set verbatim
pub fn read_descriptor_set(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| PublishError::filesystem(path, e))
}

/// Write archive bytes to `path`, readable and writable by the owner only
pub fn write_archive(path: &Path, data: &[u8]) -> Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let mut file = opts.open(path).map_err(|e| PublishError::filesystem(path, e))?;
    // mode() only applies on create; tighten an existing file too
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| PublishError::filesystem(path, e))?;
    }
    file.write_all(data)
        .and_then(|_| file.flush())
        .map_err(|e| PublishError::filesystem(path, e))
}

fn entry_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn zip_io(err: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}
