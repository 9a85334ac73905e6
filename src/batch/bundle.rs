//! Deflate archive of the renamed copies, plus its integrity check.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const COMPRESSION_LEVEL: i64 = 6;

/// Write every `(entry name, source path)` pair into a new archive at `path`.
/// Entry names are flat; source directories are not recorded.
pub fn write_bundle(path: &Path, entries: &[(String, PathBuf)]) -> Result<(), ZipError> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    for (name, source) in entries {
        writer.start_file(name.as_str(), options)?;
        let mut input = File::open(source)?;
        io::copy(&mut input, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

/// Reopen the archive and read every entry to the end, which checks each
/// entry's CRC. Returns the archive size in bytes.
pub fn verify_bundle(path: &Path, expected_entries: usize) -> Result<u64, String> {
    let size = fs::metadata(path)
        .map_err(|e| format!("archive missing: {}", e))?
        .len();
    if size == 0 {
        return Err("archive is empty".to_string());
    }

    let file = File::open(path).map_err(|e| format!("cannot open archive: {}", e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| format!("unreadable archive: {}", e))?;

    if archive.len() != expected_entries {
        return Err(format!(
            "expected {} entries, found {}",
            expected_entries,
            archive.len()
        ));
    }

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| format!("entry {} unreadable: {}", index, e))?;
        let name = entry.name().to_string();
        io::copy(&mut entry, &mut io::sink())
            .map_err(|e| format!("entry '{}' failed integrity check: {}", name, e))?;
    }

    Ok(size)
}
