//! Zip bundles of downloaded subtitles, and content types for single files.

use sources::SubtitleFile;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::{Cursor, Write as _};
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Name of the archive produced by a bulk download.
pub const BUNDLE_FILENAME: &str = "bulk_subtitles.zip";

/// Make `name` usable as a flat archive entry and unique among `used`.
/// Repeats get ` (1)`, ` (2)` ... before the extension.
fn entry_name(name: &str, used: &mut HashSet<String>) -> String {
    let flat = name.trim().replace(['/', '\\'], "_");
    let flat = if flat.is_empty() {
        String::from("subtitle")
    } else {
        flat
    };
    if used.insert(flat.clone()) {
        return flat;
    }
    let (stem, ext) = match flat.rfind('.') {
        Some(dot) if dot > 0 => flat.split_at(dot),
        _ => (flat.as_str(), ""),
    };
    let mut counter = 1_usize;
    loop {
        let candidate = format!("{stem} ({counter}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Deflate every file into one zip, in input order.
///
/// # Errors
/// Returns a `ZipError` if an entry cannot be written.
pub fn create_archive(files: &[SubtitleFile]) -> Result<Vec<u8>, ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::new();
    for file in files {
        writer.start_file(entry_name(&file.filename, &mut used), options)?;
        writer.write_all(&file.content)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// MIME type to serve a downloaded file with. Unknown extensions are
/// assumed to be archives, which is what the sites mostly hand out.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("srt" | "ass" | "ssa" | "sub") => "text/plain; charset=utf-8",
        Some("vtt") => "text/vtt; charset=utf-8",
        _ => "application/zip",
    }
}
