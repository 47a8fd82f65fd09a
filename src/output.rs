use crate::builder::{build_font, BuildOptions};
use crate::charmap::CharacterMap;
use crate::error::{Error, Result};
use crate::glyph::GlyphDescriptor;
use crate::metadata::FontMetadata;
use log::info;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `bytes` to `path` atomically: the data goes to a temporary file
/// beside the destination, which is then renamed over it.
pub fn write_font(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Build the font and write it to `path`. Nothing touches the file system
/// unless the build succeeds.
pub fn build_font_file(
    path: impl AsRef<Path>,
    descriptors: &[GlyphDescriptor],
    character_map: &CharacterMap,
    metadata: &FontMetadata,
    options: &BuildOptions,
) -> Result<()> {
    let bytes = build_font(descriptors, character_map, metadata, options)?;
    write_font(path, &bytes)
}
