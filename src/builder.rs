//! The build pipeline: descriptors are drawn, registered, measured and
//! compiled into a table set, which is then laid out as a font binary.
use crate::basictables::{
    compile_head, compile_hhea, compile_maxp, compile_name, compile_os2, compile_post,
};
use crate::charmap::{CharacterMap, MappingPolicy};
use crate::error::{Error, Result};
use crate::font::{ChecksumScope, SfntSerializer};
use crate::glyph::{GlyphDescriptor, GlyphRecord};
use crate::metadata::FontMetadata;
use crate::metrics::FontMetrics;
use crate::pen;
use crate::registry::{GlyphOrder, GlyphRegistry};
use crate::table_store::FontTableSet;
use crate::tables::loca::LocaFormat;
use crate::tables::{cmap, glyf, head, hhea, hmtx, loca, maxp, name, os2, post};
use log::{debug, info, warn};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How glyph offsets are stored in `loca`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocaPolicy {
    /// Short offsets when every offset allows it, long otherwise.
    #[default]
    Auto,
    /// Short offsets or a `SerializationError`.
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub loca: LocaPolicy,
    /// Store trailing glyphs that share the last advance width as bare
    /// left side bearings.
    pub compress_hmtx: bool,
    pub mapping_policy: MappingPolicy,
    pub checksum_scope: ChecksumScope,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            loca: LocaPolicy::Auto,
            compress_hmtx: true,
            mapping_policy: MappingPolicy::Lenient,
            checksum_scope: ChecksumScope::Tables,
        }
    }
}

fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    #[cfg(feature = "rayon")]
    {
        rayon::join(a, b)
    }
    #[cfg(not(feature = "rayon"))]
    {
        (a(), b())
    }
}

fn draw_one(descriptor: &GlyphDescriptor) -> Result<GlyphRecord> {
    let outline = pen::draw(&descriptor.outline).map_err(|source| Error::Geometry {
        glyph: descriptor.name.clone(),
        source,
    })?;
    Ok(GlyphRecord::new(
        descriptor.name.clone(),
        descriptor.advance_width,
        outline.contours,
    ))
}

/// Run every outline through the pen. Glyphs are independent, so this is
/// done in parallel; the results keep input order and the first failing
/// glyph in that order is the error reported.
pub fn draw_glyphs(descriptors: &[GlyphDescriptor]) -> Result<Vec<GlyphRecord>> {
    #[cfg(feature = "rayon")]
    let drawn: Vec<Result<GlyphRecord>> = descriptors.par_iter().map(draw_one).collect();
    #[cfg(not(feature = "rayon"))]
    let drawn: Vec<Result<GlyphRecord>> = descriptors.iter().map(draw_one).collect();
    drawn.into_iter().collect()
}

/// Register drawn glyphs in order and freeze the result.
pub fn register_glyphs(records: Vec<GlyphRecord>) -> Result<GlyphOrder> {
    let mut registry = GlyphRegistry::new();
    for record in records {
        registry.register(record)?;
    }
    Ok(registry.finalize()?)
}

/// Compile every table of the font from the frozen glyph order.
pub fn compile_tables(
    glyphs: &GlyphOrder,
    character_map: &CharacterMap,
    metadata: &FontMetadata,
    options: &BuildOptions,
) -> Result<FontTableSet> {
    metadata.validate()?;
    let (metrics, mapping) = join(
        || FontMetrics::from_glyphs(glyphs),
        || character_map.resolve(glyphs, options.mapping_policy),
    );
    let metrics = metrics?;
    let mapping = mapping?;
    if mapping.is_empty() {
        warn!("No code points map to glyphs; the font will not be usable for text");
    } else if mapping.len() < character_map.len() {
        info!(
            "{} of {} code points mapped",
            mapping.len(),
            character_map.len()
        );
    }

    let glyf_table = glyf::glyf::from_records(glyphs.glyphs());
    let (glyf_bytes, loca_table) = glyf_table.compile()?;
    let loca_format = match options.loca {
        LocaPolicy::Auto if loca_table.fits_short() => LocaFormat::Short,
        LocaPolicy::Auto | LocaPolicy::Long => LocaFormat::Long,
        LocaPolicy::Short => LocaFormat::Short,
    };
    let loca_bytes = loca_table.to_bytes(loca_format)?;
    debug!("glyf is {} bytes, loca {:?}", glyf_bytes.len(), loca_format);

    let hmtx_table = hmtx::hmtx {
        metrics: metrics.hmetrics.clone(),
    };
    let (hmtx_bytes, number_of_hmetrics) = hmtx_table.to_bytes(options.compress_hmtx)?;
    debug!(
        "{} full horizontal metrics for {} glyphs",
        number_of_hmetrics, metrics.num_glyphs
    );

    let mut tables = FontTableSet::new();
    tables.insert_table(head::TAG, &compile_head(metadata, &metrics, loca_format))?;
    tables.insert_table(
        hhea::TAG,
        &compile_hhea(metadata, &metrics, number_of_hmetrics),
    )?;
    tables.insert_table(maxp::TAG, &compile_maxp(&metrics))?;
    tables.insert_table(os2::TAG, &compile_os2(metadata, &metrics, &mapping)?)?;
    tables.insert(hmtx::TAG, hmtx_bytes);
    tables.insert_table(cmap::TAG, &cmap::cmap::new(mapping))?;
    tables.insert(loca::TAG, loca_bytes);
    tables.insert(glyf::TAG, glyf_bytes);
    tables.insert_table(name::TAG, &compile_name(metadata))?;
    tables.insert_table(post::TAG, &compile_post(metadata, &metrics))?;
    Ok(tables)
}

/// Build a complete font binary in memory.
pub fn build_font(
    descriptors: &[GlyphDescriptor],
    character_map: &CharacterMap,
    metadata: &FontMetadata,
    options: &BuildOptions,
) -> Result<Vec<u8>> {
    info!(
        "Building {} with {} glyphs",
        metadata.full_name(),
        descriptors.len()
    );
    let records = draw_glyphs(descriptors)?;
    let glyphs = register_glyphs(records)?;
    let tables = compile_tables(&glyphs, character_map, metadata, options)?;
    let font = SfntSerializer::new(options.checksum_scope).serialize(&tables)?;
    info!("Compiled {} tables, {} bytes", tables.len(), font.len());
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, RegistrationError, SerializationError};
    use crate::pen::{PathOp, Point};

    fn square(name: &str, size: i16) -> GlyphDescriptor {
        GlyphDescriptor::new(
            name,
            size as u16,
            vec![
                PathOp::MoveTo(Point::new(0, 0)),
                PathOp::LineTo(Point::new(0, size)),
                PathOp::LineTo(Point::new(size, size)),
                PathOp::LineTo(Point::new(size, 0)),
                PathOp::Close,
            ],
        )
    }

    #[test]
    fn first_geometry_error_in_input_order() {
        let descriptors = vec![
            square(".notdef", 500),
            GlyphDescriptor::new("a", 100, vec![PathOp::Close]),
            GlyphDescriptor::new("b", 100, vec![PathOp::MoveTo(Point::new(0, 0))]),
        ];
        match draw_glyphs(&descriptors).unwrap_err() {
            Error::Geometry { glyph, source } => {
                assert_eq!(glyph, "a");
                assert!(matches!(source, GeometryError::NoOpenContour { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn tables_present_in_order() {
        let descriptors = vec![square("a", 400), square(".notdef", 500)];
        let glyphs = register_glyphs(draw_glyphs(&descriptors).unwrap()).unwrap();
        assert_eq!(glyphs.glyph_id(".notdef"), Some(0));
        let cmap: CharacterMap = vec![('a', "a")].into_iter().collect();
        let tables = compile_tables(
            &glyphs,
            &cmap,
            &FontMetadata::new("Forge"),
            &BuildOptions::default(),
        )
        .unwrap();
        let tags: Vec<String> = tables.tags().map(|t| t.to_string()).collect();
        assert_eq!(
            tags,
            vec!["OS/2", "cmap", "glyf", "head", "hhea", "hmtx", "loca", "maxp", "name", "post"]
        );
        assert_eq!(tables.head().unwrap().indexToLocFormat, 0);
    }

    #[test]
    fn duplicate_glyph_fails_registration() {
        let descriptors = vec![square(".notdef", 500), square("a", 10), square("a", 20)];
        let err = build_font(
            &descriptors,
            &CharacterMap::new(),
            &FontMetadata::new("Forge"),
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Registration(RegistrationError::DuplicateName(ref n)) if n == "a"
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn strict_mapping_rejects_unknown_glyph() {
        let cmap: CharacterMap = vec![('x', "missing")].into_iter().collect();
        let options = BuildOptions {
            mapping_policy: MappingPolicy::Strict,
            ..Default::default()
        };
        let err = build_font(
            &[square(".notdef", 500)],
            &cmap,
            &FontMetadata::new("Forge"),
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
    }

    #[test]
    fn invalid_metadata_rejected() {
        let err = build_font(
            &[square(".notdef", 500)],
            &CharacterMap::new(),
            &FontMetadata::default(),
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Serialization(SerializationError::Metadata(_))
        ));
    }

    #[test]
    fn long_loca_on_request() {
        let options = BuildOptions {
            loca: LocaPolicy::Long,
            ..Default::default()
        };
        let font = build_font(
            &[square(".notdef", 500)],
            &CharacterMap::new(),
            &FontMetadata::new("Forge"),
            &options,
        )
        .unwrap();
        let tables = FontTableSet::from_sfnt(&font).unwrap();
        assert_eq!(tables.head().unwrap().indexToLocFormat, 1);
        assert_eq!(tables.get(loca::TAG).map(|l| l.len()), Some(8));
    }
}
