use glyphforge::font::{checksum, read_directory, verify, CHECKSUM_MAGIC};
use glyphforge::glyph::ContourPoint;
use glyphforge::tables::{cmap, head, hhea, loca, maxp};
use glyphforge::*;
use pretty_assertions::assert_eq;
use std::num::Wrapping;

fn rect(x0: i16, y0: i16, x1: i16, y1: i16, clockwise: bool) -> Vec<PathOp> {
    let mut corners = vec![
        Point::new(x0, y0),
        Point::new(x0, y1),
        Point::new(x1, y1),
        Point::new(x1, y0),
    ];
    if !clockwise {
        corners[1..].reverse();
    }
    let mut ops = vec![PathOp::MoveTo(corners[0])];
    ops.extend(corners[1..].iter().map(|p| PathOp::LineTo(*p)));
    ops.push(PathOp::Close);
    ops
}

fn frame_notdef() -> GlyphDescriptor {
    let mut outline = rect(0, 0, 500, 500, true);
    outline.extend(rect(50, 50, 450, 450, false));
    GlyphDescriptor::new(".notdef", 500, outline)
}

fn space() -> GlyphDescriptor {
    GlyphDescriptor::new("space", 300, vec![])
}

fn space_map() -> CharacterMap {
    vec![(' ', "space")].into_iter().collect()
}

fn build(descriptors: &[GlyphDescriptor], cmap: &CharacterMap) -> Vec<u8> {
    let _ = env_logger::builder().is_test(true).try_init();
    build_font(
        descriptors,
        cmap,
        &FontMetadata::new("Forge"),
        &BuildOptions::default(),
    )
    .unwrap()
}

#[test]
fn notdef_and_space() {
    let font = build(&[frame_notdef(), space()], &space_map());
    let tables = FontTableSet::from_sfnt(&font).unwrap();

    let maxp: maxp::maxp = tables.decode(maxp::TAG).unwrap();
    assert_eq!(maxp.numGlyphs, 2);
    assert_eq!(maxp.maxContours, 2);
    assert_eq!(maxp.maxPoints, 8);

    let cmap: cmap::cmap = tables.decode(cmap::TAG).unwrap();
    for subtable in &cmap.subtables {
        assert_eq!(subtable.mapping.get(&0x20), Some(&1));
    }

    let loca = tables.loca().unwrap();
    assert_eq!(loca.indices.len(), 3);
    assert!(loca.indices[0] < loca.indices[1]);
    assert_eq!(loca.indices[1], loca.indices[2]);

    let glyf = tables.glyf().unwrap();
    assert_eq!(glyf.glyphs.len(), 2);
    assert_eq!(glyf.glyphs[0].contours.len(), 2);
    assert!(glyf.glyphs[1].is_empty());
}

#[test]
fn quadratic_run_is_split() {
    let curve = GlyphDescriptor::new(
        "curve",
        100,
        vec![
            PathOp::MoveTo(Point::new(0, 0)),
            PathOp::QuadTo {
                controls: vec![Point::new(50, 50), Point::new(100, 50)],
                end: Point::new(100, 0),
            },
            PathOp::Close,
        ],
    );
    let font = build(&[frame_notdef(), curve], &CharacterMap::new());
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    let glyph = &tables.glyf().unwrap().glyphs[1];
    assert_eq!(
        glyph.contours,
        vec![vec![
            ContourPoint::on(0, 0),
            ContourPoint::off(50, 50),
            ContourPoint::on(75, 50),
            ContourPoint::off(100, 50),
            ContourPoint::on(100, 0),
        ]]
    );
    assert_eq!(
        (glyph.xMin, glyph.yMin, glyph.xMax, glyph.yMax),
        (0, 0, 100, 50)
    );
}

#[test]
fn duplicate_name_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dupe.ttf");
    let err = build_font_file(
        &path,
        &[frame_notdef(), space(), space()],
        &space_map(),
        &FontMetadata::new("Forge"),
        &BuildOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Registration(_)));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn table_checksums_balance() {
    let font = build(&[frame_notdef(), space()], &space_map());
    let (header, records) = read_directory(&font).unwrap();
    assert_eq!(header.numTables, 10);
    assert_eq!((header.searchRange, header.entrySelector, header.rangeShift), (128, 3, 32));

    let mut total = Wrapping(0u32);
    let mut adjustment = 0;
    for record in &records {
        let start = record.offset as usize;
        assert_eq!(start % 4, 0);
        let mut data = font[start..start + record.length as usize].to_vec();
        if record.tag == head::TAG {
            adjustment = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
            data[8..12].fill(0);
        }
        assert_eq!(checksum(&data), record.checksum);
        total += Wrapping(record.checksum);
    }
    assert_eq!((total + Wrapping(adjustment)).0, CHECKSUM_MAGIC);
}

#[test]
fn whole_file_checksum_on_request() {
    let options = BuildOptions {
        checksum_scope: ChecksumScope::WholeFont,
        ..Default::default()
    };
    let font = build_font(
        &[frame_notdef(), space()],
        &space_map(),
        &FontMetadata::new("Forge"),
        &options,
    )
    .unwrap();
    assert_eq!(checksum(&font), CHECKSUM_MAGIC);
    assert!(verify(&font, ChecksumScope::WholeFont).is_ok());
}

#[test]
fn outlines_survive_compilation() {
    let descriptors = vec![frame_notdef(), space()];
    let font = build(&descriptors, &space_map());
    let glyf = FontTableSet::from_sfnt(&font).unwrap().glyf().unwrap();
    for (descriptor, glyph) in descriptors.iter().zip(&glyf.glyphs) {
        let ops = descriptor
            .outline
            .iter()
            .filter(|op| matches!(op, PathOp::Close))
            .count();
        assert_eq!(glyph.contours.len(), ops);
        for contour in &glyph.contours {
            assert!(contour.iter().all(|p| p.on_curve));
            assert_eq!(contour.len(), 4);
        }
    }
}

#[test]
fn trailing_widths_share_a_record() {
    let descriptors = vec![
        frame_notdef(),
        GlyphDescriptor::new("a", 300, vec![]),
        GlyphDescriptor::new("b", 300, vec![]),
        GlyphDescriptor::new("c", 300, vec![]),
    ];
    let font = build(&descriptors, &CharacterMap::new());
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    let hhea: hhea::hhea = tables.decode(hhea::TAG).unwrap();
    assert_eq!(hhea.numberOfHMetrics, 2);
    let hmtx = tables.hmtx().unwrap();
    let widths: Vec<u16> = hmtx.metrics.iter().map(|m| m.advanceWidth).collect();
    assert_eq!(widths, vec![500, 300, 300, 300]);
}

#[test]
fn unknown_glyph_is_dropped_from_cmap() {
    let mut map = space_map();
    map.insert('x', "missing");
    let font = build(&[frame_notdef(), space()], &map);
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    let cmap: cmap::cmap = tables.decode(cmap::TAG).unwrap();
    let mapping = &cmap.subtables[0].mapping;
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get(&('x' as u32)), None);
}

#[test]
fn short_loca_halves_offsets() {
    let font = build(&[frame_notdef(), space()], &space_map());
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    assert_eq!(tables.head().unwrap().indexToLocFormat, 0);
    let raw = tables.get(loca::TAG).unwrap();
    assert_eq!(raw.len(), 6);
    let end = u16::from_be_bytes([raw[4], raw[5]]) as usize;
    assert_eq!(end * 2, tables.get(glyphforge::tables::glyf::TAG).unwrap().len());
}

#[test]
fn source_file_to_font_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forge.json");
    std::fs::write(
        &input,
        r#"{
            "metadata": {"familyName": "Forge", "styleName": "Bold"},
            "glyphs": [{"name": "space", "advanceWidth": 250}],
            "characterMap": {"U+0020": "space"}
        }"#,
    )
    .unwrap();
    let mut source = FontSource::load(&input).unwrap();
    assert!(source.add_notdef());
    let output = dir.path().join("forge.ttf");
    build_font_file(
        &output,
        &source.glyphs,
        &source.character_map,
        &source.metadata,
        &BuildOptions::default(),
    )
    .unwrap();
    let font = std::fs::read(&output).unwrap();
    verify(&font, ChecksumScope::Tables).unwrap();
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    assert_eq!(tables.head().unwrap().macStyle, head::MAC_STYLE_BOLD);
}

fn zigzag(name: String) -> GlyphDescriptor {
    let mut outline = vec![PathOp::MoveTo(Point::new(0, 0))];
    outline.extend((1..400).map(|i: i16| {
        let x = if i % 2 == 1 { 1000 } else { 0 };
        PathOp::LineTo(Point::new(x, i * 2))
    }));
    outline.push(PathOp::Close);
    GlyphDescriptor::new(name, 1000, outline)
}

fn heavy_font() -> Vec<GlyphDescriptor> {
    let mut descriptors = vec![frame_notdef()];
    descriptors.extend((0..150).map(|i| zigzag(format!("g{}", i))));
    descriptors
}

#[test]
fn large_glyf_switches_to_long_loca() {
    let font = build(&heavy_font(), &CharacterMap::new());
    let tables = FontTableSet::from_sfnt(&font).unwrap();
    assert!(tables.get(glyphforge::tables::glyf::TAG).unwrap().len() > 131070);
    assert_eq!(tables.head().unwrap().indexToLocFormat, 1);
    assert_eq!(tables.get(loca::TAG).unwrap().len(), 152 * 4);
    assert_eq!(tables.glyf().unwrap().glyphs[150].contours[0].len(), 400);
}

#[test]
fn short_loca_overflow_is_an_error() {
    let options = BuildOptions {
        loca: LocaPolicy::Short,
        ..Default::default()
    };
    let err = build_font(
        &heavy_font(),
        &CharacterMap::new(),
        &FontMetadata::new("Forge"),
        &options,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Serialization(glyphforge::error::SerializationError::ShortLocaOverflow(end))
            if end > 131070
    ));
}

#[test]
fn builds_are_reproducible() {
    let descriptors = heavy_font();
    let mut map = space_map();
    map.insert('A', "g0");
    map.insert('B', "g1");
    let first = build(&descriptors, &map);
    let second = build(&descriptors, &map);
    assert!(first == second);
}
