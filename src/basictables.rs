//! Assembly of the fixed-layout tables from metadata and glyph metrics.
use crate::error::SerializationError;
use crate::metadata::FontMetadata;
use crate::metrics::FontMetrics;
use crate::tables::head;
use crate::tables::hhea::hhea;
use crate::tables::loca::LocaFormat;
use crate::tables::maxp::maxp;
use crate::tables::name::{name, NameRecordID};
use crate::tables::os2::{self, FsSelection};
use crate::tables::post::post;
use otspec::types::*;
use std::collections::BTreeMap;

/// `value * per_mille / 1000`, rounded half away from zero.
fn scale(value: i32, per_mille: i32) -> i16 {
    let product = value * per_mille;
    let rounded = if product >= 0 {
        (product + 500) / 1000
    } else {
        (product - 500) / 1000
    };
    rounded as i16
}

pub fn compile_head(
    info: &FontMetadata,
    metrics: &FontMetrics,
    loca_format: LocaFormat,
) -> head::head {
    head::new(
        info.font_revision(),
        info.units_per_em,
        metrics.bounds,
        info.created(),
        info.modified(),
        info.mac_style(),
        loca_format,
    )
}

pub fn compile_hhea(
    info: &FontMetadata,
    metrics: &FontMetrics,
    number_of_hmetrics: uint16,
) -> hhea {
    hhea::new(
        info.ascender,
        info.descender,
        info.line_gap,
        metrics,
        number_of_hmetrics,
    )
}

pub fn compile_maxp(metrics: &FontMetrics) -> maxp {
    maxp::new10(metrics.num_glyphs, metrics.max_points, metrics.max_contours)
}

pub fn compile_post(info: &FontMetadata, metrics: &FontMetrics) -> post {
    post::new(info.units_per_em, metrics.is_fixed_pitch)
}

fn get_selection(info: &FontMetadata) -> FsSelection {
    let mut selection = FsSelection::USE_TYPO_METRICS;
    if info.is_bold() {
        selection |= FsSelection::BOLD;
    }
    if info.is_italic() {
        selection |= FsSelection::ITALIC;
    }
    if !info.is_bold() && !info.is_italic() {
        selection |= FsSelection::REGULAR;
    }
    selection
}

pub fn compile_os2(
    info: &FontMetadata,
    metrics: &FontMetrics,
    mapping: &BTreeMap<u32, u16>,
) -> Result<os2::os2, SerializationError> {
    let upm = i32::from(info.units_per_em);
    let [range1, range2, range3, range4] = os2::calc_unicode_ranges(mapping.keys());
    let [page1, page2] = os2::calc_code_page_ranges(mapping);
    let clamp_bmp = |cp: &u32| (*cp).min(0xFFFF) as uint16;
    let win_ascent = i32::from(info.ascender).max(i32::from(metrics.bounds.y_max));
    let win_descent = (-i32::from(info.descender)).max(-i32::from(metrics.bounds.y_min));

    Ok(os2::os2 {
        version: 4,
        xAvgCharWidth: metrics.avg_char_width,
        usWeightClass: info.weight_class,
        usWidthClass: info.width_class,
        fsType: info.fs_type,
        ySubscriptXSize: scale(upm, 650),
        ySubscriptYSize: scale(upm, 600),
        ySubscriptXOffset: 0,
        ySubscriptYOffset: scale(upm, 75),
        ySuperscriptXSize: scale(upm, 650),
        ySuperscriptYSize: scale(upm, 600),
        ySuperscriptXOffset: 0,
        ySuperscriptYOffset: scale(upm, 350),
        yStrikeoutSize: compile_post(info, metrics).underlineThickness,
        yStrikeoutPosition: scale(i32::from(info.x_height), 220),
        sFamilyClass: 0,
        panose: [0; 10],
        ulUnicodeRange1: range1,
        ulUnicodeRange2: range2,
        ulUnicodeRange3: range3,
        ulUnicodeRange4: range4,
        achVendID: info.vendor_tag()?,
        fsSelection: get_selection(info).bits(),
        usFirstCharIndex: mapping.keys().next().map_or(0, clamp_bmp),
        usLastCharIndex: mapping.keys().next_back().map_or(0, clamp_bmp),
        sTypoAscender: info.ascender,
        sTypoDescender: info.descender,
        sTypoLineGap: info.line_gap,
        // both are at most 32768, from i16 inputs
        usWinAscent: win_ascent.max(0) as uint16,
        usWinDescent: win_descent.max(0) as uint16,
        ulCodePageRange1: page1,
        ulCodePageRange2: page2,
        sxHeight: info.x_height,
        sCapHeight: info.cap_height,
        usDefaultChar: 0,
        usBreakChar: 0x20,
        usMaxContext: 0,
    })
}

pub fn compile_name(info: &FontMetadata) -> name {
    let mut records: Vec<(NameRecordID, String)> = vec![];
    if let Some(copyright) = &info.copyright {
        records.push((NameRecordID::Copyright, copyright.to_string()));
    }
    records.extend(vec![
        (NameRecordID::FontFamilyName, info.family_name.clone()),
        (NameRecordID::FontSubfamilyName, info.style_name.clone()),
        (NameRecordID::UniqueID, info.unique_identifier()),
        (NameRecordID::FullFontName, info.full_name()),
        (NameRecordID::Version, info.version_string.clone()),
        (NameRecordID::PostscriptName, info.postscript_name()),
    ]);
    for (id, field) in &[
        (NameRecordID::Manufacturer, &info.manufacturer),
        (NameRecordID::Designer, &info.designer),
    ] {
        if let Some(value) = field {
            records.push((*id, value.to_string()));
        }
    }
    name::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::BoundingBox;
    use crate::tables::hmtx::Metric;
    use crate::tables::name::{PLATFORM_MACINTOSH, PLATFORM_WINDOWS};

    fn metrics() -> FontMetrics {
        FontMetrics {
            hmetrics: vec![Metric {
                advanceWidth: 500,
                lsb: 50,
            }],
            bounds: BoundingBox {
                x_min: 50,
                y_min: -250,
                x_max: 450,
                y_max: 950,
            },
            num_glyphs: 1,
            max_points: 8,
            max_contours: 2,
            advance_width_max: 500,
            min_left_side_bearing: 50,
            min_right_side_bearing: 50,
            x_max_extent: 450,
            avg_char_width: 500,
            is_fixed_pitch: true,
        }
    }

    #[test]
    fn scale_rounds_half_away() {
        assert_eq!(scale(1000, 75), 75);
        assert_eq!(scale(2048, 75), 154);
        assert_eq!(scale(-1000, 75), -75);
        assert_eq!(scale(10, 50), 1);
    }

    #[test]
    fn os2_from_metadata() {
        let mut info = FontMetadata::new("Forge");
        info.style_name = "Bold".to_string();
        let mapping: BTreeMap<u32, u16> = vec![(0x41, 1), (0x1F600, 2)].into_iter().collect();
        let table = compile_os2(&info, &metrics(), &mapping).unwrap();
        assert_eq!(table.usWeightClass, 400);
        assert_eq!(table.usWinAscent, 950);
        assert_eq!(table.usWinDescent, 250);
        assert_eq!(table.usFirstCharIndex, 0x41);
        assert_eq!(table.usLastCharIndex, 0xFFFF);
        assert_eq!(table.yStrikeoutSize, 50);
        assert_eq!(table.yStrikeoutPosition, 110);
        assert_eq!(
            table.fsSelection,
            (FsSelection::BOLD | FsSelection::USE_TYPO_METRICS).bits()
        );
        assert_eq!(table.ulUnicodeRange1, 1);
        assert_eq!(table.ulUnicodeRange2, 1 << (57 - 32));
    }

    #[test]
    fn regular_selection() {
        let info = FontMetadata::new("Forge");
        let selection = get_selection(&info);
        assert!(selection.contains(FsSelection::REGULAR));
        assert!(!selection.contains(FsSelection::BOLD));
    }

    #[test]
    fn required_names_present() {
        let mut info = FontMetadata::new("Forge Sans");
        info.designer = Some("A. Person".to_string());
        let table = compile_name(&info);
        for platform in &[PLATFORM_MACINTOSH, PLATFORM_WINDOWS] {
            assert_eq!(table.get(*platform, NameRecordID::FontFamilyName), Some("Forge Sans"));
            assert_eq!(table.get(*platform, NameRecordID::FontSubfamilyName), Some("Regular"));
            assert_eq!(
                table.get(*platform, NameRecordID::UniqueID),
                Some("Forge Sans-Regular")
            );
            assert_eq!(
                table.get(*platform, NameRecordID::FullFontName),
                Some("Forge Sans Regular")
            );
            assert_eq!(table.get(*platform, NameRecordID::Version), Some("Version 1.0"));
            assert_eq!(
                table.get(*platform, NameRecordID::PostscriptName),
                Some("ForgeSans-Regular")
            );
            assert_eq!(table.get(*platform, NameRecordID::Designer), Some("A. Person"));
        }
        assert_eq!(table.get(PLATFORM_WINDOWS, NameRecordID::Copyright), None);
        assert_eq!(table.records.len(), 14);
    }

    #[test]
    fn head_takes_global_box() {
        let info = FontMetadata::new("Forge");
        let table = compile_head(&info, &metrics(), LocaFormat::Long);
        assert_eq!(table.yMin, -250);
        assert_eq!(table.indexToLocFormat, 1);
        assert_eq!(table.created, LONGDATETIME(0));
        assert_eq!(table.fontRevision, Fixed::from_integer(1));
    }
}
