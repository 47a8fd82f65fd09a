#![allow(non_camel_case_types, non_snake_case, clippy::upper_case_acronyms)]
//! Compile declarative glyph outlines into TrueType font binaries.
//!
//! Glyphs are described as a name, an advance width and a list of
//! [`PathOp`]s. The pipeline draws each outline into TrueType contours,
//! registers the glyphs with `.notdef` first, computes metrics, resolves
//! the character map and serializes the `head`, `hhea`, `maxp`, `OS/2`,
//! `hmtx`, `cmap`, `loca`, `glyf`, `name` and `post` tables into a single
//! sfnt file whose checksums balance.
//!
//! ```
//! use glyphforge::{build_font, BuildOptions, CharacterMap, FontMetadata, GlyphDescriptor};
//! use glyphforge::{PathOp, Point};
//!
//! let notdef = GlyphDescriptor::new(
//!     ".notdef",
//!     500,
//!     vec![
//!         PathOp::MoveTo(Point::new(50, 0)),
//!         PathOp::LineTo(Point::new(50, 700)),
//!         PathOp::LineTo(Point::new(450, 700)),
//!         PathOp::LineTo(Point::new(450, 0)),
//!         PathOp::Close,
//!     ],
//! );
//! let space = GlyphDescriptor::new("space", 300, vec![]);
//! let cmap: CharacterMap = vec![(' ', "space")].into_iter().collect();
//! let font = build_font(
//!     &[notdef, space],
//!     &cmap,
//!     &FontMetadata::new("Example"),
//!     &BuildOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(&font[..4], &[0, 1, 0, 0]);
//! ```

mod basictables;
pub mod builder;
pub mod charmap;
pub mod error;
pub mod font;
pub mod glyph;
pub mod metadata;
pub mod metrics;
pub mod notdef;
pub mod output;
pub mod pen;
pub mod registry;
pub mod source;
pub mod table_store;
/// Binary layouts of the individual OpenType tables
pub mod tables;

pub use crate::builder::{build_font, BuildOptions, LocaPolicy};
pub use crate::charmap::{CharacterMap, MappingPolicy};
pub use crate::error::{Error, Result};
pub use crate::font::{ChecksumScope, SfntSerializer};
pub use crate::glyph::{GlyphDescriptor, GlyphRecord};
pub use crate::metadata::FontMetadata;
pub use crate::output::{build_font_file, write_font};
pub use crate::pen::{PathOp, Point};
pub use crate::registry::{GlyphOrder, GlyphRegistry};
pub use crate::source::FontSource;
pub use crate::table_store::FontTableSet;
