use clap::{App, Arg, ArgMatches};
use glyphforge::{
    build_font_file, BuildOptions, ChecksumScope, FontSource, LocaPolicy, MappingPolicy,
};
use log::{error, info};

fn read_args() -> ArgMatches<'static> {
    App::new("glyphforge")
        .about("Builds a TrueType font from a JSON glyph source")
        .arg(
            Arg::with_name("INPUT")
                .help("The JSON font source")
                .required(true),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Where to write the font")
                .required(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more (repeat for debug output)"),
        )
        .arg(
            Arg::with_name("add-notdef")
                .long("add-notdef")
                .help("Synthesize a .notdef glyph if the source has none"),
        )
        .arg(
            Arg::with_name("loca")
                .long("loca")
                .takes_value(true)
                .possible_values(&["auto", "short", "long"])
                .default_value("auto")
                .help("Glyph offset format"),
        )
        .arg(
            Arg::with_name("no-hmtx-compression")
                .long("no-hmtx-compression")
                .help("Write a full metric record for every glyph"),
        )
        .arg(
            Arg::with_name("strict-cmap")
                .long("strict-cmap")
                .help("Fail if a code point maps to a glyph that does not exist"),
        )
        .arg(
            Arg::with_name("whole-font-checksum")
                .long("whole-font-checksum")
                .help("Balance checksumAdjustment over the whole file"),
        )
        .get_matches()
}

fn build_options(matches: &ArgMatches) -> BuildOptions {
    BuildOptions {
        loca: match matches.value_of("loca") {
            Some("short") => LocaPolicy::Short,
            Some("long") => LocaPolicy::Long,
            _ => LocaPolicy::Auto,
        },
        compress_hmtx: !matches.is_present("no-hmtx-compression"),
        mapping_policy: if matches.is_present("strict-cmap") {
            MappingPolicy::Strict
        } else {
            MappingPolicy::Lenient
        },
        checksum_scope: if matches.is_present("whole-font-checksum") {
            ChecksumScope::WholeFont
        } else {
            ChecksumScope::Tables
        },
    }
}

fn run(matches: &ArgMatches) -> glyphforge::Result<()> {
    // both are required arguments
    let input = matches.value_of("INPUT").unwrap_or_default();
    let output = matches.value_of("OUTPUT").unwrap_or_default();
    let mut source = FontSource::load(input)?;
    if matches.is_present("add-notdef") && source.add_notdef() {
        info!("Added a synthesized .notdef");
    }
    build_font_file(
        output,
        &source.glyphs,
        &source.character_map,
        &source.metadata,
        &build_options(matches),
    )
}

fn main() {
    let matches = read_args();
    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    );
    if let Err(e) = run(&matches) {
        error!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
