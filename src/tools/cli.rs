use clap::Parser;
use log::info;
use std::{fmt::Display, fmt::Formatter};

use crate::compression::header::HeaderLayout;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Off,
            Verbosity::Errors => log::LevelFilter::Error,
            Verbosity::Warnings => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Encode, Decode, CodeTable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
    /// Write only the header of what encoding would produce.
    CodeTable,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Encode/Decode/CodeTable
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Explicit output file name, only valid with a single input file
    pub output_path: Option<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// How codes are stored in the header when encoding
    pub layout: HeaderLayout,
    /// Print the code table to stdout after encoding or decoding
    pub print_codes: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            op_mode: Mode::Encode,
            output: Output::File,
            output_path: None,
            force_overwrite: false,
            layout: HeaderLayout::Auto,
            print_codes: false,
            verbose: Verbosity::Errors,
        }
    }

    /// Name of the file written for `input`: the override if one was given, otherwise the
    /// input name with a mode suffix.
    pub fn output_name(&self, input: &str) -> String {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let suffix = match self.op_mode {
            Mode::Encode => "-encoded",
            Mode::Decode => "-decoded",
            Mode::CodeTable => "-codetable",
        };
        format!("{}{}", input, suffix)
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Byte oriented Huffman compressor",
    long_about = None)]
pub struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Encode the input files (default)
    #[clap(short = 'z', long = "encode", conflicts_with_all = &["decode", "codetable"])]
    encode: bool,

    /// Decode the input files
    #[clap(short = 'd', long = "decode", conflicts_with = "codetable")]
    decode: bool,

    /// Write only the code table header of each input file
    #[clap(short = 't', long = "codetable")]
    codetable: bool,

    /// Write output to this file instead of <input>-encoded / -decoded / -codetable
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    ///Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Header layout: auto, packed or explicit
    #[clap(long = "layout", default_value = "auto")]
    layout: HeaderLayout,

    /// Print the code table after encoding or decoding
    #[clap(short = 'p', long = "print-codes")]
    print_codes: bool,

    /// Suppress everything but the output
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Sets verbosity. -v shows warnings, -vvvv is chatty
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,
}

impl From<Args> for HuffOpts {
    /// Copy command line stuff from clap's structure into our internal one
    fn from(args: Args) -> Self {
        let mut opts = HuffOpts::new();
        opts.files = args.files;
        if args.encode {
            opts.op_mode = Mode::Encode
        };
        if args.decode {
            opts.op_mode = Mode::Decode
        };
        if args.codetable {
            opts.op_mode = Mode::CodeTable
        };
        if args.stdout {
            opts.output = Output::Stdout
        };
        opts.output_path = args.output;
        opts.force_overwrite = args.force;
        opts.layout = args.layout;
        opts.print_codes = args.print_codes;
        opts.verbose = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Errors,
            (false, 1) => Verbosity::Warnings,
            (false, 2) => Verbosity::Info,
            (false, 3) => Verbosity::Debug,
            _ => Verbosity::Trace,
        };
        opts
    }
}

/// Parse the process arguments, set the log level and report the settings.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.level_filter());

    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Output sent to {}", opts.output);
    info!("Header layout set to {}", opts.layout);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}
