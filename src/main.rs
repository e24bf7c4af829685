//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huffpack::compression::{
    compress::{compress_file, write_code_table_file},
    decompress::decompress_file,
};
use huffpack::tools::cli::{huffopts_init, Mode};

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The options narrow this down.
    // Logs go to stderr so they never mix with data sent to stdout.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let opts = huffopts_init();
    if opts.files.is_empty() {
        error!("No input files given. Try --help.");
        std::process::exit(2);
    }
    if opts.output_path.is_some() && opts.files.len() > 1 {
        error!("--output can only be used with a single input file.");
        std::process::exit(2);
    }

    //----- Figure how what we need to do and go do it
    let result = match opts.op_mode {
        Mode::Encode => compress_file(&opts),
        Mode::Decode => decompress_file(&opts),
        Mode::CodeTable => write_code_table_file(&opts),
    };

    match result {
        Ok(()) => info!("Done.\n"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
