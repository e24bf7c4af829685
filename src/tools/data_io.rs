use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use super::cli::{HuffOpts, Output};
use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;

/// Read a whole input file into memory.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    let data = fs::read(path)?;
    debug!("Read {} bytes from {}.", data.len(), path);
    Ok(data)
}

/// Send finished output to stdout or to the file opts name for `input`. An existing file is
/// only replaced when forced. Returns where the data went.
pub fn write_output(opts: &HuffOpts, input: &str, data: &[u8]) -> Result<String> {
    if opts.output == Output::Stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(data)?;
        handle.flush()?;
        return Ok("stdout".to_string());
    }

    let fname = opts.output_name(input);
    let mut f_out = OpenOptions::new()
        .write(true)
        .create(opts.force_overwrite)
        .create_new(!opts.force_overwrite)
        .truncate(true)
        .open(&fname)?;
    f_out.write_all(data)?;
    info!("Wrote {} bytes to {}.", data.len(), fname);
    Ok(fname)
}

/// Print the code table when asked to. Goes to stderr when stdout carries the data.
pub fn show_code_table(opts: &HuffOpts, table: &CodeTable) {
    if !opts.print_codes {
        return;
    }
    match opts.output {
        Output::Stdout => eprint!("{}", table),
        Output::File => print!("{}", table),
    }
}
