use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use atty::Stream;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use flate2::read::GzDecoder;

use crate::error::Result;
use crate::record::FromCsv;

// Open the benchmark output. "-" is stdin; compressed sweeps are decoded by extension.
pub fn open_input(path: &Path, verbosity: u8) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        if verbosity > 2 { eprintln!("reading stdin"); }
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let rdr = BufReader::new(File::open(path)?);
    match ext.as_str() {
        "gz" | "tgz" => {
            if verbosity > 2 { eprintln!("opening gzip file {}", path.display()); }
            Ok(Box::new(GzDecoder::new(rdr)))
        }
        "zst" | "zstd" => {
            if verbosity > 2 { eprintln!("opening zstd file {}", path.display()); }
            Ok(Box::new(zstd::stream::read::Decoder::new(rdr)?))
        }
        _ => {
            if verbosity > 2 { eprintln!("opening plain file {}", path.display()); }
            Ok(Box::new(rdr))
        }
    }
}

// Harness output has no header, may pad fields with blanks and never quotes numbers.
pub fn create_csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::All);
    builder
}

/// Lazily parse each row of `input` as a `T`, tagging failures with the input line.
pub fn read_records<T, R>(input: R, verbosity: u8) -> impl Iterator<Item = Result<T>>
where
    T: FromCsv + std::fmt::Debug,
    R: Read,
{
    create_csv_builder()
        .from_reader(input)
        .into_records()
        .map(move |rec| -> Result<T> {
            let rec = rec?;
            let line = rec.position().map(|p| p.line()).unwrap_or(0);
            let parsed = T::from_csv(&rec, line)?;
            if verbosity >= 3 {
                eprintln!("DBG:  {:?}  from line {}", &parsed, line);
            }
            Ok(parsed)
        })
}

pub fn report_error(err: &dyn std::error::Error) {
    if atty::is(Stream::Stderr) {
        eprintln!("{}error:{} {}", SetForegroundColor(Color::Red), ResetColor, err);
    } else {
        eprintln!("error: {}", err);
    }
}
