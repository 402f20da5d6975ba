//! CSV serialization of scraped records
//!
//! The file starts with a UTF-8 byte-order mark so spreadsheet tools detect
//! the encoding of the Chinese headers and values.

use crate::output::OutputResult;
use crate::record::{Field, Record};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes all records to `output_path`, replacing any existing file
///
/// The header row lists the field captions in column order, followed by one
/// row per record in the order given.
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_records(records: &[Record], output_path: &Path) -> OutputResult<usize> {
    let file = File::create(output_path)?;
    let written = write_records_to(records, BufWriter::new(file))?;
    Ok(written)
}

/// Writes the BOM, header and records to any writer
pub fn write_records_to<W: Write>(records: &[Record], mut writer: W) -> OutputResult<usize> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(Field::labels())?;

    for record in records {
        csv_writer.write_record(record.values())?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}
