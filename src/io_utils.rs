//! CSV reading/writing helpers: delimiter and encoding resolution, reader
//! construction, and an atomic output writer.
//!
//! Output goes through [`AtomicCsvWriter`], which writes to a sibling `.tmp`
//! file and renames it into place on commit. An aborted run therefore never
//! leaves a partially cleaned file at the destination.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: &Path, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    Ok(builder.from_reader(reader))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

/// CSV writer that stages output in a temp file and renames on commit.
///
/// The temp file lives in the destination directory so the final rename is a
/// same-filesystem move. Dropping the writer without committing removes the
/// temp file.
pub struct AtomicCsvWriter {
    writer: Option<csv::Writer<BufWriter<File>>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    committed: bool,
}

impl AtomicCsvWriter {
    pub fn create(path: &Path, delimiter: u8) -> Result<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("Output path {path:?} has no file name"))?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);
        let file = File::create(&temp_path)
            .with_context(|| format!("Creating temporary output file {temp_path:?}"))?;
        // Callers write the header row explicitly, so it is present even for
        // an empty table; serialize must not emit a second one.
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(delimiter)
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .double_quote(true);
        Ok(Self {
            writer: Some(builder.from_writer(BufWriter::new(file))),
            temp_path,
            final_path: path.to_path_buf(),
            committed: false,
        })
    }

    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .as_mut()
            .expect("writer is present until commit")
            .write_record(record)
            .context("Writing output record")
    }

    pub fn serialize<S: Serialize>(&mut self, record: S) -> Result<()> {
        self.writer
            .as_mut()
            .expect("writer is present until commit")
            .serialize(record)
            .context("Serializing output record")
    }

    pub fn commit(mut self) -> Result<()> {
        let mut writer = self.writer.take().expect("writer is present until commit");
        writer.flush().context("Flushing output writer")?;
        drop(writer);
        fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "Renaming {temp:?} to {dest:?}",
                temp = self.temp_path,
                dest = self.final_path
            )
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for AtomicCsvWriter {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.writer.take());
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}
