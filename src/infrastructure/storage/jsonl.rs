//! Line-delimited persistence for search results.

use crate::domain::entities::record::Record;
use crate::domain::error::DomainError;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn create(path: &Path) -> Result<BufWriter<File>, DomainError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// One JSON object per line. Parent directories are created.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), DomainError> {
    let mut out = create(path)?;
    for record in records {
        serde_json::to_writer(&mut out, record)
            .map_err(|e| DomainError::Io(format!("{}: {e}", path.display())))?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<Record>, DomainError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)
            .map_err(|e| DomainError::Io(format!("{}:{}: {e}", path.display(), n + 1)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), DomainError> {
    let mut out = create(path)?;
    for line in lines {
        out.write_all(line.as_ref().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_lines(path: &Path) -> Result<Vec<String>, DomainError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
