use crate::error::{BagForgeError, BfResult};
use crate::export::Communities;
use crate::matrix::SimilarityMatrix;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Reads a condensed pair-score vector: either a JSON array, or numbers
/// separated by commas / whitespace (`#` starts a comment line).
pub fn load_condensed<P: AsRef<Path>>(path: P) -> BfResult<Vec<f64>> {
    let text = fs::read_to_string(path.as_ref())?;
    let values = parse_condensed(&text)?;
    info!(
        "Loaded {} pair scores from {}",
        values.len(),
        path.as_ref().display()
    );
    Ok(values)
}

pub fn parse_condensed(text: &str) -> BfResult<Vec<f64>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let v: f64 = token.parse().map_err(|_| {
                BagForgeError::Parse(format!(
                    "Invalid number '{}' on line {}",
                    token,
                    line_no + 1
                ))
            })?;
            values.push(v);
        }
    }
    Ok(values)
}

/// Reads a headerless CSV matrix, one row per line.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> BfResult<SimilarityMatrix> {
    let file = File::open(path.as_ref())?;
    let m = read_matrix(file)?;
    info!(
        "Loaded {}x{} similarity matrix from {}",
        m.len(),
        m.len(),
        path.as_ref().display()
    );
    Ok(m)
}

pub fn read_matrix<R: Read>(reader: R) -> BfResult<SimilarityMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>().map_err(|_| {
                    BagForgeError::Parse(format!(
                        "Invalid number '{}' at row {}, column {}",
                        cell, row_idx, col
                    ))
                })
            })
            .collect::<BfResult<Vec<f64>>>()?;
        rows.push(row);
    }
    debug!("Parsed {} matrix rows", rows.len());
    SimilarityMatrix::from_rows(rows)
}

pub fn save_matrix<P: AsRef<Path>>(m: &SimilarityMatrix, path: P) -> BfResult<()> {
    create_parent(path.as_ref())?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    for row in m.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    info!("Saved similarity matrix -> {}", path.as_ref().display());
    Ok(())
}

pub fn save_communities<P: AsRef<Path>>(c: &Communities, path: P) -> BfResult<()> {
    create_parent(path.as_ref())?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, c)?;
    writer.flush()?;
    info!("Saved communities -> {}", path.as_ref().display());
    Ok(())
}

pub fn load_communities<P: AsRef<Path>>(path: P) -> BfResult<Communities> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn create_parent(path: &Path) -> BfResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
