//! Plain-text dataset files.
//!
//! Format: two integers `inputs_size outputs_size`, then records of
//! `inputs_size` input values followed by `outputs_size` target values, all
//! whitespace-separated. Reading stops at the first missing, non-numeric or
//! non-finite value; an incomplete trailing record is dropped.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::dataset::dataset::Dataset;
use crate::error::{Error, Result};

pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let dataset = parse(&text)?;
    debug!(path = %path.as_ref().display(), samples = dataset.len(), "loaded dataset");
    Ok(dataset)
}

pub fn parse(text: &str) -> Result<Dataset> {
    let mut tokens = text.split_whitespace();

    let inputs_size = parse_header(tokens.next(), "inputs size")?;
    let outputs_size = parse_header(tokens.next(), "outputs size")?;
    if inputs_size == 0 || outputs_size == 0 {
        return Err(Error::Parse(format!(
            "header declares {} inputs and {} outputs; both must be positive",
            inputs_size, outputs_size
        )));
    }

    let mut values = tokens.map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()));
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    'records: loop {
        let mut record = Vec::with_capacity(inputs_size + outputs_size);
        while record.len() < inputs_size + outputs_size {
            match values.next() {
                Some(Some(v)) => record.push(v),
                Some(None) | None => {
                    if !record.is_empty() {
                        warn!(
                            values = record.len(),
                            expected = inputs_size + outputs_size,
                            "dropping incomplete trailing record"
                        );
                    }
                    break 'records;
                }
            }
        }
        outputs.push(record.split_off(inputs_size));
        inputs.push(record);
    }

    Dataset::new(inputs, outputs)
}

pub fn save<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(dataset, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// One header line, then one record per line.
pub fn write<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    writeln!(writer, "{} {}", dataset.inputs_size(), dataset.outputs_size())?;
    for (inputs, outputs) in dataset.inputs().iter().zip(dataset.outputs()) {
        let line: Vec<String> = inputs.iter().chain(outputs).map(|v| v.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

fn parse_header(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| Error::Parse(format!("missing {} in header", what)))?;
    token
        .parse::<usize>()
        .map_err(|_| Error::Parse(format!("{} '{}' is not a non-negative integer", what, token)))
}
