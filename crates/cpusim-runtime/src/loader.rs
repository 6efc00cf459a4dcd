use crate::error::RuntimeError;
use cpusim_core::{Pid, ProcessRecord, Tick};
use log::{info, trace};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const FIELDS: usize = 5;

/// Reads process files of the form `id|arrival|burst_length|burst_count|io_length`.
pub struct ProcessLoader;

impl ProcessLoader {
    pub fn load(path: &Path) -> Result<Vec<ProcessRecord>, RuntimeError> {
        let text = fs::read_to_string(path)?;
        let records = Self::parse(&text)?;
        info!("loaded {} processes from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn parse(text: &str) -> Result<Vec<ProcessRecord>, RuntimeError> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                trace!("skipping line {}", line);
                continue;
            }

            let record = Self::parse_line(line, content)?;
            if !seen.insert(record.id().clone()) {
                return Err(RuntimeError::parse(
                    line,
                    format!("duplicate process id {}", record.id()),
                ));
            }
            records.push(record);
        }

        Ok(records)
    }

    fn parse_line(line: usize, content: &str) -> Result<ProcessRecord, RuntimeError> {
        let fields: Vec<&str> = content.split('|').map(str::trim).collect();
        if fields.len() != FIELDS {
            return Err(RuntimeError::parse(
                line,
                format!("expected {} fields, found {}", FIELDS, fields.len()),
            ));
        }

        let number = |name: &str, field: &str| -> Result<Tick, RuntimeError> {
            field
                .parse::<Tick>()
                .map_err(|e| RuntimeError::parse(line, format!("{} {:?}: {}", name, field, e)))
        };

        let arrival = number("arrival", fields[1])?;
        let burst_length = number("burst length", fields[2])?;
        let burst_count = fields[3]
            .parse::<u32>()
            .map_err(|e| RuntimeError::parse(line, format!("burst count {:?}: {}", fields[3], e)))?;
        let io_length = number("I/O length", fields[4])?;

        ProcessRecord::new(
            Pid::from(fields[0]),
            arrival,
            burst_length,
            burst_count,
            io_length,
        )
        .map_err(|e| RuntimeError::parse(line, e))
    }
}
