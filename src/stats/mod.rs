/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// stats module
//
// compartment totals recorded after every timestep
//
////////////////////////////////////////////////////////////////////////////////////

use crate::error::Result;
use crate::world::InfectionStatus;
use csv::{Writer, WriterBuilder};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Receives the population wide compartment counts once per timestep.
pub trait OutputSink {
    fn write(&mut self, time: f64, counts: &BTreeMap<InfectionStatus, usize>) -> Result<()>;
}

// one csv row, columns in status order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompartmentRecord {
    pub time: f64,
    #[serde(rename = "Susceptible")]
    pub susceptible: usize,
    #[serde(rename = "Exposed")]
    pub exposed: usize,
    #[serde(rename = "InfectASympt")]
    pub infect_asympt: usize,
    #[serde(rename = "InfectMild")]
    pub infect_mild: usize,
    #[serde(rename = "InfectGP")]
    pub infect_gp: usize,
    #[serde(rename = "InfectHosp")]
    pub infect_hosp: usize,
    #[serde(rename = "InfectICU")]
    pub infect_icu: usize,
    #[serde(rename = "InfectICURecov")]
    pub infect_icu_recov: usize,
    #[serde(rename = "Recovered")]
    pub recovered: usize,
    #[serde(rename = "Dead")]
    pub dead: usize,
}

impl CompartmentRecord {
    pub fn new(time: f64, counts: &BTreeMap<InfectionStatus, usize>) -> CompartmentRecord {
        let count = |status| counts.get(&status).copied().unwrap_or(0);
        CompartmentRecord {
            time,
            susceptible: count(InfectionStatus::Susceptible),
            exposed: count(InfectionStatus::Exposed),
            infect_asympt: count(InfectionStatus::InfectASympt),
            infect_mild: count(InfectionStatus::InfectMild),
            infect_gp: count(InfectionStatus::InfectGP),
            infect_hosp: count(InfectionStatus::InfectHosp),
            infect_icu: count(InfectionStatus::InfectICU),
            infect_icu_recov: count(InfectionStatus::InfectICURecov),
            recovered: count(InfectionStatus::Recovered),
            dead: count(InfectionStatus::Dead),
        }
    }

    pub fn total(&self) -> usize {
        self.susceptible
            + self.exposed
            + self.infect_asympt
            + self.infect_mild
            + self.infect_gp
            + self.infect_hosp
            + self.infect_icu
            + self.infect_icu_recov
            + self.recovered
            + self.dead
    }
}

// Csv writer ------------------------------------------------------------------------------------------------
pub struct CsvCompartmentWriter {
    writer: Writer<File>,
}

impl CsvCompartmentWriter {
    /// Creates (or truncates) the file. The header goes out with the first row.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<CsvCompartmentWriter> {
        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;
        debug!("writing compartments to {}", path.as_ref().display());
        Ok(CsvCompartmentWriter { writer })
    }
}

impl OutputSink for CsvCompartmentWriter {
    fn write(&mut self, time: f64, counts: &BTreeMap<InfectionStatus, usize>) -> Result<()> {
        self.writer.serialize(CompartmentRecord::new(time, counts))?;
        self.writer.flush()?;
        Ok(())
    }
}

// In memory -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<CompartmentRecord>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, time: f64, counts: &BTreeMap<InfectionStatus, usize>) -> Result<()> {
        self.records.push(CompartmentRecord::new(time, counts));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn counts() -> BTreeMap<InfectionStatus, usize> {
        let mut counts: BTreeMap<InfectionStatus, usize> =
            InfectionStatus::ALL.iter().map(|s| (*s, 0)).collect();
        counts.insert(InfectionStatus::Susceptible, 8);
        counts.insert(InfectionStatus::InfectMild, 2);
        counts
    }

    #[test]
    fn csv_has_header_then_one_row_per_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.csv");
        {
            let mut writer = CsvCompartmentWriter::new(&path).unwrap();
            writer.write(0.0, &counts()).unwrap();
            writer.write(1.0, &counts()).unwrap();
        }
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "time,Susceptible,Exposed,InfectASympt,InfectMild,InfectGP,InfectHosp,InfectICU,InfectICURecov,Recovered,Dead"
        );
        assert_eq!(lines[1], "0.0,8,0,0,2,0,0,0,0,0,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("output.csv");
        assert!(CsvCompartmentWriter::new(&path).is_err());
    }

    #[test]
    fn memory_sink_keeps_records() {
        let mut sink = MemorySink::new();
        sink.write(3.0, &counts()).unwrap();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].total(), 10);
        assert_eq!(sink.records[0].infect_mild, 2);
    }
}
