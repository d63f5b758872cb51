//! Append-only training log in JSON Lines format.
//!
//! Each logged generation is one line:
//!
//! ```text
//! {"generation":0,"fitness":[0.4,0.33,...],"parameters":[[0.12,-0.8,...],...]}
//! ```
//!
//! `fitness` is sorted best first and `parameters[i]` belongs to the individual whose
//! fitness is `fitness[i]`. Every record is flushed as soon as it is written, so an
//! interrupted run keeps all the generations logged so far.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingLogError {
    #[display("I/O error on the training log")]
    Io(io::Error),
    #[display("malformed training log record on line {line}")]
    #[from(ignore)]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

/// Snapshot of one sorted generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub fitness: Vec<f32>,
    pub parameters: Vec<Vec<f32>>,
}

impl GenerationRecord {
    /// Fitness of the best individual.
    #[must_use]
    pub fn best_fitness(&self) -> Option<f32> {
        self.fitness.first().copied()
    }

    /// Parameters of the best individual.
    #[must_use]
    pub fn best_parameters(&self) -> Option<&[f32]> {
        self.parameters.first().map(Vec::as_slice)
    }
}

/// Writes [`GenerationRecord`]s, one JSON document per line.
#[derive(Debug)]
pub struct TrainingLogWriter<W> {
    writer: W,
}

impl TrainingLogWriter<BufWriter<File>> {
    /// Creates (or truncates) a log file.
    pub fn create<P>(path: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W> TrainingLogWriter<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, record: &GenerationRecord) -> Result<(), TrainingLogError> {
        serde_json::to_writer(&mut self.writer, record).map_err(io::Error::from)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// A training log loaded back into memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingLog {
    records: Vec<GenerationRecord>,
}

impl TrainingLog {
    pub fn open<P>(path: P) -> Result<Self, TrainingLogError>
    where
        P: AsRef<Path>,
    {
        Self::read(BufReader::new(File::open(path)?))
    }

    /// Parses a log; blank lines are skipped.
    pub fn read<R>(reader: R) -> Result<Self, TrainingLogError>
    where
        R: BufRead,
    {
        let mut records = vec![];
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| TrainingLogError::Json {
                line: index + 1,
                source,
            })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Sorted fitness vectors, one per logged generation.
    pub fn fitness_history(&self) -> impl Iterator<Item = &[f32]> {
        self.records.iter().map(|r| r.fitness.as_slice())
    }

    /// Population parameters, one matrix per logged generation.
    pub fn parameter_history(&self) -> impl Iterator<Item = &[Vec<f32>]> {
        self.records.iter().map(|r| r.parameters.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn record(generation: usize) -> GenerationRecord {
        GenerationRecord {
            generation,
            fitness: vec![0.5, 0.25, 0.0],
            parameters: vec![vec![0.1, -0.2], vec![0.3, 0.4], vec![-1.0, 1.0]],
        }
    }

    #[test]
    fn test_roundtrip() {
        let mut writer = TrainingLogWriter::new(Vec::new());
        writer.write(&record(0)).unwrap();
        writer.write(&record(5)).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 2);

        let log = TrainingLog::read(Cursor::new(bytes)).unwrap();
        assert_eq!(log.records(), &[record(0), record(5)]);
        assert_eq!(log.fitness_history().count(), 2);
        assert_eq!(log.parameter_history().next().unwrap().len(), 3);
        assert_eq!(log.records()[1].best_fitness(), Some(0.5));
        assert_eq!(log.records()[1].best_parameters(), Some(&[0.1, -0.2][..]));
    }

    #[test]
    fn test_malformed_line() {
        let input = "{\"generation\":0,\"fitness\":[],\"parameters\":[]}\n\nnot json\n";
        let err = TrainingLog::read(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, TrainingLogError::Json { line: 3, .. }));
    }

    #[test]
    fn test_empty_log() {
        let log = TrainingLog::read(Cursor::new("")).unwrap();
        assert!(log.records().is_empty());
    }
}
