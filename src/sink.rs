use std::fs;
use std::io;
use std::io::{Read, Seek, Write};
use std::path;

use serde::Serialize;
use thiserror::Error;

use crate::candidates::{Candidate, Candidates};

/// Receives a complete, ordered selection.
pub trait Sink {
    fn submit(&mut self, selection : &[Candidate]) -> Result<(), SubmissionError>;
}

impl<S : Sink + ?Sized> Sink for Box<S> {
    fn submit(&mut self, selection : &[Candidate]) -> Result<(), SubmissionError> {
        (**self).submit(selection)
    }
}

/// Reasons a sink did not accept a selection.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("could not write the submission: {0}")]
    Io(#[from] io::Error),
    #[error("could not write the submission: {0}")]
    Csv(#[from] csv::Error),
    #[error("the ballot file lists different candidates to the ones being ranked")]
    RosterMismatch,
    #[error("the submission was rejected: {0}")]
    Rejected(String),
}

/// Appends each submission as a ballot to a CSV file. The header lists every candidate id and
/// each row holds the rank given to the candidate in that column, left empty when unranked.
#[derive(Debug, Clone)]
pub struct BallotFileSink {
    path : path::PathBuf,
    roster : Vec<String>,
}

impl BallotFileSink {
    /// Creates a sink for ballots over all of `candidates`, in source order.
    pub fn new(path : impl Into<path::PathBuf>, candidates : &Candidates) -> Self {
        BallotFileSink {
            path : path.into(),
            roster : candidates.iter().map(|c| c.id.clone()).collect(),
        }
    }

    /// Converts a selection into a row indexed by candidate, holding the 1-based rank.
    fn ballot_row(&self, selection : &[Candidate]) -> Result<Vec<String>, SubmissionError> {
        let mut row = vec![String::new(); self.roster.len()];

        for (rank, candidate) in selection.iter().enumerate() {
            let column =
                self.roster
                .iter()
                .position(|id| id == &candidate.id)
                .ok_or_else(|| SubmissionError::Rejected(format!("`{}` is not on the ballot", candidate.id)))?;

            row[column] = (rank + 1).to_string();
        }

        Ok(row)
    }

    /// Whether the ballot file has yet to be started.
    fn is_new(&self) -> Result<bool, SubmissionError> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(error) => Err(error.into()),
        }
    }

    /// Whether the last byte of an existing ballot file ends a record.
    fn ends_with_newline(&self) -> Result<bool, SubmissionError> {
        let mut file = fs::File::open(&self.path)?;
        file.seek(io::SeekFrom::End(-1))?;

        let mut last = [0; 1];
        file.read_exact(&mut last)?;

        Ok(last[0] == b'\n')
    }

    /// Checks that an existing ballot file was started for the same candidates.
    fn check_header(&self) -> Result<(), SubmissionError> {
        let mut reader =
            csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?;

        match headers.iter().eq(self.roster.iter().map(String::as_str)) {
            true => Ok(()),
            false => Err(SubmissionError::RosterMismatch),
        }
    }
}

impl Sink for BallotFileSink {
    fn submit(&mut self, selection : &[Candidate]) -> Result<(), SubmissionError> {
        let row = self.ballot_row(selection)?;

        let new = self.is_new()?;
        let terminated = match new {
            true => true,
            false => {
                self.check_header()?;
                self.ends_with_newline()?
            },
        };

        let mut file =
            fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Otherwise the row would be glued onto the last record.
        if !terminated {
            file.write_all(b"\n")?;
        }

        let mut writer =
            csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if new {
            writer.write_record(&self.roster)?;
        }
        writer.write_record(&row)?;
        writer.flush()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct RankedEntry<'a> {
    rank : usize,
    id : &'a str,
    name : &'a str,
}

/// Writes each submission as `rank,id,name` records, with the header written once.
pub struct RankingWriter<W : io::Write> {
    writer : csv::Writer<W>,
}

impl<W : io::Write> RankingWriter<W> {
    pub fn new(writer : W) -> Self {
        RankingWriter {
            writer : csv::Writer::from_writer(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SubmissionError> {
        self.writer
        .into_inner()
        .map_err(|e| SubmissionError::Io(e.into_error()))
    }
}

impl<W : io::Write> Sink for RankingWriter<W> {
    fn submit(&mut self, selection : &[Candidate]) -> Result<(), SubmissionError> {
        for (rank, candidate) in selection.iter().enumerate() {
            self.writer.serialize(RankedEntry {
                rank : rank + 1,
                id : &candidate.id,
                name : &candidate.name,
            })?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Candidates {
        Candidates::new(vec![
            Candidate::new("1", "A"),
            Candidate::new("2", "B"),
            Candidate::new("3", "C"),
            Candidate::new("4", "D"),
            Candidate::new("5", "E"),
            Candidate::new("6", "F"),
        ])
    }

    fn ranked(ids : &[&str]) -> Vec<Candidate> {
        ids.iter().map(|id| Candidate::new(*id, "")).collect()
    }

    #[test]
    fn ballot_file_starts_with_roster_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        let mut sink = BallotFileSink::new(&path, &roster());

        sink.submit(&ranked(&["3", "1", "6", "2", "4"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1,2,3,4,5,6\n2,4,1,5,,3\n");
    }

    #[test]
    fn ballot_file_appends_later_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        let mut sink = BallotFileSink::new(&path, &roster());

        sink.submit(&ranked(&["1", "2", "3", "4", "5"])).unwrap();
        sink.submit(&ranked(&["6", "5", "4", "3", "2"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1,2,3,4,5,6\n1,2,3,4,5,\n,5,4,3,2,1\n");
    }

    #[test]
    fn ballot_file_without_final_newline_keeps_records_apart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        fs::write(&path, "1,2,3,4,5,6\n,,1,2,3,4").unwrap();
        let mut sink = BallotFileSink::new(&path, &roster());

        sink.submit(&ranked(&["1", "2", "3", "4", "5"])).unwrap();
        sink.submit(&ranked(&["6", "5", "4", "3", "2"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1,2,3,4,5,6\n,,1,2,3,4\n1,2,3,4,5,\n,5,4,3,2,1\n");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 6);
        assert_eq!(reader.records().count(), 3);
    }

    #[test]
    fn header_only_ballot_file_without_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        fs::write(&path, "1,2,3,4,5,6").unwrap();
        let mut sink = BallotFileSink::new(&path, &roster());

        sink.submit(&ranked(&["1", "2", "3", "4", "5"])).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1,2,3,4,5,6\n1,2,3,4,5,\n");
    }

    #[test]
    fn empty_ballot_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        fs::write(&path, "").unwrap();
        let mut sink = BallotFileSink::new(&path, &roster());

        sink.submit(&ranked(&["1", "2", "3", "4", "5"])).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("1,2,3,4,5,6\n"));
    }

    #[test]
    fn ballot_file_for_other_candidates_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        fs::write(&path, "1,2,3\n1,2,3\n").unwrap();
        let mut sink = BallotFileSink::new(&path, &roster());

        let result = sink.submit(&ranked(&["1", "2", "3", "4", "5"]));

        assert!(matches!(result, Err(SubmissionError::RosterMismatch)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,2,3\n1,2,3\n");
    }

    #[test]
    fn unknown_candidate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        let mut sink = BallotFileSink::new(&path, &roster());

        let result = sink.submit(&ranked(&["1", "2", "3", "4", "99"]));

        assert!(matches!(result, Err(SubmissionError::Rejected(_))));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_ballot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = BallotFileSink::new(dir.path().join("missing").join("ballots.csv"), &roster());

        let result = sink.submit(&ranked(&["1", "2", "3", "4", "5"]));

        assert!(matches!(result, Err(SubmissionError::Io(_))));
    }

    #[test]
    fn ranking_writer_writes_rank_id_and_name() {
        let mut sink = RankingWriter::new(Vec::new());
        sink.submit(&[Candidate::new("7", "Pogacar"), Candidate::new("3", "Van Aert")]).unwrap();

        let written = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(written, "rank,id,name\n1,7,Pogacar\n2,3,Van Aert\n");
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink : Box<dyn Sink> = Box::new(RankingWriter::new(io::sink()));
        assert!(sink.submit(&ranked(&["1"])).is_ok());
    }
}
