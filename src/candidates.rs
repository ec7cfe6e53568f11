use std::collections::HashSet;
use std::io;
use std::path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reporting;

/// A single rider which can be ranked. Only the `id` and `name` columns of the source are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id : String,
    pub name : String,
}

impl Candidate {
    /// Creates a new candidate from an id and display name.
    pub fn new(id : impl Into<String>, name : impl Into<String>) -> Self {
        Candidate {
            id : id.into(),
            name : name.into(),
        }
    }
}

/// Failure to read the list of candidates.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read the candidates: {0}")]
    Csv(#[from] csv::Error),
    #[error("the source did not list any candidates")]
    Empty,
}

/// Collection of candidates, in the same order as the source and unique by id.
#[derive(Debug, Clone, Default)]
pub struct Candidates(Vec<Candidate>);

impl Candidates {
    /// Creates a new instance of `Candidates`, keeping the first candidate for any repeated id and
    /// dropping any without an id.
    pub fn new(candidates : Vec<Candidate>) -> Self {
        let rows =
            candidates
            .into_iter()
            .map(|c| (0, c))
            .collect();

        Candidates(unique(rows, false))
    }

    /// Reads the candidates from a CSV file.
    pub fn from_file(path : &path::Path, report : bool) -> Result<Candidates, SourceError> {
        let reader =
            csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        Candidates::from_csv(reader, report)
    }

    /// Reads the candidates from any CSV source.
    pub fn from_reader<R : io::Read>(reader : R, report : bool) -> Result<Candidates, SourceError> {
        let reader =
            csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        Candidates::from_csv(reader, report)
    }

    fn from_csv<R : io::Read>(mut reader : csv::Reader<R>, report : bool) -> Result<Candidates, SourceError> {
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            // Any columns other than `id` and `name` are ignored here.
            let candidate : Candidate = record.deserialize(Some(&headers))?;
            rows.push((line, candidate));
        }

        let candidates = unique(rows, report);

        match candidates.len() {
            0 => Err(SourceError::Empty),
            _ => Ok(Candidates(candidates)),
        }
    }

    /// Gets a candidate based on their position in the source.
    pub fn get(&self, index : usize) -> Option<&Candidate> {
        self.0.get(index)
    }

    /// Creates an iterator over the candidates in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.0
    }
}

/// Keeps the first candidate for each id and drops any without one. Each candidate is paired with
/// the source line it was read from, which is only used for reporting.
fn unique(rows : Vec<(u64, Candidate)>, report : bool) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut candidates = Vec::with_capacity(rows.len());

    for (line, candidate) in rows {
        if candidate.id.is_empty() {
            reporting::invalid_candidate(line, "missing id", report);
        }
        else if !seen.insert(candidate.id.clone()) {
            reporting::invalid_candidate(line, &format!("repeated id `{}`", candidate.id), report);
        }
        else {
            candidates.push(candidate);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_id_and_name_ignoring_other_columns() {
        let source = "id,name,email\n1,Pogacar,tp@example.com\n2,Vingegaard,jv@example.com\n";
        let candidates = Candidates::from_reader(source.as_bytes(), false).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates.get(0), Some(&Candidate::new("1", "Pogacar")));
        assert_eq!(candidates.get(1), Some(&Candidate::new("2", "Vingegaard")));
    }

    #[test]
    fn trims_fields() {
        let source = "id , name\n 7 ,  Evenepoel \n";
        let candidates = Candidates::from_reader(source.as_bytes(), false).unwrap();

        assert_eq!(candidates.get(0), Some(&Candidate::new("7", "Evenepoel")));
    }

    #[test]
    fn skips_repeated_and_missing_ids() {
        let source = "id,name\n1,A\n,B\n1,C\n2,D\n";
        let candidates = Candidates::from_reader(source.as_bytes(), true).unwrap();

        let ids : Vec<_> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(candidates.get(0).unwrap().name, "A");
    }

    #[test]
    fn empty_source_is_an_error() {
        let result = Candidates::from_reader("id,name\n".as_bytes(), false);
        assert!(matches!(result, Err(SourceError::Empty)));
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let result = Candidates::from_reader("id\n1\n".as_bytes(), false);
        assert!(matches!(result, Err(SourceError::Csv(_))));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Candidates::from_file(&dir.path().join("riders.csv"), false);
        assert!(matches!(result, Err(SourceError::Csv(_))));
    }

    #[test]
    fn new_keeps_first_of_repeated_ids() {
        let candidates = Candidates::new(vec![
            Candidate::new("1", "A"),
            Candidate::new("1", "B"),
        ]);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.get(0).unwrap().name, "A");
    }

    #[test]
    fn new_and_reader_agree_on_which_rows_survive() {
        let rows = vec![
            Candidate::new("1", "A"),
            Candidate::new("", "B"),
            Candidate::new("1", "C"),
            Candidate::new("2", "D"),
        ];
        let from_rows = Candidates::new(rows);
        let from_source = Candidates::from_reader("id,name\n1,A\n,B\n1,C\n2,D\n".as_bytes(), false).unwrap();

        assert_eq!(from_rows.into_vec(), from_source.into_vec());
    }
}
