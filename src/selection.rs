use thiserror::Error;

use crate::candidates::{Candidate, Candidates};
use crate::sink::{Sink, SubmissionError};

/// Number of candidates a submitted selection must hold, and the most it may ever hold.
pub const SELECTION_SIZE : usize = 5;

/// Where the selection is in the submission process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Reasons a change to, or check of, the selection was refused. None of these change any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no available candidate has the id `{0}`")]
    CandidateNotFound(String),
    #[error("you can only select up to {capacity} candidates")]
    SelectionFull { capacity : usize },
    #[error("please select exactly {required} candidates ({actual} selected)")]
    InvalidSelectionSize { required : usize, actual : usize },
    #[error("there is no selected candidate at rank {} (only {len} selected)", .position + 1)]
    PositionOutOfRange { position : usize, len : usize },
    #[error("no selected candidate has the id `{0}`")]
    NotSelected(String),
}

/// Failure of a submission, either before or after reaching the sink.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] SelectionError),
    #[error(transparent)]
    Sink(#[from] SubmissionError),
}

/// Splits candidates between those still available and the ranked selection, where the order
/// within the selection expresses preference (position 0 is rank 1). Every candidate is in
/// exactly one of the two.
#[derive(Debug, Clone, Default)]
pub struct RankedSelection {
    roster : Vec<Candidate>,
    available : Vec<Candidate>,
    selected : Vec<Candidate>,
    status : SubmissionStatus,
}

impl RankedSelection {
    /// Creates a selection with every candidate available and nothing selected.
    pub fn new(candidates : Candidates) -> Self {
        let roster = candidates.into_vec();

        RankedSelection {
            available : roster.clone(),
            roster,
            selected : Vec::with_capacity(SELECTION_SIZE),
            status : SubmissionStatus::Idle,
        }
    }

    /// Every candidate, picked or not, in source order.
    pub fn roster(&self) -> &[Candidate] {
        &self.roster
    }

    /// Rank of a candidate in the selection, starting at 1.
    pub fn rank_of(&self, id : &str) -> Option<usize> {
        self.selected.iter().position(|c| c.id == id).map(|p| p + 1)
    }

    pub fn available(&self) -> &[Candidate] {
        &self.available
    }

    /// The selected candidates in order of preference.
    pub fn selected(&self) -> &[Candidate] {
        &self.selected
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Moves the candidate with the given id from the available pool to the bottom of the
    /// selection, returning the position it took.
    pub fn pick(&mut self, id : &str) -> Result<usize, SelectionError> {
        if self.selected.len() >= SELECTION_SIZE {
            return Err(SelectionError::SelectionFull { capacity : SELECTION_SIZE });
        }

        // A selected id has already left the pool, so this also refuses duplicates.
        let index =
            self.available
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SelectionError::CandidateNotFound(id.to_string()))?;

        let candidate = self.available.remove(index);
        self.selected.push(candidate);
        self.changed();

        Ok(self.selected.len() - 1)
    }

    /// Moves the selected candidate at `source` to `destination`, shifting those in between.
    /// A missing destination is a cancelled move and changes nothing.
    pub fn reorder(&mut self, source : usize, destination : Option<usize>) -> Result<(), SelectionError> {
        let destination = match destination {
            Some(destination) => destination,
            None => return Ok(()),
        };

        let len = self.selected.len();
        for position in [source, destination] {
            if position >= len {
                return Err(SelectionError::PositionOutOfRange { position, len });
            }
        }

        if source != destination {
            let candidate = self.selected.remove(source);
            self.selected.insert(destination, candidate);
            self.changed();
        }

        Ok(())
    }

    /// Returns a selected candidate to the end of the available pool. Candidates ranked below it
    /// each move up one place.
    pub fn unpick(&mut self, id : &str) -> Result<Candidate, SelectionError> {
        let index =
            self.selected
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SelectionError::NotSelected(id.to_string()))?;

        let candidate = self.selected.remove(index);
        self.available.push(candidate.clone());
        self.changed();

        Ok(candidate)
    }

    /// Available candidates whose name or id contains `query`, ignoring case, in pool order.
    pub fn search(&self, query : &str) -> Vec<&Candidate> {
        let query = query.trim().to_lowercase();

        self.available
        .iter()
        .filter(|c| {
            query.is_empty()
            || c.name.to_lowercase().contains(&query)
            || c.id.to_lowercase().contains(&query)
        })
        .collect()
    }

    /// Checks that the selection is complete.
    pub fn validate(&self) -> Result<(), SelectionError> {
        match self.selected.len() {
            SELECTION_SIZE => Ok(()),
            actual => Err(SelectionError::InvalidSelectionSize { required : SELECTION_SIZE, actual }),
        }
    }

    /// Hands the ordered selection to `sink` if it is complete. The selection itself is never
    /// changed by submitting, so a failed submission can be retried.
    pub fn submit<S : Sink + ?Sized>(&mut self, sink : &mut S) -> Result<(), SubmitError> {
        if let Err(error) = self.validate() {
            self.status = SubmissionStatus::Idle;
            return Err(error.into());
        }

        self.status = SubmissionStatus::Submitting;

        match sink.submit(&self.selected) {
            Ok(()) => {
                self.status = SubmissionStatus::Succeeded;
                Ok(())
            },
            Err(error) => {
                self.status = SubmissionStatus::Failed;
                Err(error.into())
            },
        }
    }

    /// An outcome only describes the selection that was submitted.
    fn changed(&mut self) {
        self.status = SubmissionStatus::Idle;
    }
}
