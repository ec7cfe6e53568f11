//! Pick up to five candidates from a larger list, rank them, and submit the ranking.

pub mod candidates;
pub mod reporting;
pub mod selection;
pub mod session;
pub mod sink;

pub use candidates::{Candidate, Candidates, SourceError};
pub use selection::{RankedSelection, SelectionError, SubmissionStatus, SubmitError, SELECTION_SIZE};
pub use session::{Command, Session};
pub use sink::{BallotFileSink, RankingWriter, Sink, SubmissionError};
