use std::io;

use colored::*;

use crate::candidates::{Candidate, SourceError};
use crate::selection::{
    RankedSelection,
    SelectionError,
    SubmissionStatus,
    SubmitError,
};
use crate::session::ParseError;

/// Displays a row of the source which was skipped.
pub fn invalid_candidate(line : u64, reason : &str, report : bool) {
    if report {
        println!("{} {} (line: {})", "Skipped Candidate:".bright_green().bold(), reason, line);
    }
}

/// Warns that there are too few candidates to ever complete a selection.
pub fn short_roster(count : usize, required : usize) {
    println!(
        "{} Only {} candidates are available, but exactly {} must be selected",
        "Warning:".yellow().bold(),
        count,
        required,
    );
}

/// Displays the candidates which can still be picked.
pub fn available(candidates : &[&Candidate]) {
    println!("{}", "Available:".bright_yellow().bold());

    if candidates.is_empty() {
        println!("    (none)");
    }

    for candidate in candidates {
        println!("    {} : {}", candidate.id.dimmed(), candidate.name);
    }
}

/// Displays every candidate in source order, marking the rank of those selected.
pub fn roster(selection : &RankedSelection) {
    println!("{}", "Riders:".bright_yellow().bold());

    for candidate in selection.roster() {
        match selection.rank_of(&candidate.id) {
            Some(rank) => println!("    {} : {} {}", candidate.id.dimmed(), candidate.name, format!("(#{})", rank).bright_cyan()),
            None => println!("    {} : {}", candidate.id.dimmed(), candidate.name),
        }
    }
}

/// Displays the selection in order of preference.
pub fn selection(selected : &[Candidate]) {
    println!("{}", "Your Ranking:".bright_yellow().bold());

    if selected.is_empty() {
        println!("    (none)");
    }

    for (position, candidate) in selected.iter().enumerate() {
        println!("    {}. {}", position + 1, candidate.name);
    }
}

/// Confirms a candidate was added to the selection.
pub fn picked(candidate : &Candidate, position : usize, report : bool) {
    if report {
        println!("{} {} at rank {}", "Picked:".bright_cyan(), candidate.name, position + 1);
    }
}

/// Confirms a candidate was returned to the available pool.
pub fn unpicked(candidate : &Candidate, report : bool) {
    if report {
        println!("{} {}", "Removed:".bright_magenta(), candidate.name);
    }
}

/// Displays a refused change to the selection.
pub fn selection_error(error : &SelectionError) {
    match error {
        SelectionError::SelectionFull { .. } => {
            println!("{} {}", "Blocked:".red().bold(), error)
        },
        SelectionError::InvalidSelectionSize { .. } => {
            println!("{} {}", "Invalid Selection:".red().bold(), error)
        },
        _ => println!("{} {}", "Notice:".yellow(), error),
    }
}

/// Displays the outcome of a submission.
pub fn submission(result : &Result<(), SubmitError>) {
    match result {
        Ok(()) => println!("{}", "Selection submitted successfully!".bright_blue().bold()),
        Err(SubmitError::Invalid(error)) => selection_error(error),
        Err(SubmitError::Sink(error)) => {
            println!("{} {}", "Submission Failed:".red().bold(), error);
            println!("Your selection has been kept, so you can submit again.");
        },
    }
}

/// Displays the current `SubmissionStatus`.
pub fn status(status : SubmissionStatus) {
    let text = match status {
        SubmissionStatus::Idle => "not submitted".normal(),
        SubmissionStatus::Submitting => "submitting".bright_cyan(),
        SubmissionStatus::Succeeded => "submitted".bright_blue(),
        SubmissionStatus::Failed => "submission failed".red(),
    };

    println!("{} {}", "Status:".bold(), text);
}

/// Displays a line of input which could not be understood.
pub fn parse_error(line : usize, error : &ParseError) {
    println!("{} {} (line: {})", "Unrecognised Command:".yellow().bold(), error, line);
}

/// Lists the commands of a session.
pub fn help() {
    println!("{}", "Commands:".bold());
    println!("    pick <id>             add a candidate to the bottom of your ranking");
    println!("    unpick <id>           return a candidate to the available list");
    println!("    move <from> [<to>]    move the candidate at one rank to another");
    println!("    search [<text>]       list available candidates matching the text");
    println!("    roster                list every candidate, picked or not");
    println!("    show                  show your ranking");
    println!("    status                show whether your ranking was submitted");
    println!("    submit                submit your ranking");
    println!("    quit                  end the session");
}

/// Displays a failure to read the candidates.
pub fn source_error(error : &SourceError) {
    println!("{} {}", "Error:".red().bold(), error);
}

/// Displays a failure to read commands.
pub fn input_error(error : &io::Error) {
    println!("{} could not read commands: {}", "Error:".red().bold(), error);
}
