use std::fs;
use std::io;
use std::path;
use std::process;

use clap::Parser;

use top_riders::{
    reporting,
    BallotFileSink,
    Candidates,
    RankedSelection,
    RankingWriter,
    Session,
    Sink,
    SubmissionStatus,
    SELECTION_SIZE,
};

#[derive(Parser, Debug)]
#[clap(author, version)]
/// Stores the command line arguments.
struct Args {
    /// Path to the CSV listing the candidates, with `id` and `name` columns.
    #[clap()]
    path : path::PathBuf,

    /// Ballot CSV to append submissions to. Submissions are printed when omitted.
    #[clap(long, short)]
    ballots : Option<path::PathBuf>,

    /// Read commands from a file instead of standard input.
    #[clap(long, short)]
    script : Option<path::PathBuf>,

    /// Generate report of each change.
    #[clap(long, takes_value = false)]
    report : bool,
}

/// Runs a session over the commands from the script or standard input.
fn drive<S : Sink>(selection : RankedSelection, sink : S, args : &Args) -> i32 {
    let mut session = Session::new(selection, sink, args.report);

    let result = match &args.script {
        Some(script) => match fs::File::open(script) {
            Ok(file) => session.run(io::BufReader::new(file)),
            Err(error) => {
                reporting::input_error(&error);
                return exitcode::NOINPUT;
            },
        },
        None => {
            reporting::help();
            session.run(io::stdin().lock())
        },
    };

    match result {
        Ok(SubmissionStatus::Failed) => exitcode::UNAVAILABLE,
        Ok(_) => exitcode::OK,
        Err(error) => {
            reporting::input_error(&error);
            exitcode::IOERR
        },
    }
}

fn main() {
    let args = Args::parse();

    let candidates = match Candidates::from_file(&args.path, args.report) {
        Ok(candidates) => candidates,
        Err(error) => {
            reporting::source_error(&error);
            process::exit(exitcode::DATAERR);
        },
    };

    if candidates.len() < SELECTION_SIZE {
        reporting::short_roster(candidates.len(), SELECTION_SIZE);
    }

    let code = match &args.ballots {
        Some(path) => {
            let sink = BallotFileSink::new(path, &candidates);
            drive(RankedSelection::new(candidates), sink, &args)
        },
        None => drive(RankedSelection::new(candidates), RankingWriter::new(io::stdout()), &args),
    };

    process::exit(code);
}
