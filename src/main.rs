use clap::Parser;
use std::process::ExitCode;
use todo::{init_logging, run, Args};

fn main() -> ExitCode {
  let args = Args::parse();
  init_logging(args.verbosity());

  let stdout = std::io::stdout();
  match run(args, &mut stdout.lock()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}
