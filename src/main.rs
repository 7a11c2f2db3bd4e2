use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;

use regsearch::engine::{FinalFrame, SingleOutcome};
use regsearch::{Cli, FrameWriter, RunLog, SearchController, run_single};

fn read_payload(args: &Cli) -> Result<String> {
    match &args.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read payload from {:?}", path)),
        None => {
            let mut payload = String::new();
            io::stdin()
                .read_to_string(&mut payload)
                .context("Failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let payload = match read_payload(&args) {
        Ok(payload) => payload,
        Err(e) if !args.single => {
            // The consumer still gets its terminal frame
            let mut frames = FrameWriter::new(io::stdout().lock());
            frames.final_result(&FinalFrame::failed(0, format!("{:#}", e)))?;
            return Err(e);
        }
        Err(e) => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &SingleOutcome::unreadable(format!("{:#}", e)))?;
            writeln!(stdout)?;
            return Err(e);
        }
    };

    if args.single {
        let mut run_log = RunLog::new("SINGLE");
        let outcome = run_single(&payload, &mut run_log);
        run_log.flush_to(&mut io::stderr().lock())?;

        let mut stdout = io::stdout().lock();
        serde_json::to_writer(&mut stdout, &outcome)?;
        writeln!(stdout)?;
        return Ok(());
    }

    // C. Run the search; frames go to stdout as they are produced
    let mut run_log = RunLog::new("MASTER");
    let controller = SearchController::new(args.batch_policy());
    let mut frames = FrameWriter::new(io::stdout().lock());
    let outcome = controller.run(&payload, &mut frames, &mut run_log);

    // D. Teardown: the run log goes out once, after the final frame
    run_log.flush_to(&mut io::stderr().lock())?;

    let final_frame = outcome?;
    log::info!(
        "Search {} after {} models",
        final_frame.status,
        final_frame.total_models_calculated
    );
    Ok(())
}
