use clap::{Parser, Subcommand};
use qa_rank::batch::run_batch;
use qa_rank::config;
use qa_rank::pipeline::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qa-rank", about = "Rank candidate answers by n-gram overlap with the question")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process every record file in a directory
    Run {
        /// Directory holding q<NNN>.txt record files
        input_dir: PathBuf,

        /// Directory for a<NNN>.txt reports (created if absent)
        output_dir: PathBuf,

        /// Highest n-gram order to extract
        #[arg(long, default_value_t = config::MAX_NGRAM_ORDER)]
        ngram: usize,
    },
    /// Score a single record and print its report
    Line {
        /// One record in `Q ... A1 <flag> ...` form
        record: String,

        /// Highest n-gram order to extract
        #[arg(long, default_value_t = config::MAX_NGRAM_ORDER)]
        ngram: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("qa_rank=info".parse().expect("valid directive literal")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Run {
            input_dir,
            output_dir,
            ngram,
        } => {
            let pipeline = Pipeline::new(ngram);
            let summary = run_batch(&pipeline, &input_dir, &output_dir)?;
            println!(
                "processed {} record(s), {} failed, {} skipped",
                summary.processed, summary.failed, summary.skipped
            );
        }
        Command::Line { record, ngram } => {
            let report = Pipeline::new(ngram).run_record(&record)?;
            print!("{report}");
        }
    }
    Ok(())
}
