use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use consensus_rank::Samples;
use log::error;
use structopt::StructOpt;

mod error;
mod experiment;

use error::{ExperimentError, Result};
use experiment::Experiment;

/// Rank variance features and consensus clustering on a labeled dataset
///
/// Without `--data` the built-in Fisher iris data is used.
#[derive(Debug, StructOpt)]
struct Options {
    #[structopt(short = "d", long = "data", parse(from_os_str))]
    /// CSV file with numeric columns followed by a label column
    data: Option<PathBuf>,
    #[structopt(long = "header")]
    /// The CSV file starts with a header line
    header: bool,
    #[structopt(short = "r", long = "rounds", default_value = "4")]
    /// Number of augmentation rounds
    rounds: usize,
    #[structopt(short = "e", long = "ensemble-size", default_value = "33")]
    /// Random projections per rank ensemble
    ensemble_size: usize,
    #[structopt(short = "n", long = "runs", default_value = "100")]
    /// k-means runs per consensus clustering
    runs: usize,
    #[structopt(long = "min-clusters", default_value = "1")]
    /// Smallest cluster count of the sweep
    min_clusters: usize,
    #[structopt(long = "max-clusters", default_value = "7")]
    /// Largest cluster count of the sweep
    max_clusters: usize,
    #[structopt(short = "g", long = "split-groups", default_value = "3")]
    /// Groups of every variance split
    split_groups: usize,
    #[structopt(short = "s", long = "seed", default_value = "1")]
    /// Seed of the augmentation rounds
    seed: u64,
    #[structopt(short = "t", long = "threads")]
    /// Worker threads of the rank ensembles, all cores by default
    threads: Option<usize>,
}

impl Options {
    fn experiment(&self) -> Experiment {
        Experiment {
            rounds: self.rounds,
            ensemble_size: self.ensemble_size,
            n_threads: self.threads,
            n_runs: self.runs,
            clusters: self.min_clusters..=self.max_clusters,
            split_groups: self.split_groups,
            seed: self.seed,
        }
    }

    fn load(&self) -> Result<Samples<f64>> {
        let samples = match &self.data {
            Some(path) => {
                let file = File::open(path).map_err(|source| ExperimentError::Open {
                    path: path.display().to_string(),
                    source,
                })?;
                rank_datasets::from_reader(BufReader::new(file), self.header)?
            }
            None => rank_datasets::iris()?,
        };

        Ok(samples)
    }
}

fn run(options: &Options) -> Result<()> {
    let samples = options.load()?;
    let stdout = io::stdout();
    options.experiment().run(samples, &mut stdout.lock())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::from_args();
    if let Err(err) = run(&options) {
        error!("{}", err);
        process::exit(1);
    }
}
