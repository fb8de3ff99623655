use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use crab_core::report::all_reports;
use crab_core::{to_json, CrabError, CrabResult, LearnConfig, Morphology, Side};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "crab",
    about = "Unsupervised morphological analysis with the Linguistica Crab algorithm"
)]
struct Cli {
    /// Text file containing the data to analyze.
    #[arg(short, long)]
    input: PathBuf,

    /// Input file encoding (utf-8 or latin-1).
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Regular expression whose matches are the input tokens (default: \w+).
    #[arg(short, long)]
    token: Option<String>,

    /// Lowercase input text (the default).
    #[arg(short, long, overrides_with = "no_lowercase")]
    lowercase: bool,

    /// Keep input text as is.
    #[arg(long)]
    no_lowercase: bool,

    /// Learn prefixal morphology only (default: suffixal, then prefixal).
    #[arg(short, long)]
    prefix: bool,

    #[arg(short = 's', long)]
    min_stem_length: Option<usize>,

    #[arg(short = 'n', long)]
    min_num_stems: Option<usize>,

    #[arg(short = 'f', long)]
    num_seed_families: Option<usize>,

    /// Robustness required for a signature to join a family.
    #[arg(short = 'r', long)]
    min_robustness: Option<usize>,

    /// Edge entropy required of the long-stem signature of a biparse.
    #[arg(long)]
    min_biparse_entropy: Option<f64>,

    /// JSON file with learning parameters; flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base filename for output files, written next to the input
    /// (default: print to screen).
    #[arg(short, long)]
    output: Option<String>,

    /// Write a JSON document per side instead of the text reports.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn learn_config(&self) -> CrabResult<LearnConfig> {
        let mut config = match &self.config {
            Some(path) => LearnConfig::from_json_file(path)?,
            None => LearnConfig::default(),
        };
        if let Some(pattern) = &self.token {
            config.tokenization_regex = pattern.clone();
        }
        if self.no_lowercase {
            config.lowercase = false;
        } else if self.lowercase {
            config.lowercase = true;
        }
        if self.prefix {
            config.sides = vec![Side::Prefix];
        }
        if let Some(n) = self.min_stem_length {
            config.min_stem_len = n;
        }
        if let Some(n) = self.min_num_stems {
            config.min_num_stems = n;
        }
        if let Some(n) = self.num_seed_families {
            config.num_seed_families = n;
        }
        if let Some(n) = self.min_robustness {
            config.min_robustness = n;
        }
        if let Some(e) = self.min_biparse_entropy {
            config.min_biparse_entropy = e;
        }
        Ok(config)
    }

    fn output_path(&self, name: &str, extension: &str) -> Option<PathBuf> {
        let base = self.output.as_ref()?;
        let dir = self.input.parent().unwrap_or_else(|| Path::new("."));
        Some(dir.join(format!("{base}_{name}.{extension}")))
    }
}

fn emit(cli: &Cli, name: &str, extension: &str, contents: &str) -> CrabResult<()> {
    match cli.output_path(name, extension) {
        Some(path) => {
            fs::write(&path, contents).map_err(|source| CrabError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "wrote {name}");
        }
        None => {
            println!("{}\n", "#".repeat(80));
            println!("{contents}");
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> CrabResult<()> {
    let config = cli.learn_config()?;
    let mut morphology = Morphology::new();
    morphology.learn_from_file(&cli.input, &cli.encoding, &config)?;

    for &side in &config.sides {
        if cli.json {
            emit(cli, side.as_str(), "json", &to_json(&morphology, side)?)?;
            continue;
        }
        for report in all_reports(&morphology, side) {
            let name = format!("{side}_{}", report.kind());
            emit(cli, &name, "txt", &report.to_string())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
