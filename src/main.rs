use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use termscape::config::AnalysisConfig;
use termscape::density::{DensityCache, Kernel};
use termscape::matrix::MatrixSnapshot;
use termscape::output::terminal;
use termscape::pipeline::{
    rank_neighbors, select_terms, skim_snapshot, texture_map, MentalMap, TermSelection,
};
use termscape::scoring::ScoringPolicy;
use termscape::text::{Stopwords, TermIndex, Tokenizer};

/// Termscape: term-similarity graphs of long texts.
///
/// Finds which words cluster in the same parts of a text and links each
/// to its closest neighbours, producing a graph you can open in Gephi.
#[derive(Parser)]
#[command(name = "termscape", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a term graph from a text file and write it as GML
    Generate {
        /// Input text file
        input: PathBuf,

        /// Output GML file
        output: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Also save the term matrix as a JSON snapshot
        #[arg(long)]
        matrix: Option<PathBuf>,
    },

    /// Show the most frequent terms of a text
    Terms {
        /// Input text file
        input: PathBuf,

        /// Number of terms to show (default: 25)
        #[arg(long, default_value = "25")]
        top: usize,

        /// Stopword file (one word per line), replacing the built-in list
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Build a word co-occurrence graph (2- and 5-word windows) and write it as GML
    Texture {
        /// Input text file
        input: PathBuf,

        /// Output GML file
        output: PathBuf,

        /// Stopword file (one word per line), replacing the built-in list
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Rebuild a graph from a saved matrix snapshot
    Skim {
        /// Matrix snapshot written by `generate --matrix`
        matrix: PathBuf,

        /// Output GML file
        output: PathBuf,

        /// Neighbours linked per term
        #[arg(long)]
        skim_depth: Option<usize>,

        /// Store 1 - score as the edge weight
        #[arg(long)]
        distance_weights: bool,
    },

    /// List the terms closest to one word
    Neighbors {
        /// Input text file
        input: PathBuf,

        /// The word to rank neighbours for
        word: String,

        /// Number of neighbours to show (default: 20)
        #[arg(long, default_value = "20")]
        top: usize,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

/// Flags shared by every command that analyses a text. Each one overrides
/// the matching TERMSCAPE_* environment variable.
#[derive(Args)]
struct AnalysisArgs {
    /// How many terms to score
    #[arg(long)]
    term_depth: Option<usize>,

    /// frequent (most frequent terms) or clumpy (most concentrated terms)
    #[arg(long)]
    selection: Option<TermSelection>,

    /// Neighbours linked per term
    #[arg(long)]
    skim_depth: Option<usize>,

    /// Kernel bandwidth, in word positions
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Points on the density sampling grid
    #[arg(long)]
    samples: Option<usize>,

    /// gaussian, epanechnikov, tophat, exponential, linear or cosine
    #[arg(long)]
    kernel: Option<Kernel>,

    /// overlap, braycurtis or cosine
    #[arg(long)]
    scoring: Option<ScoringPolicy>,

    /// Store 1 - score as the edge weight
    #[arg(long)]
    distance_weights: bool,

    /// Stopword file (one word per line), replacing the built-in list
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Score pairs on a single thread
    #[arg(long)]
    serial: bool,
}

impl AnalysisArgs {
    fn apply(self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(v) = self.term_depth {
            config.term_depth = v;
        }
        if let Some(v) = self.selection {
            config.selection = v;
        }
        if let Some(v) = self.skim_depth {
            config.skim_depth = v;
        }
        if let Some(v) = self.bandwidth {
            config.bandwidth = v;
        }
        if let Some(v) = self.samples {
            config.samples = v;
        }
        if let Some(v) = self.kernel {
            config.kernel = v;
        }
        if let Some(v) = self.scoring {
            config.scoring = v;
        }
        if self.distance_weights {
            config.distance_weights = true;
        }
        if self.stopwords.is_some() {
            config.stopwords_path = self.stopwords;
        }
        if self.serial {
            config.parallel = false;
        }
        config
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("termscape=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            analysis,
            matrix,
        } => {
            let config = analysis.apply(AnalysisConfig::load()?);
            config.validate()?;
            let text = read_text(&input)?;
            let stopwords = load_stopwords(config.stopwords_path.as_deref())?;

            println!(
                "Mapping {} ({} {} terms, {} neighbours each)...",
                input.display(),
                config.term_depth,
                config.selection,
                config.skim_depth
            );
            let map = MentalMap::build_with_progress(&text, &stopwords, &config, true)?;

            map.graph()
                .write_gml(&output)
                .with_context(|| format!("Failed to write graph to {}", output.display()))?;

            if let Some(path) = matrix {
                map.snapshot()?
                    .save_json(&path)
                    .with_context(|| format!("Failed to write matrix to {}", path.display()))?;
                println!("Matrix saved to {}", path.display());
            }

            terminal::display_graph_summary(map.graph());
            println!("{}", format!("Graph written to {}", output.display()).bold());
        }

        Commands::Terms {
            input,
            top,
            stopwords,
        } => {
            let config = AnalysisConfig::load()?;
            let text = read_text(&input)?;
            let stopwords = load_stopwords(stopwords.or(config.stopwords_path).as_deref())?;
            let index = TermIndex::from_text(&text, &Tokenizer::new(stopwords))?;
            terminal::display_term_counts(&index, top);
        }

        Commands::Texture {
            input,
            output,
            stopwords,
        } => {
            let config = AnalysisConfig::load()?;
            let text = read_text(&input)?;
            let stopwords = load_stopwords(stopwords.or(config.stopwords_path).as_deref())?;

            let graph = texture_map(&text, &stopwords)?;
            graph
                .write_gml(&output)
                .with_context(|| format!("Failed to write graph to {}", output.display()))?;

            terminal::display_graph_summary(&graph);
            println!("{}", format!("Graph written to {}", output.display()).bold());
        }

        Commands::Skim {
            matrix,
            output,
            skim_depth,
            distance_weights,
        } => {
            let config = AnalysisConfig::load()?;
            let skim_depth = skim_depth.unwrap_or(config.skim_depth);
            let distance_weights = distance_weights || config.distance_weights;

            let snapshot = MatrixSnapshot::load_json(&matrix)
                .with_context(|| format!("Failed to read matrix from {}", matrix.display()))?;
            if snapshot.labels.is_empty() {
                warn!(
                    path = %matrix.display(),
                    "Snapshot has no term labels, naming nodes by stem"
                );
            }

            let graph = skim_snapshot(&snapshot, skim_depth, distance_weights)?;
            graph
                .write_gml(&output)
                .with_context(|| format!("Failed to write graph to {}", output.display()))?;

            terminal::display_graph_summary(&graph);
            println!("{}", format!("Graph written to {}", output.display()).bold());
        }

        Commands::Neighbors {
            input,
            word,
            top,
            analysis,
        } => {
            let config = analysis.apply(AnalysisConfig::load()?);
            config.validate()?;
            let text = read_text(&input)?;
            let stopwords = load_stopwords(config.stopwords_path.as_deref())?;
            let tokenizer = Tokenizer::new(stopwords);
            let index = TermIndex::from_text(&text, &tokenizer)?;

            let anchor = tokenizer.single_term(&word)?;
            if !index.contains(&anchor.stemmed) {
                anyhow::bail!("\"{word}\" does not occur in {}", input.display());
            }
            info!(word = %word, stem = %anchor.stemmed, "Ranking neighbours");

            let densities = DensityCache::new(config.density_params())?;
            let candidates = select_terms(&index, &densities, &config)?;
            let ranked = rank_neighbors(
                &index,
                &densities,
                config.scoring,
                &anchor.stemmed,
                &candidates,
            )?;
            let shown: Vec<(String, f64)> = ranked.into_iter().take(top).collect();
            terminal::display_neighbors(&word, &shown, &index);
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_stopwords(path: Option<&Path>) -> Result<Stopwords> {
    match path {
        Some(path) => Stopwords::from_file(path)
            .with_context(|| format!("Failed to read stopwords from {}", path.display())),
        None => Ok(Stopwords::english()),
    }
}
