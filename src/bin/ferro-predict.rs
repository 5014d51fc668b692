// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-predict CLI
//!
//! Command-line interface for region normalization, variant effect
//! summaries and prediction requests.

use clap::{Parser, Subcommand};
use ferro_predict::analysis::{
    Analyzer, IntervalAnalysis, IntervalAnalysisRequest, VariantAnalysis, VariantAnalysisRequest,
};
use ferro_predict::cli::{
    output_effect, output_error as cli_output_error, output_interval, output_interval_analysis,
    output_json, output_tracks, output_variant_analysis, parse_ontology_terms, parse_outputs,
    parse_scores, process_input_line, read_array_file, OutputFormat,
};
use ferro_predict::config::{PredictConfig, PredictionBackend};
use ferro_predict::prediction::{ClientHandle, OutputType, TISSUES};
use ferro_predict::{
    EffectComputer, EffectConfig, EffectSummary, GenomicInterval, GenomicVariant, PredictError,
    RegionNormalizer, SequenceLength,
};
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ferro-predict")]
#[command(author, version, about = "Region normalizer and variant effect summaries for genomic prediction")]
#[command(
    long_about = "Normalize genomic regions to supported model input lengths, summarize variant
effects from prediction arrays and query a prediction service.

Examples:
  ferro-predict validate chr22:35677410-36725986
  ferro-predict resize chr22:36201000-36201100 --length 2KB
  ferro-predict window chr22 36201698 --length 1MB
  ferro-predict summarize --reference ref.json --alternate alt.json
  ferro-predict top-tracks 0.1,0.5,0.3,0.5 -k 2
  ferro-predict --mock predict-variant chr22:36201698:A>C"
)]
struct Cli {
    /// Output format
    #[arg(short = 'f', long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Configuration file with [prediction] and [analysis] sections
    #[arg(long, global = true, env = "FERRO_PREDICT_CONFIG")]
    config: Option<PathBuf>,

    /// Use the synthetic prediction backend
    #[arg(long, global = true)]
    mock: bool,

    /// Prediction service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that regions have a supported length
    Validate {
        /// Region such as chr1:100-2148 (reads -i or stdin when omitted)
        region: Option<String>,

        /// Input file (one region per line)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Resize regions to a supported length around their midpoint
    Resize {
        /// Region such as chr1:100-200 (reads -i or stdin when omitted)
        region: Option<String>,

        /// Input file (one region per line)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Target length (2KB, 16KB, 100KB, 500KB, 1MB or base pairs)
        #[arg(short, long, default_value = "1MB")]
        length: SequenceLength,
    },

    /// Window of a supported length centered on a position
    Window {
        /// Chromosome name (chr1..chr22, chrX, chrY)
        chromosome: String,

        /// 1-based position
        position: u64,

        /// Window length
        #[arg(short, long, default_value = "1MB")]
        length: SequenceLength,
    },

    /// Summarize the difference between reference and alternate predictions
    Summarize {
        /// Reference prediction array (JSON)
        #[arg(long)]
        reference: PathBuf,

        /// Alternate prediction array (JSON)
        #[arg(long)]
        alternate: PathBuf,

        /// Minimum |mean difference| for a directional call
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Rank track scores, highest first
    TopTracks {
        /// Comma-separated scores (reads -i or stdin when omitted)
        scores: Option<String>,

        /// Input file with scores
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of tracks to report
        #[arg(short, default_value = "5")]
        k: usize,
    },

    /// Predict an interval and summarize each output
    PredictInterval {
        /// Region such as chr22:35677410-36725986
        region: String,

        /// Resize the region to this length first
        #[arg(long)]
        resize_to: Option<SequenceLength>,

        /// Comma-separated output types (e.g. RNA_SEQ,ATAC)
        #[arg(long)]
        outputs: Option<String>,

        /// Comma-separated ontology terms (e.g. UBERON:0001157)
        #[arg(long)]
        ontology_terms: Option<String>,
    },

    /// Predict reference and alternate alleles and summarize the effect
    PredictVariant {
        /// Variant such as chr22:36201698:A>C
        variant: String,

        /// Context region (a window around the variant when omitted)
        #[arg(long)]
        interval: Option<String>,

        /// Comma-separated output types (e.g. RNA_SEQ,ATAC)
        #[arg(long)]
        outputs: Option<String>,

        /// Comma-separated ontology terms (e.g. UBERON:0001157)
        #[arg(long)]
        ontology_terms: Option<String>,

        /// Number of tracks to rank per output
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// List output types
    Outputs,

    /// List known tissue ontology terms
    Tissues,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let format = cli.format.as_str();
    let config = load_config(cli.config.as_deref(), cli.mock, cli.api_url)?;

    match cli.command {
        Commands::Validate { region, input } => {
            run_validate(region.as_deref(), input.as_ref(), format)
        }
        Commands::Resize {
            region,
            input,
            length,
        } => run_resize(region.as_deref(), input.as_ref(), length, format),
        Commands::Window {
            chromosome,
            position,
            length,
        } => run_window(&chromosome, position, length, format),
        Commands::Summarize {
            reference,
            alternate,
            threshold,
        } => run_summarize(&reference, &alternate, threshold, &config, format),
        Commands::TopTracks { scores, input, k } => {
            run_top_tracks(scores.as_deref(), input.as_ref(), k, format)
        }
        Commands::PredictInterval {
            region,
            resize_to,
            outputs,
            ontology_terms,
        } => run_predict_interval(
            &region,
            resize_to,
            outputs.as_deref(),
            ontology_terms.as_deref(),
            &config,
            format,
        ),
        Commands::PredictVariant {
            variant,
            interval,
            outputs,
            ontology_terms,
            top_k,
        } => run_predict_variant(
            &variant,
            interval.as_deref(),
            outputs.as_deref(),
            ontology_terms.as_deref(),
            top_k,
            &config,
            format,
        ),
        Commands::Outputs => run_outputs(format),
        Commands::Tissues => run_tissues(format),
    }
}

fn load_config(
    path: Option<&Path>,
    mock: bool,
    api_url: Option<String>,
) -> Result<PredictConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            PredictConfig::from_file(path)?
        }
        None => PredictConfig::default(),
    };
    if mock {
        config.prediction.backend = PredictionBackend::Mock;
    }
    if let Some(url) = api_url {
        config.prediction.api_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn run_validate(
    region: Option<&str>,
    input: Option<&PathBuf>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = RegionNormalizer::new();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let errors = for_each_input(region, input, format, |text| {
        let interval: GenomicInterval = text.parse()?;
        let interval = normalizer.validate(&interval)?;
        output_interval(&mut writer, text, &interval, parse_format(format))?;
        Ok(())
    })?;

    finish(errors, "region(s) failed validation")
}

fn run_resize(
    region: Option<&str>,
    input: Option<&PathBuf>,
    length: SequenceLength,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = RegionNormalizer::new();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let errors = for_each_input(region, input, format, |text| {
        let interval: GenomicInterval = text.parse()?;
        let resized = normalizer.resize(&interval, length);
        let resized = normalizer.validate(&resized)?;
        output_interval(&mut writer, text, &resized, parse_format(format))?;
        Ok(())
    })?;

    finish(errors, "region(s) failed to resize")
}

fn run_window(
    chromosome: &str,
    position: u64,
    length: SequenceLength,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = RegionNormalizer::new();
    let input = format!("{}:{}", chromosome, position);

    let result = normalizer
        .fit_variant_window(chromosome, position, length)
        .and_then(|interval| normalizer.validate(&interval));
    match result {
        Ok(interval) => {
            output_interval(&mut io::stdout().lock(), &input, &interval, parse_format(format))?;
            Ok(())
        }
        Err(e) => fail(&input, &e, format),
    }
}

fn run_summarize(
    reference: &Path,
    alternate: &Path,
    threshold: Option<f64>,
    config: &PredictConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let run = || -> Result<EffectSummary, PredictError> {
        let effect_config = match threshold {
            Some(t) => EffectConfig::with_threshold(t)?,
            None => config.analysis.effect_config()?,
        };
        let reference_array = read_array_file(reference)?;
        let alternate_array = read_array_file(alternate)?;
        EffectComputer::new(effect_config).summarize(&reference_array, &alternate_array)
    };

    let result = run();
    match result {
        Ok(summary) => {
            output_effect(&mut io::stdout().lock(), &summary, parse_format(format))?;
            Ok(())
        }
        Err(e) => {
            let input = format!("{} vs {}", reference.display(), alternate.display());
            fail(&input, &e, format)
        }
    }
}

fn run_top_tracks(
    scores: Option<&str>,
    input: Option<&PathBuf>,
    k: usize,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (label, text) = match (scores, input) {
        (Some(scores), _) => (scores.to_string(), scores.to_string()),
        (None, Some(path)) => (path.display().to_string(), std::fs::read_to_string(path)?),
        (None, None) => ("<stdin>".to_string(), io::read_to_string(io::stdin())?),
    };

    let computer = EffectComputer::default();
    match parse_scores(&text).and_then(|scores| computer.top_tracks(&scores, k)) {
        Ok(tracks) => {
            output_tracks(&mut io::stdout().lock(), &tracks, parse_format(format))?;
            Ok(())
        }
        Err(e) => fail(&label, &e, format),
    }
}

fn run_predict_interval(
    region: &str,
    resize_to: Option<SequenceLength>,
    outputs: Option<&str>,
    ontology_terms: Option<&str>,
    config: &PredictConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ClientHandle::from_config(&config.prediction);

    let run = || -> Result<IntervalAnalysis, PredictError> {
        let analyzer = Analyzer::new(config.analysis.clone())?;
        let mut request = IntervalAnalysisRequest::new(region.parse()?);
        request.resize_to = resize_to;
        request.requested_outputs = outputs.map(parse_outputs).transpose()?;
        request.ontology_terms = ontology_terms.map(parse_ontology_terms);
        let client = handle.get()?;
        block_on(async { analyzer.analyze_interval(client.as_ref(), &request).await })?
    };

    match run() {
        Ok(analysis) => {
            output_interval_analysis(&mut io::stdout().lock(), &analysis, parse_format(format))?;
            Ok(())
        }
        Err(e) => fail(region, &e, format),
    }
}

fn run_predict_variant(
    variant: &str,
    interval: Option<&str>,
    outputs: Option<&str>,
    ontology_terms: Option<&str>,
    top_k: Option<usize>,
    config: &PredictConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ClientHandle::from_config(&config.prediction);

    let run = || -> Result<VariantAnalysis, PredictError> {
        let analyzer = Analyzer::new(config.analysis.clone())?;
        let parsed: GenomicVariant = variant.parse()?;
        let mut request = VariantAnalysisRequest::new(parsed);
        request.interval = interval.map(str::parse::<GenomicInterval>).transpose()?;
        request.requested_outputs = outputs.map(parse_outputs).transpose()?;
        request.ontology_terms = ontology_terms.map(parse_ontology_terms);
        request.top_k = top_k;
        let client = handle.get()?;
        block_on(async { analyzer.analyze_variant(client.as_ref(), &request).await })?
    };

    match run() {
        Ok(analysis) => {
            output_variant_analysis(&mut io::stdout().lock(), &analysis, parse_format(format))?;
            Ok(())
        }
        Err(e) => fail(variant, &e, format),
    }
}

fn run_outputs(format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = io::stdout().lock();
    match parse_format(format) {
        OutputFormat::Json => output_json(&mut writer, OutputType::all())?,
        OutputFormat::Text => {
            for output in OutputType::all() {
                writeln!(writer, "{}", output)?;
            }
        }
    }
    Ok(())
}

fn run_tissues(format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = io::stdout().lock();
    match parse_format(format) {
        OutputFormat::Json => {
            let map: std::collections::BTreeMap<&str, &str> = TISSUES.iter().copied().collect();
            output_json(&mut writer, &map)?;
        }
        OutputFormat::Text => {
            for (term, name) in TISSUES {
                writeln!(writer, "{}\t{}", term, name)?;
            }
        }
    }
    Ok(())
}

/// Apply `process` to the positional value, each line of `input`, or each
/// line of stdin; returns the number of failed entries
fn for_each_input<F>(
    value: Option<&str>,
    input: Option<&PathBuf>,
    format: &str,
    mut process: F,
) -> Result<usize, Box<dyn std::error::Error>>
where
    F: FnMut(&str) -> Result<(), PredictError>,
{
    let mut errors = 0usize;

    if let Some(value) = value {
        if let Err(e) = process(value) {
            output_error(value, &e, format)?;
            errors += 1;
        }
        return Ok(errors);
    }

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(io::BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(text) = process_input_line(&line, line_num == 0) {
            if let Err(e) = process(text) {
                output_error(text, &e, format)?;
                errors += 1;
            }
        }
    }
    Ok(errors)
}

fn block_on<F: Future>(future: F) -> Result<F::Output, PredictError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn finish(errors: usize, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if errors > 0 {
        Err(format!("{} {}", errors, what).into())
    } else {
        Ok(())
    }
}

fn fail(input: &str, error: &PredictError, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    output_error(input, error, format)?;
    std::process::exit(1);
}

fn parse_format(format: &str) -> OutputFormat {
    format.parse().unwrap_or_default()
}

fn output_error(input: &str, error: &PredictError, format: &str) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    cli_output_error(&mut handle, input, error, parse_format(format))
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    Ok(())
}
