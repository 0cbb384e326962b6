//! formfill command line
//!
//! `extract` prints a PDF's form fields as descriptor JSON, `fill` writes an
//! edited descriptor list back into the PDF. Logs go to stderr so stdout can
//! be piped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use formfill_core::{ExtractionStrategy, FieldDescriptor, FieldExtractor, FormWriter, FormfillConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "formfill")]
#[command(version, about = "Normalize and fill PDF AcroForm fields")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the document's fields as JSON descriptors
    Extract {
        /// Input PDF
        pdf: PathBuf,

        /// How text fields become descriptors (overrides the config file)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Single-line JSON instead of pretty output
        #[arg(long)]
        compact: bool,
    },

    /// Write descriptor values into the document
    Fill {
        /// Input PDF
        pdf: PathBuf,

        /// JSON file with the descriptor list
        #[arg(long)]
        fields: PathBuf,

        /// Where to write the filled PDF
        #[arg(short, long)]
        output: PathBuf,

        /// Strategy the descriptors were extracted with
        #[arg(long, value_enum, default_value = "split")]
        strategy: StrategyArg,

        /// Print the per-field report as JSON
        #[arg(long)]
        report: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StrategyArg {
    Split,
    Classify,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Split => ExtractionStrategy::Split,
            StrategyArg::Classify => ExtractionStrategy::Classify,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON, so all logging goes to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Extract {
            pdf,
            strategy,
            config,
            compact,
        } => extract(&pdf, strategy, config.as_deref(), compact).await,
        Command::Fill {
            pdf,
            fields,
            output,
            strategy,
            report,
        } => fill(&pdf, &fields, &output, strategy, report).await,
    }
}

async fn extract(
    pdf: &Path,
    strategy: Option<StrategyArg>,
    config: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let mut config = load_config(config).await?;
    if let Some(strategy) = strategy {
        config.strategy = strategy.into();
    }

    let mut file = tokio::fs::File::open(pdf)
        .await
        .with_context(|| format!("Failed to open {}", pdf.display()))?;
    let descriptors = FieldExtractor::new(config)?
        .extract_from_reader(&mut file)
        .await
        .with_context(|| format!("Failed to extract fields from {}", pdf.display()))?;

    tracing::info!("Extracted {} descriptors from {}", descriptors.len(), pdf.display());
    let json = if compact {
        serde_json::to_string(&descriptors)?
    } else {
        serde_json::to_string_pretty(&descriptors)?
    };
    println!("{}", json);
    Ok(())
}

async fn fill(
    pdf: &Path,
    fields: &Path,
    output: &Path,
    strategy: StrategyArg,
    report: bool,
) -> Result<()> {
    let json = tokio::fs::read_to_string(fields)
        .await
        .with_context(|| format!("Failed to read {}", fields.display()))?;
    let descriptors: Vec<FieldDescriptor> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid descriptor JSON in {}", fields.display()))?;

    let bytes = tokio::fs::read(pdf)
        .await
        .with_context(|| format!("Failed to read {}", pdf.display()))?;
    let (filled, fill_report) = FormWriter::new()
        .with_strategy(strategy.into())
        .fill_with_report(&bytes, &descriptors)
        .with_context(|| format!("Failed to fill {}", pdf.display()))?;

    tokio::fs::write(output, &filled)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Wrote {}: {} applied, {} skipped, {} failed",
        output.display(),
        fill_report.applied.len(),
        fill_report.skipped.len(),
        fill_report.failed.len()
    );
    if report {
        println!("{}", serde_json::to_string_pretty(&fill_report)?);
    }
    Ok(())
}

async fn load_config(path: Option<&Path>) -> Result<FormfillConfig> {
    let Some(path) = path else {
        return Ok(FormfillConfig::default());
    };
    let toml = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = FormfillConfig::from_str(&toml)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_with_strategy() {
        let cli = Cli::try_parse_from([
            "formfill",
            "extract",
            "form.pdf",
            "--strategy",
            "classify",
            "--compact",
        ])
        .unwrap();

        match cli.command {
            Command::Extract {
                pdf,
                strategy,
                config,
                compact,
            } => {
                assert_eq!(pdf, PathBuf::from("form.pdf"));
                assert_eq!(strategy, Some(StrategyArg::Classify));
                assert_eq!(config, None);
                assert!(compact);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fill_requires_fields_and_output() {
        assert!(Cli::try_parse_from(["formfill", "fill", "form.pdf"]).is_err());

        let cli = Cli::try_parse_from([
            "formfill",
            "fill",
            "form.pdf",
            "--fields",
            "fields.json",
            "-o",
            "filled.pdf",
            "--report",
        ])
        .unwrap();
        match cli.command {
            Command::Fill {
                fields,
                output,
                strategy,
                report,
                ..
            } => {
                assert_eq!(fields, PathBuf::from("fields.json"));
                assert_eq!(output, PathBuf::from("filled.pdf"));
                assert_eq!(strategy, StrategyArg::Split);
                assert!(report);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fill_with_classify_strategy() {
        let cli = Cli::try_parse_from([
            "formfill",
            "fill",
            "form.pdf",
            "--fields",
            "fields.json",
            "--output",
            "filled.pdf",
            "--strategy",
            "classify",
        ])
        .unwrap();
        match cli.command {
            Command::Fill { strategy, .. } => assert_eq!(strategy, StrategyArg::Classify),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["formfill", "extract", "form.pdf", "--strategy", "merge"]).is_err());
    }

    #[test]
    fn test_strategy_conversion() {
        assert_eq!(ExtractionStrategy::from(StrategyArg::Split), ExtractionStrategy::Split);
        assert_eq!(
            ExtractionStrategy::from(StrategyArg::Classify),
            ExtractionStrategy::Classify
        );
    }
}
