//! Mobility Map View
//!
//! Command-line entry point:
//! - `serve`: run the bridge server against the configured backend
//! - `grade <score>`: classify one score
//! - `style <project-id> <zoom> [flags]`: print the style document for a view

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use mobi_mapr::backend::{Credential, HttpBackend, MapBackend};
use mobi_mapr::classify::{band_color_of, grade_of, score_label};
use mobi_mapr::model::{AverageType, Project, VisualizationMode, VisualizationType};
use mobi_mapr::resolution::{select_resolution, ViewToggles};
use mobi_mapr::telemetry::{init_tracing, DEFAULT_FILTER};
use mobi_mapr::{MapViewController, MaprConfig, StyleBuilder, StyleInputs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Accessibility map view: styles, grades and a renderer bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bridge server against the configured backend
    Serve,
    /// Classify one score into grade, label and colour
    Grade {
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },
    /// Print the style document for a project at a zoom level (offline)
    Style(StyleArgs),
}

#[derive(Args, Debug)]
struct StyleArgs {
    project_id: u64,
    zoom: f64,
    /// Treat the project as a difference project
    #[arg(long)]
    difference: bool,
    /// Paint travel-time scores instead of the index
    #[arg(long)]
    score: bool,
    /// Area weighting instead of population weighting
    #[arg(long)]
    area: bool,
    #[arg(long, value_name = "T", conflicts_with = "share_key")]
    token: Option<String>,
    #[arg(long, value_name = "K")]
    share_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(DEFAULT_FILTER);
    let config = MaprConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Grade { score } => {
            grade(score);
            Ok(())
        }
        Commands::Style(args) => style(&config, args),
    }
}

async fn serve(config: MaprConfig) -> Result<()> {
    println!("\n{}", "═".repeat(60));
    println!("🗺️  Mobility Map View v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));
    println!("Backend: {}", config.api_base_url);
    println!("{}\n", "═".repeat(60));

    let backend: Arc<dyn MapBackend> = Arc::new(HttpBackend::new(&config)?);
    let addr = config.server_addr.clone();
    let controller = MapViewController::spawn(config, backend);

    info!("Starting bridge server on {}", addr);
    mobi_mapr::server::run_server(controller, &addr).await
}

fn grade(score: f64) {
    println!("grade:   {}", grade_of(score));
    println!("label:   {}", score_label(score));
    println!("colour:  {}", band_color_of(score).hex());
    println!("band:    {:?}", grade_of(score).sextet());
}

fn style_inputs(args: StyleArgs) -> Result<StyleInputs> {
    let mut project = Project::new(args.project_id, format!("project {}", args.project_id));
    project.difference = args.difference;
    let visualization = if args.score { VisualizationType::Score } else { VisualizationType::Index };
    let average = if args.area { AverageType::Area } else { AverageType::Population };

    let credential = Credential::from_parts(args.token, args.share_key)?;
    let logged_in = credential.as_ref().is_some_and(Credential::is_logged_in);
    let choice = select_resolution(args.zoom, ViewToggles::default(), logged_in);

    Ok(StyleInputs {
        mode: VisualizationMode::resolve(Some(&project), visualization),
        project: Some(project),
        level: choice.level,
        average,
        credential,
        ..StyleInputs::empty(choice.level)
    })
}

fn style(config: &MaprConfig, args: StyleArgs) -> Result<()> {
    let inputs = style_inputs(args)?;
    let spec = StyleBuilder::new(config).build(&inputs);
    println!("{}", serde_json::to_string_pretty(&spec.to_json())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_mapr::model::ResolutionLevel;

    fn style_args(argv: &[&str]) -> StyleArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Style(args) => args,
            other => panic!("expected style, got {:?}", other),
        }
    }

    #[test]
    fn test_style_flags() {
        let args = style_args(&["mobi_mapr", "style", "12", "9.5", "--difference", "--area", "--token", "abc"]);
        let inputs = style_inputs(args).unwrap();
        assert_eq!(inputs.mode, VisualizationMode::Difference);
        assert_eq!(inputs.average, AverageType::Area);
        assert_eq!(inputs.level, ResolutionLevel::Municipality);
        assert_eq!(inputs.credential, Some(Credential::Token("abc".into())));
        assert_eq!(inputs.project.map(|p| p.id), Some(12));
    }

    #[test]
    fn test_token_and_share_key_conflict() {
        let result = Cli::try_parse_from(["mobi_mapr", "style", "1", "5", "--token", "t", "--share-key", "k"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_grade_accepts_negative_and_rejects_text() {
        let cli = Cli::try_parse_from(["mobi_mapr", "grade", "-0.2"]).unwrap();
        assert!(matches!(cli.command, Commands::Grade { score } if score == -0.2));
        assert!(Cli::try_parse_from(["mobi_mapr", "grade", "abc"]).is_err());
        assert!(Cli::try_parse_from(["mobi_mapr"]).is_err());
    }
}
