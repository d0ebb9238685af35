use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "posemaster")]
#[command(about = "PoseMaster CLI - AI photo shoot planner", long_about = None)]
struct Cli {
    /// Directory holding secret.json (defaults to ~/.config/posemaster)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the secret.json template in the config directory
    Init,
    /// List the built-in scene and style presets
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the composition archetypes used for every shoot
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one shoot: pick a scene and a style, then generate the variants
    Shoot(ShootArgs),
}

#[derive(Args)]
pub struct ShootArgs {
    /// Scene preset id, local image file, or image URL
    #[arg(long, conflicts_with = "scene_prompt", required_unless_present = "scene_prompt")]
    pub scene: Option<String>,

    /// Generate the scene from this prompt instead
    #[arg(long)]
    pub scene_prompt: Option<String>,

    /// Description of a scene given as a file or URL
    #[arg(long)]
    pub scene_description: Option<String>,

    /// Style preset id
    #[arg(long, conflicts_with = "style_prompt", required_unless_present = "style_prompt")]
    pub style: Option<String>,

    /// Generate the style reference from this description instead
    #[arg(long)]
    pub style_prompt: Option<String>,

    /// Number of people in the shot (1-10)
    #[arg(long, default_value_t = 1)]
    pub people: u32,

    /// Directory the variant images are written to
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the image model
    #[arg(long)]
    pub image_model: Option<String>,

    /// Override the text model
    #[arg(long)]
    pub text_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = cli.config_dir.as_deref();

    match cli.command {
        Commands::Init => commands::init::run(config_dir)?,
        Commands::Presets { json } => commands::presets::run(json)?,
        Commands::Catalog { json } => commands::catalog::run(json)?,
        Commands::Shoot(args) => commands::shoot::run(config_dir, args).await?,
    }

    Ok(())
}
