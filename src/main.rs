use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use shotmark::{Config, Session, session};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shotmark")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SHOTMARK_GIT_HASH"), ")"),
    about = "Annotate screenshots from the command line"
)]
struct Cli {
    /// Source image (PNG)
    #[arg(long, short = 'i', value_name = "PNG", required_unless_present = "init_config")]
    input: Option<PathBuf>,

    /// Where to write the annotated image
    #[arg(long, short = 'o', value_name = "PNG", required_unless_present = "init_config")]
    output: Option<PathBuf>,

    /// Scene file with annotations to draw over the source
    #[arg(long, short = 's', value_name = "JSON")]
    scene: Option<PathBuf>,

    /// Config file to use instead of ~/.config/shotmark/config.toml
    #[arg(long, short = 'c', value_name = "TOML")]
    config: Option<PathBuf>,

    /// Also write the final annotation list as a scene file
    #[arg(long, value_name = "JSON")]
    save_scene: Option<PathBuf>,

    /// Write the documented default config and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        anyhow::bail!("--input and --output are required");
    };

    let mut session = Session::from_config(&config);
    let bytes =
        fs::read(&input).with_context(|| format!("Failed to read image {}", input.display()))?;
    session
        .load_image_bytes(&bytes)
        .with_context(|| format!("Failed to load image {}", input.display()))?;

    if let Some(scene) = &cli.scene {
        for annotation in session::load_scene(scene)? {
            session.insert_annotation(annotation);
        }
    }

    let png = session.get_snapshot()?.encode_png()?;
    fs::write(&output, png)
        .with_context(|| format!("Failed to write image {}", output.display()))?;
    log::info!(
        "Wrote {} annotations to {}",
        session.annotations().len(),
        output.display()
    );

    if let Some(path) = &cli.save_scene {
        session::save_scene(path, session.annotations())?;
    }

    Ok(())
}
