use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "squareshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a square profile picture as a PNG.
    Render(RenderArgs),
    /// List the output size presets.
    Presets,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo (JPEG, PNG, or GIF, at most 10 MiB).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path. Defaults to a timestamped name next to the input.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render parameters JSON (`{"output_size": 800, "blur_radius": 20}`); flags override it.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output edge length in pixels.
    #[arg(long, conflicts_with = "preset")]
    size: Option<u32>,

    /// Output size preset.
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,

    /// Background blur radius in pixels (0 disables the blur).
    #[arg(long)]
    blur: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Small,
    Medium,
    Large,
}

impl From<PresetChoice> for squareshot::SizePreset {
    fn from(p: PresetChoice) -> Self {
        match p {
            PresetChoice::Small => squareshot::SizePreset::Small,
            PresetChoice::Medium => squareshot::SizePreset::Medium,
            PresetChoice::Large => squareshot::SizePreset::Large,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Presets => cmd_presets(),
    }
}

fn resolve_params(args: &RenderArgs) -> anyhow::Result<squareshot::RenderParams> {
    let mut params = match &args.params {
        Some(path) => squareshot::RenderParams::from_path(path)
            .with_context(|| format!("load render params '{}'", path.display()))?,
        None => squareshot::RenderParams::default(),
    };
    if let Some(preset) = args.preset {
        params = params.with_preset(preset.into());
    }
    if let Some(size) = args.size {
        params.output_size = size;
    }
    if let Some(blur) = args.blur {
        params.blur_radius = blur;
    }
    params.validate()?;
    Ok(params)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let params = resolve_params(&args)?;

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    let source = squareshot::decode_upload(&bytes)
        .with_context(|| format!("decode input '{}'", args.in_path.display()))?;
    tracing::info!(
        width = source.width(),
        height = source.height(),
        "decoded input"
    );

    let result = squareshot::render(&source, &params)?;
    let png = squareshot::encode_png(&result)?;

    let out = args.out.clone().unwrap_or_else(|| {
        let dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
        dir.join(squareshot::download_file_name(chrono::Utc::now()))
    });
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in squareshot::SizePreset::ALL {
        let size = preset.output_size();
        println!("{:<8} {size}x{size}", format!("{preset:?}").to_lowercase());
    }
    Ok(())
}
