use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use batchframe::{
    ArchiveWriter, Batch, BatchConfig, CropMode, ExportFormat, FileInput, TargetSpec,
    UniqueNames, archive_name, collect_files,
    batch::is_supported,
    presets::{BACKGROUND_PRESETS, SIZE_PRESETS},
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "batchframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize a batch of images.
    Run(RunArgs),
    /// List the built-in size and background presets.
    Presets,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input image files or directories (directories are scanned non-recursively).
    #[arg(long = "in", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// JSON job file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target size as WxH.
    #[arg(long, conflicts_with = "preset")]
    size: Option<TargetSpec>,

    /// Size preset slug (see `batchframe presets`).
    #[arg(long)]
    preset: Option<String>,

    /// Crop mode.
    #[arg(long, value_enum)]
    crop: Option<CropChoice>,

    /// Background preset slug, `transparent`, `#hex`, or `#c1:#c2[:...][:direction]`.
    #[arg(long, conflicts_with = "background_image")]
    background: Option<String>,

    /// Image file cover-fitted behind the source in fill mode.
    #[arg(long)]
    background_image: Option<PathBuf>,

    /// Export format.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// JPEG quality, 1-100. PNG and WebP output is lossless and ignores it.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Write one zip archive instead of individual files.
    #[arg(long)]
    zip: bool,

    /// Archive name prefix.
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CropChoice {
    Top,
    Center,
    Fill,
}

impl From<CropChoice> for CropMode {
    fn from(c: CropChoice) -> Self {
        match c {
            CropChoice::Top => CropMode::Top,
            CropChoice::Center => CropMode::Center,
            CropChoice::Fill => CropMode::Fill,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    #[value(alias = "jpg")]
    Jpeg,
    Png,
    Webp,
}

impl From<FormatChoice> for ExportFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Jpeg => ExportFormat::Jpeg,
            FormatChoice::Png => ExportFormat::Png,
            FormatChoice::Webp => ExportFormat::WebP,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Presets => {
            print_presets();
            Ok(())
        }
    }
}

fn build_config(args: &RunArgs) -> anyhow::Result<BatchConfig> {
    let base = match &args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };

    let overrides = BatchConfig {
        width: args.size.map(TargetSpec::width),
        height: args.size.map(TargetSpec::height),
        size_preset: args.preset.clone(),
        crop: args.crop.map(CropMode::from),
        background: args.background.clone(),
        background_image: args.background_image.clone(),
        format: args.format.map(ExportFormat::from),
        quality: args.quality,
        archive_prefix: args.prefix.clone(),
    };
    Ok(base.merged(overrides))
}

fn gather_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<FileInput>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let files = collect_files(path)
                .with_context(|| format!("scan input dir '{}'", path.display()))?;
            inputs.extend(files.into_iter().map(FileInput::new));
        } else if path.is_file() {
            if !is_supported(path) {
                tracing::warn!(path = %path.display(), "extension not recognized, trying anyway");
            }
            inputs.push(FileInput::new(path));
        } else {
            anyhow::bail!("input '{}' does not exist", path.display());
        }
    }
    Ok(inputs)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let settings = config.to_settings().context("invalid batch settings")?;
    let inputs = gather_inputs(&args.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("no supported images found");
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let target = settings.target;
    if args.quality.is_some() && !settings.effective_format().uses_quality() {
        tracing::warn!(
            format = %settings.effective_format(),
            "--quality has no effect on lossless output"
        );
    }
    let mut batch = Batch::new(settings, inputs);

    if args.zip {
        let zip_path = args.out.join(archive_name(config.archive_prefix(), target));
        let file = File::create(&zip_path)
            .with_context(|| format!("create archive '{}'", zip_path.display()))?;
        let mut archive = ArchiveWriter::new(BufWriter::new(file));

        for result in batch.by_ref().flatten() {
            let entry = archive.add(&result)?;
            if entry != result.name {
                tracing::warn!(output = %result.name, entry = %entry, "duplicate name, renamed");
            }
        }

        if archive.is_empty() {
            drop(archive);
            std::fs::remove_file(&zip_path).ok();
        } else {
            archive.finish()?;
            eprintln!("wrote {}", zip_path.display());
        }
    } else {
        let mut names = UniqueNames::new();
        for result in batch.by_ref().flatten() {
            let name = names.claim(&result.name);
            if name != result.name {
                tracing::warn!(output = %result.name, file = %name, "duplicate name, renamed");
            }
            write_output(&args.out.join(&name), &result.bytes)?;
        }
    }

    eprintln!("done: {}", batch.summary());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn print_presets() {
    println!("size presets:");
    let mut category = "";
    for p in SIZE_PRESETS {
        if p.category != category {
            category = p.category;
            println!("  {category}:");
        }
        println!("    {:<22} {}x{}  {}", p.slug, p.width, p.height, p.label);
    }

    println!("background presets:");
    let mut category = "";
    for p in BACKGROUND_PRESETS {
        if p.category != category {
            category = p.category;
            println!("  {category}:");
        }
        println!("    {:<22} {}", p.slug, p.text);
    }
}
