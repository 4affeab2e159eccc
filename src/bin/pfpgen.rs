use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pfpgen::{
    DEFAULT_TRIM_ALPHA_THRESHOLD, EncodedImage, FontFace, GenerationSettings, RenderOpts,
    SubjectBitmap, TemplateRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "pfpgen", version, about = "Render stylised profile pictures")]
struct Cli {
    /// Log stage details to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one profile picture.
    Render(RenderArgs),
    /// Render several templates from one base settings file in parallel.
    FanOut(FanOutArgs),
    /// List the built-in template ids.
    Templates,
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Background-removed subject image.
    #[arg(long)]
    subject: PathBuf,

    /// Settings JSON (camelCase fields, missing fields use defaults).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Badge font file; falls back to $PFPGEN_FONT, then a system sans-serif face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Keep transparent borders around the subject instead of trimming them.
    #[arg(long, default_value_t = false)]
    no_trim: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Apply this template's overwrites before rendering.
    #[arg(long)]
    template: Option<String>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FanOutArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Templates to render (default: all built-ins).
    #[arg(long, value_delimiter = ',')]
    templates: Vec<String>,

    /// Output directory; files are named `<template>.<ext>`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::FanOut(args) => cmd_fan_out(args),
        Command::Templates => cmd_templates(),
    }
}

struct Inputs {
    subject: SubjectBitmap,
    settings: GenerationSettings,
    opts: RenderOpts,
}

fn load_inputs(args: &InputArgs) -> anyhow::Result<Inputs> {
    let bytes = std::fs::read(&args.subject)
        .with_context(|| format!("read subject '{}'", args.subject.display()))?;
    let mut subject = SubjectBitmap::decode(&bytes)?;
    if !args.no_trim {
        subject = subject.trimmed(DEFAULT_TRIM_ALPHA_THRESHOLD);
    }

    let settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read(path)
                .with_context(|| format!("read settings '{}'", path.display()))?;
            GenerationSettings::from_json_slice(&json)
                .with_context(|| format!("load settings '{}'", path.display()))?
        }
        None => GenerationSettings::default(),
    };

    let font_path = args
        .font
        .clone()
        .or_else(|| std::env::var_os("PFPGEN_FONT").map(PathBuf::from));
    let mut opts = RenderOpts::default();
    if let Some(path) = font_path {
        let font = std::fs::read(&path)
            .with_context(|| format!("read font '{}'", path.display()))?;
        opts = opts.with_badge_font(FontFace::new(font));
    }

    Ok(Inputs {
        subject,
        settings,
        opts,
    })
}

fn write_output(path: &Path, image: &EncodedImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, &image.bytes)
        .with_context(|| format!("write {} '{}'", image.mime(), path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(&args.input)?;
    let image = match &args.template {
        Some(id) => TemplateRegistry::builtin().render(
            id,
            &inputs.subject,
            &inputs.settings,
            &inputs.opts,
        )?,
        None => pfpgen::render(&inputs.subject, &inputs.settings, &inputs.opts)?,
    };
    write_output(&args.out, &image)
}

fn cmd_fan_out(args: FanOutArgs) -> anyhow::Result<()> {
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configure rayon thread pool")?;
    }
    let inputs = load_inputs(&args.input)?;
    let registry = TemplateRegistry::builtin();
    let ids: Vec<&str> = if args.templates.is_empty() {
        registry.ids().collect()
    } else {
        args.templates.iter().map(String::as_str).collect()
    };

    let outputs = registry.render_all(&ids, &inputs.subject, &inputs.settings, &inputs.opts);
    let mut failed = 0usize;
    for out in outputs {
        match out.result {
            Ok(image) => {
                let path = args
                    .out_dir
                    .join(format!("{}.{}", out.id, image.format.extension()));
                write_output(&path, &image)?;
            }
            Err(e) => {
                failed += 1;
                eprintln!("template '{}' failed: {e}", out.id);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} template(s) failed");
    }
    Ok(())
}

fn cmd_templates() -> anyhow::Result<()> {
    for id in TemplateRegistry::builtin().ids() {
        println!("{id}");
    }
    Ok(())
}
