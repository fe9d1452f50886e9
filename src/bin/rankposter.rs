use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rankposter", version)]
struct Cli {
    /// Poster config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog with 1-based indices.
    Catalog,
    /// Show how one line of text is fitted.
    Fit(FitArgs),
    /// Compose a ranking and export it as PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Text to fit (normalized and uppercased like a title).
    text: String,

    /// Available width in canvas px. Defaults to the title column.
    #[arg(long)]
    width: Option<f32>,

    /// Maximum size in px. Defaults to the base size for one row.
    #[arg(long)]
    max: Option<u32>,

    /// Use fixed-width block glyphs instead of the configured font.
    #[arg(long)]
    block_font: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Picks in rank order: 1-based catalog indices or exact titles.
    #[arg(required = false)]
    picks: Vec<String>,

    /// Signature shown bottom right.
    #[arg(long)]
    signature: Option<String>,

    /// Directory the PNG is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Render scale override (device px per canvas px).
    #[arg(long)]
    scale: Option<f64>,

    /// Also write the preview frame to this PNG path.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Use fixed-width block glyphs instead of the configured font.
    #[arg(long)]
    block_font: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => rankposter::PosterConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => rankposter::PosterConfig::default(),
    };

    match cli.cmd {
        Command::Catalog => cmd_catalog(&cfg),
        Command::Fit(args) => cmd_fit(&cfg, args),
        Command::Render(args) => cmd_render(cfg, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_catalog(cfg: &rankposter::PosterConfig) -> anyhow::Result<()> {
    for (i, title) in cfg.catalog.titles().iter().enumerate() {
        println!("{:>2}. {title}", i + 1);
    }
    Ok(())
}

fn cmd_fit(cfg: &rankposter::PosterConfig, args: FitArgs) -> anyhow::Result<()> {
    let face: Box<dyn rankposter::FontFace> = if args.block_font {
        Box::new(rankposter::BlockFace::default())
    } else {
        Box::new(cfg.assets.font.load(Path::new("."))?)
    };

    let layout = &cfg.layout;
    let width = args.width.unwrap_or(layout.title_column().width());
    let mut params = layout.title_fit(layout.base_size_for(1));
    if let Some(max) = args.max {
        params.max_px = max;
        params.min_px = params.min_px.min(max);
    }

    let text = rankposter::display_title(&args.text);
    let fitted = rankposter::fit_text(face.as_ref(), &text, width, &params)?;
    println!("font      {}", face.family_name());
    println!("text      {text}");
    println!("width     {width:.1} (budget {:.1})", width * params.safety_margin);
    println!("size      {} px [{}..={}]", fitted.font_size, params.min_px, params.max_px);
    println!("measured  {:.1}", fitted.line.width);
    if fitted.truncated {
        println!(
            "truncated {} -> {:?}",
            text.chars().count(),
            fitted.line.text()
        );
    }
    Ok(())
}

fn cmd_render(mut cfg: rankposter::PosterConfig, args: RenderArgs) -> anyhow::Result<()> {
    if let Some(scale) = args.scale {
        cfg.export.render_scale = scale;
    }
    let mut session = rankposter::RankingSession::new(&cfg)?;

    if args.block_font {
        session.attach_assets(rankposter::PreparedAssets::prepare_with_face(
            &cfg.assets.background,
            Path::new("."),
            cfg.layout.canvas,
            cfg.export.render_scale,
            Arc::new(rankposter::BlockFace::default()),
        )?);
    } else {
        session.load_assets(&cfg.assets, Path::new("."))?;
    }

    for pick in &args.picks {
        let title = resolve_pick(&cfg.catalog, pick)?;
        match session.add(&title) {
            rankposter::AddOutcome::Added(rank) => {
                tracing::info!(rank = rank + 1, title = %title, "ranked");
            }
            other => eprintln!("skipped '{title}': {other:?}"),
        }
    }
    if let Some(signature) = &args.signature {
        session.set_signature(signature.as_str());
    }

    if let Some(path) = &args.preview {
        let frame = session.preview()?;
        write_frame_png(path, &frame)?;
        eprintln!("wrote {}", path.display());
    }

    let artifact = session.export()?;
    let path = artifact.write_to_dir(&args.out_dir)?;
    eprintln!(
        "wrote {} ({}x{})",
        path.display(),
        artifact.width,
        artifact.height
    );
    Ok(())
}

fn resolve_pick(catalog: &rankposter::Catalog, pick: &str) -> anyhow::Result<String> {
    if let Ok(n) = pick.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| catalog.get(i))
            .map(str::to_string)
            .with_context(|| format!("no catalog entry #{n} (1..={})", catalog.len()));
    }
    let i = catalog
        .position(pick)
        .with_context(|| format!("'{pick}' is not in the catalog"))?;
    Ok(catalog.titles()[i].clone())
}

fn write_frame_png(path: &Path, frame: &rankposter::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
