use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use sprite_sheet_core::codegen::to_json;
use sprite_sheet_core::prelude::*;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-sheet",
    about = "Pack images into a CSS sprite sheet",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into one sheet and generate css/scss/json for it
    Pack(PackArgs),
    /// Slice a sheet into one PNG per rectangle, optionally re-packing the slices
    Explode(ExplodeArgs),
    /// Generate code for the stored session
    Generate(GenerateArgs),
    /// Share layouts as URL fragments
    #[command(subcommand)]
    Url(UrlCommand),
    /// Inspect or clear the stored session
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Parser, Debug, Clone)]
struct StoreArgs {
    /// Session store directory
    #[arg(long, default_value = ".sprite-sheet")]
    store: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Sheet base name (files will be name.png/.css/...)
    #[arg(short, long, default_value = "sprite", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout/export options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Save the packed session to this store directory
    #[arg(long, help_heading = "Input/Output")]
    store: Option<PathBuf>,

    // Layout
    /// Padding between sprites and between rows
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    padding: u32,
    /// Lower bound of the estimated row width
    #[arg(long, default_value_t = 512, help_heading = "Layout")]
    min_row_width: u32,
    /// Upper bound of the estimated row width
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_row_width: u32,
    /// Multiplier applied to sqrt(total area) when estimating the row width
    #[arg(long, default_value_t = 1.5, help_heading = "Layout")]
    row_width_factor: f64,
    /// Draw red outlines (debug)
    #[arg(long, default_value_t = false, help_heading = "Image Processing")]
    outlines: bool,

    // Export
    /// Output format: css | scss | json (repeatable)
    #[arg(long = "format", default_value = "css", help_heading = "Export")]
    formats: Vec<String>,
    /// Sheet URL referenced from css/scss (defaults to <name>.png)
    #[arg(long, help_heading = "Export")]
    image_url: Option<String>,
    /// Base class name; sprite classes are <prefix>-<name>
    #[arg(long, default_value = "sprite", help_heading = "Export")]
    class_prefix: String,
    /// External template file (handlebars) rendered next to the --format outputs
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct ExplodeArgs {
    /// Sheet image to slice
    sheet: PathBuf,
    /// Layout JSON as written by `pack --format json`
    #[arg(long)]
    layout: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
    /// Re-pack the slices into a new sheet instead of writing one PNG each
    #[arg(long, default_value_t = false)]
    repack: bool,
    /// Base name of the re-packed sheet
    #[arg(short, long, default_value = "repacked")]
    name: String,
    /// Padding used when re-packing
    #[arg(long, default_value_t = 2)]
    padding: u32,
    /// Output format written for the re-packed sheet (repeatable)
    #[arg(long = "format", default_value = "json")]
    formats: Vec<String>,
    /// Save the re-packed session to this store directory
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    #[command(flatten)]
    store: StoreArgs,
    /// Output format: css | scss | json
    #[arg(long, default_value = "css")]
    format: String,
    /// External template file (handlebars); replaces --format
    #[arg(long)]
    template: Option<PathBuf>,
    /// Sheet URL referenced from css/scss
    #[arg(long, default_value = "sprite.png")]
    image_url: String,
    /// Base class name; sprite classes are <prefix>-<name>
    #[arg(long, default_value = "sprite")]
    class_prefix: String,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum UrlCommand {
    /// Print the URL fragment for the stored session
    Encode(StoreArgs),
    /// Decode a URL fragment and print its rectangles as JSON
    Decode {
        /// Fragment, with or without the leading '#'
        fragment: String,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Summarize the stored session
    Show(StoreArgs),
    /// Remove the stored session
    Clear(StoreArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, show_progress).await,
        Commands::Explode(args) => run_explode(args).await,
        Commands::Generate(args) => run_generate(args),
        Commands::Url(UrlCommand::Encode(s)) => {
            let (metadata, _) = load_session(&s.store)?;
            println!("{}", url_state::to_fragment(&metadata.rectangles));
            Ok(())
        }
        Commands::Url(UrlCommand::Decode { fragment }) => run_url_decode(fragment),
        Commands::Session(SessionCommand::Show(s)) => run_session_show(&s.store),
        Commands::Session(SessionCommand::Clear(s)) => {
            open_store(&s.store)?
                .clear()
                .with_context(|| format!("clear session in {}", s.store.display()))?;
            info!(store = %s.store.display(), "session cleared");
            Ok(())
        }
    }
}

async fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut settings = Settings {
        packer: PackerConfig::builder()
            .padding(cli.padding)
            .row_width_bounds(cli.min_row_width, cli.max_row_width)
            .row_width_factor(cli.row_width_factor)
            .build(),
        render: RenderConfig {
            outlines: cli.outlines,
        },
        codegen: CodegenOptions {
            image_url: cli
                .image_url
                .clone()
                .unwrap_or_else(|| format!("{}.png", cli.name)),
            class_prefix: cli.class_prefix.clone(),
        },
        formats: parse_formats(&cli.formats)?,
    };
    // Config file values win over flags
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        settings = y.into_settings(settings)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&settings)?),
            _ => println!("{}", serde_json::to_string_pretty(&settings)?),
        }
        return Ok(());
    }
    settings.packer.validate()?;

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let items = load_items_with_progress(&paths, show_progress)?;
    info!(count = items.len(), "loaded input images");

    let sheet = pack_items(items, &settings.packer)?;
    let layout = sheet.layout.clone();
    let stats = layout.stats();
    info!(
        sprites = stats.num_sprites,
        width = layout.canvas_width,
        height = layout.canvas_height,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );
    if cli.dry_run {
        println!(
            "sprites={} canvas={}x{} used_area={} occupancy={:.2}%",
            stats.num_sprites,
            layout.canvas_width,
            layout.canvas_height,
            stats.used_area,
            stats.occupancy * 100.0
        );
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    let renderer = CompositeRenderer::new(settings.render.clone());
    let raster = renderer
        .draw(&sheet.placed, layout.canvas_width, layout.canvas_height)
        .await?;
    let raster = write_sheet(&cli.out_dir, &cli.name, raster)?;
    write_outputs(
        &cli.out_dir,
        &cli.name,
        &layout,
        &settings,
        cli.template.as_deref(),
    )?;
    info!(fragment = %url_state::to_fragment(&layout.rectangles), "share link");

    if let Some(dir) = &cli.store {
        save_session(dir, &SessionState::multi_item().with_layout(layout), raster).await?;
    }
    Ok(())
}

async fn run_explode(cli: &ExplodeArgs) -> anyhow::Result<()> {
    let raster = read_raster(&cli.sheet)?;
    let rectangles = read_layout(&cli.layout)?;
    info!(
        rectangles = rectangles.len(),
        width = raster.width,
        height = raster.height,
        "exploding sheet"
    );
    let renderer = CompositeRenderer::default();
    let items = renderer.explode(&raster, &rectangles).await?;
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    if !cli.repack {
        for item in &items {
            let PixelSource::Encoded(png) = &item.source else {
                continue;
            };
            let path = cli.out_dir.join(format!("{}.png", item.name));
            fs::write(&path, &png[..]).with_context(|| format!("write {}", path.display()))?;
        }
        info!(count = items.len(), out_dir = %cli.out_dir.display(), "slices written");
        return Ok(());
    }

    let settings = Settings {
        packer: PackerConfig::builder().padding(cli.padding).build(),
        render: RenderConfig::default(),
        codegen: CodegenOptions {
            image_url: format!("{}.png", cli.name),
            ..Default::default()
        },
        formats: parse_formats(&cli.formats)?,
    };
    let sheet = pack_items(items, &settings.packer)?;
    let layout = sheet.layout.clone();
    let raster = renderer
        .draw(&sheet.placed, layout.canvas_width, layout.canvas_height)
        .await?;
    let raster = write_sheet(&cli.out_dir, &cli.name, raster)?;
    write_outputs(&cli.out_dir, &cli.name, &layout, &settings, None)?;
    if let Some(dir) = &cli.store {
        save_session(dir, &SessionState::multi_item().with_layout(layout), raster).await?;
    }
    Ok(())
}

fn run_generate(cli: &GenerateArgs) -> anyhow::Result<()> {
    let (metadata, _) = load_session(&cli.store.store)?;
    let opts = CodegenOptions {
        image_url: cli.image_url.clone(),
        class_prefix: cli.class_prefix.clone(),
    };
    let layout = LayoutResult {
        rectangles: metadata.rectangles,
        canvas_width: metadata.canvas_width,
        canvas_height: metadata.canvas_height,
    };
    let text = match &cli.template {
        Some(path) => render_template(path, &layout, &opts)?,
        None => generate_named(
            &layout.rectangles,
            layout.canvas_width,
            layout.canvas_height,
            &cli.format,
            &opts,
        )?,
    };
    match &cli.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "generated");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_url_decode(fragment: &str) -> anyhow::Result<()> {
    let text = fragment.strip_prefix('#').unwrap_or(fragment);
    if !text.starts_with(url_state::VERSION_PREFIX) {
        warn!("fragment carries no recognized layout");
    }
    let (rectangles, skipped) = url_state::decode_with_report(text);
    for bad in &skipped {
        warn!(index = bad.index, raw = %bad.raw, reason = bad.reason, "skipped record");
    }
    println!("{}", serde_json::to_string_pretty(&to_json(&rectangles))?);
    Ok(())
}

fn run_session_show(store: &Path) -> anyhow::Result<()> {
    let Some(record) = open_store(store)?
        .load()
        .with_context(|| format!("load session from {}", store.display()))?
    else {
        println!("no session stored in {}", store.display());
        return Ok(());
    };
    let meta = &record.metadata;
    println!("saved_at: {}", record.saved_at.to_rfc3339());
    println!("mode: {:?}", meta.mode);
    println!("canvas: {}x{}", meta.canvas_width, meta.canvas_height);
    match &record.raster {
        Some(r) => println!("raster: {}x{} ({} bytes)", r.width, r.height, r.png.len()),
        None => println!("raster: none"),
    }
    if !meta.pending.is_empty() {
        println!("pending: {}", meta.pending.len());
    }
    let layout = LayoutResult {
        rectangles: meta.rectangles.clone(),
        canvas_width: meta.canvas_width,
        canvas_height: meta.canvas_height,
    };
    println!("{}", layout.stats().summary());
    for r in &meta.rectangles {
        println!("  {:<24} {:>5},{:<5} {}x{}", r.name, r.x, r.y, r.w, r.h);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct Settings {
    packer: PackerConfig,
    render: RenderConfig,
    codegen: CodegenOptions,
    formats: Vec<OutputFormat>,
}

fn parse_formats(names: &[String]) -> anyhow::Result<Vec<OutputFormat>> {
    let mut formats = Vec::with_capacity(names.len());
    for name in names {
        let f: OutputFormat = name.parse()?;
        if !formats.contains(&f) {
            formats.push(f);
        }
    }
    Ok(formats)
}

/// Writes `<name>.png`; a blank raster (no sprites) produces no file and is not kept.
fn write_sheet(out_dir: &Path, name: &str, raster: RasterBlob) -> anyhow::Result<Option<RasterBlob>> {
    if raster.is_empty() {
        warn!("no sprites to draw, skipping sheet image");
        return Ok(None);
    }
    let png_path = out_dir.join(format!("{name}.png"));
    fs::write(&png_path, &raster.png[..])
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, width = raster.width, height = raster.height, "wrote sheet");
    Ok(Some(raster))
}

fn write_outputs(
    out_dir: &Path,
    name: &str,
    layout: &LayoutResult,
    settings: &Settings,
    template: Option<&Path>,
) -> anyhow::Result<()> {
    for format in &settings.formats {
        let text = generate(
            &layout.rectangles,
            layout.canvas_width,
            layout.canvas_height,
            *format,
            &settings.codegen,
        );
        let path = out_dir.join(format!("{name}.{}", format.extension()));
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "generated");
    }
    if let Some(tpl_path) = template {
        let rendered = render_template(tpl_path, layout, &settings.codegen)?;
        // icons.less.hbs -> <name>.less
        let ext = tpl_path
            .file_stem()
            .and_then(|s| Path::new(s).extension().or(Some(s)))
            .and_then(|s| s.to_str())
            .unwrap_or("txt");
        let out_path = out_dir.join(format!("{name}.{ext}"));
        fs::write(&out_path, rendered)
            .with_context(|| format!("write {}", out_path.display()))?;
        info!(?out_path, "template written");
    }
    Ok(())
}

async fn save_session(
    dir: &Path,
    state: &SessionState,
    raster: Option<RasterBlob>,
) -> anyhow::Result<()> {
    let store = open_store(dir)?;
    let autosave = Autosave::new(Arc::new(store), AutosaveConfig::default());
    autosave
        .save_now(SessionSnapshot {
            metadata: state.metadata(),
            raster,
        })
        .await
        .with_context(|| format!("save session to {}", dir.display()))?;
    info!(store = %dir.display(), "session saved");
    Ok(())
}

fn open_store(dir: &Path) -> anyhow::Result<FileStore> {
    FileStore::open(dir).with_context(|| format!("open store {}", dir.display()))
}

fn load_session(dir: &Path) -> anyhow::Result<(SessionMetadata, Option<RasterBlob>)> {
    let record = open_store(dir)?
        .load()
        .with_context(|| format!("load session from {}", dir.display()))?
        .with_context(|| format!("no session stored in {}", dir.display()))?;
    Ok((record.metadata, record.raster))
}

fn read_raster(path: &Path) -> anyhow::Result<RasterBlob> {
    let bytes: Arc<[u8]> = Arc::from(fs::read(path).with_context(|| format!("read {}", path.display()))?);
    let probe = ingest_bytes("sheet", Arc::clone(&bytes))
        .with_context(|| format!("read image header of {}", path.display()))?;
    Ok(RasterBlob {
        width: probe.w,
        height: probe.h,
        png: bytes,
    })
}

#[derive(Debug, Deserialize)]
struct JsonFrame {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Reads `{ name: { x, y, width, height } }` keeping the file's key order.
fn read_layout(path: &Path) -> anyhow::Result<Vec<Rectangle>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let frames: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("parse layout {}", path.display()))?;
    let mut rectangles = Vec::with_capacity(frames.len());
    for (name, value) in frames {
        let f: JsonFrame = serde_json::from_value(value)
            .with_context(|| format!("frame '{name}' in {}", path.display()))?;
        rectangles.push(Rectangle::new(
            sanitize_name(&name),
            Rect::new(f.x, f.y, f.width, f.height),
        ));
    }
    Ok(rectangles)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif" | "webp")
    )
}

fn load_items_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<UnpositionedItem>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_item(p) {
            Ok(item) => list.push(item),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_item(p: &Path) -> anyhow::Result<UnpositionedItem> {
    let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("sprite");
    let bytes = fs::read(p)?;
    Ok(ingest_bytes(name, bytes)?)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Serialize)]
struct TemplateSprite {
    name: String,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TemplateContext {
    image: String,
    class_prefix: String,
    width: u32,
    height: u32,
    sprites: Vec<TemplateSprite>,
}

fn build_template_context(layout: &LayoutResult, opts: &CodegenOptions) -> TemplateContext {
    let sprites = layout
        .rectangles
        .iter()
        .map(|r| TemplateSprite {
            name: r.name.clone(),
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
        })
        .collect();
    TemplateContext {
        image: opts.image_url.clone(),
        class_prefix: opts.class_prefix.clone(),
        width: layout.canvas_width,
        height: layout.canvas_height,
        sprites,
    }
}

fn render_template(
    path: &Path,
    layout: &LayoutResult,
    opts: &CodegenOptions,
) -> anyhow::Result<String> {
    let tpl = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_template_string("tpl", tpl)?;
    Ok(reg.render("tpl", &build_template_context(layout, opts))?)
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    padding: Option<u32>,
    min_row_width: Option<u32>,
    max_row_width: Option<u32>,
    row_width_factor: Option<f64>,
    outlines: Option<bool>,
    image_url: Option<String>,
    class_prefix: Option<String>,
    formats: Option<Vec<String>>,
}

impl YamlConfig {
    fn into_settings(self, mut s: Settings) -> anyhow::Result<Settings> {
        if let Some(v) = self.padding {
            s.packer.padding = v;
        }
        if let Some(v) = self.min_row_width {
            s.packer.min_row_width = v;
        }
        if let Some(v) = self.max_row_width {
            s.packer.max_row_width = v;
        }
        if let Some(v) = self.row_width_factor {
            s.packer.row_width_factor = v;
        }
        if let Some(v) = self.outlines {
            s.render.outlines = v;
        }
        if let Some(v) = self.image_url {
            s.codegen.image_url = v;
        }
        if let Some(v) = self.class_prefix {
            s.codegen.class_prefix = v;
        }
        if let Some(v) = self.formats {
            s.formats = parse_formats(&v)?;
        }
        Ok(s)
    }
}
