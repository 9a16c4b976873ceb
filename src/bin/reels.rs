use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use estate_reels::{
    CancelToken, Collaborators, FfmpegEncoder, FsBlobStore, InMemoryStore, MemoryBlobStore,
    PipelineConfig, RenderJob, RenderPipeline, RenderPool, RenderRequest, SummaryEncoder,
    VideoEncoder, delivery, plan::catalog,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "reels", version, about = "Render and serve listing videos")]
struct Cli {
    /// Pipeline config JSON; `REELS_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a project and store the video.
    Render(RenderArgs),
    /// Render a list of jobs on a worker pool sized by `workers`.
    Batch(BatchArgs),
    /// Render one timeline frame as a PNG (no encoder needed).
    Frame(FrameArgs),
    /// Print stored metadata for a video.
    Info(VideoArgs),
    /// Write a stored video to a file.
    Download(DownloadArgs),
    /// Write a stored video (or a byte range of it) to stdout; headers go to stderr.
    Stream(StreamArgs),
    /// Print the subscription plan catalog.
    Plans,
}

#[derive(Parser, Debug)]
struct RequestArgs {
    /// Collaborator fixture JSON (`users`, `projects`, `agents`).
    #[arg(long)]
    fixture: PathBuf,

    #[arg(long)]
    project: String,

    /// Requesting user id.
    #[arg(long)]
    user: String,

    /// `16:9`, `9:16` or `1:1`.
    #[arg(long, default_value = "16:9")]
    format: String,

    /// `sd`, `hd`, `fullhd` or `4k`.
    #[arg(long, default_value = "sd")]
    quality: String,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Video store root directory.
    #[arg(long)]
    store: PathBuf,

    /// Store a frame summary instead of running ffmpeg.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Collaborator fixture JSON (`users`, `projects`, `agents`).
    #[arg(long)]
    fixture: PathBuf,

    /// JSON array of `{"user_id", "project_id", "format_type", "quality"}` jobs.
    #[arg(long)]
    jobs: PathBuf,

    /// Video store root directory.
    #[arg(long)]
    store: PathBuf,

    /// Store frame summaries instead of running ffmpeg.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Time into the video, in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[arg(long)]
    store: PathBuf,

    #[arg(long)]
    video: Uuid,
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    #[command(flatten)]
    video: VideoArgs,

    /// Output file; defaults to the attachment name in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StreamArgs {
    #[command(flatten)]
    video: VideoArgs,

    /// HTTP `Range` header value, e.g. `bytes=0-1023`.
    #[arg(long)]
    range: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Batch(args) => cmd_batch(config, args),
        Command::Frame(args) => cmd_frame(config, args),
        Command::Info(args) => cmd_info(config, args),
        Command::Download(args) => cmd_download(config, args),
        Command::Stream(args) => cmd_stream(config, args),
        Command::Plans => cmd_plans(),
    }
}

fn open_store(config: &PipelineConfig, root: &Path) -> anyhow::Result<FsBlobStore> {
    Ok(FsBlobStore::open(root)?.with_chunk_bytes(config.stream_chunk_bytes))
}

fn load_request(args: &RequestArgs) -> anyhow::Result<(InMemoryStore, RenderRequest)> {
    let fixture = InMemoryStore::from_json_file(&args.fixture)?;
    let request = RenderRequest::parse(args.project.clone(), &args.format, &args.quality)?;
    Ok((fixture, request))
}

fn encoder_for(config: &PipelineConfig, dry_run: bool) -> Arc<dyn VideoEncoder> {
    if dry_run {
        Arc::new(SummaryEncoder)
    } else {
        Arc::new(FfmpegEncoder::new(config.encoder.ffmpeg_settings()))
    }
}

fn cmd_render(config: PipelineConfig, args: RenderArgs) -> anyhow::Result<()> {
    let (fixture, request) = load_request(&args.request)?;
    let encoder = encoder_for(&config, args.dry_run);
    let store = Arc::new(open_store(&config, &args.store)?);
    let pipeline = RenderPipeline::new(config, encoder, store)?;

    let outcome = pipeline.render_project(
        &args.request.user,
        &request,
        Collaborators::from_one(&fixture),
        &CancelToken::new(),
    )?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn cmd_batch(config: PipelineConfig, args: BatchArgs) -> anyhow::Result<()> {
    let fixture = InMemoryStore::from_json_file(&args.fixture)?;
    let bytes = std::fs::read(&args.jobs)
        .with_context(|| format!("read jobs '{}'", args.jobs.display()))?;
    let jobs: Vec<RenderJob> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse jobs '{}'", args.jobs.display()))?;

    let pool = RenderPool::from_config(&config)?;
    let encoder = encoder_for(&config, args.dry_run);
    let store = Arc::new(open_store(&config, &args.store)?);
    let pipeline = RenderPipeline::new(config, encoder, store)?;

    let results = pool.render_all(
        &pipeline,
        Collaborators::from_one(&fixture),
        &jobs,
        &CancelToken::new(),
    );
    let failed = results.iter().filter(|r| r.is_err()).count();
    let report: Vec<serde_json::Value> = results
        .iter()
        .map(|r| match r {
            Ok(outcome) => serde_json::to_value(outcome),
            Err(e) => Ok(serde_json::json!({ "status": "failed", "error": e.to_string() })),
        })
        .collect::<Result<_, _>>()?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if failed > 0 {
        anyhow::bail!("{failed} of {} renders failed", jobs.len());
    }
    Ok(())
}

fn cmd_frame(config: PipelineConfig, args: FrameArgs) -> anyhow::Result<()> {
    let (fixture, request) = load_request(&args.request)?;
    let pipeline = RenderPipeline::new(
        config,
        Arc::new(SummaryEncoder),
        Arc::new(MemoryBlobStore::new()),
    )?;

    let prepared = pipeline.prepare(
        &args.request.user,
        &request,
        Collaborators::from_one(&fixture),
        &CancelToken::new(),
    )?;
    let idx = prepared.timeline.frame_at_secs(args.at);
    let frame = prepared.timeline.render_frame(idx)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    // Timeline frames are opaque, so premultiplied and straight alpha coincide.
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote frame {} of {} to {}",
        idx.0,
        prepared.timeline.total_frames(),
        args.out.display()
    );
    Ok(())
}

fn cmd_info(config: PipelineConfig, args: VideoArgs) -> anyhow::Result<()> {
    let store = open_store(&config, &args.store)?;
    let video = estate_reels::BlobStore::find_by_video_id(&store, args.video)?;
    println!("{}", serde_json::to_string_pretty(&video)?);
    Ok(())
}

fn cmd_download(config: PipelineConfig, args: DownloadArgs) -> anyhow::Result<()> {
    let store = open_store(&config, &args.video.store)?;
    let response = delivery::download_video(&store, args.video.video)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&response.file_name));
    std::fs::write(&out, &response.body)
        .with_context(|| format!("write video '{}'", out.display()))?;
    eprintln!("wrote {} ({} bytes)", out.display(), response.body.len());
    Ok(())
}

fn cmd_stream(config: PipelineConfig, args: StreamArgs) -> anyhow::Result<()> {
    let store = open_store(&config, &args.video.store)?;
    let response = delivery::stream_video(&store, args.video.video, args.range.as_deref())?;
    eprintln!("HTTP {}", response.status);
    for (name, value) in response.headers() {
        eprintln!("{name}: {value}");
    }
    let mut stdout = std::io::stdout().lock();
    for chunk in response.body {
        stdout.write_all(&chunk?).context("write to stdout")?;
    }
    stdout.flush().context("flush stdout")?;
    Ok(())
}

fn cmd_plans() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&catalog::PLANS)?);
    Ok(())
}
