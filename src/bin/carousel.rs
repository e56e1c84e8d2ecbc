//! CLI binary for carousel-gen.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CarouselConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use carousel_gen::config::DEFAULT_API_BASE;
use carousel_gen::{
    generate_plan, plan, CarouselConfig, CarouselPlan, GenerationProgressCallback,
    ProgressCallback, RenderingSpeed,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the run plus a log line per slide.
///
/// The bar stays hidden until `on_run_start`, so a run that fails before
/// its first slide (e.g. a missing key) leaves nothing on the terminal.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:32.green/238}] {pos:>2}/{len} slides  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix("Generating");
        Arc::new(Self { bar })
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_slides: usize) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_length(total_slides as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_slides} slides…"))
        ));
    }

    fn on_slide_start(&self, slide_num: usize, _total: usize, title: &str) {
        self.bar.set_message(format!("slide {slide_num}: {title}"));
    }

    fn on_slide_complete(&self, slide_num: usize, total: usize, bytes: usize) {
        self.bar.println(format!(
            "  {} Slide {:>2}/{:<2}  {}",
            green("✓"),
            slide_num,
            total,
            dim(&format!("{:>8} bytes", bytes)),
        ));
        self.bar.inc(1);
    }

    fn on_slide_error(&self, slide_num: usize, total: usize, error: &str) {
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Slide {:>2}/{:<2}  {}",
            red("✗"),
            slide_num,
            total,
            red(&msg)
        ));
        self.bar.abandon();
    }

    fn on_run_complete(&self, total_slides: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} slides generated",
            green("✔"),
            bold(&total_slides.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Preview every prompt, no API key needed
  carousel brief.md --dry-run

  # Generate into ./output (slide-01.png … carousel.pdf)
  carousel brief.md

  # Custom output directory, best text rendering
  carousel brief.md -o build/carousel --rendering-speed quality

INPUT FORMAT:
  ## CAROUSEL SLIDES

  ### Slide 1 — Hook
  **Bold line becomes the title**
  **(up to two bold lines)**
  Other lines become the subtext, *emphasis* stripped.
  ---
  ### Slide 2
  ...

ENVIRONMENT VARIABLES:
  IDEOGRAM_API_KEY     Image service key (not needed with --dry-run)
  IDEOGRAM_API_BASE    Override the service URL
  RUST_LOG             Override log filtering (e.g. carousel_gen=debug)
"#;

/// Generate carousel slide images and a PDF from a markdown brief.
#[derive(Parser, Debug)]
#[command(
    name = "carousel",
    version,
    about = "Generate carousel slide images and a PDF from a markdown brief",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the carousel markdown file.
    markdown_file: PathBuf,

    /// Output directory for slide images and the PDF.
    #[arg(short, long, env = "CAROUSEL_OUTPUT", default_value = "./output")]
    output: PathBuf,

    /// Print prompts without calling the API.
    #[arg(long)]
    dry_run: bool,

    /// Image model identifier.
    #[arg(long, env = "CAROUSEL_MODEL", default_value = "V_3")]
    model: String,

    /// Rendering speed: turbo, default, quality.
    #[arg(long, env = "CAROUSEL_RENDERING_SPEED", value_enum, default_value = "default")]
    rendering_speed: SpeedArg,

    /// Pause between slide requests in milliseconds.
    #[arg(long, env = "CAROUSEL_DELAY_MS", default_value_t = 2000)]
    delay_ms: u64,

    /// Image service base URL.
    #[arg(long, env = "IDEOGRAM_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Output structured JSON (plan or run summary) on stdout.
    #[arg(long, env = "CAROUSEL_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "CAROUSEL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CAROUSEL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CAROUSEL_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum SpeedArg {
    Turbo,
    Default,
    Quality,
}

impl From<SpeedArg> for RenderingSpeed {
    fn from(v: SpeedArg) -> Self {
        match v {
            SpeedArg::Turbo => RenderingSpeed::Turbo,
            SpeedArg::Default => RenderingSpeed::Default,
            SpeedArg::Quality => RenderingSpeed::Quality,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; without it the per-slide INFO
    // lines are the feedback.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Parse & synthesize (no network, no credential) ───────────────────
    let plan = plan(&cli.markdown_file).context("Failed to read carousel")?;

    if cli.dry_run {
        print_dry_run(&cli, &plan)?;
        return Ok(());
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "Parsed {} slides from {}",
            plan.len(),
            cli.markdown_file.display()
        );
    }

    // ── Generate ─────────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn GenerationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let output = generate_plan(&plan, &config)
        .await
        .context("Generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        match output.pdf_path {
            Some(ref pdf) => {
                eprintln!(
                    "{}  {} slides  {}ms  →  {}",
                    green("✔"),
                    output.stats.total_slides,
                    output.stats.total_duration_ms,
                    bold(&pdf.display().to_string()),
                );
                println!("PDF created: {}", pdf.display());
            }
            None => eprintln!("{} No slides found; no PDF written", cyan("⚠")),
        }
    }

    Ok(())
}

/// Print every prompt and return without touching the network.
fn print_dry_run(cli: &Cli, plan: &CarouselPlan) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(plan).context("Failed to serialise plan")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "Parsed {} slides from {}",
        plan.len(),
        cli.markdown_file.display()
    );
    println!("\n=== DRY RUN — Prompts Only ===\n");
    for req in &plan.requests {
        println!("--- Slide {}: {} ---", req.slide_number, req.title);
        println!("{}", req.prompt_text);
        println!();
    }
    Ok(())
}

/// Map CLI args to `CarouselConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CarouselConfig> {
    let mut builder = CarouselConfig::builder()
        .output_dir(&cli.output)
        .api_base(&cli.api_base)
        .model(&cli.model)
        .rendering_speed(cli.rendering_speed.clone().into())
        .request_delay_ms(cli.delay_ms);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
