use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use procflow::color::Matching;
use procflow::config::Config;
use procflow::renderer::ImageFormat;

#[derive(Parser)]
#[command(
    name = "procflow",
    version,
    about = "Turn step/DECISION/CHOICE notation into a process flow diagram"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output file, `-` for stdout [default: process_flow.<format>, stdout for dot]
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output kind [default: format from config, else svg]
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// YAML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Graphviz executable to render with
    #[arg(long)]
    renderer: Option<String>,

    /// Seconds to wait for the renderer
    #[arg(long)]
    timeout: Option<u64>,

    /// Match color keywords against whole words instead of substrings
    #[arg(long)]
    whole_words: bool,

    /// Wrap node labels at this many columns
    #[arg(long)]
    wrap: Option<usize>,

    /// Print the built-in admission workflow example and exit
    #[arg(long)]
    sample: bool,

    /// Print the color key and exit
    #[arg(long)]
    legend: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    Svg,
    Pdf,
    Dot,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.sample {
        print!("{}", procflow::SAMPLE);
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(program) = cli.renderer {
        config.renderer.program = program;
    }
    if let Some(secs) = cli.timeout {
        config.renderer.timeout_secs = secs;
    }
    if cli.whole_words {
        config.matching = Matching::WholeWord;
    }
    if cli.wrap.is_some() {
        config.wrap_width = cli.wrap;
    }

    if cli.legend {
        for (name, fill) in procflow::legend(&config.palette) {
            println!("{name:<10} {fill}");
        }
        return Ok(());
    }

    let input = read_input(cli.file.as_deref())?;
    let emit = cli.emit.unwrap_or(match config.renderer.format {
        ImageFormat::Svg => Emit::Svg,
        ImageFormat::Pdf => Emit::Pdf,
    });

    let flow = procflow::build_with_policy(&input, config.matching.policy());
    for warning in &flow.warnings {
        eprintln!("WARNING: {warning}");
    }

    match emit {
        Emit::Dot => {
            let dot = procflow::dot::write_dot(&flow.graph, &config.palette, config.wrap_width);
            write_output(cli.output.as_deref(), None, dot.as_bytes())?;
        }
        Emit::Svg | Emit::Pdf => {
            config.renderer.format = match emit {
                Emit::Pdf => ImageFormat::Pdf,
                _ => ImageFormat::Svg,
            };
            let image = procflow::render_flow(&flow, &config, &config.renderer())?;
            write_output(
                cli.output.as_deref(),
                Some(config.renderer.format.file_name()),
                &image,
            )?;
        }
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&Path>, default_file: Option<&str>, bytes: &[u8]) -> Result<()> {
    let target = output.or(default_file.map(Path::new));
    match target {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote diagram");
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to write stdout")?;
        }
    }
    Ok(())
}
