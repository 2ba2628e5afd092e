//! Reports per-block luma statistics of a y4m clip as JSON.

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use av_blockdsp::{AnalysisOptions, BlockSize, CpuFeatureLevel, PlaneAnalysis, analyze_plane};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use serde::Serialize;

/// Per-block luma statistics of a y4m clip
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Sets the input file to use, or `-` for stdin
    input: PathBuf,

    /// File to write results in, instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Side length of the blocks whose transform activity is measured (8 or 16)
    #[arg(long, default_value = "16", value_parser = parse_block_size)]
    block_size: BlockSize,

    /// Count the DC coefficient towards block activity
    #[arg(long)]
    keep_dc: bool,

    /// Stop after this many frames
    #[arg(long)]
    limit: Option<usize>,

    /// Include the full per-block maps of every frame
    #[arg(long)]
    full: bool,

    /// Log more, repeat for trace output
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_block_size(s: &str) -> Result<BlockSize, String> {
    let side: usize = s.parse().map_err(|e| format!("{e}"))?;
    match BlockSize::from_width_and_height_opt(side, side) {
        Ok(bsize @ (BlockSize::BLOCK_8X8 | BlockSize::BLOCK_16X16)) => Ok(bsize),
        _ => Err(format!("block size must be 8 or 16, got {side}")),
    }
}

#[derive(Debug, Serialize)]
struct FrameSummary {
    frame: usize,
    mean_of_means: Option<f64>,
    total_activity: u64,
    max_activity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<PlaneAnalysis>,
}

impl FrameSummary {
    fn new(frame: usize, analysis: PlaneAnalysis, full: bool) -> Self {
        FrameSummary {
            frame,
            mean_of_means: analysis.mean_of_means(),
            total_activity: analysis.total_activity(),
            max_activity: analysis.max_activity(),
            blocks: full.then_some(analysis),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    width: usize,
    height: usize,
    block_size: BlockSize,
    keep_dc: bool,
    frame_count: usize,
    /// Average speed (FPS)
    speed: f64,
    frames: Vec<FrameSummary>,
}

fn init_logger(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => console::style("error").red().bold(),
                log::Level::Warn => console::style("warn").yellow(),
                log::Level::Info => console::style("info").green(),
                log::Level::Debug => console::style("debug").cyan(),
                log::Level::Trace => console::style("trace").dim(),
            };
            out.finish(format_args!("[{}] {}", level, message));
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("failed to install the logger")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    })?;

    let input: Box<dyn Read> = if args.input.as_os_str() == "-" {
        Box::new(io::stdin())
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open {}", args.input.display()))?;
        Box::new(file)
    };

    let mut decoder = match y4m::decode(BufReader::new(input)) {
        Ok(decoder) => decoder,
        Err(e) => bail!("failed to read the y4m header: {e:?}"),
    };
    if decoder.get_bit_depth() != 8 {
        bail!(
            "only 8-bit input is supported, got {}-bit",
            decoder.get_bit_depth()
        );
    }

    let (width, height) = (decoder.get_width(), decoder.get_height());
    let opts = AnalysisOptions {
        block_size: args.block_size,
        keep_dc: args.keep_dc,
    };
    info!(
        "Analyzing {}x{} luma in {} blocks using {} kernels",
        width,
        height,
        opts.block_size,
        CpuFeatureLevel::detect()
    );

    let start_time = Instant::now();
    let mut frames: Vec<FrameSummary> = Vec::new();
    while args.limit.is_none_or(|limit| frames.len() < limit) {
        let frame = match decoder.read_frame() {
            Ok(frame) => frame,
            Err(y4m::Error::EOF) => break,
            Err(e) => bail!("failed to decode frame {}: {e:?}", frames.len()),
        };
        // Decoded y4m planes are tightly packed.
        let analysis = analyze_plane(frame.get_y_plane(), width, height, width, opts)
            .with_context(|| format!("failed to analyze frame {}", frames.len()))?;
        frames.push(FrameSummary::new(frames.len(), analysis, args.full));
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    let report = Report {
        width,
        height,
        block_size: opts.block_size,
        keep_dc: opts.keep_dc,
        frame_count: frames.len(),
        speed: if elapsed > 0.0 {
            frames.len() as f64 / elapsed
        } else {
            0.0
        },
        frames,
    };
    info!(
        "Analyzed {} frames at {:.2} fps",
        report.frame_count, report.speed
    );

    let output = serde_json::to_string_pretty(&report).context("could not convert results into json")?;
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            file.write_all(output.as_bytes())?;
        }
        None => println!("{output}"),
    }

    Ok(())
}
