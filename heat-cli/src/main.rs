use clap::{Args, Parser, Subcommand};
use heat_core::{
    BoundaryConditions, DiffusivityField, Execution, RodConfig, Simulation, SimulationConfig,
    SliceSummary, SliceView, simulate_rod,
};
use log::LevelFilter;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log level (error|warn|info|debug|trace); falls back to RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 2-D plate with a circular low-diffusivity inclusion
    Plate(PlateArgs),
    /// 1-D rod with fixed end temperatures
    Rod(RodArgs),
}

#[derive(Args, Debug)]
struct PlateArgs {
    /// JSON SimulationConfig; excludes the geometry, diffusivity and --initial flags
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, conflicts_with = "config", default_value_t = 2.0)]
    length_x: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 2.0)]
    length_y: f64,

    /// Space step (x and y)
    #[arg(long, conflicts_with = "config", default_value_t = 0.025)]
    dx: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 0.00125)]
    dt: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 5.0)]
    total_time: f64,

    /// Temperature of all four edges
    #[arg(long, conflicts_with = "config", default_value_t = 200.0)]
    boundary: f64,

    /// Edge overrides (top = last row, bottom = row 0)
    #[arg(long)]
    top: Option<f64>,
    #[arg(long)]
    bottom: Option<f64>,
    #[arg(long)]
    left: Option<f64>,
    #[arg(long)]
    right: Option<f64>,

    #[arg(long, conflicts_with = "config", default_value_t = 1.5)]
    center_x: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 1.5)]
    center_y: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 0.5)]
    radius: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 0.01)]
    k_inside: f64,

    #[arg(long, conflicts_with = "config", default_value_t = 0.1)]
    k_outside: f64,

    /// Spatially constant diffusivity instead of the inclusion
    #[arg(long, conflicts_with = "config")]
    uniform_k: Option<f64>,

    /// Interior temperature at t = 0
    #[arg(long, conflicts_with = "config", default_value_t = 0.0)]
    initial: f64,

    /// Update rows of each step on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Keep two slices in memory instead of the whole history
    #[arg(long)]
    rolling: bool,

    /// Report every N-th slice (the last slice is always reported)
    #[arg(long, default_value_t = 100)]
    every: usize,

    /// Output directory for grid.json, frames.bin and summary.jsonl
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RodArgs {
    #[arg(long, default_value_t = 2.0)]
    length: f64,

    #[arg(long, default_value_t = 0.1)]
    dx: f64,

    #[arg(long, default_value_t = 0.001)]
    dt: f64,

    #[arg(long, default_value_t = 4.0)]
    total_time: f64,

    /// Diffusivity
    #[arg(long, default_value_t = 0.466)]
    k: f64,

    #[arg(long, default_value_t = 200.0)]
    left: f64,

    #[arg(long, default_value_t = 200.0)]
    right: f64,

    #[arg(long, default_value_t = 0.0)]
    initial: f64,

    #[arg(long, default_value_t = 100)]
    every: usize,
}

#[derive(Serialize)]
struct GridMeta<'a> {
    x_points: usize,
    y_points: usize,
    t_points: usize,
    dx: f64,
    dt: f64,
    every: usize,
    x: &'a [f64],
    y: &'a [f64],
    config: &'a SimulationConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Command::Plate(args) => run_plate(&args, io::stdout().lock()),
        Command::Rod(args) => run_rod(&args),
    }
}

fn init_logging(level: Option<&str>) {
    let level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter_level(level).init();
}

fn build_config(args: &PlateArgs) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            serde_json::from_str::<SimulationConfig>(&text)
                .map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => {
            let diffusivity = match args.uniform_k {
                Some(k) => DiffusivityField::uniform(k),
                None => DiffusivityField::inclusion(
                    (args.center_x, args.center_y),
                    args.radius,
                    args.k_inside,
                    args.k_outside,
                ),
            };
            SimulationConfig::new(
                args.length_x,
                args.length_y,
                args.dx,
                args.dt,
                args.total_time,
                args.boundary,
            )
            .with_diffusivity(diffusivity)
            .with_initial_temperature(args.initial)
        }
    };

    let bc: &mut BoundaryConditions = &mut config.boundary;
    if let Some(v) = args.top {
        bc.top = v;
    }
    if let Some(v) = args.bottom {
        bc.bottom = v;
    }
    if let Some(v) = args.left {
        bc.left = v;
    }
    if let Some(v) = args.right {
        bc.right = v;
    }
    Ok(config)
}

/// Writes reported slices to stdout and, optionally, to an output directory.
struct Reporter<W: Write> {
    every: usize,
    last: usize,
    frames: Option<BufWriter<File>>,
    summaries: Option<BufWriter<File>>,
    stdout: W,
    reported: usize,
}

impl<W: Write> Reporter<W> {
    fn new(
        every: usize,
        t_points: usize,
        out: Option<&Path>,
        stdout: W,
    ) -> Result<Reporter<W>, Box<dyn std::error::Error>> {
        let (frames, summaries) = match out {
            Some(dir) => (
                Some(BufWriter::new(File::create(dir.join("frames.bin"))?)),
                Some(BufWriter::new(File::create(dir.join("summary.jsonl"))?)),
            ),
            None => (None, None),
        };
        Ok(Reporter {
            every: every.max(1),
            last: t_points - 1,
            frames,
            summaries,
            stdout,
            reported: 0,
        })
    }

    fn wants(&self, t: usize) -> bool {
        t % self.every == 0 || t == self.last
    }

    fn report(&mut self, view: SliceView<'_>, summary: &SliceSummary) -> io::Result<()> {
        serde_json::to_writer(&mut self.stdout, summary)?;
        self.stdout.write_all(b"\n")?;
        if let Some(w) = self.summaries.as_mut() {
            serde_json::to_writer(&mut *w, summary)?;
            w.write_all(b"\n")?;
        }
        if let Some(w) = self.frames.as_mut() {
            write_f64_vec(w, view.as_slice())?;
        }
        self.reported += 1;
        Ok(())
    }

    fn finish(mut self) -> io::Result<usize> {
        if let Some(w) = self.frames.as_mut() {
            w.flush()?;
        }
        if let Some(w) = self.summaries.as_mut() {
            w.flush()?;
        }
        self.stdout.flush()?;
        Ok(self.reported)
    }
}

fn run_plate<W: Write>(args: &PlateArgs, stdout: W) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    let sim = Simulation::new(config).map_err(|e| format!("invalid configuration: {e}"))?;
    let grid = sim.grid().clone();
    let execution = if args.parallel {
        Execution::Parallel
    } else {
        Execution::Serial
    };

    if let Some(dir) = &args.out {
        fs::create_dir_all(dir)?;
        let meta = GridMeta {
            x_points: grid.x_points(),
            y_points: grid.y_points(),
            t_points: grid.t_points(),
            dx: grid.dx(),
            dt: grid.dt(),
            every: args.every.max(1),
            x: grid.x(),
            y: grid.y(),
            config: sim.config(),
        };
        let mut w = BufWriter::new(File::create(dir.join("grid.json"))?);
        serde_json::to_writer_pretty(&mut w, &meta)?;
        w.flush()?;
    }

    let mut reporter = Reporter::new(args.every, grid.t_points(), args.out.as_deref(), stdout)?;

    if args.rolling {
        let mut stepper = sim.into_stepper().with_execution(execution);
        loop {
            let t = stepper.time_index();
            if reporter.wants(t) {
                reporter.report(stepper.current(), &stepper.summary())?;
            }
            if stepper.is_finished() {
                break;
            }
            stepper.step();
        }
    } else {
        let result = sim.run_with(execution);
        for t in 0..result.state().len() {
            if reporter.wants(t) {
                reporter.report(result.slice(t), &result.summary(t))?;
            }
        }
    }

    let reported = reporter.finish()?;
    log::info!(
        "reported {reported} of {} slices ({}x{} grid)",
        grid.t_points(),
        grid.x_points(),
        grid.y_points()
    );
    if let Some(dir) = &args.out {
        log::info!("wrote frames to: {}", dir.display());
    }
    Ok(())
}

fn run_rod(args: &RodArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RodConfig {
        length: args.length,
        dx: args.dx,
        dt: args.dt,
        total_time: args.total_time,
        diffusivity: args.k,
        left: args.left,
        right: args.right,
        initial_temperature: args.initial,
    };
    let history = simulate_rod(&config).map_err(|e| format!("invalid configuration: {e}"))?;

    let every = args.every.max(1);
    let last = history.len() - 1;
    let mut out = io::stdout().lock();
    for t in (0..history.len()).filter(|t| t % every == 0 || *t == last) {
        serde_json::to_writer(&mut out, &history.summary(t))?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn write_f64_vec<W: Write>(w: &mut W, v: &[f64]) -> io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}
