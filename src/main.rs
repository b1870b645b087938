use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use structviz::engine::{StructureEngine, StructureKind};
use structviz::error::StructvizError;
use structviz::options::Options;
use structviz::record::Record;
use structviz::script::ScriptRunner;
use structviz::util::frame_clock::FrameClock;

/// Headless runner: plays a command script against one structure and
/// prints the outcome of every line plus the final structure as JSON.
#[derive(Parser, Debug)]
#[command(name = "structviz", about = "Animate data-structure mutations from a script")]
struct Cli {
    /// Structure kind: stack, sequence, linked, binary, bst, avl, huffman.
    #[arg(short, long, default_value = "bst")]
    structure: StructureKind,
    /// Command script, one command per line.
    #[arg(long)]
    script: PathBuf,
    /// TOML options preset.
    #[arg(long)]
    options: Option<PathBuf>,
    /// JSON record to start from. Its structure kind wins over --structure.
    #[arg(long)]
    initial: Option<PathBuf>,
    /// Ticks per second of simulated time.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Pace ticks to the wall clock instead of stepping as fast as possible.
    #[arg(long)]
    realtime: bool,
    /// Skip animation and apply every command at once.
    #[arg(long)]
    immediate: bool,
}

fn read(path: &Path) -> Result<String, StructvizError> {
    Ok(std::fs::read_to_string(path)?)
}

fn build_engine(cli: &Cli) -> Result<StructureEngine, StructvizError> {
    let mut options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if cli.immediate {
        options.animation.enabled = false;
    }
    let mut engine = StructureEngine::new(cli.structure, options);
    if let Some(path) = &cli.initial {
        engine.load_record(Record::from_json(&read(path)?)?)?;
    }
    Ok(engine)
}

fn play(runner: &mut ScriptRunner, engine: &mut StructureEngine, cli: &Cli) {
    let mut clock = FrameClock::new(cli.fps);
    let mut phase = None;
    loop {
        let dt = if cli.realtime {
            std::thread::sleep(clock.until_next());
            clock.tick()
        } else {
            clock.fixed_delta()
        };
        if !runner.tick(engine, dt) {
            break;
        }
        let now = engine.op_view().map(|view| (view.kind, view.phase));
        if now != phase {
            if let Some((kind, name)) = now {
                log::debug!("{}: {name}", kind.name());
            }
            phase = now;
        }
    }
}

fn run(cli: &Cli) -> Result<bool, StructvizError> {
    let mut engine = build_engine(cli)?;
    let text = read(&cli.script)?;
    let mut runner = ScriptRunner::new();
    runner.load(&text, &engine);
    if cli.immediate {
        runner.run_immediate(&mut engine);
    } else {
        play(&mut runner, &mut engine, cli);
    }

    for (line, outcome) in runner.outcomes() {
        println!("{line:>4}  {outcome}");
    }
    let report = runner.report();
    println!("{report}");
    println!("{}", engine.to_record().to_json()?);
    Ok(report.is_success())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
