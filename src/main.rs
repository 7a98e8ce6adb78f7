use std::path::PathBuf;

use sorting_line::circuit::gate::GateKind;
use sorting_line::game::{Game, LevelPhase, Session};
use sorting_line::level::LevelDef;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(name = "sorting-line", about = "Run a sorting line level headless")]
struct Opt {
    /// Level files (JSON), played in order
    #[structopt(parse(from_os_str), required = true)]
    levels: Vec<PathBuf>,

    /// Circuit expression wired into the kicker, one per level
    #[structopt(short, long)]
    circuit: Vec<String>,

    /// Extra gates placed at the default position (and, or, not, sr, d)
    #[structopt(long)]
    gate: Vec<GateKind>,

    /// Maximum number of frames per level
    #[structopt(long, default_value = "10000")]
    frames: usize,

    /// Seconds per frame
    #[structopt(long, default_value = "0.016666")]
    frame_time: f64,

    /// Write the circuit of each level as Graphviz dot
    #[structopt(long, parse(from_os_str))]
    graphviz: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[structopt(short, long, default_value = "info")]
    verbosity: String,
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&opt.verbosity));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut session = Session {
        game_score: 0,
        level_number: 1,
    };

    for (index, path) in opt.levels.iter().enumerate() {
        let def = LevelDef::from_file(path)?;

        let mut game = Game::new(session.clone());
        game.load(&def)?;

        if let Some(stmt) = opt.circuit.get(index) {
            let gates = game.build_circuit(stmt)?;
            tracing::info!("circuit `{stmt}` built with {} gates", gates.len());
        }
        for &kind in &opt.gate {
            game.add_gate(kind);
        }

        if let Some(graphviz) = &opt.graphviz {
            let path = graphviz.with_extension(format!("{}.dot", game.level().number()));
            std::fs::write(&path, game.to_graphviz())?;
            tracing::info!("graphviz written to {}", path.display());
        }

        game.start_conveyors();

        let mut phase = LevelPhase::Running;
        for _ in 0..opt.frames {
            phase = game.update(opt.frame_time);
            if phase == LevelPhase::Finished {
                break;
            }
        }

        if phase != LevelPhase::Finished {
            tracing::warn!(
                "level {} did not finish within {} frames",
                game.level().number(),
                opt.frames
            );
        }

        println!(
            "level {}: level score {}, game score {}",
            game.level().number(),
            game.level_score().unwrap_or(0),
            game.game_score()
        );

        session = game.session().clone();
        session.level_number += 1;
    }

    Ok(())
}
