//! Twisty Cube
//!
//! Models a 3x3x3 twisty cube and turns its faces, either in an interactive
//! 3D viewer or from the command line.

mod visualization;

use std::time::Duration;

use clap::{Parser, Subcommand};

use twister::face::parse_turns;
use twister::grid::{format_facelets, format_layout};
use twister::scramble::{ScrambleParams, DEFAULT_SCRAMBLE_LENGTH};
use twister::{Easing, TurnConfig, TurnController, TurnRequest};

/// Turns the faces of a 3x3x3 twisty cube.
#[derive(Parser)]
#[command(name = "twister")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Duration of one animated quarter turn, in milliseconds.
    #[arg(long, global = true, default_value_t = 250)]
    turn_ms: u64,
    /// Interpolation curve for animated turns.
    #[arg(long, global = true, default_value_t = Easing::Cosine)]
    easing: Easing,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive 3D viewer.
    View,
    /// Scramble a solved cube and print the result.
    Scramble {
        /// Number of random turns.
        #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
        moves: u32,
        /// Seed for a reproducible scramble.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply a sequence of turns such as "R U R' U'" and print the result.
    Apply {
        /// Whitespace-separated turns.
        turns: String,
    },
}

impl Cli {
    fn turn_config(&self) -> TurnConfig {
        TurnConfig {
            duration: Duration::from_millis(self.turn_ms),
            easing: self.easing,
        }
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::builder().init();

    let cli = Cli::parse();
    let config = cli.turn_config();

    match cli.command {
        Some(Command::Scramble { moves, seed }) => {
            print!("{}", run_scramble(config, moves, seed)?);
        }
        Some(Command::Apply { turns }) => {
            print!("{}", run_apply(config, &turns)?);
        }
        Some(Command::View) | None => {
            println!("Controls: R L U D F B turn (Shift reverses), Space scrambles");
            visualization::display(TurnController::new(config))?;
        }
    }
    Ok(())
}

/// Scrambles a fresh cube and describes it.
fn run_scramble(config: TurnConfig, moves: u32, seed: Option<u64>) -> eyre::Result<String> {
    let mut controller = TurnController::new(config);
    let mut params = ScrambleParams::new(moves);
    if let Some(seed) = seed {
        params = params.with_seed(seed);
    }
    let _ = controller.start_scramble(params, Duration::ZERO)?;

    let sequence: Vec<String> = controller
        .last_scramble()
        .iter()
        .map(|turn| turn.to_string())
        .collect();
    Ok(format!(
        "Scramble: {}\n\n{}",
        sequence.join(" "),
        describe(&controller)
    ))
}

/// Applies turns to a fresh cube and describes it.
fn run_apply(config: TurnConfig, turns: &str) -> eyre::Result<String> {
    let mut controller = TurnController::new(config);
    for turn in parse_turns(turns)? {
        if controller.apply_instant(turn)? == TurnRequest::Busy {
            eyre::bail!("cube was busy while applying {turn}");
        }
    }
    Ok(describe(&controller))
}

fn describe(controller: &TurnController) -> String {
    let cube = controller.cube();
    format!(
        "{}\n{}\nSolved: {}\n",
        format_layout(cube),
        format_facelets(cube),
        if cube.is_solved() { "yes" } else { "no" }
    )
}
