#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Quest Chronicles **
//! Turn-based role-playing game in the terminal

use chronicle_engine::style::GameStyle;
use chronicle_engine::{CHRONICLE_VERSION, GameSession, load_game_data, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;

use log::info;

use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading Quest Chronicles data...");
    let data = load_game_data().context("while loading game data")?;
    info!("game data loaded successfully.");

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().context("while clearing the screen")?;
    info!("Starting the game!");

    println!(
        "{:^84}",
        format!("QUEST CHRONICLES v{CHRONICLE_VERSION}").bright_yellow().underline()
    );
    println!(
        "\n{}\n",
        "Build your character, complete quests, and become a legend!".description_style()
    );

    let mut session = GameSession::new(data);
    run_repl(&mut session)
}
