use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use oreminer_core::{
    BoardGenerator, GameEvent, GameSession, GameVariant, RandomBoardGenerator, Stores,
};

use command::Command;

mod command;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// 10x10 board, six ores
    Standard,
    /// 15x15 board, eight ores
    Extended,
}

impl From<Variant> for GameVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Standard => GameVariant::standard(),
            Variant::Extended => GameVariant::extended(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Directory holding settings.json, highscore.json and seeds.json
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Board size and ore table
    #[arg(long, value_enum, default_value_t = Variant::Standard)]
    variant: Variant,

    /// Force a generator seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print ore names without terminal colors
    #[arg(long)]
    no_color: bool,
}

struct App<G> {
    session: GameSession<G>,
    colored: bool,
}

impl<G: BoardGenerator> App<G> {
    fn print_board(&self) {
        println!("{}", view::render_board(&self.session, self.colored));
    }

    /// Runs one command, returning `false` once the player quits.
    fn dispatch(&mut self, command: Command, input: &mut impl BufRead) -> anyhow::Result<bool> {
        match command {
            Command::Reveal(coords) => {
                let outcome = self.session.reveal(coords);
                if !outcome.has_update() {
                    println!("Nothing to mine there.");
                }
            }
            Command::NewGame => self.session.new_game(),
            Command::Restart => self.session.reset(true),
            Command::Import(id) => match self.session.import_game(&id) {
                Ok(()) => println!("Seed imported successfully! ID: {id}"),
                Err(err) => println!("Import error: {err}"),
            },
            Command::Seeds => println!("{}", view::render_seeds(&self.session.list_seeds())),
            Command::ClearSeeds => {
                if confirm(input, "Delete all saved seeds?")? {
                    self.session.clear_seeds();
                    println!("All seeds have been cleared!");
                }
            }
            Command::Difficulty(difficulty) => {
                self.session.set_difficulty(difficulty);
                println!(
                    "Difficulty set to {difficulty}. Start a new game for this to take effect."
                );
            }
            Command::Sound(enabled) => self.session.set_sound_enabled(enabled),
            Command::Animations(enabled) => self.session.set_animations_enabled(enabled),
            Command::ResetHighScore => {
                if confirm(input, "Reset the high score?")? {
                    self.session.reset_high_score();
                    println!("High score has been reset!");
                }
            }
            Command::Board => {}
            Command::Help => println!("{}", Command::HELP),
            Command::Quit => return Ok(false),
        }
        self.handle_events(input)?;
        Ok(true)
    }

    fn handle_events(&mut self, input: &mut impl BufRead) -> anyhow::Result<()> {
        let mut play_again = false;
        for event in self.session.drain_events() {
            match event {
                GameEvent::TileRevealed { coords, value } => {
                    let ore = self.session.variant().ores().ore(value);
                    log::debug!("{coords:?} revealed {}", ore.name);
                    println!("{} +{value}", ore.name);
                }
                GameEvent::GameComplete(completion) => {
                    self.print_board();
                    let message = if completion.is_new_high_score {
                        format!("Game Complete! New High Score: {}", completion.final_score)
                    } else {
                        format!("Game Complete! Your score: {}", completion.final_score)
                    };
                    play_again = confirm(input, &format!("{message}\nPlay again?"))?;
                }
                GameEvent::SettingsChanged(settings) => {
                    log::debug!("settings changed: {settings:?}");
                }
                GameEvent::StoreWarning(message) => eprintln!("warning: {message}"),
            }
        }

        if play_again {
            self.session.reset(false);
            return self.handle_events(input);
        }
        self.print_board();
        Ok(())
    }
}

fn confirm(input: &mut impl BufRead, question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("seed: {:?}", args.seed);

    let stores = Stores::open(&args.data_dir);
    let generator = args
        .seed
        .map_or_else(RandomBoardGenerator::from_entropy, RandomBoardGenerator::new);
    let session = GameSession::new(args.variant.into(), stores, generator);
    let mut app = App {
        session,
        colored: !args.no_color,
    };

    println!("{}", view::render_legend(app.session.variant().ores(), app.colored));
    println!("Type `help` for commands.");
    app.handle_events(&mut io::empty())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("reading command")? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Ok(command) => {
                if !app.dispatch(command, &mut input)? {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    app.session.shutdown();
    for event in app.session.drain_events() {
        if let GameEvent::StoreWarning(message) = event {
            eprintln!("warning: {message}");
        }
    }
    log::debug!("Exiting");
    Ok(())
}
