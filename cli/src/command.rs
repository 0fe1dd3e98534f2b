use anyhow::{Context, anyhow, bail};
use oreminer_core::{Coord, Coord2, Difficulty};

/// One line of player input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Reveal(Coord2),
    NewGame,
    Restart,
    Import(String),
    Seeds,
    ClearSeeds,
    Difficulty(Difficulty),
    Sound(bool),
    Animations(bool),
    ResetHighScore,
    Board,
    Help,
    Quit,
}

impl Command {
    pub(crate) const HELP: &'static str = "\
Commands:
  r <row> <col>        mine the cell (0-based)
  new                  start a new board
  restart              hide every cell of the current board again
  import <seed id>     replay a saved board
  seeds                list saved seeds
  clear-seeds          delete every saved seed
  difficulty <level>   easy, normal or hard (applies to the next board)
  sound on|off         toggle sound effects
  animations on|off    toggle animations
  reset-high-score     set the high score back to 0
  board                redraw the board
  help                 show this help
  quit                 save and exit";

    pub(crate) fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(op) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();

        let command = match (op.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("r" | "reveal" | "mine", [row, col]) => Self::Reveal((coord(row)?, coord(col)?)),
            ("new", []) => Self::NewGame,
            ("restart", []) => Self::Restart,
            ("import", [id]) => Self::Import((*id).to_owned()),
            ("seeds", []) => Self::Seeds,
            ("clear-seeds", []) => Self::ClearSeeds,
            ("difficulty", [level]) => Self::Difficulty(level.parse().map_err(|e| anyhow!("{e}"))?),
            ("sound", [state]) => Self::Sound(toggle(state)?),
            ("animations", [state]) => Self::Animations(toggle(state)?),
            ("reset-high-score", []) => Self::ResetHighScore,
            ("board", []) => Self::Board,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            (op, _) => bail!("unrecognized command `{op}`, try `help`"),
        };
        Ok(command)
    }
}

fn coord(word: &str) -> anyhow::Result<Coord> {
    word.parse()
        .with_context(|| format!("`{word}` is not a cell coordinate"))
}

fn toggle(word: &str) -> anyhow::Result<bool> {
    match word {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => bail!("expected on or off, got `{word}`"),
    }
}
