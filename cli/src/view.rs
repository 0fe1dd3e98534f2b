use std::fmt::Write;

use oreminer_core::{BoardGenerator, CellState, GameSession, Ore, OreTable, Seed, iter_coords};

/// Seeds listed before the rest are summarized.
const SEED_PREVIEW: usize = 10;
const CELL_WIDTH: usize = 9;

fn paint(ore: Ore, text: &str, colored: bool) -> String {
    if colored {
        let [r, g, b] = ore.color;
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    } else {
        text.to_owned()
    }
}

pub(crate) fn render_board<G: BoardGenerator>(session: &GameSession<G>, colored: bool) -> String {
    let size = session.size();
    let ores = session.variant().ores();
    let mut out = String::new();

    out.push_str("    ");
    for col in 0..size {
        let _ = write!(out, "{col:^CELL_WIDTH$}");
    }
    out.push('\n');

    for (row, col) in iter_coords(size) {
        if col == 0 {
            let _ = write!(out, "{row:>3} ");
        }
        let cell = match session.cell_at((row, col)) {
            Some(CellState::Revealed(value)) => {
                let ore = ores.ore(value);
                paint(ore, &format!("{:^CELL_WIDTH$}", ore.name), colored)
            }
            _ => format!("{:^CELL_WIDTH$}", "Mine"),
        };
        out.push_str(&cell);
        if col + 1 == size {
            out.push('\n');
        }
    }

    let _ = write!(
        out,
        "Score: {}    High Score: {}",
        session.current_score(),
        session.high_score()
    );
    out
}

pub(crate) fn render_legend(ores: &OreTable, colored: bool) -> String {
    ores.iter()
        .map(|(points, ore)| paint(ore, &format!("{} +{points}", ore.name), colored))
        .collect::<Vec<_>>()
        .join("  ")
}

pub(crate) fn render_seeds(seeds: &[Seed]) -> String {
    if seeds.is_empty() {
        return "No seeds saved yet. Play a game to generate seeds!".to_owned();
    }

    let mut out = String::from("Saved Seeds:\n");
    for (index, seed) in seeds.iter().take(SEED_PREVIEW).enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  ({})",
            index + 1,
            seed.id(),
            seed.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    if seeds.len() > SEED_PREVIEW {
        let _ = writeln!(out, "... and {} more", seeds.len() - SEED_PREVIEW);
    }
    out.trim_end().to_owned()
}
