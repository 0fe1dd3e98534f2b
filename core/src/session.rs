use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Fresh,
    InProgress,
    Complete,
}

impl SessionState {
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Fresh
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub final_score: Score,
    pub is_new_high_score: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed(TileValue),
    Completed(TileValue, Completion),
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Value of the tile that was just revealed.
    pub const fn value(self) -> Option<TileValue> {
        match self {
            Self::NoChange => None,
            Self::Revealed(value) | Self::Completed(value, _) => Some(value),
        }
    }
}

/// Notifications for the presentation layer, collected until drained.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    TileRevealed { coords: Coord2, value: TileValue },
    GameComplete(Completion),
    SettingsChanged(Settings),
    /// A record could not be written; the in-memory state is still current.
    StoreWarning(String),
}

/// The single live play-through: board, reveal mask, score, and the stores it
/// checkpoints into.
#[derive(Debug)]
pub struct GameSession<G = RandomBoardGenerator> {
    variant: GameVariant,
    stores: Stores,
    generator: G,
    board: OreGrid,
    cells: Array2<CellState>,
    revealed_count: Saturating<CellCount>,
    score: ScoreTracker,
    difficulty: Option<Difficulty>,
    seed_id: Option<String>,
    state: SessionState,
    events: Vec<GameEvent>,
}

impl<G: BoardGenerator> GameSession<G> {
    /// Starts a session on a freshly generated board.
    pub fn new(variant: GameVariant, stores: Stores, mut generator: G) -> Self {
        let difficulty = stores.settings.get().difficulty;
        let board = generator.generate(variant.size(), variant.profile(difficulty));
        check_board_size(&variant, &board);
        let mut session = Self {
            variant,
            stores,
            generator,
            cells: hidden_mask(&board),
            board,
            revealed_count: Saturating(0),
            score: ScoreTracker::new(),
            difficulty: Some(difficulty),
            seed_id: None,
            state: SessionState::Fresh,
            events: Vec::new(),
        };
        session.save_seed();
        session
    }

    pub fn variant(&self) -> &GameVariant {
        &self.variant
    }

    pub fn board(&self) -> &OreGrid {
        &self.board
    }

    /// Side length of the board in play.
    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellState> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn current_score(&self) -> Score {
        self.score.current_total()
    }

    pub fn high_score(&self) -> Score {
        self.stores.high_score.get()
    }

    /// Difficulty the current board was generated with, `None` for imported boards.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Id of the seed the current board was saved as or imported from.
    pub fn seed_id(&self) -> Option<&str> {
        self.seed_id.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        self.stores.settings.get()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    /// Checkpoints the high score and starts over on a new board.
    pub fn new_game(&mut self) {
        self.reset(false);
    }

    /// Checkpoints the high score and zeroes the score. With `keep_board` every cell
    /// is hidden again, otherwise a new board is generated and saved as a seed.
    pub fn reset(&mut self, keep_board: bool) {
        self.checkpoint();
        if keep_board {
            log::debug!("Restarting current board");
            self.install_board(self.board.clone(), self.difficulty, self.seed_id.clone());
        } else {
            let difficulty = self.settings().difficulty;
            let board = self
                .generator
                .generate(self.variant.size(), self.variant.profile(difficulty));
            check_board_size(&self.variant, &board);
            self.install_board(board, Some(difficulty), None);
            self.save_seed();
        }
    }

    /// Replaces the board with a stored seed. On error the session is unchanged.
    pub fn import_game(&mut self, id: &str) -> Result<()> {
        let seed = self.stores.seeds.find_by_id(id)?;
        self.import_seed(&seed)
    }

    pub fn import_seed(&mut self, seed: &Seed) -> Result<()> {
        let board = seed.board(self.variant.size())?;
        log::debug!("Importing seed {}", seed.id());
        self.checkpoint();
        self.install_board(board, None, Some(seed.seed_id.clone()));
        Ok(())
    }

    /// Reveals one cell and scores it. Revealing a revealed or out-of-bounds cell
    /// changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(CellState::Hidden) = self.cell_at(coords) else {
            return RevealOutcome::NoChange;
        };

        let Some(value) = self.board.get(coords) else {
            return RevealOutcome::NoChange;
        };
        self.cells[coords.to_nd_index()] = CellState::Revealed(value);
        self.revealed_count += 1;
        self.score.add_points(Score::from(value));
        self.events.push(GameEvent::TileRevealed { coords, value });

        if self.revealed_count.0 >= self.board.total_cells() {
            RevealOutcome::Completed(value, self.complete())
        } else {
            self.state = SessionState::InProgress;
            RevealOutcome::Revealed(value)
        }
    }

    pub fn list_seeds(&self) -> Vec<Seed> {
        self.stores.seeds.list()
    }

    pub fn clear_seeds(&mut self) {
        if let Err(err) = self.stores.seeds.clear() {
            self.warn(err);
        }
    }

    /// Selects the difficulty for the next generated board.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.change_settings(|settings| settings.difficulty = difficulty);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.change_settings(|settings| settings.sound_enabled = enabled);
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.change_settings(|settings| settings.animations_enabled = enabled);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.change_settings(|settings| settings.theme = theme);
    }

    pub fn set_renderer(&mut self, renderer: Renderer) {
        self.change_settings(|settings| settings.renderer = renderer);
    }

    pub fn reset_high_score(&mut self) {
        log::info!("Resetting high score");
        if let Err(err) = self.stores.high_score.reset() {
            self.warn(err);
        }
    }

    /// Final checkpoint before the process exits.
    pub fn shutdown(&mut self) {
        self.checkpoint();
        if let Err(err) = self.stores.settings.save() {
            self.warn(err);
        }
    }

    fn change_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        let result = self.stores.settings.update(change);
        log::debug!("Settings changed: {:?}", self.stores.settings.get());
        if let Err(err) = result {
            self.warn(err);
        }
        let settings = self.settings().clone();
        self.events.push(GameEvent::SettingsChanged(settings));
    }

    fn complete(&mut self) -> Completion {
        self.state = SessionState::Complete;
        let final_score = self.score.current_total();
        let is_new_high_score = self.checkpoint();
        log::info!("Board complete with {final_score} points");

        let completion = Completion {
            final_score,
            is_new_high_score,
        };
        self.events.push(GameEvent::GameComplete(completion));
        completion
    }

    /// Records the current total as high score if it beats it.
    fn checkpoint(&mut self) -> bool {
        let (is_new, saved) = self
            .stores
            .high_score
            .record_if_higher(self.score.current_total());
        if let Err(err) = saved {
            self.warn(err);
        }
        is_new
    }

    fn install_board(
        &mut self,
        board: OreGrid,
        difficulty: Option<Difficulty>,
        seed_id: Option<String>,
    ) {
        self.cells = hidden_mask(&board);
        self.board = board;
        self.revealed_count = Saturating(0);
        self.score.reset();
        self.difficulty = difficulty;
        self.seed_id = seed_id;
        self.state = SessionState::Fresh;
    }

    fn save_seed(&mut self) {
        let seed = Seed::new(&self.board);
        self.seed_id = Some(seed.seed_id.clone());
        if let Err(err) = self.stores.seeds.append(seed) {
            self.warn(err);
        }
    }

    fn warn(&mut self, err: StoreError) {
        log::warn!("{err}");
        self.events.push(GameEvent::StoreWarning(err.to_string()));
    }
}

fn hidden_mask(board: &OreGrid) -> Array2<CellState> {
    let size = usize::from(board.size());
    Array2::default((size, size))
}

fn check_board_size(variant: &GameVariant, board: &OreGrid) {
    if board.size() != variant.size() {
        log::warn!(
            "Generator returned a {0}x{0} board for a {1}x{1} variant",
            board.size(),
            variant.size()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::*;

    fn small_variant(size: Coord) -> GameVariant {
        GameVariant::new(size, OreTable::STANDARD, DifficultyTable::standard()).unwrap()
    }

    fn session(
        dir: &tempfile::TempDir,
        variant: GameVariant,
        draws: Vec<u8>,
    ) -> GameSession<ScriptedDraws> {
        GameSession::new(variant, Stores::open(dir.path()), ScriptedDraws::new(draws))
    }

    /// Hands out the same board regardless of the requested size.
    struct FixedBoard(OreGrid);

    impl BoardGenerator for FixedBoard {
        fn generate(&mut self, _size: Coord, _profile: &DifficultyProfile) -> OreGrid {
            self.0.clone()
        }
    }

    fn reveal_all<G: BoardGenerator>(session: &mut GameSession<G>) -> RevealOutcome {
        let mut last = RevealOutcome::NoChange;
        for coords in iter_coords(session.size()) {
            last = session.reveal(coords);
        }
        last
    }

    #[test]
    fn scripted_board_scores_its_sum() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, GameVariant::standard(), scenario_draws());

        assert_eq!(session.board().to_rows(), scenario_rows());
        assert_eq!(session.state(), SessionState::Fresh);

        let outcome = reveal_all(&mut session);

        assert_eq!(
            outcome,
            RevealOutcome::Completed(
                2,
                Completion {
                    final_score: 104,
                    is_new_high_score: true,
                }
            )
        );
        assert_eq!(session.current_score(), 104);
        assert!(session.is_complete());
        assert_eq!(session.high_score(), 104);
    }

    #[test]
    fn reveal_scores_and_moves_to_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Revealed(5));
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.cell_at((0, 0)), Some(CellState::Revealed(5)));
        assert_eq!(session.cell_at((0, 1)), Some(CellState::Hidden));
        assert_eq!(session.current_score(), 5);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::TileRevealed {
                coords: (0, 0),
                value: 5,
            }]
        );
    }

    #[test]
    fn reveal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        session.reveal((0, 1));
        let events = session.drain_events();
        assert_eq!(session.reveal((0, 1)), RevealOutcome::NoChange);

        assert_eq!(events.len(), 1);
        assert!(session.drain_events().is_empty());
        assert_eq!(session.current_score(), 4);
        assert_eq!(session.revealed_count(), 1);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn out_of_bounds_reveal_is_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        assert_eq!(session.reveal((2, 0)), RevealOutcome::NoChange);
        assert_eq!(session.reveal((0, 200)), RevealOutcome::NoChange);
        assert_eq!(session.current_score(), 0);
        assert_eq!(session.state(), SessionState::Fresh);
    }

    #[test]
    fn completes_only_when_every_cell_revealed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        session.reveal((0, 0));
        session.reveal((0, 1));
        session.reveal((1, 0));
        assert!(!session.is_complete());

        assert!(matches!(
            session.reveal((1, 1)),
            RevealOutcome::Completed(0, _)
        ));
        assert!(session.is_complete());
        assert_eq!(session.reveal((1, 1)), RevealOutcome::NoChange);
    }

    #[test]
    fn high_score_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0, 0, 0, 0, 50]);
        assert_eq!(session.high_score(), 0);

        reveal_all(&mut session);
        let events = session.drain_events();
        assert_eq!(session.high_score(), 12);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameComplete(Completion {
                final_score: 12,
                is_new_high_score: true,
            }))
        );

        session.new_game();
        assert_eq!(session.board().total_points(), 1);
        let outcome = reveal_all(&mut session);

        assert_eq!(
            outcome,
            RevealOutcome::Completed(
                1,
                Completion {
                    final_score: 1,
                    is_new_high_score: false,
                }
            )
        );
        assert_eq!(session.high_score(), 12);
        assert_eq!(
            HighScoreStore::load(dir.path().join(Stores::HIGH_SCORE_FILE)).get(),
            12
        );
    }

    #[test]
    fn equal_total_is_not_a_new_high_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        reveal_all(&mut session);
        session.reset(true);
        let outcome = reveal_all(&mut session);

        assert!(matches!(
            outcome,
            RevealOutcome::Completed(_, Completion {
                final_score: 12,
                is_new_high_score: false,
            })
        ));
    }

    #[test]
    fn reset_is_a_high_score_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        session.reveal((0, 0));
        session.reveal((0, 1));
        session.reset(false);

        assert_eq!(session.high_score(), 9);
        assert_eq!(session.current_score(), 0);
        assert_eq!(session.state(), SessionState::Fresh);
    }

    #[test]
    fn reset_keeping_board_hides_every_cell() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0, 0]);
        let board = session.board().clone();
        let seed_id = session.seed_id().map(str::to_owned);

        session.reveal((1, 0));
        session.reset(true);

        assert_eq!(session.board(), &board);
        assert_eq!(session.seed_id().map(str::to_owned), seed_id);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.cell_at((1, 0)), Some(CellState::Hidden));
        assert_eq!(session.list_seeds().len(), 1);
    }

    #[test]
    fn clear_then_new_game_appends_one_seed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(3), scenario_draws());
        assert_eq!(session.list_seeds().len(), 1);

        session.clear_seeds();
        assert!(session.list_seeds().is_empty());

        session.new_game();
        let seeds = session.list_seeds();
        assert_eq!(seeds.len(), 1);
        assert_eq!(Some(seeds[0].id()), session.seed_id());
        assert_eq!(seeds[0].board(3).as_ref(), Ok(session.board()));
    }

    #[test]
    fn import_round_trips_the_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut draws = scenario_draws();
        draws.extend([0; 100]);
        let mut session = session(&dir, GameVariant::standard(), draws);
        let original = session.seed_id().unwrap().to_owned();

        session.new_game();
        assert_ne!(session.board().to_rows(), scenario_rows());
        session.reveal((0, 0));

        session.import_game(&original).unwrap();

        assert_eq!(session.board().to_rows(), scenario_rows());
        assert_eq!(session.seed_id(), Some(original.as_str()));
        assert_eq!(session.difficulty(), None);
        assert_eq!(session.current_score(), 0);
        assert_eq!(session.state(), SessionState::Fresh);
        assert_eq!(session.list_seeds().len(), 2);
    }

    #[test]
    fn import_of_wrong_size_leaves_session_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, GameVariant::standard(), scenario_draws());
        session.reveal((0, 2));
        let board = session.board().clone();

        let small = OreGrid::from_rows(9, &vec![vec![1; 9]; 9]).unwrap();
        let seed = Seed::new(&small);
        Stores::open(dir.path()).seeds.append(seed.clone()).unwrap();

        assert_eq!(
            session.import_game(seed.id()),
            Err(GameError::DimensionMismatch {
                expected: 10,
                found_rows: 9,
                found_cols: 9,
            })
        );
        assert_eq!(session.board(), &board);
        assert_eq!(session.current_score(), 3);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn import_of_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![10]);

        assert_eq!(
            session.import_game("nope"),
            Err(GameError::SeedNotFound("nope".to_owned()))
        );
        assert_eq!(session.state(), SessionState::Fresh);
    }

    #[test]
    fn difficulty_applies_to_next_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(1), vec![55]);
        assert_eq!(session.board()[(0, 0)], 1);

        session.set_difficulty(Difficulty::Easy);
        assert_eq!(session.difficulty(), Some(Difficulty::Normal));
        assert_eq!(
            session.drain_events().last(),
            Some(&GameEvent::SettingsChanged(Settings {
                difficulty: Difficulty::Easy,
                ..Settings::default()
            }))
        );

        session.new_game();
        assert_eq!(session.board()[(0, 0)], 0);
        assert_eq!(session.difficulty(), Some(Difficulty::Easy));

        let reopened = Stores::open(dir.path());
        assert_eq!(reopened.settings.get().difficulty, Difficulty::Easy);
    }

    #[test]
    fn presentation_settings_are_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(1), vec![0]);

        session.set_sound_enabled(false);
        session.set_animations_enabled(false);
        session.set_theme(Theme::Dark);
        session.set_renderer(Renderer::Software);

        let reopened = Stores::open(dir.path());
        assert_eq!(
            reopened.settings.get(),
            &Settings {
                difficulty: Difficulty::Normal,
                sound_enabled: false,
                animations_enabled: false,
                theme: Theme::Dark,
                renderer: Renderer::Software,
            }
        );
    }

    #[test]
    fn reset_high_score_and_shutdown_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);
        reveal_all(&mut session);
        assert_eq!(session.high_score(), 12);

        session.reset(true);
        session.reset_high_score();
        assert_eq!(session.high_score(), 0);

        session.reveal((0, 0));
        session.shutdown();

        let reopened = Stores::open(dir.path());
        assert_eq!(reopened.high_score.get(), 5);
        assert!(dir.path().join(Stores::SETTINGS_FILE).exists());
    }

    #[test]
    fn failed_seed_write_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(Stores::SEED_FILE)).unwrap();

        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);

        assert!(matches!(
            session.drain_events().as_slice(),
            [GameEvent::StoreWarning(_)]
        ));
        assert!(session.seed_id().is_some());
        assert_eq!(session.reveal((0, 0)), RevealOutcome::Revealed(5));
        assert!(session.list_seeds().is_empty());
    }

    #[test]
    fn failed_high_score_write_still_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(Stores::HIGH_SCORE_FILE)).unwrap();
        let mut session = session(&dir, small_variant(2), vec![99, 95, 90, 0]);
        session.drain_events();

        let outcome = reveal_all(&mut session);
        let events = session.drain_events();

        assert_eq!(
            outcome,
            RevealOutcome::Completed(
                0,
                Completion {
                    final_score: 12,
                    is_new_high_score: true,
                }
            )
        );
        assert_eq!(session.high_score(), 12);
        let tail: Vec<_> = events.iter().rev().take(2).collect();
        assert!(matches!(
            tail.as_slice(),
            [
                GameEvent::GameComplete(Completion {
                    final_score: 12,
                    is_new_high_score: true,
                }),
                GameEvent::StoreWarning(_),
            ]
        ));
    }

    #[test]
    fn seed_with_large_tile_values_imports() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir, small_variant(1), vec![0]);
        std::fs::write(
            dir.path().join(Stores::SEED_FILE),
            r#"[{ "seedId": "x", "oreData": [[300]], "timestamp": 1 }]"#,
        )
        .unwrap();

        session.import_game("x").unwrap();

        assert_eq!(session.reveal((0, 0)).value(), Some(300));
        assert_eq!(session.current_score(), 300);
        assert_eq!(session.variant().ores().ore(300), Ore::UNKNOWN);
    }

    #[test]
    fn undersized_generated_board_never_panics() {
        let dir = tempfile::tempdir().unwrap();
        let board = OreGrid::from_rows(1, &[vec![3]]).unwrap();
        let mut session = GameSession::new(
            small_variant(2),
            Stores::open(dir.path()),
            FixedBoard(board),
        );

        assert_eq!(session.size(), 1);
        assert_eq!(session.reveal((1, 1)), RevealOutcome::NoChange);
        assert!(matches!(
            session.reveal((0, 0)),
            RevealOutcome::Completed(3, _)
        ));
    }
}
