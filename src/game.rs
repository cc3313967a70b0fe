use crate::{
    error::Error,
    sweep::{Board, BoardConfig, Coordinate, Reveal},
};
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Fresh,
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game: the board plus win/loss flags and the clock.
///
/// `game_over` and `game_won` are never both set, and once either is set the
/// board no longer changes until [`GameState::restart`].
#[derive(Debug, Clone)]
pub(crate) struct GameState {
    board: Board,
    game_over: bool,
    game_won: bool,
    elapsed: Duration,
    started: bool,
}

impl GameState {
    pub(crate) fn new<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Result<Self, Error> {
        Board::new(config, rng).map(Self::from_board)
    }

    pub(crate) fn from_board(board: Board) -> Self {
        Self {
            board,
            game_over: false,
            game_won: false,
            elapsed: Duration::ZERO,
            started: false,
        }
    }

    /// Replaces the whole game with a freshly mined board of the same shape.
    pub(crate) fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), Error> {
        *self = Self::new(self.board.config(), rng)?;
        log::info!("restarted {:?}", self.board.config());
        Ok(())
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn status(&self) -> Status {
        if self.game_won {
            Status::Won
        } else if self.game_over {
            Status::Lost
        } else if self.started {
            Status::InProgress
        } else {
            Status::Fresh
        }
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub(crate) fn is_game_won(&self) -> bool {
        self.game_won
    }

    pub(crate) fn started(&self) -> bool {
        self.started
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mines left to flag; negative when more cells are flagged than there
    /// are mines.
    pub(crate) fn mines_remaining(&self) -> isize {
        let mines = isize::try_from(self.board.mine_count()).unwrap_or(isize::MAX);
        let flagged = isize::try_from(self.board.flagged_count()).unwrap_or(isize::MAX);
        mines - flagged
    }

    /// Any in-bounds reveal request starts the clock, even one that lands on
    /// a revealed or flagged cell.
    pub(crate) fn reveal(&mut self, coord: Coordinate) -> Reveal {
        if self.status().is_terminal() || !self.board.in_bounds(coord) {
            return Reveal::Ignored;
        }

        if !self.started {
            self.started = true;
            log::info!("game started at {coord:?}");
        }

        let outcome = self.board.reveal(coord);
        match outcome {
            Reveal::Mine => {
                self.game_over = true;
                log::info!(
                    "mine hit at {coord:?} after {:.1}s with {} cells revealed",
                    self.elapsed.as_secs_f64(),
                    self.board.revealed_count()
                );
            }
            Reveal::Cleared(count) => log::debug!("revealed {count} cells from {coord:?}"),
            Reveal::Ignored => log::debug!("ignored reveal at {coord:?}"),
        }
        outcome
    }

    pub(crate) fn toggle_flag(&mut self, coord: Coordinate) -> bool {
        if self.status().is_terminal() {
            return false;
        }
        let changed = self.board.toggle_flag(coord);
        if changed {
            log::debug!("toggled flag at {coord:?}");
        }
        changed
    }

    /// Win check, polled once per frame. The game is won as soon as the
    /// number of covered flagged cells equals the mine count, whether or not
    /// the flags sit on mines.
    pub(crate) fn refresh(&mut self) {
        if self.status().is_terminal() {
            return;
        }
        if self.board.flagged_count() == self.board.mine_count() {
            self.game_won = true;
            log::info!("game won after {:.1}s", self.elapsed.as_secs_f64());
        }
    }

    /// Advances the clock by the frame delta while a game is in progress.
    pub(crate) fn tick(&mut self, delta: Duration) {
        self.refresh();
        if self.status() == Status::InProgress {
            self.elapsed += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::tests::five_cell_pocket;
    use rand::{rngs::StdRng, SeedableRng};

    const FRAME: Duration = Duration::from_millis(16);

    fn pocket_game() -> GameState {
        GameState::from_board(five_cell_pocket())
    }

    #[test]
    fn new_game_is_fresh() {
        let mut rng = StdRng::seed_from_u64(3);
        let game = GameState::new(BoardConfig::default(), &mut rng).unwrap();
        assert_eq!(game.status(), Status::Fresh);
        assert!(!game.started());
        assert_eq!(game.elapsed(), Duration::ZERO);
        assert_eq!(game.mines_remaining(), 10);
        assert_eq!(game.board().revealed_count(), 0);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = BoardConfig {
            width: 2,
            height: 2,
            mines: 4,
        };
        assert!(matches!(
            GameState::new(config, &mut rng),
            Err(Error::InvalidMineCount { mines: 4, cells: 4, max: 3 })
        ));
    }

    #[test]
    fn first_reveal_starts_the_game() {
        let mut game = pocket_game();
        assert_eq!(game.reveal((0, 0)), Reveal::Cleared(12));
        assert!(game.started());
        assert_eq!(game.status(), Status::InProgress);
    }

    #[test]
    fn reveal_on_flagged_cell_still_starts_the_clock() {
        let mut game = pocket_game();
        game.toggle_flag((0, 0));
        assert!(!game.started());

        assert_eq!(game.reveal((0, 0)), Reveal::Ignored);
        assert!(game.started());
    }

    #[test]
    fn out_of_bounds_reveal_changes_nothing() {
        let mut game = pocket_game();
        assert_eq!(game.reveal((10, 3)), Reveal::Ignored);
        assert!(!game.started());
        assert!(!game.toggle_flag((3, 10)));
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut game = pocket_game();
        game.reveal((0, 0));
        assert_eq!(game.reveal((9, 9)), Reveal::Mine);
        assert!(game.is_game_over());
        assert!(!game.is_game_won());
        assert_eq!(game.status(), Status::Lost);

        game.tick(FRAME);
        assert!(!game.is_game_won());
    }

    #[test]
    fn lost_game_ignores_further_moves() {
        let mut game = pocket_game();
        game.reveal((6, 0));
        let revealed = game.board().revealed_count();

        assert_eq!(game.reveal((0, 0)), Reveal::Ignored);
        assert!(!game.toggle_flag((9, 0)));
        assert_eq!(game.board().revealed_count(), revealed);
        assert_eq!(game.board().flagged_count(), 0);
    }

    #[test]
    fn flagging_mine_count_cells_wins_even_when_wrong() {
        let mut game = pocket_game();
        // row 5 holds no mines at all
        for x in 0..10 {
            assert!(!game.board().is_mine((x, 5)));
            game.toggle_flag((x, 5));
        }
        assert_eq!(game.mines_remaining(), 0);
        assert!(!game.is_game_won());

        game.refresh();
        assert!(game.is_game_won());
        assert!(!game.is_game_over());
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.reveal((0, 0)), Reveal::Ignored);
    }

    #[test]
    fn win_needs_exactly_the_mine_count() {
        let mut game = pocket_game();
        for x in 0..9 {
            game.toggle_flag((x, 5));
        }
        game.tick(FRAME);
        assert!(!game.is_game_won());

        game.toggle_flag((9, 5));
        game.toggle_flag((0, 6));
        assert_eq!(game.mines_remaining(), -1);
        game.tick(FRAME);
        assert!(!game.is_game_won());
    }

    #[test]
    fn revealed_flags_do_not_count_toward_the_win() {
        let mut game = pocket_game();
        game.toggle_flag((1, 0));
        for x in 0..9 {
            game.toggle_flag((x, 5));
        }
        // the cascade uncovers the flag on (1, 0)
        game.reveal((4, 0));
        game.refresh();
        assert!(!game.is_game_won());
        assert_eq!(game.mines_remaining(), 1);
    }

    #[test]
    fn clock_runs_only_while_in_progress() {
        let mut game = pocket_game();
        game.tick(FRAME);
        assert_eq!(game.elapsed(), Duration::ZERO);

        game.reveal((0, 0));
        game.tick(FRAME);
        game.tick(Duration::from_millis(500));
        assert_eq!(game.elapsed(), FRAME + Duration::from_millis(500));

        game.reveal((9, 9));
        let frozen = game.elapsed();
        game.tick(Duration::from_secs(1));
        assert_eq!(game.elapsed(), frozen);
    }

    #[test]
    fn clock_stops_on_the_winning_frame() {
        let mut game = pocket_game();
        game.reveal((0, 0));
        for x in 0..10 {
            game.toggle_flag((x, 5));
        }
        game.tick(FRAME);
        assert!(game.is_game_won());
        assert_eq!(game.elapsed(), Duration::ZERO);
    }

    #[test]
    fn restart_after_a_finished_game_is_fresh() {
        let mut rng = StdRng::seed_from_u64(11);

        let mut lost = pocket_game();
        lost.reveal((0, 0));
        lost.tick(FRAME);
        lost.reveal((6, 1));
        lost.restart(&mut rng).unwrap();

        let mut won = pocket_game();
        won.reveal((0, 0));
        for x in 0..10 {
            won.toggle_flag((x, 7));
        }
        won.tick(FRAME);
        assert!(won.is_game_won());
        won.restart(&mut rng).unwrap();

        for game in [lost, won] {
            assert_eq!(game.status(), Status::Fresh);
            assert!(!game.is_game_over());
            assert!(!game.is_game_won());
            assert_eq!(game.elapsed(), Duration::ZERO);
            assert_eq!(game.board().revealed_count(), 0);
            assert_eq!(game.board().flagged_count(), 0);
            assert_eq!(game.board().config(), BoardConfig::default());
        }
    }
}
