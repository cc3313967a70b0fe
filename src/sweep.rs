use crate::error::Error;
use bit_set::BitSet;
use rand::Rng;

/// A board position as `(x, y)`: `x` counts columns from the left, `y` counts
/// rows from the top.
pub(crate) type Coordinate = (usize, usize);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
}

/// Dimensions and mine count of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoardConfig {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) mines: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            mines: 10,
        }
    }
}

impl BoardConfig {
    pub(crate) fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Checks `width > 0`, `height > 0` and `0 < mines < width * height`.
    pub(crate) fn validate(self) -> Result<Self, Error> {
        let Self {
            width,
            height,
            mines,
        } = self;

        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let cells = self.cells();
        if mines == 0 || mines >= cells {
            return Err(Error::InvalidMineCount {
                mines,
                cells,
                max: cells - 1,
            });
        }

        Ok(self)
    }
}

/// Outcome of a reveal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reveal {
    /// Out of bounds, already revealed, or flagged.
    Ignored,
    /// The target was a mine.
    Mine,
    /// The target was safe; holds the number of newly revealed cells.
    Cleared(usize),
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Increment {
    One,
    NegOne,
    Zero,
}

impl Increment {
    fn offset(self, value: usize, bound: usize) -> Option<usize> {
        match self {
            Self::One => value.checked_add(1),
            Self::NegOne => value.checked_sub(1),
            Self::Zero => Some(value),
        }
        .filter(|&offset| offset < bound)
    }
}

/// The in-bounds cells at Chebyshev distance 1 from `(x, y)`.
fn adjacent((x, y): Coordinate, width: usize, height: usize) -> impl Iterator<Item = Coordinate> {
    const INCREMENTS: [Increment; 3] = [Increment::One, Increment::NegOne, Increment::Zero];

    INCREMENTS
        .iter()
        .copied()
        .flat_map(|x_incr| std::iter::repeat(x_incr).zip(INCREMENTS))
        .filter_map(move |(x_incr, y_incr)| match (x_incr, y_incr) {
            (Increment::Zero, Increment::Zero) => None,
            _ => Some((x_incr.offset(x, width)?, y_incr.offset(y, height)?)),
        })
}

fn index_from_coord((x, y): Coordinate, width: usize) -> usize {
    y * width + x
}

fn coord_from_index(index: usize, width: usize) -> Coordinate {
    (index % width, index / width)
}

#[derive(Debug, Clone)]
pub(crate) struct Board {
    cells: Vec<Cell>,
    // mine placement, fixed once the board is built
    mines: BitSet,
    width: usize,
    height: usize,
    mine_count: usize,
}

impl Board {
    /// Places `config.mines` mines by rejection sampling: draw a random
    /// coordinate, draw again on collision.
    pub(crate) fn new<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Result<Self, Error> {
        let BoardConfig {
            width,
            height,
            mines,
        } = config.validate()?;

        let mut placed = BitSet::with_capacity(config.cells());
        for _ in 0..mines {
            loop {
                let coord = (rng.gen_range(0..width), rng.gen_range(0..height));
                if placed.insert(index_from_coord(coord, width)) {
                    break;
                }
            }
        }

        Ok(Self::from_parts(width, height, mines, placed))
    }

    /// Builds a board with mines at exactly the given coordinates.
    pub(crate) fn with_mines(
        width: usize,
        height: usize,
        mines: impl IntoIterator<Item = Coordinate>,
    ) -> Result<Self, Error> {
        let mut placed = BitSet::new();
        for (x, y) in mines {
            if x >= width || y >= height {
                return Err(Error::MineOutOfBounds((x, y)));
            }
            if !placed.insert(index_from_coord((x, y), width)) {
                return Err(Error::DuplicateMine((x, y)));
            }
        }

        let mine_count = placed.len();
        BoardConfig {
            width,
            height,
            mines: mine_count,
        }
        .validate()?;

        Ok(Self::from_parts(width, height, mine_count, placed))
    }

    fn from_parts(width: usize, height: usize, mine_count: usize, mines: BitSet) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            mines,
            width,
            height,
            mine_count,
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub(crate) fn config(&self) -> BoardConfig {
        BoardConfig {
            width: self.width,
            height: self.height,
            mines: self.mine_count,
        }
    }

    pub(crate) fn in_bounds(&self, (x, y): Coordinate) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| index_from_coord(coord, self.width))
    }

    /// Every coordinate on the board, row by row.
    pub(crate) fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.width;
        (0..self.cells.len()).map(move |index| coord_from_index(index, width))
    }

    pub(crate) fn cell(&self, coord: Coordinate) -> Option<Cell> {
        self.index(coord).map(|index| self.cells[index])
    }

    pub(crate) fn is_mine(&self, coord: Coordinate) -> bool {
        self.index(coord)
            .map_or(false, |index| self.mines.contains(index))
    }

    /// Number of mines among the neighbors of `coord`, not counting `coord`
    /// itself. Out-of-bounds coordinates have no neighbors.
    pub(crate) fn count_surrounding_mines(&self, coord: Coordinate) -> u8 {
        if !self.in_bounds(coord) {
            return 0;
        }
        adjacent(coord, self.width, self.height)
            .fold(0, |total, neighbor| total + u8::from(self.is_mine(neighbor)))
    }

    /// Flagged cells that are still covered.
    pub(crate) fn flagged_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.flagged && !cell.revealed)
            .count()
    }

    pub(crate) fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.revealed).count()
    }

    pub(crate) fn reveal(&mut self, coord: Coordinate) -> Reveal {
        let Some(index) = self.index(coord) else {
            return Reveal::Ignored;
        };

        let target = self.cells[index];
        if target.revealed || target.flagged {
            return Reveal::Ignored;
        }

        if self.mines.contains(index) {
            self.cells[index].revealed = true;
            return Reveal::Mine;
        }

        let (width, height) = (self.width, self.height);
        let mut pending = vec![coord];
        let mut revealed = 0;

        // cascaded cells are revealed even when flagged, a zero cell never
        // borders a mine so the fill cannot reach one
        while let Some(coord) = pending.pop() {
            let index = index_from_coord(coord, width);
            if self.cells[index].revealed {
                continue;
            }
            self.cells[index].revealed = true;
            revealed += 1;

            if self.count_surrounding_mines(coord) == 0 {
                pending.extend(
                    adjacent(coord, width, height)
                        .filter(|&neighbor| !self.cells[index_from_coord(neighbor, width)].revealed),
                );
            }
        }

        Reveal::Cleared(revealed)
    }

    /// Flips the flag on a covered cell. Returns whether anything changed.
    pub(crate) fn toggle_flag(&mut self, coord: Coordinate) -> bool {
        match self.index(coord) {
            Some(index) if !self.cells[index].revealed => {
                let cell = &mut self.cells[index];
                cell.flagged = !cell.flagged;
                true
            }
            _ => false,
        }
    }
}
