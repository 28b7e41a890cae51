use alloc::vec::Vec;
use core::fmt;
use core::num::Saturating;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

/// Points awarded for a single run: `base_score × 2^(len − 3)`, zero below three.
pub fn score_for_run(base_score: Score, len: usize) -> Score {
    if len < 3 {
        return 0;
    }
    let factor = u32::try_from(len - 3)
        .ok()
        .and_then(|extra| Score::checked_pow(2, extra))
        .unwrap_or(Score::MAX);
    base_score.saturating_mul(factor)
}

/// Changes produced by one removal pass, in the order a front end plays them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    /// Icons that formed runs, possibly listed twice when a horizontal and a
    /// vertical run cross.
    pub removed: Vec<Cell>,
    pub moved: Vec<Cell>,
    pub added: Vec<Cell>,
    pub points: Score,
}

impl Cascade {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Array2<Option<Icon>>,
    pub score: Score,
}

/// The match-three board and its rules.
///
/// Moves are pairs of adjacent cells with different icons, accepted only when
/// the swap forms at least one run of three or more. A run of `3 + n` icons is
/// worth `base_score × 2^n`.
#[derive(Clone, Debug)]
pub struct Game<G> {
    config: GameConfig,
    generator: G,
    grid: Array2<Option<Icon>>,
    score: Saturating<Score>,
    debug: bool,
}

impl<G: IconGenerator> Game<G> {
    /// Creates a board filled by `generator` and settled so no run is left.
    /// Settling the initial board does not count towards the score.
    pub fn new(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let mut game = Self::empty(config, generator);
        game.shuffle()?;
        Ok(game)
    }

    /// Creates a board from explicit icon types, one slice per row, without
    /// settling it. The generator is only used for refills.
    pub fn from_icons<R: AsRef<[u8]>>(config: GameConfig, generator: G, rows: &[R]) -> Result<Self> {
        config.validate()?;
        if rows.len() != usize::from(config.height)
            || rows.iter().any(|row| row.as_ref().len() != usize::from(config.width))
        {
            return Err(GameError::InvalidBoardShape);
        }

        let mut game = Self::empty(config, generator);
        for ((row, col), slot) in game.grid.indexed_iter_mut() {
            *slot = Some(Icon::new(rows[row].as_ref()[col]));
        }
        Ok(game)
    }

    fn empty(config: GameConfig, generator: G) -> Self {
        let size = (usize::from(config.height), usize::from(config.width));
        Self {
            config,
            generator,
            grid: Array2::from_elem(size, None),
            score: Saturating(0),
            debug: false,
        }
    }

    fn shuffle(&mut self) -> Result<()> {
        let limit = self.config.cascade_limit;
        for attempt in 1..=limit {
            self.generator.initialize(&mut self.grid);
            let settled = self.settle();
            self.score = Saturating(0);
            match settled {
                Ok(cascades) => {
                    log::debug!("Board ready after {} passes", cascades.len());
                    return Ok(());
                }
                Err(err) => log::warn!("{err}, regenerating board (attempt {attempt})"),
            }
        }
        Err(GameError::CannotSettle { passes: limit })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn score(&self) -> Score {
        self.score.0
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn grid(&self) -> ArrayView2<'_, Option<Icon>> {
        self.grid.view()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.height() && coords.1 < self.width() {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn icon_at(&self, coords: Coord2) -> Option<Icon> {
        self.grid[coords.to_nd_index()]
    }

    pub fn cell_at(&self, (row, col): Coord2) -> Cell {
        Cell::new(row, col, self.icon_at((row, col)))
    }

    pub fn set_icon(&mut self, coords: Coord2, icon: Option<Icon>) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.grid[coords.to_nd_index()] = icon;
        Ok(())
    }

    fn swap(&mut self, a: Coord2, b: Coord2) {
        self.grid.swap(a.to_nd_index(), b.to_nd_index());
    }

    /// Tries to swap the icons of exactly two cells.
    ///
    /// The cells must be adjacent, hold different icons, lie on the board, and
    /// the swap must form at least one run. Otherwise the board is left as it
    /// was. After [`SelectOutcome::Swapped`] call [`Game::settle`].
    pub fn select(&mut self, cells: &[Cell]) -> SelectOutcome {
        use SelectOutcome::*;

        let [a, b] = cells else {
            log::debug!("Select needs two cells, got {}", cells.len());
            return WrongCellCount;
        };

        let outcome = if !a.is_adjacent(b) {
            NotAdjacent
        } else if a.icon() == b.icon() {
            SameIcon
        } else if !a.in_grid(self.width(), self.height()) || !b.in_grid(self.width(), self.height()) {
            OutOfBounds
        } else {
            self.swap(a.coords(), b.coords());
            if has_runs(&self.grid) {
                Swapped
            } else {
                self.swap(a.coords(), b.coords());
                NoRun
            }
        };

        log::debug!("Select {a} {b}: {outcome:?}");
        if self.debug && outcome.has_update() {
            log::debug!("Grid =\n{self}");
        }
        outcome
    }

    /// Every cell that is part of a horizontal or vertical run, rows first.
    /// A cell in two crossing runs is listed twice.
    ///
    /// With `mark` set the listed slots are emptied and the runs are scored.
    pub fn find_runs(&mut self, mark: bool) -> Vec<Cell> {
        let (cells, lengths) = scan_runs(&self.grid);

        if mark {
            for cell in &cells {
                self.grid[cell.coords().to_nd_index()] = None;
            }
            for &len in &lengths {
                self.score += score_for_run(self.config.base_score, len);
            }
        }

        if self.debug && !cells.is_empty() {
            log::debug!("Find runs (mark: {mark}), run lengths {lengths:?}");
            log::debug!("Cells = {}", DisplayCells(&cells));
            log::debug!("Grid =\n{self}");
            log::debug!("Score = {}", self.score);
        }
        cells
    }

    pub fn has_runs(&self) -> bool {
        has_runs(&self.grid)
    }

    /// Lets the icons of a column fall so every empty slot ends up on top.
    ///
    /// Returns the icons that changed row, at their new position and with
    /// `previous_row` set to where they were. Icons that stay put are not
    /// reported.
    pub fn collapse_column(&mut self, col: Coord) -> Vec<Cell> {
        let mut moved = Vec::new();
        let mut lane = self.grid.column_mut(col.into());

        // slot the next icon from below lands on
        let mut target = lane.len();
        for row in (0..lane.len()).rev() {
            let Some(icon) = lane[row] else {
                continue;
            };
            target -= 1;
            if target != row {
                lane[target] = Some(icon);
                lane[row] = None;
                moved.push(
                    Cell::new(target as Coord, col, Some(icon)).with_previous_row(row as RowOffset),
                );
            }
        }

        log::trace!("Collapsed column {col}, {} icons fell", moved.len());
        if self.debug && !moved.is_empty() {
            log::debug!("Collapse column {col}: {}", DisplayCells(&moved));
            log::debug!("Grid =\n{self}");
        }
        moved
    }

    /// Fills the empty slots of a column with new icons, bottom to top.
    ///
    /// The n-th filled slot reports `previous_row = -n`, so the new icons line
    /// up above the board in the order they drop in.
    pub fn fill_column(&mut self, col: Coord) -> Vec<Cell> {
        let mut added = Vec::new();
        let mut above: RowOffset = 0;

        for row in (0..self.grid.nrows()).rev() {
            let slot = &mut self.grid[[row, col.into()]];
            if slot.is_none() {
                let icon = self.generator.generate();
                *slot = Some(icon);
                above -= 1;
                added.push(Cell::new(row as Coord, col, Some(icon)).with_previous_row(above));
            }
        }

        log::trace!("Filled column {col} with {} icons", added.len());
        if self.debug && !added.is_empty() {
            log::debug!("Fill column {col}: {}", DisplayCells(&added));
            log::debug!("Grid =\n{self}");
        }
        added
    }

    pub fn remove_all_runs(&mut self) -> Cascade {
        let before = self.score;
        let removed = self.find_runs(true);
        if removed.is_empty() {
            return Cascade::default();
        }

        let mut cascade = Cascade {
            removed,
            points: (self.score - before).0,
            ..Default::default()
        };
        for col in 0..self.width() {
            cascade.moved.extend(self.collapse_column(col));
            cascade.added.extend(self.fill_column(col));
        }

        if self.debug {
            log::debug!("Score = {}\n{}", self.score, self.repr());
        }
        cascade
    }

    /// Gives up with [`GameError::CannotSettle`] after the configured number of
    /// passes. The board is full at that point, only runs may remain.
    pub fn settle(&mut self) -> Result<Vec<Cascade>> {
        let limit = self.config.cascade_limit;
        let mut cascades = Vec::new();

        while self.has_runs() {
            if cascades.len() >= limit as usize {
                log::warn!("Giving up settling after {limit} passes");
                return Err(GameError::CannotSettle { passes: limit });
            }
            cascades.push(self.remove_all_runs());
        }

        if cascades.len() > 1 {
            log::debug!("Chain reaction of {} passes", cascades.len());
        }
        Ok(cascades)
    }

    pub fn play(&mut self, a: Coord2, b: Coord2) -> Result<(SelectOutcome, Vec<Cascade>)> {
        let a = self.cell_at(self.validate_coords(a)?);
        let b = self.cell_at(self.validate_coords(b)?);

        let outcome = self.select(&[a, b]);
        let cascades = if outcome.has_update() {
            self.settle()?
        } else {
            Vec::new()
        };
        Ok((outcome, cascades))
    }

    /// Each pair once, ordered `(smaller, larger)`.
    pub fn available_moves(&self) -> Vec<(Coord2, Coord2)> {
        let mut scratch = self.grid.clone();
        let mut moves = Vec::new();

        for row in 0..self.height() {
            for col in 0..self.width() {
                let from = (row, col);
                for to in self.grid.iter_neighbors(from).filter(|&to| to > from) {
                    let (a, b) = (from.to_nd_index(), to.to_nd_index());
                    if scratch[a] == scratch[b] || scratch[a].is_none() || scratch[b].is_none() {
                        continue;
                    }
                    scratch.swap(a, b);
                    if has_runs(&scratch) {
                        moves.push((from, to));
                    }
                    scratch.swap(a, b);
                }
            }
        }
        moves
    }

    pub fn has_moves(&self) -> bool {
        !self.available_moves().is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            score: self.score.0,
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.grid.dim() != self.grid.dim() {
            return Err(GameError::InvalidBoardShape);
        }
        self.grid.assign(&snapshot.grid);
        self.score = Saturating(snapshot.score);
        Ok(())
    }

    /// Compact dump with a column header, one glyph per icon and the row
    /// number closing every line. Empty slots are left blank.
    pub fn repr(&self) -> Repr<'_, G> {
        Repr(self)
    }
}

impl<G> fmt::Display for Game<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lane in self.grid.rows() {
            for slot in lane {
                match slot {
                    Some(icon) => write!(f, "   {icon}")?,
                    None => f.write_str("   *")?,
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

pub struct Repr<'a, G>(&'a Game<G>);

impl<G: IconGenerator> fmt::Display for Repr<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.0;
        let wide = game.width() > 10;

        for col in 0..game.width() {
            if wide {
                write!(f, "{col:02} ")?;
            } else {
                write!(f, "{col} ")?;
            }
        }
        f.write_str("   \n\n")?;

        let types = game.generator.icon_types();
        let separator = if wide { "  " } else { " " };
        for (row, lane) in game.grid.rows().into_iter().enumerate() {
            for slot in lane {
                let glyph = slot.map_or(' ', |icon| icon.symbol(types));
                write!(f, "{glyph}{separator}")?;
            }
            writeln!(f, "  {row}")?;
        }
        Ok(())
    }
}

struct DisplayCells<'a>(&'a [Cell]);

impl fmt::Display for DisplayCells<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.0 {
            write!(f, "{cell} ")?;
        }
        Ok(())
    }
}

/// Runs of three or more equal icons in one row or column, as `(start, len)`.
/// Empty slots never match.
fn lane_runs(lane: ArrayView1<'_, Option<Icon>>) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;

    while start + 2 < lane.len() {
        let Some(icon) = lane[start] else {
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < lane.len() && lane[end] == Some(icon) {
            end += 1;
        }
        if end - start >= 3 {
            runs.push((start, end - start));
        }
        start = end;
    }
    runs
}

fn scan_runs(grid: &Array2<Option<Icon>>) -> (Vec<Cell>, Vec<usize>) {
    let mut cells = Vec::new();
    let mut lengths = Vec::new();

    for (row, lane) in grid.rows().into_iter().enumerate() {
        for (start, len) in lane_runs(lane) {
            log::trace!("Run of {len} in row {row} from column {start}");
            lengths.push(len);
            cells.extend((start..start + len).map(|col| Cell::new(row as Coord, col as Coord, lane[col])));
        }
    }

    for (col, lane) in grid.columns().into_iter().enumerate() {
        for (start, len) in lane_runs(lane) {
            log::trace!("Run of {len} in column {col} from row {start}");
            lengths.push(len);
            cells.extend((start..start + len).map(|row| Cell::new(row as Coord, col as Coord, lane[row])));
        }
    }

    (cells, lengths)
}

fn has_runs(grid: &Array2<Option<Icon>>) -> bool {
    grid.rows().into_iter().chain(grid.columns()).any(|lane| !lane_runs(lane).is_empty())
}
