use jewels_core::*;
use std::sync::Mutex;

/// Board produced by cycling types 0..5 row by row over eight columns,
/// i.e. `(3 * row + col) % 5`, which holds no run.
fn cycled_board() -> Game<SequenceIconGenerator> {
    let generator = SequenceIconGenerator::new(0..5);
    Game::new(GameConfig::default(), generator).unwrap()
}

fn kinds(game: &Game<impl IconGenerator>) -> Vec<Vec<u8>> {
    (0..game.height())
        .map(|row| {
            (0..game.width())
                .map(|col| game.icon_at((row, col)).map_or(u8::MAX, Icon::kind))
                .collect()
        })
        .collect()
}

fn assert_stable(game: &Game<impl IconGenerator>) {
    assert_eq!((game.width(), game.height()), (8, 8));
    assert!(game.grid().iter().all(Option::is_some), "board has holes:\n{game}");
    assert!(!game.has_runs(), "board has runs:\n{game}");
}

#[test]
fn deterministic_board_needs_no_presettling() {
    let game = cycled_board();

    assert_stable(&game);
    assert_eq!(game.score(), 0);
    assert_eq!(game.generator().position(), 64);
    assert_eq!(kinds(&game)[1], [3, 4, 0, 1, 2, 3, 4, 0]);
    assert!(!game.has_moves());
}

#[test]
fn single_run_end_to_end() {
    let mut game = cycled_board();
    // bottom row becomes 0 0 3 4 ..., the 0 at (6, 2) completes it
    game.set_icon((7, 0), Some(Icon::new(0))).unwrap();
    game.set_icon((7, 1), Some(Icon::new(0))).unwrap();
    assert!(!game.has_runs());

    let a = game.cell_at((6, 2));
    let b = game.cell_at((7, 2));
    assert_eq!(game.select(&[a, b]), SelectOutcome::Swapped);
    assert_eq!((game.width(), game.height()), (8, 8));

    let cascades = game.settle().unwrap();

    assert_eq!(cascades.len(), 1);
    let cascade = &cascades[0];
    assert_eq!(
        cascade.removed,
        [
            Cell::new(7, 0, Some(Icon::new(0))),
            Cell::new(7, 1, Some(Icon::new(0))),
            Cell::new(7, 2, Some(Icon::new(0))),
        ]
    );
    assert_eq!(cascade.points, BASE_SCORE);
    assert_eq!(cascade.moved.len(), 21);
    assert!(cascade.moved.iter().all(|cell| cell.previous_row() + 1 == cell.row() as RowOffset));
    assert_eq!(
        cascade.added,
        [
            Cell::new(0, 0, Some(Icon::new(4))).with_previous_row(-1),
            Cell::new(0, 1, Some(Icon::new(0))).with_previous_row(-1),
            Cell::new(0, 2, Some(Icon::new(1))).with_previous_row(-1),
        ]
    );

    assert_eq!(game.score(), BASE_SCORE);
    assert_stable(&game);
    assert_eq!(
        kinds(&game),
        [
            [4, 0, 1, 3, 4, 0, 1, 2],
            [0, 1, 2, 1, 2, 3, 4, 0],
            [3, 4, 0, 4, 0, 1, 2, 3],
            [1, 2, 3, 2, 3, 4, 0, 1],
            [4, 0, 1, 0, 1, 2, 3, 4],
            [2, 3, 4, 3, 4, 0, 1, 2],
            [0, 1, 2, 1, 2, 3, 4, 0],
            [3, 4, 3, 4, 0, 1, 2, 3],
        ]
    );

    // nothing left to do until the next move
    assert!(game.find_runs(false).is_empty());
    assert!(game.settle().unwrap().is_empty());
    assert_eq!(game.score(), BASE_SCORE);
}

#[test]
fn rejected_moves_leave_board_untouched() {
    let mut game = cycled_board();
    let before = game.snapshot();

    let (outcome, cascades) = game.play((0, 0), (0, 1)).unwrap();
    assert_eq!(outcome, SelectOutcome::NoRun);
    assert!(cascades.is_empty());

    game.set_icon((0, 1), Some(Icon::new(0))).unwrap();
    let same = game.snapshot();
    assert_eq!(game.play((0, 0), (0, 1)).unwrap().0, SelectOutcome::SameIcon);
    assert_eq!(game.snapshot(), same);

    game.restore(&before).unwrap();
    assert_eq!(game.play((0, 0), (1, 1)).unwrap().0, SelectOutcome::NotAdjacent);
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.score(), 0);
}

#[test]
fn random_games_keep_invariants() {
    for seed in 0..8 {
        let mut game = Game::new(GameConfig::default(), RandomIconGenerator::new(seed, 5)).unwrap();
        assert_stable(&game);
        assert_eq!(game.score(), 0);

        for _ in 0..25 {
            let Some(&(a, b)) = game.available_moves().first() else {
                break;
            };
            let score = game.score();

            let (outcome, cascades) = game.play(a, b).unwrap();

            assert_eq!(outcome, SelectOutcome::Swapped, "seed {seed}");
            assert!(!cascades.is_empty());
            assert_eq!(game.score() - score, cascades.iter().map(|c| c.points).sum::<Score>());
            for cascade in &cascades {
                assert!(cascade.added.iter().all(|cell| cell.is_new(game.height())));
                assert!(cascade.moved.iter().all(Cell::has_moved));
            }
            assert_stable(&game);
        }
    }
}

#[test]
fn snapshot_survives_json() {
    let mut game = Game::new(GameConfig::default(), RandomIconGenerator::new(3, 6)).unwrap();
    let saved = game.snapshot();

    let json = serde_json::to_string(&saved).unwrap();
    let loaded: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, saved);

    if let Some(&(a, b)) = game.available_moves().first() {
        game.play(a, b).unwrap();
        assert_ne!(game.snapshot().grid, saved.grid);
    }
    game.restore(&loaded).unwrap();
    assert_eq!(game.snapshot(), saved);
}

/// Keeps every formatted record so debug dumps can be inspected.
struct CaptureLog(Mutex<Vec<String>>);

impl log::Log for CaptureLog {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        self.0.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLog = CaptureLog(Mutex::new(Vec::new()));

#[test]
fn debug_logging_does_not_change_results() {
    // the only logger in this binary, ignore a repeated install
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(log::LevelFilter::Trace);

    let mut quiet = cycled_board();
    let mut loud = cycled_board();
    loud.set_debug(true);
    assert!(loud.debug());

    for game in [&mut quiet, &mut loud] {
        game.set_icon((7, 0), Some(Icon::new(0))).unwrap();
        game.set_icon((7, 1), Some(Icon::new(0))).unwrap();
        game.play((6, 2), (7, 2)).unwrap();
    }

    assert_eq!(quiet.snapshot(), loud.snapshot());

    let records = CAPTURE.0.lock().unwrap();
    assert!(records.iter().any(|msg| msg.starts_with("Grid =\n")));
    assert!(records.iter().any(|msg| msg.starts_with("Fill column 0: [(0,0) 4(-1)]")));
    let dump = records
        .iter()
        .find(|msg| msg.starts_with("Score = 10\n"))
        .expect("score dump after the removal pass");
    assert!(dump.contains("0 1 2 3 4 5 6 7    \n\n"));
    assert!(dump.ends_with("  7\n"));
}
