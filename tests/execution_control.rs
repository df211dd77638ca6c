use std::thread;
use std::time::{Duration, Instant};

use uninformed_search::neighbors::is_legal_move;
use uninformed_search::obstacles::ObstacleSpawner;
use uninformed_search::{
    AlgorithmKind, Engine, FailureReason, Grid, Outcome, Path, Position, RunState, SearchError,
    SearchWorker, Snapshot,
};

fn open_grid() -> Grid {
    Grid::with_endpoints(7, 7, Position::new(0, 0), Position::new(6, 6)).unwrap()
}

fn walled_grid() -> Grid {
    let mut grid = Grid::with_endpoints(9, 9, Position::new(0, 0), Position::new(8, 8)).unwrap();
    for row in 0..7 {
        grid.toggle_wall(Position::new(row, 4)).unwrap();
    }
    grid.toggle_wall(Position::new(4, 6)).unwrap();
    grid
}

fn assert_valid(grid: &Grid, path: &Path) {
    assert_eq!(path.cells().first(), Some(&grid.start()));
    assert_eq!(path.cells().last(), Some(&grid.target()));
    for pair in path.cells().windows(2) {
        assert!(is_legal_move(pair[0], pair[1]));
    }
    for cell in path.cells() {
        assert!(grid.is_traversable(*cell), "{} is blocked", cell);
    }
}

fn wait_for(worker: &SearchWorker, pred: impl Fn(&Snapshot) -> bool) -> Snapshot {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snap = worker.snapshot();
        if pred(&snap) {
            return snap;
        }
        assert!(Instant::now() < deadline, "worker never reached the expected state");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn pausing_does_not_change_results() {
    for kind in AlgorithmKind::ALL {
        let mut straight = Engine::new(walled_grid()).with_algorithm(kind);
        straight.start().unwrap();
        straight.run_to_completion().unwrap();

        let mut interrupted = Engine::new(walled_grid()).with_algorithm(kind);
        interrupted.start().unwrap();
        let mut steps = 0;
        while interrupted.state() == RunState::Running {
            interrupted.step().unwrap();
            steps += 1;
            if steps % 3 == 0 && interrupted.state() == RunState::Running {
                interrupted.pause().unwrap();
                assert_eq!(interrupted.stats().status, "Paused");
                assert!(matches!(interrupted.step(), Err(SearchError::InvalidState { .. })));
                interrupted.resume().unwrap();
            }
        }

        assert_eq!(interrupted.state(), straight.state(), "{}", kind);
        assert_eq!(interrupted.path(), straight.path(), "{}", kind);
        assert_eq!(interrupted.explored(), straight.explored(), "{}", kind);
        assert_eq!(
            interrupted.stats().nodes_expanded,
            straight.stats().nodes_expanded,
            "{}",
            kind
        );
        assert_eq!(interrupted.stats().status, straight.stats().status);
    }
}

#[test]
fn obstacle_on_frontier_is_routed_around() {
    let blocked = Position::new(1, 1);
    for kind in AlgorithmKind::ALL {
        let mut engine = Engine::new(open_grid()).with_algorithm(kind);
        engine.start().unwrap();
        engine.step().unwrap();
        assert!(engine.frontier().contains(&blocked), "{}", kind);

        engine.inject_obstacle(blocked).unwrap();
        engine.run_to_completion().unwrap();

        let path = engine.outcome().unwrap();
        assert!(!path.contains(&blocked), "{}", kind);
        assert!(!engine.explored().contains(&blocked), "{}", kind);
        assert_valid(engine.grid(), path);
    }
}

#[test]
fn blocking_an_expanded_ancestor_forces_a_replan() {
    let blocked = Position::new(3, 3);
    let mut engine = Engine::new(open_grid()).with_algorithm(AlgorithmKind::Bfs);
    engine.start().unwrap();
    while !engine.explored().contains(&blocked) {
        engine.step().unwrap();
    }
    engine.inject_obstacle(blocked).unwrap();
    engine.run_to_completion().unwrap();

    let path = engine.outcome().unwrap();
    assert!(!path.contains(&blocked));
    assert_valid(engine.grid(), path);
    assert_eq!(path.hops(), engine.grid().shortest_hops().unwrap());
    assert_eq!(engine.stats().replans, 1);
    assert_eq!(engine.stats().status, "Path found");
}

#[test]
fn every_algorithm_avoids_cells_blocked_after_expansion() {
    let blocked = Position::new(3, 3);
    for kind in AlgorithmKind::ALL {
        let mut engine = Engine::new(open_grid()).with_algorithm(kind);
        engine.start().unwrap();
        while engine.state() == RunState::Running && !engine.explored().contains(&blocked) {
            engine.step().unwrap();
        }
        if engine.state() == RunState::Running {
            engine.inject_obstacle(blocked).unwrap();
            engine.run_to_completion().unwrap();
        }

        let path = engine.outcome().unwrap();
        assert!(!path.contains(&blocked), "{}", kind);
        assert_valid(engine.grid(), path);
    }
}

#[test]
fn spawned_obstacles_respect_radius_and_never_block_the_result() {
    for kind in AlgorithmKind::ALL {
        let mut runs_with_obstacles = 0;
        for seed in 0..15 {
            let mut engine = Engine::new(Grid::new(12, 12).unwrap()).with_algorithm(kind);
            engine.set_exclusion_radius(1);
            engine.set_spawner(Some(ObstacleSpawner::new(0.3, Some(seed))));
            engine.start().unwrap();

            let mut most_seen = 0;
            while engine.state() == RunState::Running {
                engine.step().unwrap();
                most_seen = most_seen.max(engine.snapshot().dynamic_obstacles.len());
            }
            if most_seen > 0 {
                runs_with_obstacles += 1;
            }

            let grid = engine.grid();
            for pos in grid.dynamic_obstacles() {
                assert!(pos.chebyshev(&grid.start()) > grid.exclusion_radius());
                assert!(pos.chebyshev(&grid.target()) > grid.exclusion_radius());
            }
            match engine.outcome() {
                Ok(path) => assert_valid(grid, path),
                Err(SearchError::NoPath) => {}
                Err(SearchError::DepthExceeded { .. }) if kind == AlgorithmKind::Dls => {}
                Err(e) => panic!("{} seed {}: {}", kind, seed, e),
            }
        }
        assert!(runs_with_obstacles > 0, "{} never saw an obstacle", kind);
    }
}

#[test]
fn walls_drawn_while_paused_are_respected() {
    let mut engine = Engine::new(open_grid()).with_algorithm(AlgorithmKind::Bfs);
    engine.start().unwrap();
    engine.step().unwrap();
    engine.pause().unwrap();

    let wall = Position::new(1, 1);
    assert!(engine.toggle_wall(wall).unwrap());
    engine.resume().unwrap();
    engine.run_to_completion().unwrap();

    let path = engine.outcome().unwrap();
    assert!(!path.contains(&wall));
    assert_eq!(path.hops(), engine.grid().shortest_hops().unwrap());
}

#[test]
fn obstacle_cutting_off_target_ends_in_no_path() {
    let mut engine = Engine::new(open_grid()).with_algorithm(AlgorithmKind::Bfs);
    engine.start().unwrap();
    engine.step().unwrap();
    for pos in [Position::new(5, 5), Position::new(5, 6), Position::new(6, 5)] {
        engine.inject_obstacle(pos).unwrap();
    }
    engine.run_to_completion().unwrap();
    assert_eq!(
        engine.state(),
        RunState::Finished(Outcome::Failure(FailureReason::NoPath))
    );
    assert!(engine.frontier().is_empty());
}

#[test]
fn reset_clears_injected_obstacles() {
    let mut engine = Engine::new(open_grid());
    engine.inject_obstacle(Position::new(3, 3)).unwrap();
    engine.start().unwrap();
    engine.run_to_completion().unwrap();
    assert!(!engine.path().contains(&Position::new(3, 3)));

    engine.reset_search();
    assert!(engine.grid().dynamic_obstacles().is_empty());
    engine.start().unwrap();
    engine.run_to_completion().unwrap();
    assert!(engine.path().contains(&Position::new(3, 3)));
}

#[test]
fn elapsed_time_freezes_while_paused() {
    let mut engine = Engine::new(open_grid());
    engine.start().unwrap();
    engine.step().unwrap();
    engine.pause().unwrap();
    let frozen = engine.stats().elapsed;
    thread::sleep(Duration::from_millis(20));
    engine.resume().unwrap();
    engine.step().unwrap();
    assert!(engine.stats().elapsed < frozen + Duration::from_millis(20));
}

#[test]
fn worker_accepts_obstacles_while_paused() {
    let grid = Grid::with_endpoints(12, 12, Position::new(0, 0), Position::new(11, 11)).unwrap();
    let engine = Engine::new(grid).with_algorithm(AlgorithmKind::Bfs);
    let worker = SearchWorker::spawn(engine, Duration::from_millis(2)).unwrap();

    worker.pause().unwrap();
    let paused = wait_for(&worker, |s| s.state == RunState::Paused);

    let blocked = Position::new(8, 8);
    worker.inject_obstacle(blocked).unwrap();
    let snap = wait_for(&worker, |s| s.dynamic_obstacles.contains(&blocked));
    assert_eq!(snap.stats.nodes_expanded, paused.stats.nodes_expanded);

    worker.set_delay(Duration::ZERO).unwrap();
    worker.resume().unwrap();
    let engine = worker.join().unwrap();

    assert_eq!(engine.state(), RunState::Finished(Outcome::Success));
    let path = engine.outcome().unwrap();
    assert!(!path.contains(&blocked));
    assert_valid(engine.grid(), path);
}

#[test]
fn dropping_worker_cancels_the_run() {
    let grid = Grid::new(30, 30).unwrap();
    let engine = Engine::new(grid).with_algorithm(AlgorithmKind::Dfs);
    let worker = SearchWorker::spawn(engine, Duration::from_millis(50)).unwrap();
    let started = Instant::now();
    drop(worker);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn worker_applies_wall_edits_while_paused() {
    let grid = Grid::with_endpoints(12, 12, Position::new(0, 0), Position::new(11, 11)).unwrap();
    let target = grid.target();
    let engine = Engine::new(grid).with_algorithm(AlgorithmKind::Bfs);
    let worker = SearchWorker::spawn(engine, Duration::from_millis(2)).unwrap();

    wait_for(&worker, |s| s.stats.nodes_expanded >= 3);
    worker.pause().unwrap();
    let paused = wait_for(&worker, |s| s.state == RunState::Paused);

    let mut frontier: Vec<Position> = paused
        .frontier
        .iter()
        .copied()
        .filter(|pos| *pos != target)
        .collect();
    frontier.sort();
    assert!(frontier.len() >= 2);
    let (wall, erased) = (frontier[0], frontier[1]);

    worker.toggle_wall(wall).unwrap();
    worker.toggle_wall(erased).unwrap();
    worker.erase(erased).unwrap();
    worker.set_delay(Duration::ZERO).unwrap();
    worker.resume().unwrap();
    let engine = worker.join().unwrap();

    assert!(engine.grid().is_wall(wall));
    assert!(!engine.grid().is_wall(erased));
    let path = engine.outcome().unwrap();
    assert!(!path.contains(&wall));
    assert_valid(engine.grid(), path);
}
