use pathfinding::prelude::{bfs_reach, dijkstra};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use uninformed_search::neighbors::{is_legal_move, successors};
use uninformed_search::{
    AlgorithmKind, Engine, FailureReason, Grid, Outcome, Path, Position, RunState, SearchError,
};

fn finish(grid: Grid, kind: AlgorithmKind) -> Engine {
    let mut engine = Engine::new(grid).with_algorithm(kind);
    engine.start().unwrap();
    engine.run_to_completion().unwrap();
    engine
}

fn random_grids() -> Vec<Grid> {
    (0..20)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new(10, 10).unwrap();
            grid.scatter_walls(25, &mut rng);
            grid
        })
        .collect()
}

fn assert_valid(grid: &Grid, path: &Path) {
    let cells = path.cells();
    assert_eq!(cells.first(), Some(&grid.start()));
    assert_eq!(cells.last(), Some(&grid.target()));
    for pair in cells.windows(2) {
        assert!(is_legal_move(pair[0], pair[1]), "{} -> {}", pair[0], pair[1]);
    }
    for cell in cells {
        assert!(grid.is_traversable(*cell));
    }
}

fn reachable(grid: &Grid, from: Position) -> FxHashSet<Position> {
    bfs_reach(from, |p| {
        successors(grid, *p).into_iter().map(|s| s.pos).collect::<Vec<_>>()
    })
    .collect()
}

/// Optimal √2-weighted cost, with costs scaled to integers for the oracle.
fn optimal_cost(grid: &Grid) -> Option<f64> {
    let scale = |c: f64| (c * 1_000_000.0).round() as u64;
    dijkstra(
        &grid.start(),
        |p| {
            successors(grid, *p)
                .into_iter()
                .map(|s| (s.pos, scale(s.cost)))
                .collect::<Vec<_>>()
        },
        |p| *p == grid.target(),
    )
    .map(|(_, cost)| cost as f64 / 1_000_000.0)
}

#[test]
fn bfs_on_open_five_by_five() {
    let grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(4, 4)).unwrap();
    let engine = finish(grid, AlgorithmKind::Bfs);

    assert_eq!(engine.state(), RunState::Finished(Outcome::Success));
    assert_eq!(engine.stats().path_length, 5);
    assert!(engine.stats().nodes_expanded > 0);
    assert_eq!(engine.stats().status, "Path found");
    assert_eq!(
        engine.path().cells(),
        &[
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(2, 2),
            Position::new(3, 3),
            Position::new(4, 4)
        ]
    );
}

#[test]
fn bfs_matches_reference_hop_distance() {
    for grid in random_grids() {
        let expected = grid.shortest_hops();
        let engine = finish(grid.clone(), AlgorithmKind::Bfs);
        match expected {
            Some(hops) => {
                assert_eq!(engine.outcome().unwrap().hops(), hops);
                assert_valid(&grid, engine.path());
            }
            None => assert!(matches!(engine.outcome(), Err(SearchError::NoPath))),
        }
    }
}

#[test]
fn ucs_finds_minimum_cost() {
    for grid in random_grids() {
        let engine = finish(grid.clone(), AlgorithmKind::Ucs);
        match optimal_cost(&grid) {
            Some(best) => {
                let path = engine.outcome().unwrap();
                assert_valid(&grid, path);
                assert!((path.cost() - best).abs() < 1e-3, "{} vs {}", path.cost(), best);
                assert!((engine.stats().path_cost - best).abs() < 1e-3);
            }
            None => assert!(matches!(engine.outcome(), Err(SearchError::NoPath))),
        }
    }
}

#[test]
fn depth_first_family_returns_valid_paths() {
    for grid in random_grids() {
        let reachable = grid.shortest_hops().is_some();
        for kind in [AlgorithmKind::Dfs, AlgorithmKind::Iddfs] {
            let engine = finish(grid.clone(), kind);
            if reachable {
                assert_valid(&grid, engine.outcome().unwrap());
            } else {
                assert!(matches!(engine.outcome(), Err(SearchError::NoPath)));
            }
        }

        let mut dls = Engine::new(grid.clone())
            .with_algorithm(AlgorithmKind::Dls)
            .with_depth_limit(100);
        dls.start().unwrap();
        dls.run_to_completion().unwrap();
        if reachable {
            assert_valid(&grid, dls.outcome().unwrap());
        }
    }
}

#[test]
fn dfs_prefers_up_first() {
    let grid = Grid::with_endpoints(5, 5, Position::new(2, 2), Position::new(0, 2)).unwrap();
    let engine = finish(grid, AlgorithmKind::Dfs);
    assert_eq!(
        engine.path().cells(),
        &[Position::new(2, 2), Position::new(1, 2), Position::new(0, 2)]
    );
}

#[test]
fn iddfs_stops_at_true_distance() {
    for grid in random_grids() {
        let Some(d) = grid.shortest_hops() else {
            continue;
        };
        let engine = finish(grid.clone(), AlgorithmKind::Iddfs);
        let path = engine.outcome().unwrap();
        assert_eq!(path.hops(), d);
        assert_eq!(engine.stats().depth_limit, Some(d));
        assert_eq!(engine.stats().status, format!("Found at depth {}", d));
    }
}

#[test]
fn bidirectional_paths_are_connected() {
    for grid in random_grids() {
        let engine = finish(grid.clone(), AlgorithmKind::Bidirectional);
        match grid.shortest_hops() {
            Some(d) => {
                let path = engine.outcome().unwrap();
                assert_valid(&grid, path);
                assert!(path.hops() >= d);
                assert!(path.hops() <= 2 * d + 1);
                let unique: FxHashSet<_> = path.cells().iter().collect();
                assert_eq!(unique.len(), path.len());
            }
            None => assert!(matches!(engine.outcome(), Err(SearchError::NoPath))),
        }
    }
}

#[test]
fn bidirectional_on_open_grid_is_near_optimal() {
    let grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(4, 4)).unwrap();
    let engine = finish(grid.clone(), AlgorithmKind::Bidirectional);
    let hops = engine.outcome().unwrap().hops();
    assert!(hops == 4 || hops == 5, "got {} hops", hops);
    assert_eq!(engine.stats().status, "Paths met");
}

#[test]
fn full_wall_means_no_path_for_everyone() {
    let mut grid = Grid::with_endpoints(6, 6, Position::new(0, 0), Position::new(5, 5)).unwrap();
    for row in 0..6 {
        grid.toggle_wall(Position::new(row, 3)).unwrap();
    }
    let from_start = reachable(&grid, grid.start());
    let from_target = reachable(&grid, grid.target());

    for kind in AlgorithmKind::ALL {
        let engine = finish(grid.clone(), kind);
        assert_eq!(
            engine.state(),
            RunState::Finished(Outcome::Failure(FailureReason::NoPath)),
            "{}",
            kind
        );
        assert!(matches!(engine.outcome(), Err(SearchError::NoPath)));
        assert!(engine.frontier().is_empty(), "{}", kind);
        assert_eq!(engine.stats().frontier_size, 0);
        assert!(engine.path().is_empty());

        let expected: FxHashSet<Position> = if kind == AlgorithmKind::Bidirectional {
            from_start.union(&from_target).copied().collect()
        } else {
            from_start.clone()
        };
        assert_eq!(engine.explored(), &expected, "{}", kind);
    }
}

#[test]
fn dls_reports_depth_exceeded_not_no_path() {
    let grid = Grid::with_endpoints(6, 6, Position::new(0, 0), Position::new(0, 3)).unwrap();
    assert_eq!(grid.shortest_hops(), Some(3));

    let mut engine = Engine::new(grid)
        .with_algorithm(AlgorithmKind::Dls)
        .with_depth_limit(1);
    engine.start().unwrap();
    engine.run_to_completion().unwrap();
    assert_eq!(
        engine.state(),
        RunState::Finished(Outcome::Failure(FailureReason::DepthExceeded))
    );
    assert!(matches!(
        engine.outcome(),
        Err(SearchError::DepthExceeded { limit: 1 })
    ));
}

#[test]
fn explored_count_never_exceeds_expansions() {
    for kind in AlgorithmKind::ALL {
        let grid = Grid::new(8, 8).unwrap();
        let engine = finish(grid, kind);
        assert!(engine.explored().len() <= engine.stats().nodes_expanded);
    }
}
