use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_autopilot::{build_tour, Coords, Direction, Grid, SpanningTree, Tour};

fn assert_hamiltonian(tour: &Tour, width: u16, height: u16) {
    let cells = tour.cells();
    assert_eq!(cells.len(), width as usize * height as usize);

    let unique: HashSet<Coords> = cells.iter().copied().collect();
    assert_eq!(unique.len(), cells.len(), "tour repeats a cell");
    assert!(cells.iter().all(|&(x, y)| x < width && y < height));

    for (i, &from) in cells.iter().enumerate() {
        let to = cells[(i + 1) % cells.len()];
        assert!(
            Direction::between(from, to).is_some(),
            "{:?} -> {:?} is not a single step",
            from,
            to
        );
    }
}

#[test]
fn tours_cover_even_grids() {
    let sizes = [(4, 4), (6, 4), (4, 8), (8, 8), (10, 6), (18, 18)];

    for (width, height) in sizes {
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let head = (1, height / 2);
            let tour = build_tour(width, height, head, (0, height / 2), &mut rng).unwrap();

            assert_hamiltonian(&tour, width, height);
            assert_eq!(tour.cells()[0], head);
        }
    }
}

#[test]
fn four_by_four_from_the_top_row() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let head = (1, 0);
    let tour = build_tour(4, 4, head, (0, 0), &mut rng).unwrap();

    assert_eq!(tour.len(), 16);
    assert_hamiltonian(&tour, 4, 4);

    let after = tour.cell_at(tour.position(head).unwrap() + 1);
    assert!(Direction::between(head, after).is_some());
    assert_ne!(after, (0, 0));
}

#[test]
fn reverse_index_matches_the_walk() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let tour = build_tour(8, 6, (3, 3), (3, 4), &mut rng).unwrap();

    for (i, &pos) in tour.cells().iter().enumerate() {
        assert_eq!(tour.position(pos), Some(i));
        assert_eq!(tour.successor(pos), Some(tour.cell_at(i + 1)));
    }
}

#[test]
fn every_session_gets_its_own_shape() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let shapes: HashSet<Vec<Coords>> = (0..10)
        .map(|_| build_tour(8, 8, (1, 4), (0, 4), &mut rng).unwrap().cells().to_vec())
        .collect();

    assert!(shapes.len() > 1, "random trees should not all trace the same tour");
}

#[test]
fn tour_crosses_blocks_only_along_tree_edges() {
    let grid = Grid::new(10, 8);
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let tree = SpanningTree::grow(grid, &mut rng).unwrap();
    let tour = Tour::from_tree(&tree, (4, 4), (5, 4)).unwrap();

    let edges: HashSet<(Coords, Coords)> = tree.edges().collect();
    let cells = tour.cells();
    let mut crossings = 0;

    for (i, &from) in cells.iter().enumerate() {
        let to = cells[(i + 1) % cells.len()];
        let (a, b) = ((from.0 / 2, from.1 / 2), (to.0 / 2, to.1 / 2));
        if a != b {
            crossings += 1;
            assert!(edges.contains(&(a, b)) || edges.contains(&(b, a)));
        }
    }

    // Each tree edge is crossed once in each direction.
    assert_eq!(crossings, 2 * tree.edge_count());
}
