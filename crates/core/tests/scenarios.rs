use std::collections::BTreeSet;

use dungeon_core::{
    Coord, DungeonConfig, OccupancyGrid, Pathfinder, RecordingSink, Room, RoomSpec,
    SimpleRoomBuilder, WorldPos, distance_cost, generate_dungeon, path_cost,
};

#[test]
fn test_scenario_a_open_grid_corner_to_corner() {
    let grid = OccupancyGrid::open(5, 1, 5, 1.0, WorldPos::ORIGIN);
    let start = Coord::new(0, 0, 0);
    let end = Coord::new(4, 0, 4);

    let path = Pathfinder::new(&grid)
        .find_path(start, end)
        .expect("endpoints are in bounds")
        .expect("open grid always has a path");

    let steps = [(0, 0), (1, 0), (1, 1), (2, 1), (2, 2), (3, 2), (3, 3), (4, 3), (4, 4)];
    let staircase: Vec<Coord> = steps
        .into_iter()
        .map(|(x, z)| Coord::new(x, 0, z))
        .collect();
    assert_eq!(path.cells, staircase, "equal-cost ties go to the first cell in scan order");
    assert_eq!(path.cost, path_cost(&path.cells));
    assert_eq!(path.cost, 80);
    // The octile estimate only guides the search; it never grades the realized path.
    assert_eq!(distance_cost(start, end), 56);
    assert_ne!(path.cost, distance_cost(start, end));
}

#[test]
fn test_scenario_b_routes_around_single_obstacle() {
    let mut grid = OccupancyGrid::open(3, 1, 2, 1.0, WorldPos::ORIGIN);
    grid.set_available(Coord::new(1, 0, 0), false);

    let path = Pathfinder::new(&grid)
        .find_path(Coord::new(0, 0, 0), Coord::new(2, 0, 0))
        .expect("endpoints are in bounds")
        .expect("the second row is open");

    assert_eq!(
        path.cells,
        vec![
            Coord::new(0, 0, 0),
            Coord::new(0, 0, 1),
            Coord::new(1, 0, 1),
            Coord::new(2, 0, 1),
            Coord::new(2, 0, 0),
        ]
    );
    assert_eq!(path.cost, 40);
}

fn buffer_band(spec: &RoomSpec, buffer: i32) -> Vec<Coord> {
    let mut band = Vec::new();
    for x in (spec.origin.x - buffer)..(spec.origin.x + spec.width + buffer) {
        for z in (spec.origin.z - buffer)..(spec.origin.z + spec.depth + buffer) {
            let coord = Coord::new(x, spec.origin.y, z);
            if !spec.contains(coord) {
                band.push(coord);
            }
        }
    }
    band
}

#[test]
fn test_scenario_c_corridors_only_claim_the_buffer_cells_they_cross() {
    let config =
        DungeonConfig { seed: 31, min_distance_between_rooms: 2, ..DungeonConfig::default() };
    let mut sink = RecordingSink::default();
    let generator =
        generate_dungeon(config, SimpleRoomBuilder, &mut sink).expect("generation runs");
    assert!(generator.report().rooms_placed >= 2);
    assert!(generator.report().connections_made >= 1);

    let corridor: BTreeSet<Coord> = generator.corridor_tiles().iter().copied().collect();
    let mut crossed = 0;
    for (_, room) in generator.rooms() {
        for coord in buffer_band(room.spec(), 2) {
            let available = generator.grid().is_available(coord);
            if corridor.contains(&coord) {
                crossed += 1;
                assert!(!available, "corridor tile {coord} is still marked available");
            } else {
                assert!(available, "buffer cell {coord} stayed claimed without a corridor");
            }
        }
        assert!(room.spec().interior().all(|coord| !generator.grid().is_available(coord)));
    }
    assert!(crossed > 0, "doors sit in the buffer band, so corridors must cross it");
}
