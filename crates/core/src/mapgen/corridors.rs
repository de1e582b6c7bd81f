//! Corridor connection between room doors.
//! This module exists so the retry-bounded connection loop stays separate from phase control.
//! It does not reserve room buffers or derive walls.

use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

use crate::error::DungeonError;
use crate::geometry::GeometrySink;
use crate::occupancy::OccupancyGrid;
use crate::pathfinding::Pathfinder;
use crate::room::{Room, pick_open_door};
use crate::seed::random_index;
use crate::types::{Coord, RoomId};

use super::model::ConnectionOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ConnectionStats {
    pub(super) connections_made: usize,
    pub(super) failed_attempts: usize,
    pub(super) unresolved_door_attempts: usize,
    pub(super) outcome: ConnectionOutcome,
}

pub(super) struct ConnectionContext<'a, R: Room> {
    pub(super) grid: &'a mut OccupancyGrid,
    pub(super) rooms: &'a mut SlotMap<RoomId, R>,
    pub(super) spawn_order: &'a [RoomId],
    pub(super) rng: &'a mut ChaCha8Rng,
    pub(super) retry_budget: u32,
    pub(super) corridor_tiles: &'a mut Vec<Coord>,
}

/// Joins random pairs of open rooms until at most one is left or the budget runs out.
pub(super) fn connect_rooms<R: Room>(
    context: &mut ConnectionContext<'_, R>,
    sink: &mut dyn GeometrySink,
) -> Result<ConnectionStats, DungeonError> {
    let mut open_rooms: Vec<RoomId> = context
        .spawn_order
        .iter()
        .copied()
        .filter(|&id| context.rooms[id].open_door_count() > 0)
        .collect();
    let mut stats = ConnectionStats {
        connections_made: 0,
        failed_attempts: 0,
        unresolved_door_attempts: 0,
        outcome: ConnectionOutcome::FullyConnected,
    };
    let mut retries_left = context.retry_budget;

    while open_rooms.len() > 1 {
        let start_slot = random_index(context.rng, open_rooms.len());
        let mut end_slot = random_index(context.rng, open_rooms.len() - 1);
        if end_slot >= start_slot {
            end_slot += 1;
        }
        let start_room = open_rooms[start_slot];
        let end_room = open_rooms[end_slot];

        let start_door = pick_open_door(&context.rooms[start_room], context.rng);
        let end_door = pick_open_door(&context.rooms[end_room], context.rng);
        let endpoints = start_door.zip(end_door).and_then(|(start_door, end_door)| {
            let start = context.rooms[start_room].doors()[start_door].cell?;
            let end = context.rooms[end_room].doors()[end_door].cell?;
            Some(((start_door, start), (end_door, end)))
        });

        let resolved = endpoints.filter(|((_, start), (_, end))| {
            context.grid.contains(*start) && context.grid.contains(*end)
        });
        let Some(((start_door, start), (end_door, end))) = resolved else {
            stats.unresolved_door_attempts += 1;
            stats.failed_attempts += 1;
            retries_left -= 1;
            if retries_left == 0 {
                break;
            }
            continue;
        };

        let path = Pathfinder::new(context.grid).find_path(start, end)?;
        let Some(path) = path else {
            stats.failed_attempts += 1;
            retries_left -= 1;
            if retries_left == 0 {
                break;
            }
            continue;
        };

        retries_left = context.retry_budget;
        for &cell in &path.cells {
            context.grid.set_available(cell, false);
            sink.place_floor(context.grid.world_position(cell));
            context.corridor_tiles.push(cell);
        }
        context.rooms[start_room].doors_mut()[start_door].is_open = false;
        context.rooms[end_room].doors_mut()[end_door].is_open = false;
        stats.connections_made += 1;
        tracing::debug!(
            from = %start,
            to = %end,
            tiles = path.cells.len(),
            cost = path.cost,
            "carved corridor"
        );

        let rooms = &*context.rooms;
        open_rooms.retain(|&id| rooms[id].open_door_count() > 0);
    }

    if open_rooms.len() > 1 {
        stats.outcome = ConnectionOutcome::RetriesExhausted { open_rooms: open_rooms.len() };
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RecordingSink;
    use crate::mapgen::test_support::{FixedRoom, spec_at};
    use crate::seed::seeded_rng;
    use crate::types::WorldPos;

    struct Fixture {
        grid: OccupancyGrid,
        rooms: SlotMap<RoomId, FixedRoom>,
        order: Vec<RoomId>,
    }

    fn two_rooms(west_door: Option<Coord>, east_door: Option<Coord>) -> Fixture {
        let mut grid = OccupancyGrid::open(12, 1, 7, 1.0, WorldPos::ORIGIN);
        let west = spec_at(Coord::new(1, 0, 2), 3, 3);
        let east = spec_at(Coord::new(8, 0, 2), 3, 3);
        for coord in west.interior().chain(east.interior()) {
            grid.set_available(coord, false);
        }
        let mut rooms = SlotMap::with_key();
        let order = vec![
            rooms.insert(FixedRoom::new(west, &[west_door])),
            rooms.insert(FixedRoom::new(east, &[east_door])),
        ];
        Fixture { grid, rooms, order }
    }

    fn run(
        fixture: &mut Fixture,
        budget: u32,
        sink: &mut RecordingSink,
    ) -> (ConnectionStats, Vec<Coord>) {
        let mut rng = seeded_rng(5);
        let mut corridor = Vec::new();
        let stats = connect_rooms(
            &mut ConnectionContext {
                grid: &mut fixture.grid,
                rooms: &mut fixture.rooms,
                spawn_order: &fixture.order,
                rng: &mut rng,
                retry_budget: budget,
                corridor_tiles: &mut corridor,
            },
            sink,
        )
        .expect("door cells are inside the grid");
        (stats, corridor)
    }

    #[test]
    fn connecting_two_facing_doors_carves_a_straight_corridor() {
        let mut fixture = two_rooms(Some(Coord::new(4, 0, 3)), Some(Coord::new(7, 0, 3)));
        let mut sink = RecordingSink::default();
        let (stats, corridor) = run(&mut fixture, 30, &mut sink);

        assert_eq!(stats.outcome, ConnectionOutcome::FullyConnected);
        assert_eq!(stats.connections_made, 1);
        assert_eq!(corridor.len(), 4);
        assert!(corridor.contains(&Coord::new(4, 0, 3)) && corridor.contains(&Coord::new(7, 0, 3)));
        assert!(corridor.iter().all(|&cell| !fixture.grid.is_available(cell)));
        assert_eq!(sink.floors().count(), 4);
        for id in &fixture.order {
            assert_eq!(fixture.rooms[*id].open_door_count(), 0);
        }
    }

    #[test]
    fn unresolved_doors_burn_the_shared_retry_budget() {
        let mut fixture = two_rooms(Some(Coord::new(4, 0, 3)), None);
        let mut sink = RecordingSink::default();
        let (stats, corridor) = run(&mut fixture, 3, &mut sink);

        assert_eq!(stats.outcome, ConnectionOutcome::RetriesExhausted { open_rooms: 2 });
        assert_eq!(stats.failed_attempts, 3);
        assert_eq!(stats.unresolved_door_attempts, 3);
        assert!(corridor.is_empty());
        assert!(sink.requests.is_empty());
    }

    #[test]
    fn enclosed_door_exhausts_retries_without_carving() {
        let mut fixture = two_rooms(Some(Coord::new(4, 0, 3)), Some(Coord::new(7, 0, 3)));
        for z in 0..7 {
            fixture.grid.set_available(Coord::new(6, 0, z), false);
        }
        let mut sink = RecordingSink::default();
        let (stats, corridor) = run(&mut fixture, 4, &mut sink);

        assert_eq!(stats.outcome, ConnectionOutcome::RetriesExhausted { open_rooms: 2 });
        assert_eq!(stats.failed_attempts, 4);
        assert_eq!(stats.unresolved_door_attempts, 0);
        assert!(corridor.is_empty());
        assert!(fixture.rooms.values().all(|room| room.open_door_count() == 1));
    }

    #[test]
    fn rooms_without_doors_never_enter_the_open_list() {
        let mut fixture = two_rooms(Some(Coord::new(4, 0, 3)), Some(Coord::new(7, 0, 3)));
        let east = fixture.order[1];
        fixture.rooms[east].doors_mut()[0].is_open = false;
        let mut sink = RecordingSink::default();
        let (stats, corridor) = run(&mut fixture, 30, &mut sink);

        assert_eq!(stats.outcome, ConnectionOutcome::FullyConnected);
        assert_eq!(stats.connections_made, 0);
        assert!(corridor.is_empty());
    }
}
