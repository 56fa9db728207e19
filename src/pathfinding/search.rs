//! Reachable-tile and best-path searches
//!
//! Both searches share one expansion rule: from each closed tile, look at the
//! four cardinal neighbors and skip any that are impassable, that the unit
//! may not enter, or that would cost more than the unit's movement range.
//!
//! Per-tile scratch lives in a buffer indexed like the map grid. Each search
//! takes a fresh generation number and a slot only counts as opened or
//! closed when its stamp matches, so nothing is cleared between searches.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::error::{EngineError, Result};
use crate::core::types::UnitId;
use crate::grid::{PrimaryDirection, TilePos, CARDINAL_DIRECTIONS};
use crate::map::{Map, Unit};
use crate::pathfinding::heap::MinHeap;
use crate::pathfinding::path::Path;

#[derive(Debug, Clone, Copy, Default)]
struct SearchNode {
    opened: u32,
    closed: u32,
    pos: TilePos,
    cost: u32,
    /// Step from this tile back toward the origin
    previous: PrimaryDirection,
}

/// Tiles a unit can reach this turn, with their cheapest cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableTiles {
    origin: TilePos,
    tiles: BTreeMap<TilePos, (u32, PrimaryDirection)>,
}

impl ReachableTiles {
    pub fn origin(&self) -> TilePos {
        self.origin
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn cost_to(&self, pos: TilePos) -> Option<u32> {
        self.tiles.get(&pos).map(|&(cost, _)| cost)
    }

    /// Reachable positions in sorted order
    pub fn iter(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.tiles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Cheapest path found to `pos`, if it was reached
    pub fn path_to(&self, pos: TilePos) -> Option<Path> {
        if !self.contains(pos) {
            return None;
        }
        let mut directions = Vec::new();
        let mut current = pos;
        while current != self.origin {
            let &(_, back) = self.tiles.get(&current)?;
            directions.push(back.opposite());
            current = current.offset(back);
        }
        directions.reverse();
        Some(Path::with_directions(self.origin, directions))
    }
}

/// Reusable search state
#[derive(Debug, Default)]
pub struct Pathfinder {
    scratch: Vec<SearchNode>,
    heap: MinHeap,
    generation: u32,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of searches run so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn begin_search(&mut self, map: &Map) -> u32 {
        let capacity = map.grid().capacity();
        if self.scratch.len() < capacity {
            self.scratch.resize(capacity, SearchNode::default());
        }
        self.heap.clear();

        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.scratch.fill(SearchNode::default());
            self.generation = 1;
        }
        self.generation
    }

    /// Uniform-cost search bounded by the unit's movement range
    ///
    /// The origin is always included at cost 0.
    pub fn find_reachable_tiles(&mut self, map: &Map, unit: UnitId) -> Result<ReachableTiles> {
        let unit = map.require_unit(unit)?;
        let range = map.effective_movement_range(unit);
        let generation = self.begin_search(map);

        let mut tiles = BTreeMap::new();
        self.open_origin(map, unit, generation, 0)?;

        while let Some((index, _)) = self.heap.pop_min() {
            let node = &mut self.scratch[index];
            node.closed = generation;
            let node = *node;
            tiles.insert(node.pos, (node.cost, node.previous));

            self.expand(map, unit, node, range, generation, None);
        }

        debug!(unit = %unit.id, range, reachable = tiles.len(), "Reachable tiles");
        Ok(ReachableTiles {
            origin: unit.position,
            tiles,
        })
    }

    /// A* search toward `target`, bounded by the unit's movement range
    ///
    /// Returns an empty (invalid) path when the target cannot be reached.
    pub fn find_best_path_to_tile(&mut self, map: &Map, unit: UnitId, target: TilePos) -> Result<Path> {
        let unit = map.require_unit(unit)?;
        if unit.position == target {
            return Ok(Path::new(target));
        }
        let Some(target_index) = map.grid().tile_index(target).filter(|_| map.is_valid_pos(target)) else {
            return Ok(Path::empty());
        };

        let range = map.effective_movement_range(unit);
        let generation = self.begin_search(map);
        self.open_origin(map, unit, generation, heuristic(unit.position, target))?;

        while let Some((index, _)) = self.heap.pop_min() {
            let node = &mut self.scratch[index];
            node.closed = generation;
            let node = *node;

            if index == target_index {
                let path = self.reconstruct(map, unit.position, target);
                debug!(unit = %unit.id, %target, steps = path.len(), cost = node.cost, "Best path");
                return Ok(path);
            }

            self.expand(map, unit, node, range, generation, Some(target));
        }

        debug!(unit = %unit.id, %target, "Target unreachable");
        Ok(Path::empty())
    }

    /// `find_best_path_to_tile`, with an unreachable target as an error
    pub fn require_path(&mut self, map: &Map, unit: UnitId, target: TilePos) -> Result<Path> {
        let path = self.find_best_path_to_tile(map, unit, target)?;
        if path.is_valid() {
            Ok(path)
        } else {
            let from = map.require_unit(unit)?.position;
            Err(EngineError::PathNotFound { from, to: target })
        }
    }

    fn open_origin(&mut self, map: &Map, unit: &Unit, generation: u32, key: u32) -> Result<()> {
        let index = map
            .grid()
            .tile_index(unit.position)
            .ok_or_else(|| EngineError::illegal(format!("{} is off the grid", unit.id)))?;
        self.scratch[index] = SearchNode {
            opened: generation,
            closed: 0,
            pos: unit.position,
            cost: 0,
            previous: PrimaryDirection::None,
        };
        self.heap.insert(index, key as i32);
        Ok(())
    }

    fn expand(
        &mut self,
        map: &Map,
        unit: &Unit,
        node: SearchNode,
        range: u32,
        generation: u32,
        target: Option<TilePos>,
    ) {
        for direction in CARDINAL_DIRECTIONS {
            let next = node.pos.offset(direction);
            let Some(step_cost) = map.entry_cost(unit, next) else {
                continue;
            };
            if !map.can_unit_enter_tile(unit, next) {
                continue;
            }
            let total = node.cost + step_cost;
            if total > range {
                continue;
            }
            let Some(index) = map.grid().tile_index(next) else {
                continue;
            };

            let estimate = match target {
                Some(target) => total + heuristic(next, target),
                None => total,
            };
            let key = estimate as i32;

            let neighbor = &mut self.scratch[index];
            if neighbor.closed == generation {
                continue;
            }
            if neighbor.opened != generation {
                *neighbor = SearchNode {
                    opened: generation,
                    closed: 0,
                    pos: next,
                    cost: total,
                    previous: direction.opposite(),
                };
                self.heap.insert(index, key);
            } else if total < neighbor.cost {
                neighbor.cost = total;
                neighbor.previous = direction.opposite();
                self.heap.update(index, key);
            }
        }
    }

    fn reconstruct(&self, map: &Map, origin: TilePos, target: TilePos) -> Path {
        let mut directions = Vec::new();
        let mut current = target;
        while current != origin {
            let Some(node) = map.grid().tile_index(current).map(|i| self.scratch[i]) else {
                return Path::empty();
            };
            if !node.previous.is_valid() {
                return Path::empty();
            }
            directions.push(node.previous.opposite());
            current = current.offset(node.previous);
        }
        directions.reverse();
        Path::with_directions(origin, directions)
    }
}

fn heuristic(from: TilePos, to: TilePos) -> u32 {
    from.manhattan_distance(&to)
}
