//! Spatial indexing for agent neighborhood queries.
//!
//! The engine rebuilds the index from a position snapshot each tick and
//! treats query results as read-only snapshots. Results may contain the
//! querying entity itself; callers filter it out.

use std::collections::HashMap;

use hecs::{Entity, World};

use quarantine_core::components::{Disabled, QueryCategory};
use quarantine_core::constants::SPATIAL_CELL_SIZE;
use quarantine_core::enums::{Category, QueryFilter};
use quarantine_core::types::Position;

/// One indexed entity.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry {
    pub entity: Entity,
    pub position: Position,
    pub category: Category,
}

/// Common behaviour exposed by neighborhood indices.
pub trait SpatialIndex {
    /// Replace the indexed contents.
    fn rebuild(&mut self, entries: &[IndexEntry]);

    /// Entities within `radius` of `position` (inclusive) that pass `filter`.
    fn query_nearby(&self, position: &Position, radius: f64, filter: QueryFilter) -> Vec<Entity>;
}

/// Collect index entries from every positioned entity in the world.
/// Disabled entities are indexed as inert.
pub fn collect_entries(world: &World) -> Vec<IndexEntry> {
    world
        .query::<(&Position, Option<&QueryCategory>, Option<&Disabled>)>()
        .iter()
        .map(|(entity, (position, category, disabled))| IndexEntry {
            entity,
            position: *position,
            category: match (disabled, category) {
                (Some(_), _) => Category::Inert,
                (None, Some(c)) => c.0,
                (None, None) => Category::Inert,
            },
        })
        .collect()
}

/// Uniform grid over the ground plane, bucketing entries by cell.
#[derive(Debug, Clone)]
pub struct UniformGridIndex {
    cell_size: f64,
    entries: Vec<IndexEntry>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl UniformGridIndex {
    /// Create a grid with the given cell edge. Non-positive sizes fall back
    /// to the default.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            SPATIAL_CELL_SIZE
        };
        Self {
            cell_size,
            entries: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }
}

impl Default for UniformGridIndex {
    fn default() -> Self {
        Self::new(SPATIAL_CELL_SIZE)
    }
}

impl SpatialIndex for UniformGridIndex {
    fn rebuild(&mut self, entries: &[IndexEntry]) {
        self.entries.clear();
        self.entries.extend_from_slice(entries);
        self.cells.clear();
        for (idx, entry) in self.entries.iter().enumerate() {
            let cell = self.cell_of(entry.position.x, entry.position.y);
            self.cells.entry(cell).or_default().push(idx);
        }
    }

    fn query_nearby(&self, position: &Position, radius: f64, filter: QueryFilter) -> Vec<Entity> {
        let mut found = Vec::new();
        if !(radius >= 0.0) {
            return found;
        }
        let accepts = |entry: &IndexEntry| {
            filter.accepts(entry.category) && entry.position.range_to(position) <= radius
        };

        // Cell span in f64 so huge or infinite radii cannot overflow.
        let span = |c: f64| {
            ((c + radius) / self.cell_size).floor() - ((c - radius) / self.cell_size).floor() + 1.0
        };
        let visited = span(position.x) * span(position.y);
        if !(visited <= self.cells.len() as f64) {
            found.extend(self.entries.iter().filter(|e| accepts(*e)).map(|e| e.entity));
            return found;
        }

        let (min_x, min_y) = self.cell_of(position.x - radius, position.y - radius);
        let (max_x, max_y) = self.cell_of(position.x + radius, position.y + radius);

        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                found.extend(
                    bucket
                        .iter()
                        .map(|&idx| &self.entries[idx])
                        .filter(|e| accepts(*e))
                        .map(|e| e.entity),
                );
            }
        }
        found
    }
}
