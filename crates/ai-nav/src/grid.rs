use crate::{NavPath, Navigator, Vec2};
use core::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Cell, u64) {
        (self.f, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Uniform walkability grid with 8-connected A* search.
///
/// Cell `(x, y)` covers `[x * cell_size, (x + 1) * cell_size)` on both axes. Diagonal steps are
/// only taken when both adjacent orthogonal cells are open, so paths never clip wall corners.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    blocked: Vec<bool>,
}

impl NavGrid {
    pub fn new(width: u32, height: u32, cell_size: f32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        assert!(cell_size > 0.0, "cell_size must be > 0");
        let width = width as i32;
        let height = height as i32;
        Self {
            width,
            height,
            cell_size,
            blocked: vec![false; (width * height) as usize],
        }
    }

    /// Parse an ASCII map: `#` is blocked, anything else is open. Row `i` becomes `y = i`.
    ///
    /// Returns `None` for empty or ragged input.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], cell_size: f32) -> Option<Self> {
        let width = rows.first()?.as_ref().chars().count();
        if width == 0 || cell_size <= 0.0 {
            return None;
        }
        let mut grid = NavGrid::new(width as u32, rows.len() as u32, cell_size);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                grid.set_blocked(x as i32, y as i32, ch == '#');
            }
        }
        Some(grid)
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space extent of the grid.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }

    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        if let Some(idx) = self.idx(Cell { x, y }) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.idx(Cell { x, y })
            .map(|idx| self.blocked[idx])
            .unwrap_or(true)
    }

    /// Center of cell `(x, y)` in world space.
    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    fn is_open(&self, cell: Cell) -> bool {
        self.idx(cell).is_some_and(|idx| !self.blocked[idx])
    }

    fn world_to_cell(&self, p: Vec2) -> Option<Cell> {
        if !p.is_finite() {
            return None;
        }
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        let cell = Cell { x, y };
        if self.in_bounds(cell) {
            Some(cell)
        } else {
            None
        }
    }

    fn center(&self, cell: Cell) -> Vec2 {
        self.cell_center(cell.x, cell.y)
    }

    /// Octile distance, admissible for the 10/14 step costs.
    fn heuristic(&self, a: Cell, b: Cell) -> u32 {
        let dx = (a.x - b.x).unsigned_abs();
        let dy = (a.y - b.y).unsigned_abs();
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        DIAGONAL_COST * lo + STRAIGHT_COST * (hi - lo)
    }

    /// Walkable neighbours with their step cost, in a fixed order for determinism.
    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, u32)> + '_ {
        const DIRS: [(i32, i32); 8] = [
            (0, -1),
            (1, 0),
            (0, 1),
            (-1, 0),
            (1, -1),
            (1, 1),
            (-1, 1),
            (-1, -1),
        ];
        DIRS.into_iter().filter_map(move |(dx, dy)| {
            let next = cell.offset(dx, dy);
            if !self.is_open(next) {
                return None;
            }
            if dx != 0 && dy != 0 {
                if !self.is_open(cell.offset(dx, 0)) || !self.is_open(cell.offset(0, dy)) {
                    return None;
                }
                return Some((next, DIAGONAL_COST));
            }
            Some((next, STRAIGHT_COST))
        })
    }

    fn reconstruct_path(&self, came_from: &[Option<usize>], mut current: usize) -> Vec<usize> {
        let mut out = vec![current];
        while let Some(prev) = came_from[current] {
            current = prev;
            out.push(current);
        }
        out.reverse();
        out
    }

    fn cell_from_idx(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        let x = idx % self.width;
        let y = idx / self.width;
        Cell { x, y }
    }

    fn a_star(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_idx = self.idx(start)?;
        let goal_idx = self.idx(goal)?;
        if self.blocked[start_idx] || self.blocked[goal_idx] {
            return None;
        }

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        let grid_len = (self.width * self.height) as usize;
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: self.heuristic(start, goal),
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.cell == goal {
                let idx_path = self.reconstruct_path(&came_from, goal_idx);
                return Some(idx_path.into_iter().map(|i| self.cell_from_idx(i)).collect());
            }

            let node_idx = self.idx(node.cell)?;
            if node.g != g_score[node_idx] {
                continue; // stale
            }

            for (n, step) in self.neighbors(node.cell) {
                let Some(n_idx) = self.idx(n) else { continue };
                let tentative_g = node.g.saturating_add(step);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(self.heuristic(n, goal)),
                    g: tentative_g,
                    cell: n,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }

    fn clamp_to_cell(&self, p: Vec2) -> Cell {
        let x = (p.x / self.cell_size).floor();
        let y = (p.y / self.cell_size).floor();
        Cell {
            x: (x.max(0.0) as i32).min(self.width - 1),
            y: (y.max(0.0) as i32).min(self.height - 1),
        }
    }
}

impl Navigator for NavGrid {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath> {
        let start_cell = self.world_to_cell(start)?;
        let goal_cell = self.world_to_cell(goal)?;
        let cells = self.a_star(start_cell, goal_cell)?;

        // Keep the exact endpoints; interior waypoints sit on cell centers.
        let inner_len = cells.len().saturating_sub(2);
        let mut points = Vec::with_capacity(inner_len + 2);
        points.push(start);
        for cell in cells.into_iter().skip(1).take(inner_len) {
            points.push(self.center(cell));
        }
        points.push(goal);
        Some(NavPath::new(points))
    }

    /// `point` itself when walkable, otherwise the closest open cell center, searching outward
    /// in square rings.
    fn nearest_point(&self, point: Vec2) -> Option<Vec2> {
        if !point.is_finite() {
            return None;
        }
        if let Some(cell) = self.world_to_cell(point) {
            if self.is_open(cell) {
                return Some(point);
            }
        }

        let origin = self.clamp_to_cell(point);
        let max_ring = self.width.max(self.height);
        for ring in 0..=max_ring {
            let mut best: Option<(f32, Cell)> = None;
            for y in (origin.y - ring)..=(origin.y + ring) {
                for x in (origin.x - ring)..=(origin.x + ring) {
                    let on_ring = (x - origin.x).abs() == ring || (y - origin.y).abs() == ring;
                    let cell = Cell { x, y };
                    if !on_ring || !self.is_open(cell) {
                        continue;
                    }
                    let d = self.center(cell).distance_squared(point);
                    if best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, cell));
                    }
                }
            }
            if let Some((_, cell)) = best {
                return Some(self.center(cell));
            }
        }
        None
    }

    fn is_walkable(&self, point: Vec2) -> bool {
        self.world_to_cell(point)
            .is_some_and(|cell| self.is_open(cell))
    }
}
