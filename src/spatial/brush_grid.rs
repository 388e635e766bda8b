//! Brush Grid - coarse buckets of brush particle indices
//!
//! Independent of the particle grid (much larger cells, 100 units by
//! default). Rebuilt each frame from current brush positions. Stores
//! indices into the brush set, valid until the set is next mutated.

pub struct BrushGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl BrushGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "brush grid cell size must be positive");
        let mut grid = Self {
            cell_size,
            cols: 0,
            rows: 0,
            buckets: Vec::new(),
        };
        grid.resize(width, height);
        grid
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let cell = self.cell_size.max(1.0) as usize;
        self.cols = width.max(0.0) as usize / cell + 1;
        self.rows = height.max(0.0) as usize / cell + 1;
        self.buckets.resize_with(self.cols * self.rows, Vec::new);
        self.buckets.truncate(self.cols * self.rows);
        self.clear();
    }

    #[inline]
    pub fn cols(&self) -> usize { self.cols }

    #[inline]
    pub fn rows(&self) -> usize { self.rows }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Cell coordinates clamped to one ring outside the grid,
    /// `[-1, cols] x [-1, rows]`, so a 3x3 scan never overflows.
    #[inline]
    pub fn cell_coords(&self, x: f32, y: f32) -> (i32, i32) {
        let cx = ((x / self.cell_size) as i32).clamp(-1, self.cols as i32);
        let cy = ((y / self.cell_size) as i32).clamp(-1, self.rows as i32);
        (cx, cy)
    }

    #[inline]
    fn in_bounds(&self, cx: i32, cy: i32) -> bool {
        cx >= 0 && cy >= 0 && (cx as usize) < self.cols && (cy as usize) < self.rows
    }

    /// Refill buckets from `(index, x, y)` entries.
    ///
    /// Entries outside the grid are not bucketed: a brush off screen
    /// cannot touch any particle.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (usize, f32, f32)>,
    {
        self.clear();
        for (index, x, y) in entries {
            let (cx, cy) = self.cell_coords(x, y);
            if self.in_bounds(cx, cy) {
                let key = cy as usize * self.cols + cx as usize;
                self.buckets[key].push(index);
            }
        }
    }

    /// Visit every bucketed index in the 3x3 block around (x, y)
    pub fn for_each_near<F>(&self, x: f32, y: f32, mut f: F)
    where
        F: FnMut(usize),
    {
        let (cx, cy) = self.cell_coords(x, y);
        for ny in cy - 1..=cy + 1 {
            for nx in cx - 1..=cx + 1 {
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                for &index in &self.buckets[ny as usize * self.cols + nx as usize] {
                    f(index);
                }
            }
        }
    }
}
