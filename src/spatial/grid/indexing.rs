use super::*;

impl SpatialGrid {
    // === Position -> cell ===

    /// Cell column/row for a world position, clamped into the grid.
    ///
    /// Reflected or fast particles can sit slightly outside the world for a
    /// frame; NaN maps to column/row 0.
    #[inline]
    pub fn cell_coords(&self, x: f32, y: f32) -> (usize, usize) {
        let cx = ((x * self.inv_cell_size) as isize).clamp(0, self.cols as isize - 1) as usize;
        let cy = ((y * self.inv_cell_size) as isize).clamp(0, self.rows as isize - 1) as usize;
        (cx, cy)
    }

    #[inline]
    pub fn cell_of(&self, x: f32, y: f32) -> usize {
        let (cx, cy) = self.cell_coords(x, y);
        self.key(cx, cy)
    }

    // === Key conversion ===
    #[inline]
    pub fn key(&self, cx: usize, cy: usize) -> usize {
        debug_assert!(
            cx < self.cols && cy < self.rows,
            "key: out of bounds ({}, {}) for {}x{} grid",
            cx,
            cy,
            self.cols,
            self.rows
        );
        cy * self.cols + cx
    }

    #[inline]
    pub fn coords(&self, key: usize) -> (usize, usize) {
        (key % self.cols, key / self.cols)
    }

    /// Keys of the 3x3 block centred on (cx, cy), clipped to the grid,
    /// row-major order.
    #[inline]
    pub fn neighborhood(&self, cx: usize, cy: usize) -> impl Iterator<Item = usize> + '_ {
        let x0 = cx.saturating_sub(1);
        let x1 = (cx + 1).min(self.cols - 1);
        let y0 = cy.saturating_sub(1);
        let y1 = (cy + 1).min(self.rows - 1);
        (y0..=y1).flat_map(move |ny| (x0..=x1).map(move |nx| ny * self.cols + nx))
    }
}
