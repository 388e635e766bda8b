use super::*;

use crate::domain::Particle;

impl SpatialGrid {
    /// Counting-sort rebuild.
    ///
    /// 1. clear per-cell counts
    /// 2. count particles per cell
    /// 3. prefix-sum counts into start offsets
    /// 4. scatter each particle into `scratch` at its cell's next free slot
    /// 5. swap `scratch` in as the new particle buffer
    ///
    /// O(n), double-buffered. After return `particles` is ordered by cell
    /// and `scratch` holds the previous ordering (reused next frame).
    pub fn rebuild(&mut self, particles: &mut Vec<Particle>, scratch: &mut Vec<Particle>) {
        let cells = self.total_cells();
        if self.cell_count.len() != cells {
            self.cell_count.resize(cells, 0);
            self.cell_start.resize(cells, 0);
            self.cursor.resize(cells, 0);
        }

        // 1 + 2: count
        self.cell_count.fill(0);
        for p in particles.iter() {
            let cell = self.cell_of(p.x, p.y);
            *fast_mut!(self.cell_count, [cell]) += 1;
        }

        // 3: prefix sum (+ active list, same pass)
        self.active.clear();
        let mut offset = 0;
        for cell in 0..cells {
            fast!(self.cell_start, [cell] = offset);
            let count = *fast!(self.cell_count, [cell]);
            if count > 0 {
                self.active.push(cell);
            }
            offset += count;
        }

        // 4: scatter
        self.cursor.copy_from_slice(&self.cell_start);
        if scratch.len() != particles.len() {
            scratch.clear();
            scratch.extend_from_slice(particles);
        }
        for p in particles.iter() {
            let cell = self.cell_of(p.x, p.y);
            let slot = fast_mut!(self.cursor, [cell]);
            fast!(scratch, [*slot] = *p);
            *slot += 1;
        }

        // 5: swap buffers
        std::mem::swap(particles, scratch);
    }
}
