//! Nearest-neighbor field between a target image and a source image
//!
//! Every target pixel holds the coordinates of a similar patch in the source
//! and the scaled distance to it. The field is refined by PatchMatch:
//! alternating scanline propagation from already-visited neighbors and an
//! exponentially shrinking random search around the current best match.

use log::debug;
use ndarray::Array2;
use rand::Rng;

use crate::io::configuration::MAX_RANDOM_RETRIES;
use crate::math::distance::{DSCALE, patch_distance};
use crate::spatial::MaskedImage;

/// Best known source patch for one target pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correspondence {
    /// Source column of the matched patch center
    pub x: i32,
    /// Source row of the matched patch center
    pub y: i32,
    /// Scaled patch distance in `[0, DSCALE]`
    pub distance: u32,
}

impl Correspondence {
    /// Candidate with the sentinel distance, awaiting evaluation
    pub const fn unresolved(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            distance: DSCALE,
        }
    }

    /// Whether no comparable pixel was found for this match
    pub const fn is_unresolved(&self) -> bool {
        self.distance >= DSCALE
    }
}

/// Lifecycle of a field's correspondences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Allocated but never seeded
    Uninitialized,
    /// Seeded randomly or from a coarser field
    Seeded,
    /// At least one minimization pass has run
    Minimized,
}

/// Scanline direction of a minimization sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Top-left to bottom-right
    Forward,
    /// Bottom-right to top-left
    Reverse,
}

impl Sweep {
    /// Signed step along the sweep
    pub const fn step(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// Correspondence map from an owned target to a borrowed source level
///
/// The source is a pyramid level owned by the driver. The target is the
/// image under reconstruction and is swapped out between EM iterations.
/// Randomness comes only from the injected generator, so a field seeded the
/// same way always produces the same correspondences.
#[derive(Debug)]
pub struct NearestNeighborField<'a, R> {
    target: MaskedImage,
    source: &'a MaskedImage,
    radius: i32,
    links: Array2<Correspondence>,
    state: FieldState,
    max_retries: usize,
    rng: R,
}

impl<'a, R> NearestNeighborField<'a, R> {
    /// Allocate a field of the target's size with unresolved links at the origin
    pub fn new(target: MaskedImage, source: &'a MaskedImage, radius: usize, rng: R) -> Self {
        let links = Array2::from_elem(
            (target.height(), target.width()),
            Correspondence::unresolved(0, 0),
        );

        Self {
            target,
            source,
            radius: radius as i32,
            links,
            state: FieldState::Uninitialized,
            max_retries: MAX_RANDOM_RETRIES,
            rng,
        }
    }

    /// Set how many random candidates a fully invalid link may try
    #[must_use]
    pub fn with_retry_limit(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The image being reconstructed
    pub const fn target(&self) -> &MaskedImage {
        &self.target
    }

    /// The pyramid level patches are drawn from
    pub const fn source(&self) -> &'a MaskedImage {
        self.source
    }

    /// Patch radius used for every distance
    pub const fn radius(&self) -> usize {
        self.radius as usize
    }

    /// Current lifecycle state
    pub const fn state(&self) -> FieldState {
        self.state
    }

    /// Field dimensions (width, height), equal to the target's
    pub fn dimensions(&self) -> (usize, usize) {
        let (rows, cols) = self.links.dim();
        (cols, rows)
    }

    /// The correspondence grid, indexed `[row, col]`
    pub const fn links(&self) -> &Array2<Correspondence> {
        &self.links
    }

    /// Correspondence of a target pixel, `None` outside the field
    pub fn link(&self, x: i32, y: i32) -> Option<Correspondence> {
        let (col, row) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.links.get([row, col]).copied()
    }

    fn set_link(&mut self, x: i32, y: i32, link: Correspondence) {
        let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.links.get_mut([row, col]) {
            *cell = link;
        }
    }

    /// Number of links still holding the sentinel distance
    pub fn unresolved_count(&self) -> usize {
        self.links.iter().filter(|link| link.is_unresolved()).count()
    }

    /// Patch distance between target pixel (x, y) and source pixel (xp, yp)
    pub fn distance(&self, x: i32, y: i32, xp: i32, yp: i32) -> u32 {
        patch_distance(self.target(), x, y, self.source, xp, yp, self.radius)
    }

    fn source_bounds(&self) -> Option<(i32, i32)> {
        let (width, height) = (self.source.width() as i32, self.source.height() as i32);
        (width > 0 && height > 0).then_some((width, height))
    }
}

impl<R: Rng> NearestNeighborField<'_, R> {
    /// Swap in a new target of the same size, returning the previous one
    ///
    /// Links are kept as the starting guess for the next minimization; their
    /// distances are refreshed against the new target.
    pub fn replace_target(&mut self, target: MaskedImage) -> MaskedImage {
        let previous = std::mem::replace(&mut self.target, target);
        if self.dimensions() != (self.target.width(), self.target.height()) {
            self.links = Array2::from_elem(
                (self.target.height(), self.target.width()),
                Correspondence::unresolved(0, 0),
            );
            self.randomize();
        } else {
            self.refresh_distances();
        }
        previous
    }

    fn random_source_point(&mut self, width: i32, height: i32) -> (i32, i32) {
        (
            self.rng.random_range(0..width),
            self.rng.random_range(0..height),
        )
    }

    /// Give every target pixel a uniformly random source match
    pub fn randomize(&mut self) {
        let Some((width, height)) = self.source_bounds() else {
            return;
        };

        let (cols, rows) = self.dimensions();
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let (xp, yp) = self.random_source_point(width, height);
                self.set_link(x, y, Correspondence::unresolved(xp, yp));
            }
        }

        self.evaluate_links();
        self.state = FieldState::Seeded;
    }

    /// Seed from a field minimized at the next coarser pyramid level
    ///
    /// Each pixel inherits the link of its coarse parent, scaled by the
    /// integer size ratio between the two fields.
    pub fn initialize<S>(&mut self, coarser: &NearestNeighborField<'_, S>) {
        let Some((width, height)) = self.source_bounds() else {
            return;
        };
        let (coarse_cols, coarse_rows) = coarser.dimensions();
        if coarse_cols == 0 || coarse_rows == 0 {
            self.randomize();
            return;
        }

        let (cols, rows) = self.dimensions();
        let fx = (cols / coarse_cols).max(1) as i32;
        let fy = (rows / coarse_rows).max(1) as i32;
        let (last_col, last_row) = (coarse_cols as i32 - 1, coarse_rows as i32 - 1);

        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let parent = coarser
                    .link((x / fx).min(last_col), (y / fy).min(last_row))
                    .unwrap_or(Correspondence::unresolved(0, 0));
                let seeded = Correspondence::unresolved(
                    (parent.x * fx).clamp(0, width - 1),
                    (parent.y * fy).clamp(0, height - 1),
                );
                self.set_link(x, y, seeded);
            }
        }

        self.evaluate_links();
        self.state = FieldState::Seeded;
    }

    /// Compute real distances for the current links, re-rolling dead ones
    ///
    /// A link whose patch has no comparable pixel gets up to `max_retries`
    /// random replacements; if all fail it keeps the sentinel distance.
    fn evaluate_links(&mut self) {
        let Some((width, height)) = self.source_bounds() else {
            return;
        };

        let (cols, rows) = self.dimensions();
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let Some(mut link) = self.link(x, y) else {
                    continue;
                };
                link.distance = self.distance(x, y, link.x, link.y);

                let mut attempts = 0;
                while link.is_unresolved() && attempts < self.max_retries {
                    let (xp, yp) = self.random_source_point(width, height);
                    link = Correspondence {
                        x: xp,
                        y: yp,
                        distance: self.distance(x, y, xp, yp),
                    };
                    attempts += 1;
                }

                self.set_link(x, y, link);
            }
        }

        let unresolved = self.unresolved_count();
        if unresolved > 0 {
            debug!("{unresolved} correspondences left without a comparable patch");
        }
    }

    fn refresh_distances(&mut self) {
        let (cols, rows) = self.dimensions();
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                if let Some(mut link) = self.link(x, y) {
                    link.distance = self.distance(x, y, link.x, link.y);
                    self.set_link(x, y, link);
                }
            }
        }
    }

    /// Run `passes` rounds of forward then reverse scanline refinement
    pub fn minimize(&mut self, passes: usize) {
        let (cols, rows) = self.dimensions();
        let (cols, rows) = (cols as i32, rows as i32);

        for _ in 0..passes {
            for y in 0..rows {
                for x in 0..cols {
                    self.minimize_if_imperfect(x, y, Sweep::Forward);
                }
            }

            for y in (0..rows).rev() {
                for x in (0..cols).rev() {
                    self.minimize_if_imperfect(x, y, Sweep::Reverse);
                }
            }
        }

        self.state = FieldState::Minimized;
    }

    fn minimize_if_imperfect(&mut self, x: i32, y: i32, sweep: Sweep) {
        if self.link(x, y).is_some_and(|link| link.distance > 0) {
            self.minimize_link(x, y, sweep);
        }
    }

    /// Try propagation from the previous neighbors, then random search
    ///
    /// A candidate replaces the current link only on strict improvement.
    pub fn minimize_link(&mut self, x: i32, y: i32, sweep: Sweep) {
        let Some(mut best) = self.link(x, y) else {
            return;
        };
        let Some((width, height)) = self.source_bounds() else {
            return;
        };
        let dir = sweep.step();

        // Horizontal neighbor, shifted along the sweep
        if let Some(neighbor) = self.link(x - dir, y) {
            self.consider(x, y, neighbor.x + dir, neighbor.y, &mut best);
        }

        // Vertical neighbor, shifted along the sweep
        if let Some(neighbor) = self.link(x, y - dir) {
            self.consider(x, y, neighbor.x, neighbor.y + dir, &mut best);
        }

        // Random search in a window halving from the source width
        let (center_x, center_y) = (best.x, best.y);
        let mut window = width;
        while window > 0 {
            let xp = (center_x + self.rng.random_range(0..2 * window) - window).clamp(0, width - 1);
            let yp =
                (center_y + self.rng.random_range(0..2 * window) - window).clamp(0, height - 1);
            self.consider(x, y, xp, yp, &mut best);
            window /= 2;
        }

        self.set_link(x, y, best);
    }

    fn consider(&self, x: i32, y: i32, xp: i32, yp: i32, best: &mut Correspondence) {
        if !self.source.in_bounds(xp, yp) {
            return;
        }
        let distance = self.distance(x, y, xp, yp);
        if distance < best.distance {
            *best = Correspondence {
                x: xp,
                y: yp,
                distance,
            };
        }
    }
}
