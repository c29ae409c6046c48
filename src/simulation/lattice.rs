use crate::{
    error::{Error, Result},
    floating_type_mod::FT,
    simulation_parameters::SimulationParams,
    triangular::size_triangular_matrix,
    vec2f, V2,
};

/// Index of the falling particle. Lattice particles start right after it.
pub const IMPACTOR_INDEX: usize = 0;

/// Vertical gap between the top of the domain and the impactor center, in radii.
pub const IMPACTOR_CLEARANCE_RADII: FT = 4.;

/// Sizing of the packed region and of every buffer derived from it.
///
/// Only obtainable through [`LatticeLayout::from_params`] or [`LatticeLayout::from_counts`],
/// so the counts always agree with each other:
///
/// ```compile_fail
/// # use granular_impact::lattice::LatticeLayout;
/// let mut layout = LatticeLayout::from_counts(0, 3).unwrap();
/// layout.num_particles = 5;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeLayout {
    max_in_x: usize,
    max_in_y: usize,
    num_particles: usize,
    num_contacts: usize,
    num_pair_forces: usize,
}

impl LatticeLayout {
    /// Does not validate `params`; a non-positive radius gives meaningless counts.
    pub fn from_params(params: &SimulationParams) -> Result<Self> {
        let diameter = params.diameter();

        // `as` saturates: NaN becomes 0, huge values become usize::MAX
        let max_in_x = (params.x_limit / diameter).floor() as usize;
        let max_in_y = (params.y_limit / diameter).floor() as usize;

        Self::from_counts(max_in_x, max_in_y)
    }

    pub fn from_counts(max_in_x: usize, max_in_y: usize) -> Result<Self> {
        let overflow = |num_particles: usize| Error::CapacityOverflow { num_particles };

        let num_particles = max_in_x
            .checked_mul(max_in_y)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| overflow(usize::MAX))?;
        let num_contacts = size_triangular_matrix(num_particles).ok_or_else(|| overflow(num_particles))?;
        let num_pair_forces = num_particles
            .checked_mul(num_particles)
            .ok_or_else(|| overflow(num_particles))?;

        Ok(LatticeLayout {
            max_in_x,
            max_in_y,
            num_particles,
            num_contacts,
            num_pair_forces,
        })
    }

    /// Discs that fit edge-to-edge along x, i.e. the row length.
    pub fn max_in_x(&self) -> usize {
        self.max_in_x
    }

    pub fn max_in_y(&self) -> usize {
        self.max_in_y
    }

    /// `max_in_x * max_in_y` lattice particles plus the impactor.
    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    /// Slots in the unordered-pair contact buffer.
    pub fn num_contacts(&self) -> usize {
        self.num_contacts
    }

    /// Slots in each of the ordered-pair force matrices.
    pub fn num_pair_forces(&self) -> usize {
        self.num_pair_forces
    }

    pub fn num_lattice_particles(&self) -> usize {
        self.num_particles - 1
    }

    /// Lattice positions for the particle indices `1..num_particles`, in index order.
    ///
    /// Rows are filled along x first. After particle `i` with `i % max_in_x == 0` the
    /// row is complete and the next particle starts a new row one diameter higher.
    pub fn positions(&self, radius: FT) -> LatticePositions {
        LatticePositions {
            next_index: IMPACTOR_INDEX + 1,
            num_particles: self.num_particles,
            max_in_x: self.max_in_x,
            radius,
            diameter: 2. * radius,
            x: radius,
            y: radius,
        }
    }
}

/// Iterator returned by [`LatticeLayout::positions`], yields `(index, position)`.
#[derive(Debug, Clone)]
pub struct LatticePositions {
    next_index: usize,
    num_particles: usize,
    max_in_x: usize,
    radius: FT,
    diameter: FT,
    x: FT,
    y: FT,
}

impl Iterator for LatticePositions {
    type Item = (usize, V2);

    fn next(&mut self) -> Option<Self::Item> {
        // With max_in_x == 0 there is only the impactor, so the modulus below is never reached.
        if self.next_index >= self.num_particles {
            return None;
        }

        let i = self.next_index;
        let position = vec2f(self.x, self.y);

        if i % self.max_in_x == 0 {
            self.x = self.radius;
            self.y += self.diameter;
        } else {
            self.x += self.diameter;
        }

        self.next_index += 1;
        Some((i, position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_particles.saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LatticePositions {}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_params() -> SimulationParams {
        SimulationParams {
            rho: 1.,
            thickness: 1.,
            radius: 1.,
            x_limit: 10.,
            y_limit: 5.,
            kn: 0.,
            ks: 0.,
            v0: -2.,
        }
    }

    #[test]
    fn example_sizing() {
        let layout = LatticeLayout::from_params(&example_params()).unwrap();
        assert_eq!(layout.max_in_x(), 5);
        assert_eq!(layout.max_in_y(), 2);
        assert_eq!(layout.num_particles(), 11);
        assert_eq!(layout.num_lattice_particles(), 10);
        assert_eq!(layout.num_contacts(), 55);
        assert_eq!(layout.num_pair_forces(), 121);
    }

    #[test]
    fn partial_discs_are_dropped() {
        let params = SimulationParams {
            x_limit: 10.9,
            y_limit: 5.99,
            ..example_params()
        };
        let layout = LatticeLayout::from_params(&params).unwrap();
        assert_eq!((layout.max_in_x(), layout.max_in_y()), (5, 2));
    }

    #[test]
    fn radius_larger_than_domain_leaves_only_the_impactor() {
        let params = SimulationParams {
            radius: 6.,
            ..example_params()
        };
        let layout = LatticeLayout::from_params(&params).unwrap();
        assert_eq!(layout.max_in_x(), 0);
        assert_eq!(layout.num_particles(), 1);
        assert_eq!(layout.num_contacts(), 0);
        assert_eq!(layout.num_pair_forces(), 1);
        assert_eq!(layout.positions(6.).count(), 0);
    }

    #[test]
    fn one_row_but_zero_columns() {
        // fits along y but not along x
        let layout = LatticeLayout::from_counts(0, 3).unwrap();
        assert_eq!(layout.max_in_y(), 3);
        assert_eq!(layout.num_particles(), 1);
        assert_eq!(layout.num_lattice_particles(), 0);
        assert_eq!(layout.positions(1.).len(), 0);
        assert_eq!(layout.positions(1.).count(), 0);
    }

    #[test]
    fn positions_wrap_rows() {
        let layout = LatticeLayout::from_params(&example_params()).unwrap();
        let positions: Vec<(usize, V2)> = layout.positions(1.).collect();
        assert_eq!(positions.len(), 10);
        assert_eq!(positions[0], (1, vec2f(1., 1.)));
        assert_eq!(positions[4], (5, vec2f(9., 1.)));
        assert_eq!(positions[5], (6, vec2f(1., 3.)));
        assert_eq!(positions[9], (10, vec2f(9., 3.)));
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        assert!(matches!(
            LatticeLayout::from_counts(usize::MAX, 2),
            Err(Error::CapacityOverflow { .. })
        ));
        // particle count fits, its square does not
        assert!(matches!(
            LatticeLayout::from_counts(1 << 20, 1 << 20),
            Err(Error::CapacityOverflow { .. })
        ));
    }
}
