use crate::{
    error::Result,
    floating_type_mod::FT,
    particle_vec::alloc_filled,
    triangular::{size_triangular_matrix, triangular_index, triangular_pair},
};

/// Per-pair state kept between steps by the contact detection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact {
    pub tangential_displacement: FT, // accumulated slip
    pub normal_force_history: FT,
    pub age: usize, // number of steps active
}

/// One [`Contact`] per unordered particle pair, see [`crate::triangular`] for the layout.
#[derive(Clone, Debug)]
pub struct ContactBuffer {
    num_particles: usize,
    contacts: Vec<Contact>,
}

impl ContactBuffer {
    /// Allocates zeroed contacts for `len` slots, as computed by `size_triangular_matrix(num_particles)`.
    pub(crate) fn zeroed(num_particles: usize, len: usize) -> Result<Self> {
        debug_assert_eq!(size_triangular_matrix(num_particles), Some(len));
        Ok(ContactBuffer {
            num_particles,
            contacts: alloc_filled("contacts", len, Contact::default())?,
        })
    }

    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Self-pairs and indices past `num_particles` would alias the slot of another pair.
    #[inline(always)]
    fn slot(&self, i: usize, j: usize) -> usize {
        assert!(i != j, "self-pair ({}, {}) has no contact slot", i, j);
        assert!(
            i.max(j) < self.num_particles,
            "pair ({}, {}) out of range for {} particles",
            i,
            j,
            self.num_particles
        );
        triangular_index(i, j)
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> &Contact {
        &self.contacts[self.slot(i, j)]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut Contact {
        let k = self.slot(i, j);
        &mut self.contacts[k]
    }

    /// Iterates `((lo, hi), contact)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Contact)> + '_ {
        self.contacts
            .iter()
            .enumerate()
            .map(|(k, contact)| (triangular_pair(k), contact))
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn reset(&mut self) {
        self.contacts.fill(Contact::default());
    }
}
