use std::{
    fmt::{Display, Write},
    path::Path,
};

use num_traits::Float;

use crate::{
    contact::{Contact, ContactBuffer},
    error::Result,
    floating_type_mod::FT,
    lattice::{LatticeLayout, IMPACTOR_CLEARANCE_RADII, IMPACTOR_INDEX},
    pair_matrix::PairMatrix,
    particle_vec::{Particle, ParticleProperties, ParticleVec},
    simulation_parameters::SimulationParams,
    vec2f, V2,
};

/// Complete mutable state of one impact run.
///
/// Created once by [`initialize`]. Downstream stages (contact detection, force
/// accumulation, integration) borrow it and mutate the buffers in place, but never
/// resize them: `num_particles()` is fixed for the whole run.
pub struct GranularSimulation {
    pub particles: ParticleVec,

    /// One entry per unordered pair, see [`crate::triangular`].
    pub contacts: ContactBuffer,

    /// Normal force magnitude per ordered pair.
    pub normal_forces: PairMatrix,
    /// Tangential force magnitude per ordered pair.
    pub tangent_forces: PairMatrix,

    layout: LatticeLayout,
}

/// Builds the initial state: sizes and allocates every buffer, packs the lattice
/// and drops the impactor above it.
pub fn initialize(simulation_params: &SimulationParams) -> Result<GranularSimulation> {
    simulation_params.validate()?;

    let layout = LatticeLayout::from_params(simulation_params)?;

    log::info!(
        "INIT {} PARTICLES ({} x {} lattice + impactor)",
        layout.num_particles(),
        layout.max_in_x(),
        layout.max_in_y()
    );

    let mut simulation = GranularSimulation::allocate(layout)?;
    simulation.place_lattice(simulation_params);
    simulation.place_impactor(simulation_params);

    Ok(simulation)
}

impl GranularSimulation {
    /// Zeroed buffers for `layout.num_particles()` particles.
    pub(crate) fn allocate(layout: LatticeLayout) -> Result<Self> {
        let n = layout.num_particles();

        log::debug!(
            "allocating {} particles, {} contacts, 2 x {} pair forces",
            n,
            layout.num_contacts(),
            layout.num_pair_forces()
        );

        Ok(GranularSimulation {
            particles: ParticleVec::zeroed(n)?,
            contacts: ContactBuffer::zeroed(n, layout.num_contacts())?,
            normal_forces: PairMatrix::zeroed("normal_forces", n, layout.num_pair_forces())?,
            tangent_forces: PairMatrix::zeroed("tangent_forces", n, layout.num_pair_forces())?,
            layout,
        })
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Sizing the buffers were allocated with.
    pub fn layout(&self) -> &LatticeLayout {
        &self.layout
    }

    fn uniform_properties(simulation_params: &SimulationParams) -> ParticleProperties {
        ParticleProperties {
            mass: simulation_params.particle_mass(),
            kn: simulation_params.kn,
            ks: simulation_params.ks,
        }
    }

    /// Assigns position, radius and material to every lattice particle `1..num_particles`.
    pub(crate) fn place_lattice(&mut self, simulation_params: &SimulationParams) {
        let properties = Self::uniform_properties(simulation_params);
        let radius = simulation_params.radius;

        for (i, position) in self.layout.positions(radius) {
            self.particles.set_particle(i, Particle { position, radius });
            self.particles.set_properties(i, properties);
        }
    }

    /// Overwrites particle 0 with the impactor, centered above the packed region and
    /// moving vertically with `v0`.
    pub(crate) fn place_impactor(&mut self, simulation_params: &SimulationParams) {
        let radius = simulation_params.radius;
        let position = vec2f(
            simulation_params.x_limit / 2.,
            simulation_params.y_limit + IMPACTOR_CLEARANCE_RADII * radius,
        );

        self.particles
            .set_particle(IMPACTOR_INDEX, Particle { position, radius });
        self.particles
            .set_properties(IMPACTOR_INDEX, Self::uniform_properties(simulation_params));
        self.particles.velocity[IMPACTOR_INDEX] = vec2f(0., simulation_params.v0);

        log::debug!(
            "impactor at ({}, {}) with vy={}",
            position.x,
            position.y,
            simulation_params.v0
        );
    }

    /// Approximate heap usage of all buffers in bytes.
    pub fn memory_usage(&self) -> usize {
        let n = self.num_particles();
        let per_particle = 5 * std::mem::size_of::<V2>() + 4 * std::mem::size_of::<FT>();
        n * per_particle
            + self.contacts.len() * std::mem::size_of::<Contact>()
            + (self.normal_forces.as_slice().len() + self.tangent_forces.as_slice().len()) * std::mem::size_of::<FT>()
    }
}

pub fn write_summary(simulation: &GranularSimulation, simulation_params: &SimulationParams) -> String {
    let mut s = String::new();
    let layout = &simulation.layout;

    // writing to a String cannot fail
    let _ = writeln!(s, "particles: {}", simulation.num_particles());
    let _ = writeln!(
        s,
        "lattice: {} x {} (radius {}, diameter {})",
        layout.max_in_x(),
        layout.max_in_y(),
        simulation_params.radius,
        simulation_params.diameter()
    );
    let _ = writeln!(s, "particle mass: {}", simulation_params.particle_mass());

    let impactor = simulation.particles.particle(IMPACTOR_INDEX);
    let _ = writeln!(
        s,
        "impactor: position=({}, {}) velocity=({}, {})",
        impactor.position.x,
        impactor.position.y,
        simulation.particles.velocity[IMPACTOR_INDEX].x,
        simulation.particles.velocity[IMPACTOR_INDEX].y,
    );
    let _ = writeln!(s);

    for (label, len) in simulation.particles.buffer_lengths() {
        let _ = writeln!(s, "{}: {}", label, len);
    }
    let _ = writeln!(s, "contacts: {}", simulation.contacts.len());
    let _ = writeln!(s, "normal_forces: {}", simulation.normal_forces.as_slice().len());
    let _ = writeln!(s, "tangent_forces: {}", simulation.tangent_forces.as_slice().len());
    let _ = writeln!(s);

    let _ = writeln!(
        s,
        "memory: {:.3} MiB",
        simulation.memory_usage() as f64 / (1024. * 1024.)
    );

    s
}

/// Writes [`write_summary`] to `path` and returns the text that was written.
pub fn write_summary_file(
    simulation: &GranularSimulation,
    simulation_params: &SimulationParams,
    path: impl AsRef<Path>,
) -> Result<String> {
    let s = write_summary(simulation, simulation_params);
    std::fs::write(path.as_ref(), &s)?;
    log::info!("summary written to `{}`", path.as_ref().display());
    Ok(s)
}

pub fn is_ft_approx_eq<FT: Float>(a: FT, b: FT, tolerance: FT) -> bool {
    assert!(!a.is_nan());
    assert!(!b.is_nan());
    b <= a + tolerance && b >= a - tolerance
}

pub fn assert_ft_approx_eq<FT: Float + Display>(a: FT, b: FT, tolerance: FT, s: impl FnOnce() -> String) {
    if !is_ft_approx_eq(a, b, tolerance) {
        panic!(
            "{} value not equal with a tolerance of {}:\n\ta={}\n\tb={}\n",
            s(),
            tolerance,
            a,
            b
        );
    }
}
