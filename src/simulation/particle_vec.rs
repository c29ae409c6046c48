use num_traits::Zero;

use crate::{
    error::{Error, Result},
    floating_type_mod::FT,
    V2,
};

/// Allocates `len` copies of `value`, reporting allocator failure instead of aborting.
pub(crate) fn alloc_filled<T: Clone>(buffer: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut v: Vec<T> = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed { buffer, len })?;
    v.resize(len, value);
    Ok(v)
}

macro_rules! decl_particle_vec {
    (pub struct $struct_name:ident { $(pub $field_name:ident: Vec<$field_type:ty> | $default_value:expr),*$(,)?  }) => {
        /// Per-particle attributes, one `Vec` per attribute, all indexed by particle id.
        #[derive(Clone, Debug)]
        pub struct $struct_name {
            $(
                pub $field_name : Vec<$field_type>,
            )*
        }

        impl $struct_name {
            /// Every attribute gets `len` entries holding its zero value.
            pub fn zeroed(len: usize) -> Result<Self> {
                Ok(Self {
                    $(
                        $field_name: alloc_filled(stringify!($field_name), len, $default_value)?,
                    )*
                })
            }

            fn lengths(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
                [$( (stringify!($field_name), self.$field_name.len()), )*].into_iter()
            }
        }
    }
}

decl_particle_vec! {
    pub struct ParticleVec {
        // geometry
        pub position: Vec<V2> | V2::zeros(),
        pub radius: Vec<FT> | FT::zero(),

        // material
        pub mass: Vec<FT> | FT::zero(),
        pub kn: Vec<FT> | FT::zero(),
        pub ks: Vec<FT> | FT::zero(),

        // integration state
        pub force: Vec<V2> | V2::zeros(),
        pub acceleration: Vec<V2> | V2::zeros(),
        pub velocity: Vec<V2> | V2::zeros(),
        pub displacement: Vec<V2> | V2::zeros(),
    }
}

/// Geometric view of a single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: V2,
    pub radius: FT,
}

/// Material view of a single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleProperties {
    pub mass: FT,
    pub kn: FT,
    pub ks: FT,
}

impl ParticleVec {
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// True if every attribute has the same number of entries.
    pub fn is_consistent(&self) -> bool {
        let n = self.len();
        self.lengths().all(|(_, len)| len == n)
    }

    /// Name and length of every attribute buffer.
    pub fn buffer_lengths(&self) -> Vec<(&'static str, usize)> {
        self.lengths().collect()
    }

    pub fn particle(&self, i: usize) -> Particle {
        Particle {
            position: self.position[i],
            radius: self.radius[i],
        }
    }

    pub fn properties(&self, i: usize) -> ParticleProperties {
        ParticleProperties {
            mass: self.mass[i],
            kn: self.kn[i],
            ks: self.ks[i],
        }
    }

    pub fn set_particle(&mut self, i: usize, particle: Particle) {
        self.position[i] = particle.position;
        self.radius[i] = particle.radius;
    }

    pub fn set_properties(&mut self, i: usize, properties: ParticleProperties) {
        self.mass[i] = properties.mass;
        self.kn[i] = properties.kn;
        self.ks[i] = properties.ks;
    }
}
