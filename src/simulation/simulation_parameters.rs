use std::path::Path;

use crate::{
    error::{Error, Result},
    floating_type_mod::{FT, PI},
};
use serde::{Deserialize, Serialize};

/// Physical description of one impact run.
///
/// Lengths are in meters, `rho` is a volumetric density and `thickness` is the
/// out-of-plane extent of every disc, so the 2D discs carry the mass of a cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationParams {
    pub rho: FT,
    pub thickness: FT,
    pub radius: FT,

    // extents of the packed region, origin at the lower left corner
    pub x_limit: FT,
    pub y_limit: FT,

    // contact stiffness, normal and tangential
    pub kn: FT,
    pub ks: FT,

    /// Initial vertical velocity of the impactor (negative is downwards).
    pub v0: FT,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            rho: 2500.,
            thickness: 0.01,
            radius: 0.005,
            x_limit: 0.5,
            y_limit: 0.2,
            kn: 1.0e5,
            ks: 5.0e4,
            v0: -5.,
        }
    }
}

impl SimulationParams {
    /// Mass of a single disc: `rho * thickness * PI * radius^2`.
    pub fn particle_mass(&self) -> FT {
        self.rho * self.thickness * PI * self.radius * self.radius
    }

    pub fn diameter(&self) -> FT {
        2. * self.radius
    }

    /// Rejects parameters for which the lattice sizing is undefined.
    pub fn validate(&self) -> Result<()> {
        fn require(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidParam(msg.into()))
            }
        }

        require(self.radius.is_finite() && self.radius > 0., "radius must be finite and > 0")?;
        require(self.x_limit.is_finite() && self.x_limit > 0., "x_limit must be finite and > 0")?;
        require(self.y_limit.is_finite() && self.y_limit > 0., "y_limit must be finite and > 0")?;
        require(self.rho.is_finite() && self.rho >= 0., "rho must be finite and >= 0")?;
        require(
            self.thickness.is_finite() && self.thickness >= 0.,
            "thickness must be finite and >= 0",
        )?;
        require(self.kn.is_finite(), "kn must be finite")?;
        require(self.ks.is_finite(), "ks must be finite")?;
        require(self.v0.is_finite(), "v0 must be finite")?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Loads `path` and replaces single keys with the values found in `overrides_path`.
    ///
    /// The override file is a flat mapping; keys that are not a parameter name are rejected.
    pub fn load_with_overrides(path: impl AsRef<Path>, overrides_path: impl AsRef<Path>) -> Result<Self> {
        let params_yaml = std::fs::read_to_string(path)?;
        let overrides_yaml = std::fs::read_to_string(overrides_path)?;
        Self::from_yaml_with_overrides(&params_yaml, &overrides_yaml)
    }

    pub fn from_yaml_with_overrides(params_yaml: &str, overrides_yaml: &str) -> Result<Self> {
        let mut params_value: serde_yaml::Value = serde_yaml::from_str(params_yaml)?;
        let overrides: serde_yaml::Mapping = serde_yaml::from_str(overrides_yaml)?;

        let mapping = params_value
            .as_mapping_mut()
            .ok_or_else(|| Error::InvalidParam("simulation parameters must be a YAML mapping".into()))?;

        for (k, v) in overrides.into_iter() {
            let key = k.as_str().map(String::from).unwrap_or_else(|| format!("{:?}", k));
            match mapping.get_mut(&k) {
                Some(slot) => {
                    log::debug!("override {} = {:?}", key, v);
                    *slot = v;
                }
                None => return Err(Error::UnknownParam(key)),
            }
        }

        Ok(serde_yaml::from_value(params_value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_YAML: &str = "
rho: 1.0
thickness: 1.0
radius: 1.0
x_limit: 10.0
y_limit: 5.0
kn: 0.0
ks: 0.0
v0: -2.0
";

    #[test]
    fn mass_is_disc_area_times_thickness_times_density() {
        let params = SimulationParams {
            rho: 2.,
            thickness: 3.,
            radius: 0.5,
            ..SimulationParams::default()
        };
        let expected = 2. * 3. * PI * 0.25;
        assert!((params.particle_mass() - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_density_gives_massless_discs() {
        let params = SimulationParams {
            rho: 0.,
            ..SimulationParams::default()
        };
        assert_eq!(params.particle_mass(), 0.);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn parses_yaml() {
        let params = SimulationParams::from_yaml_str(EXAMPLE_YAML).unwrap();
        assert_eq!(params.radius, 1.);
        assert_eq!(params.x_limit, 10.);
        assert_eq!(params.y_limit, 5.);
        assert_eq!(params.v0, -2.);
    }

    #[test]
    fn yaml_round_trip_keeps_values() {
        let params = SimulationParams::default();
        let yaml = params.to_yaml_string().unwrap();
        assert_eq!(SimulationParams::from_yaml_str(&yaml).unwrap(), params);
    }

    #[test]
    fn missing_field_is_a_yaml_error() {
        let err = SimulationParams::from_yaml_str("rho: 1.0\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn override_replaces_known_key() {
        let params = SimulationParams::from_yaml_with_overrides(EXAMPLE_YAML, "radius: 0.5\nv0: -7.0\n").unwrap();
        assert_eq!(params.radius, 0.5);
        assert_eq!(params.v0, -7.);
        assert_eq!(params.x_limit, 10.);
    }

    #[test]
    fn override_rejects_unknown_key() {
        let err = SimulationParams::from_yaml_with_overrides(EXAMPLE_YAML, "gravity: 9.81\n").unwrap_err();
        match err {
            Error::UnknownParam(key) => assert_eq!(key, "gravity"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let base = SimulationParams::default();

        for params in [
            SimulationParams { radius: 0., ..base },
            SimulationParams { radius: -1., ..base },
            SimulationParams { radius: FT::NAN, ..base },
            SimulationParams { x_limit: 0., ..base },
            SimulationParams { y_limit: FT::INFINITY, ..base },
            SimulationParams { rho: -1., ..base },
            SimulationParams { thickness: FT::NAN, ..base },
            SimulationParams { v0: FT::NAN, ..base },
        ] {
            assert!(
                matches!(params.validate(), Err(Error::InvalidParam(_))),
                "accepted {:?}",
                params
            );
        }
    }

    #[test]
    fn default_is_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }
}
