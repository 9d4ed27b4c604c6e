use log::error;

use crate::constants::BOX_PROBE_HALF_THICKNESS_M;
use crate::error::ConfigurationError;
use crate::layers::LayerMask;
use crate::query::PhysicsQuery;
use crate::types::Vec3;

/// Collider a character may own, as described by the host.
///
/// Dimensions are meters. `height` is the full height of a capsule including its caps.
#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Capsule { radius: f32, height: f32 },
    /// Engine-provided character controller capsule.
    CharacterCapsule { radius: f32, height: f32 },
    Box { half_extents: Vec3 },
    Cylinder { radius: f32, height: f32 },
    Mesh,
}

impl ColliderShape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColliderShape::Sphere { .. } => "sphere",
            ColliderShape::Capsule { .. } => "capsule",
            ColliderShape::CharacterCapsule { .. } => "character_capsule",
            ColliderShape::Box { .. } => "box",
            ColliderShape::Cylinder { .. } => "cylinder",
            ColliderShape::Mesh => "mesh",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ProbeShape {
    Sphere { radius: f32 },
    FlatBox { half_extents: Vec3 },
}

/// Grounded test derived once from the character's collider.
///
/// The probe sits `offset` below the character origin (the collider center) and overlaps
/// the ground layers, ignoring sensors.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundProbe {
    shape: ProbeShape,
    offset: f32,
    layers: LayerMask,
}

fn dimension(name: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidDimension { name, value })
    }
}

impl GroundProbe {
    /// Select the probe variant for `collider`.
    ///
    /// Fails when there is no collider, when its shape has no probe variant, or when its
    /// dimensions are not positive.
    pub fn from_collider(
        collider: Option<&ColliderShape>,
        layers: LayerMask,
    ) -> Result<Self, ConfigurationError> {
        let probe = Self::select(collider, layers);
        if let Err(err) = &probe {
            error!("ground probe selection failed: {err}");
        }
        probe
    }

    fn select(
        collider: Option<&ColliderShape>,
        layers: LayerMask,
    ) -> Result<Self, ConfigurationError> {
        let collider = collider.ok_or(ConfigurationError::MissingCollider)?;
        let (shape, offset) = match collider {
            ColliderShape::Sphere { radius } => {
                let radius = dimension("radius", *radius)?;
                (ProbeShape::Sphere { radius }, radius)
            }
            ColliderShape::Capsule { radius, height }
            | ColliderShape::CharacterCapsule { radius, height } => {
                let radius = dimension("radius", *radius)?;
                let height = dimension("height", *height)?;
                (ProbeShape::Sphere { radius }, height * 0.5)
            }
            ColliderShape::Box { half_extents } => {
                let hx = dimension("half_extents.x", half_extents.x)?;
                let hy = dimension("half_extents.y", half_extents.y)?;
                let hz = dimension("half_extents.z", half_extents.z)?;
                let half_extents = Vec3::new(hx, BOX_PROBE_HALF_THICKNESS_M, hz);
                (ProbeShape::FlatBox { half_extents }, hy)
            }
            other => {
                return Err(ConfigurationError::UnsupportedCollider {
                    shape: other.kind_name(),
                });
            }
        };

        Ok(Self {
            shape,
            offset,
            layers,
        })
    }

    /// Center of the probe volume for a character at `position`.
    pub fn probe_center(&self, position: Vec3) -> Vec3 {
        Vec3::new(position.x, position.y - self.offset, position.z)
    }

    pub fn is_grounded(&self, physics: &dyn PhysicsQuery, position: Vec3) -> bool {
        let center = self.probe_center(position);
        match self.shape {
            ProbeShape::Sphere { radius } => physics.sphere_check(center, radius, self.layers),
            ProbeShape::FlatBox { half_extents } => {
                physics.box_check(center, half_extents, self.layers)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Layer;
    use crate::test_support::FakeWorld;

    fn ground() -> LayerMask {
        LayerMask::from_layers(&[Layer::Ground])
    }

    #[test]
    fn missing_collider_is_a_configuration_error() {
        assert_eq!(
            GroundProbe::from_collider(None, ground()),
            Err(ConfigurationError::MissingCollider)
        );
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        let err = GroundProbe::from_collider(Some(&ColliderShape::Mesh), ground());
        assert_eq!(
            err,
            Err(ConfigurationError::UnsupportedCollider { shape: "mesh" })
        );
        let cyl = ColliderShape::Cylinder {
            radius: 0.5,
            height: 2.0,
        };
        assert!(GroundProbe::from_collider(Some(&cyl), ground()).is_err());
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let capsule = ColliderShape::Capsule {
            radius: 0.0,
            height: 2.0,
        };
        assert_eq!(
            GroundProbe::from_collider(Some(&capsule), ground()),
            Err(ConfigurationError::InvalidDimension {
                name: "radius",
                value: 0.0
            })
        );
    }

    #[test]
    fn ground_check_offsets_follow_the_collider() {
        let p = Vec3::new(1.0, 5.0, -2.0);

        let sphere = ColliderShape::Sphere { radius: 0.4 };
        let probe = GroundProbe::from_collider(Some(&sphere), ground()).unwrap();
        assert!((probe.probe_center(p).y - 4.6).abs() < 1.0e-6);

        let capsule = ColliderShape::CharacterCapsule {
            radius: 0.3,
            height: 1.8,
        };
        let probe = GroundProbe::from_collider(Some(&capsule), ground()).unwrap();
        assert!((probe.probe_center(p).y - 4.1).abs() < 1.0e-6);

        let boxed = ColliderShape::Box {
            half_extents: Vec3::new(0.5, 1.0, 0.25),
        };
        let probe = GroundProbe::from_collider(Some(&boxed), ground()).unwrap();
        assert_eq!(probe.probe_center(p), Vec3::new(1.0, 4.0, -2.0));
    }

    #[test]
    fn grounded_against_flat_floor() {
        let world = FakeWorld::flat(0.0);
        let capsule = ColliderShape::Capsule {
            radius: 0.3,
            height: 2.0,
        };
        let probe = GroundProbe::from_collider(Some(&capsule), ground()).unwrap();

        // Capsule resting on the floor: center one half-height above it.
        assert!(probe.is_grounded(&world, Vec3::new(0.0, 1.0, 0.0)));
        assert!(!probe.is_grounded(&world, Vec3::new(0.0, 1.5, 0.0)));

        let boxed = ColliderShape::Box {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
        };
        let probe = GroundProbe::from_collider(Some(&boxed), ground()).unwrap();
        assert!(probe.is_grounded(&world, Vec3::new(0.0, 0.55, 0.0)));
        assert!(!probe.is_grounded(&world, Vec3::new(0.0, 0.8, 0.0)));
    }

    #[test]
    fn layers_outside_the_mask_are_not_ground() {
        let world = FakeWorld::flat(0.0);
        let sphere = ColliderShape::Sphere { radius: 0.5 };
        let probe = GroundProbe::from_collider(
            Some(&sphere),
            LayerMask::from_layers(&[Layer::LockOnTarget]),
        )
        .unwrap();
        assert!(!probe.is_grounded(&world, Vec3::new(0.0, 0.5, 0.0)));
    }
}
