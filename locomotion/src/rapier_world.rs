//! Rapier-backed query world for immutable/static level geometry.
//!
//! Hosts without their own physics engine (the sandbox client, tests) build one of these from
//! a list of static collider definitions and lend it to the controller as its
//! [`PhysicsQuery`] and [`EntityPositions`]. [`RapierCharacter`] drives a capsule through the
//! same world with Rapier's `KinematicCharacterController`.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: overlap checks, shape casts and the character controller. No dynamics.
//! - Immutable world: statics do not move after construction.

// Re-export Rapier so downstream crates can use its types without depending on it directly.
pub use rapier3d;

use std::collections::HashMap;

use log::{debug, warn};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::collider_tag::{pack_collider_tag, try_unpack_layer, unpack_entity, validate_collider_tag};
use crate::layers::{Layer, LayerMask};
use crate::query::{CharacterMover, EntityPositions, PhysicsQuery, ShapeHit};
use crate::types::{EntityId, Vec3};

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// Host entity reported by queries that hit this collider.
    pub entity: EntityId,
    pub layer: Layer,
    /// Trigger volume. Every query ignores sensors.
    pub sensor: bool,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), offset along its normal.
    ///
    /// Any "X/Z size" a renderer gives the plane is purely a mesh concern, not collision.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

/// In-memory Rapier structures needed for scene queries and the KCC.
///
/// Colliders carry a [`crate::collider_tag::ColliderTag`] in `user_data` so query hits map
/// back to host entities and layers.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    by_entity: HashMap<EntityId, ColliderHandle>,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. NaN/invalid values should be filtered by
    /// the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());
        let mut by_entity = HashMap::with_capacity(defs.len());

        for def in &defs {
            let tag = pack_collider_tag(def.entity, def.layer);
            if let Err(err) = validate_collider_tag(tag) {
                warn!("static {} has a malformed collider tag: {err:?}", def.id);
            }

            let mut collider = collider_from_def(def);
            collider.user_data = tag;
            collider.set_sensor(def.sensor);
            collider.set_position(pose_of(def));

            let handle = colliders.insert(collider);
            modified_colliders.push(handle);
            if by_entity.insert(def.entity, handle).is_some() {
                debug!("entity {:?} owns several statics, tracking the last", def.entity);
            }
        }

        // Queries only need the broad-phase BVH; there are no contacts to compute.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        debug!("built static query world with {} colliders", colliders.len());
        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
            by_entity,
        }
    }

    /// Borrowed `QueryPipeline` view restricted to non-sensor colliders on `layers`.
    ///
    /// The predicate lives on the caller's stack, so callers build it with [`on_layers`] and
    /// keep it alive for as long as the pipeline.
    fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

/// Collider predicate accepting tagged colliders whose layer is in `layers`.
fn on_layers(layers: LayerMask) -> impl Fn(ColliderHandle, &Collider) -> bool {
    move |_, collider| try_unpack_layer(collider.user_data).is_some_and(|l| layers.contains(l))
}

fn at(center: Vec3) -> Isometry<f32> {
    Isometry::translation(center.x, center.y, center.z)
}

impl PhysicsQuery for RapierQueryWorld {
    fn sphere_check(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool {
        let predicate = on_layers(layers);
        let pipeline =
            self.query_pipeline(QueryFilter::default().exclude_sensors().predicate(&predicate));
        let ball = Ball::new(radius);
        pipeline.intersect_shape(at(center), &ball).next().is_some()
    }

    fn box_check(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool {
        let predicate = on_layers(layers);
        let pipeline =
            self.query_pipeline(QueryFilter::default().exclude_sensors().predicate(&predicate));
        let cuboid = Cuboid::new(half_extents);
        pipeline.intersect_shape(at(center), &cuboid).next().is_some()
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<ShapeHit> {
        let dir = direction.try_normalize(f32::EPSILON)?;
        let predicate = on_layers(layers);
        let pipeline =
            self.query_pipeline(QueryFilter::default().exclude_sensors().predicate(&predicate));
        let ball = Ball::new(radius);

        // Unit velocity: time of impact is the distance travelled.
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        let (handle, hit) = pipeline.cast_shape(&at(origin), &dir, &ball, options)?;
        let collider = self.colliders.get(handle)?;
        Some(ShapeHit {
            entity: unpack_entity(collider.user_data),
            distance: hit.time_of_impact,
        })
    }
}

impl EntityPositions for RapierQueryWorld {
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        let handle = self.by_entity.get(&entity)?;
        self.colliders.get(*handle).map(|c| *c.translation())
    }
}

/// Pose of the collider built for `def`.
///
/// Half-spaces have a local +Y normal, so a plane only needs the offset folded into its
/// translation.
fn pose_of(def: &WorldStaticDef) -> Isometry<f32> {
    let translation = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => def.translation + (def.rotation * Vector::y()) * *offset_along_normal,
        _ => def.translation,
    };
    Isometry::from_parts(Translation3::from(translation), def.rotation)
}

/// Build a Rapier collider from a `WorldStaticDef`, with identity local transform.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane { .. } => {
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis()))).build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),
    }
}

/// Character capsule state owned by the host between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicBody {
    /// Capsule center (meters).
    pub position: Vec3,
    pub velocity: Vec3,
    /// Whether the last move ended on a surface, as reported by the KCC.
    pub grounded: bool,
    pub radius: f32,
    /// Half the length of the capsule's inner segment.
    pub half_segment: f32,
}

impl KinematicBody {
    /// A capsule of full `height` (caps included) centered at `position`.
    pub fn capsule(position: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            grounded: false,
            radius,
            half_segment: (height * 0.5 - radius).max(0.0),
        }
    }
}

/// Character controller settings for humanoid capsules: small autostep and contact offset.
pub fn default_character_controller() -> KinematicCharacterController {
    KinematicCharacterController {
        autostep: Some(CharacterAutostep {
            include_dynamic_bodies: false,
            max_height: CharacterLength::Relative(0.4),
            ..CharacterAutostep::default()
        }),
        offset: CharacterLength::Relative(0.025),
        ..KinematicCharacterController::default()
    }
}

/// [`CharacterMover`] that slides a [`KinematicBody`] through a [`RapierQueryWorld`].
pub struct RapierCharacter<'w> {
    world: &'w RapierQueryWorld,
    controller: KinematicCharacterController,
    body: &'w mut KinematicBody,
    /// Layers the capsule collides with.
    solid: LayerMask,
}

impl<'w> RapierCharacter<'w> {
    pub fn new(world: &'w RapierQueryWorld, body: &'w mut KinematicBody) -> Self {
        Self {
            world,
            controller: default_character_controller(),
            body,
            solid: LayerMask::everything(),
        }
    }

    pub fn with_solid_layers(mut self, solid: LayerMask) -> Self {
        self.solid = solid;
        self
    }
}

impl CharacterMover for RapierCharacter<'_> {
    fn move_by(&mut self, displacement: Vec3, dt: f32) {
        let predicate = on_layers(self.solid);
        let pipeline = self
            .world
            .query_pipeline(QueryFilter::default().exclude_sensors().predicate(&predicate));
        let shape = Capsule::new_y(self.body.half_segment, self.body.radius);

        let movement = self.controller.move_shape(
            dt,
            &pipeline,
            &shape,
            &at(self.body.position),
            displacement,
            |_| {},
        );

        self.body.position += movement.translation;
        self.body.grounded = movement.grounded;
        if dt > 0.0 {
            self.body.velocity = movement.translation / dt;
        }
    }

    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn velocity(&self) -> Vec3 {
        self.body.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::{ColliderShape, GroundProbe};

    const DT: f32 = 1.0 / 60.0;

    fn def(id: u32, layer: Layer, translation: Vec3, shape: ColliderShapeDef) -> WorldStaticDef {
        WorldStaticDef {
            id,
            entity: EntityId(id as u64),
            layer,
            sensor: false,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }

    fn arena() -> RapierQueryWorld {
        let mut trigger = def(
            4,
            Layer::Ground,
            Vec3::new(20.0, 5.0, 0.0),
            ColliderShapeDef::Cuboid {
                half_extents: Vector::new(1.0, 1.0, 1.0),
            },
        );
        trigger.sensor = true;

        RapierQueryWorld::build(vec![
            def(
                5,
                Layer::LockOnTarget,
                Vec3::new(0.0, 1.0, 10.0),
                ColliderShapeDef::Sphere { radius: 0.5 },
            ),
            def(
                1,
                Layer::Ground,
                Vec3::zeros(),
                ColliderShapeDef::Plane {
                    offset_along_normal: 0.0,
                },
            ),
            def(
                3,
                Layer::Prop,
                Vec3::new(-10.0, 2.0, 0.0),
                ColliderShapeDef::Cuboid {
                    half_extents: Vector::new(0.5, 2.0, 5.0),
                },
            ),
            trigger,
        ])
    }

    fn ground() -> LayerMask {
        LayerMask::from_layers(&[Layer::Ground])
    }

    #[test]
    fn overlap_checks_respect_layers_and_sensors() {
        let world = arena();
        assert_eq!(world.collider_count(), 4);

        assert!(world.sphere_check(Vec3::new(0.0, 0.1, 0.0), 0.3, ground()));
        assert!(!world.sphere_check(Vec3::new(0.0, 2.0, 0.0), 0.3, ground()));
        assert!(!world.sphere_check(
            Vec3::new(0.0, 0.1, 0.0),
            0.3,
            LayerMask::from_layers(&[Layer::LockOnTarget])
        ));

        // Inside the trigger volume, but sensors never count.
        assert!(!world.sphere_check(Vec3::new(20.0, 5.0, 0.0), 0.3, LayerMask::everything()));
        assert!(!world.box_check(
            Vec3::new(20.0, 5.0, 0.0),
            Vec3::new(0.5, 0.1, 0.5),
            LayerMask::everything()
        ));

        assert!(world.box_check(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.5, 0.1, 0.5), ground()));
    }

    #[test]
    fn sphere_cast_reports_entity_and_distance() {
        let world = arena();
        let targets = LayerMask::from_layers(&[Layer::LockOnTarget]);

        let hit = world.sphere_cast(Vec3::new(0.0, 1.0, 0.0), 3.0, Vec3::z(), 20.0, targets);
        let hit = hit.expect("target in front");
        assert_eq!(hit.entity, EntityId(5));
        assert!((hit.distance - 6.5).abs() < 1.0e-3);

        assert!(
            world
                .sphere_cast(Vec3::new(0.0, 1.0, 0.0), 3.0, -Vec3::z(), 20.0, targets)
                .is_none()
        );
        assert!(
            world
                .sphere_cast(Vec3::new(0.0, 1.0, 0.0), 3.0, Vec3::z(), 5.0, targets)
                .is_none()
        );
    }

    #[test]
    fn entity_positions_come_from_collider_poses() {
        let world = arena();
        assert_eq!(world.position_of(EntityId(5)), Some(Vec3::new(0.0, 1.0, 10.0)));
        assert_eq!(world.position_of(EntityId(99)), None);
    }

    #[test]
    fn ground_probe_against_rapier_plane() {
        let world = arena();
        let capsule = ColliderShape::CharacterCapsule {
            radius: 0.3,
            height: 2.0,
        };
        let probe = GroundProbe::from_collider(Some(&capsule), ground()).unwrap();
        assert!(probe.is_grounded(&world, Vec3::new(0.0, 1.0, 0.0)));
        assert!(!probe.is_grounded(&world, Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn character_lands_and_is_stopped_by_walls() {
        let world = arena();
        let mut body = KinematicBody::capsule(Vec3::new(0.0, 1.5, 0.0), 0.3, 2.0);

        {
            let mut mover = RapierCharacter::new(&world, &mut body);
            for _ in 0..60 {
                mover.move_by(Vec3::new(0.0, -0.1, 0.0), DT);
            }
        }
        assert!((body.position.y - 1.0).abs() < 0.1);
        assert!(body.grounded);

        {
            let mut mover = RapierCharacter::new(&world, &mut body);
            for _ in 0..200 {
                mover.move_by(Vec3::new(-0.1, 0.0, 0.0), DT);
            }
        }
        // Wall face at x = -9.5, capsule radius 0.3.
        assert!(body.position.x > -9.5);
        assert!(body.position.x < -9.0);
    }

    #[test]
    fn non_solid_layers_are_walked_through() {
        let world = arena();
        let mut body = KinematicBody::capsule(Vec3::new(0.0, 1.05, 0.0), 0.3, 2.0);
        let solid = LayerMask::everything().without(Layer::Prop);

        {
            let mut mover = RapierCharacter::new(&world, &mut body).with_solid_layers(solid);
            for _ in 0..200 {
                mover.move_by(Vec3::new(-0.1, 0.0, 0.0), DT);
            }
        }
        // Past the far face of the prop wall at x = -10.5.
        assert!(body.position.x < -10.5);
    }
}
