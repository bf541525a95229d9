use super::collision::CollisionGroups;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new kinematic position-based body (moved by game code, not forces)
    pub fn new_kinematic_position_based() -> Self {
        Self {
            body_type: RigidBodyType::KinematicPositionBased,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the initial position and rotation
    pub fn position_rotation(mut self, x: Real, y: Real, angle: Real) -> Self {
        self.position = Isometry::new(vector![x, y], angle);
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    offset: Vector<Real>,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    enabled: bool,
    density: Real,
    active_events: ActiveEvents,
    active_collision_types: ActiveCollisionTypes,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            offset: Vector::zeros(),
            collision_groups: CollisionGroups::Default,
            is_sensor: false,
            enabled: true,
            density: 1.0,
            active_events: ActiveEvents::COLLISION_EVENTS,
            active_collision_types: ActiveCollisionTypes::default(),
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Create a circle-shaped collider (actor footprints, fists, feet)
    pub fn circle(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Offset from the parent body, in the body's local frame
    pub fn translation(mut self, x: Real, y: Real) -> Self {
        self.offset = vector![x, y];
        self
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects overlaps but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Start enabled or disabled
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set density (mass will be calculated from shape volume)
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Also report overlaps between two kinematic bodies
    pub fn detect_kinematic(mut self) -> Self {
        self.active_collision_types |= ActiveCollisionTypes::KINEMATIC_KINEMATIC;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut collider = rapier2d::prelude::ColliderBuilder::new(self.shape)
            .translation(self.offset)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .density(self.density)
            .active_events(self.active_events)
            .active_collision_types(self.active_collision_types)
            .build();
        collider.set_enabled(self.enabled);
        collider
    }
}

/// Common rigid body configurations for the arena
pub mod presets {
    use super::*;

    /// Actor body: kinematic, moved by locomotion and root motion
    pub fn actor_body(x: Real, y: Real, facing_angle: Real) -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .position_rotation(x, y, facing_angle)
            .can_sleep(false)
            .build()
    }

    /// Actor footprint on the ground plane
    pub fn actor_collider(radius: Real) -> Collider {
        ColliderBuilder2D::circle(radius)
            .collision_groups(CollisionGroups::Actor)
            .detect_kinematic()
            .build()
    }

    /// Attack volume `reach` ahead of the body, disabled until an attack opens it
    pub fn hitbox_collider(radius: Real, reach: Real) -> Collider {
        ColliderBuilder2D::circle(radius)
            .translation(reach, 0.0)
            .collision_groups(CollisionGroups::Hitbox)
            .sensor(true)
            .enabled(false)
            .density(0.0)
            .detect_kinematic()
            .build()
    }

    /// Static wall segment
    pub fn wall_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    pub fn wall_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Environment)
            .build()
    }
}
