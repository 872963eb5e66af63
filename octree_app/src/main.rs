//! Octree Collision Demo
//!
//! Headless demonstration of the collision pipeline:
//! - A swarm of boxes bouncing inside a cubic region
//! - Per-frame octree rebuild driven by entity density
//! - Narrow-phase SAT tests on per-leaf candidate pairs
//! - Enter/exit collision events and octree stats on the log
//!
//! Draw requests are emitted to a logging sink; point `RUST_LOG=trace` at it
//! to see the wireframe stream a renderer would consume.

use collision_engine::config::Config;
use collision_engine::debug::colors;
use collision_engine::foundation::logging;
use collision_engine::foundation::math::Vector3;
use collision_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Simulation settings
const WORLD_HALF: f32 = 15.0; // Bodies bounce inside [-15, 15] on each axis
const FRAME_COUNT: u32 = 300;
const DT: f32 = 1.0 / 60.0;
const STATS_INTERVAL: u32 = 60;

// Body counts
const NUM_SMALL_BOX: usize = 24;
const NUM_LARGE_BOX: usize = 8;

// Movement
const SMALL_BOX_SPEED: f32 = 6.0;
const LARGE_BOX_SPEED: f32 = 3.0;
const SMALL_BOX_HALF: f32 = 0.5;
const LARGE_BOX_HALF: f32 = 1.25;

// Fixed seed so runs are reproducible
const RNG_SEED: u64 = 0x0c7_ee;

/// One moving box in the demo scene
struct Body {
    entity: Entity,
    position: Vec3,
    velocity: Vec3,
    spin_rate: f32,
    angle: f32,
}

impl Body {
    /// Advance position/orientation and bounce off the region walls
    fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.angle += self.spin_rate * dt;

        for axis in 0..3 {
            if self.position[axis].abs() > WORLD_HALF {
                self.position[axis] = self.position[axis].clamp(-WORLD_HALF, WORLD_HALF);
                self.velocity[axis] = -self.velocity[axis];
            }
        }
    }

    /// Current model matrix: translation * spin about Y
    fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * rotation_y(self.angle)
    }
}

fn rotation_y(angle: f32) -> Mat4 {
    Quat::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous()
}

fn random_direction(rng: &mut StdRng) -> Vec3 {
    // Rejection-free: random point on the cube surface normalized is plenty
    // uniform for demo purposes
    let v = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    if v.norm() < 1e-3 {
        Vec3::x()
    } else {
        v.normalize()
    }
}

fn box_volume(half: f32) -> RigidVolume {
    RigidVolume::from_points(&[
        Vec3::new(-half, -half, -half),
        Vec3::new(half, half, half),
    ])
}

fn spawn_bodies(world: &mut CollisionWorld, rng: &mut StdRng) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(NUM_SMALL_BOX + NUM_LARGE_BOX);

    for index in 0..(NUM_SMALL_BOX + NUM_LARGE_BOX) {
        let large = index >= NUM_SMALL_BOX;
        let half = if large { LARGE_BOX_HALF } else { SMALL_BOX_HALF };
        let speed = if large { LARGE_BOX_SPEED } else { SMALL_BOX_SPEED };

        let entity = world.insert(box_volume(half));
        let position = random_direction(rng) * rng.gen_range(0.0..WORLD_HALF * 0.8);
        let body = Body {
            entity,
            position,
            velocity: random_direction(rng) * speed,
            spin_rate: rng.gen_range(-1.5..1.5),
            angle: 0.0,
        };
        world.set_model_matrix(entity, body.model_matrix());
        bodies.push(body);
    }

    bodies
}

fn load_config() -> OctreeConfig {
    match OctreeConfig::load_from_file("octree.toml") {
        Ok(config) => {
            log::info!(
                "loaded octree.toml: ideal_entity_count={}, max_level={}",
                config.ideal_entity_count,
                config.max_level
            );
            config
        }
        Err(error) => {
            log::debug!("octree.toml not used ({error}); falling back to defaults");
            OctreeConfig::default()
        }
    }
}

fn main() {
    logging::init();

    let config = load_config();
    let mut world = CollisionWorld::new(config);
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let mut bodies = spawn_bodies(&mut world, &mut rng);

    log::info!(
        "octree demo: {} bodies in a {:.0}-unit cube, {} frames",
        bodies.len(),
        WORLD_HALF * 2.0,
        FRAME_COUNT
    );

    let mut draw = LogDraw;
    for frame in 0..FRAME_COUNT {
        for body in &mut bodies {
            body.step(DT);
        }
        // Transforms first, then one detect pass per frame
        for body in &bodies {
            world.set_model_matrix(body.entity, body.model_matrix());
        }
        world.detect();

        for pair in world.collisions_entered() {
            log::info!(
                "frame {frame}: collision enter {} <-> {}",
                pair.entity_a.id(),
                pair.entity_b.id()
            );
        }
        for pair in world.collisions_exited() {
            log::info!(
                "frame {frame}: collision exit {} <-> {}",
                pair.entity_a.id(),
                pair.entity_b.id()
            );
        }

        if frame % STATS_INTERVAL == 0 {
            if let Some(octree) = world.octree() {
                log::info!(
                    "frame {frame}: {} octants, {} populated leaves, {} colliding pairs",
                    octree.octant_count(),
                    octree.populated_leaves().len(),
                    world.current_collisions().len()
                );
            }

            // Stream the frame's wireframes to the trace log
            if let Some(octree) = world.octree() {
                octree.display_leafs(&mut draw, colors::GREEN);
            }
            world.draw_volumes(&mut draw);
        }
    }

    log::info!("demo finished after {FRAME_COUNT} frames");
}
