//! Selections of live entities: copy, rebuild and bulk manipulation.

mod builder;
mod codec;

pub use builder::{BuiltSelection, IdRemapper, SelectionBuilder, describe};
pub use codec::{SELECTION_FORMAT_VERSION, decode, encode};

use crate::entities::{CellKey, ClusterKey, ParticleKey, UnitContext};
use crate::utils::{centroid, rotate_about};
use glam::Vec2;
use std::collections::HashSet;

/// Keys of selected entities.
///
/// Selecting a cluster implies all of its cells; `cells` holds cells that
/// are selected individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clusters: Vec<ClusterKey>,
    pub cells: Vec<CellKey>,
    pub particles: Vec<ParticleKey>,
}

impl Selection {
    /// Cluster-level selection.
    pub fn extended(clusters: Vec<ClusterKey>, particles: Vec<ParticleKey>) -> Self {
        Self {
            clusters,
            cells: Vec::new(),
            particles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.cells.is_empty() && self.particles.is_empty()
    }

    /// Individually selected cells that are not already covered by a selected
    /// cluster.
    fn loose_cells(&self, context: &UnitContext) -> Vec<CellKey> {
        let clusters: HashSet<_> = self.clusters.iter().copied().collect();
        self.cells
            .iter()
            .copied()
            .filter(|&key| {
                context
                    .cell(key)
                    .is_some_and(|cell| !cell.cluster.is_some_and(|c| clusters.contains(&c)))
            })
            .collect()
    }

    pub fn center_position(&self, context: &UnitContext) -> Option<Vec2> {
        let clusters = self
            .clusters
            .iter()
            .filter_map(|&key| context.cluster(key))
            .map(|cluster| cluster.pos);
        let cells = self
            .loose_cells(context)
            .into_iter()
            .filter_map(|key| context.cell(key))
            .map(|cell| cell.pos);
        let particles = self
            .particles
            .iter()
            .filter_map(|&key| context.particle(key))
            .map(|particle| particle.pos);
        centroid(clusters.chain(cells).chain(particles))
    }

    /// Rotates the whole selection around its center by `angle` radians.
    pub fn rotate(&self, context: &mut UnitContext, angle: f32) {
        let Some(center) = self.center_position(context) else {
            return;
        };
        let rotation = Vec2::from_angle(angle);

        let mut cells = self.loose_cells(context);
        for &key in &self.clusters {
            let Some(cluster) = context.cluster(key) else {
                continue;
            };
            let pos = context.wrap_position(rotate_about(center, rotation, cluster.pos));
            cells.extend(cluster.cells.iter().copied());
            if let Some(cluster) = context.cluster_mut(key) {
                cluster.pos = pos;
                cluster.angle += angle;
            }
        }
        for key in cells {
            let Some(cell) = context.cell(key) else {
                continue;
            };
            let pos = context.wrap_position(rotate_about(center, rotation, cell.pos));
            if let Some(cell) = context.cell_mut(key) {
                cell.pos = pos;
            }
        }
        for &key in &self.particles {
            let Some(particle) = context.particle(key) else {
                continue;
            };
            let pos = context.wrap_position(rotate_about(center, rotation, particle.pos));
            if let Some(particle) = context.particle_mut(key) {
                particle.pos = pos;
            }
        }
    }

    pub fn set_velocity_x(&self, context: &mut UnitContext, velocity: f32) {
        self.update_velocities(context, |vel| vel.x = velocity);
    }

    pub fn set_velocity_y(&self, context: &mut UnitContext, velocity: f32) {
        self.update_velocities(context, |vel| vel.y = velocity);
    }

    pub fn set_angular_velocity(&self, context: &mut UnitContext, angular_velocity: f32) {
        for &key in &self.clusters {
            if let Some(cluster) = context.cluster_mut(key) {
                cluster.angular_vel = angular_velocity;
            }
        }
    }

    fn update_velocities(&self, context: &mut UnitContext, update: impl Fn(&mut Vec2)) {
        for &key in &self.clusters {
            if let Some(cluster) = context.cluster_mut(key) {
                update(&mut cluster.vel);
            }
        }
        for &key in &self.particles {
            if let Some(particle) = context.particle_mut(key) {
                update(&mut particle.vel);
            }
        }
    }

    /// Removes every selected entity from `context`.
    pub fn delete(&self, context: &mut UnitContext) {
        for &key in &self.clusters {
            context.remove_cluster(key);
        }
        for &key in &self.cells {
            context.remove_cell(key);
        }
        for &key in &self.particles {
            context.remove_particle(key);
        }
    }
}
