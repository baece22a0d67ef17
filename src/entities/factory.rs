//! Construction of live entities from change descriptions.

use super::context::UnitContext;
use super::description::*;
use super::entity::*;
use crate::constants::MAX_COLORS;
use crate::error::ConstructionError;
use glam::Vec2;

/// Builds live entities bound to a [`UnitContext`].
///
/// Each constructor draws a fresh id from the context and wraps positions into
/// its universe. Cross-entity references are left unresolved: the result has
/// no cluster membership, bonds, tokens or carrier. The description is never
/// modified.
pub trait EntityFactory {
    fn build_cluster(
        &self,
        desc: &ClusterDescription,
        context: &mut UnitContext,
    ) -> Result<Cluster, ConstructionError>;

    fn build_cell(
        &self,
        desc: &CellDescription,
        context: &mut UnitContext,
    ) -> Result<Cell, ConstructionError>;

    fn build_token(
        &self,
        desc: &TokenDescription,
        context: &mut UnitContext,
    ) -> Result<Token, ConstructionError>;

    fn build_particle(
        &self,
        desc: &ParticleDescription,
        context: &mut UnitContext,
    ) -> Result<Particle, ConstructionError>;

    fn build(
        &self,
        desc: &EntityDescription,
        context: &mut UnitContext,
    ) -> Result<Entity, ConstructionError> {
        Ok(match desc {
            EntityDescription::Cluster(d) => Entity::Cluster(self.build_cluster(d, context)?),
            EntityDescription::Cell(d) => Entity::Cell(self.build_cell(d, context)?),
            EntityDescription::Token(d) => Entity::Token(self.build_token(d, context)?),
            EntityDescription::Particle(d) => Entity::Particle(self.build_particle(d, context)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEntityFactory;

impl EntityFactory for StandardEntityFactory {
    fn build_cluster(
        &self,
        desc: &ClusterDescription,
        context: &mut UnitContext,
    ) -> Result<Cluster, ConstructionError> {
        let kind = EntityKind::Cluster;
        check_vec(kind, desc.id, "position", desc.pos)?;
        check_vec(kind, desc.id, "velocity", desc.vel)?;
        check_scalar(kind, desc.id, "angle", desc.angle)?;
        check_scalar(kind, desc.id, "angular velocity", desc.angular_vel)?;

        Ok(Cluster {
            id: context.new_id(),
            pos: context.wrap_position(desc.pos),
            vel: desc.vel,
            angle: desc.angle,
            angular_vel: desc.angular_vel,
            cells: Vec::new(),
        })
    }

    fn build_cell(
        &self,
        desc: &CellDescription,
        context: &mut UnitContext,
    ) -> Result<Cell, ConstructionError> {
        let kind = EntityKind::Cell;
        check_vec(kind, desc.id, "position", desc.pos)?;
        check_energy(kind, desc.id, desc.energy)?;
        check_color(kind, desc.id, desc.color)?;
        if desc.bonds.len() > desc.max_connections as usize {
            return Err(ConstructionError::TooManyBonds {
                id: desc.id,
                bonds: desc.bonds.len(),
                max_connections: desc.max_connections,
            });
        }

        Ok(Cell {
            id: context.new_id(),
            cluster: None,
            pos: context.wrap_position(desc.pos),
            energy: desc.energy,
            color: desc.color,
            age: desc.age,
            max_connections: desc.max_connections,
            bonds: Vec::with_capacity(desc.bonds.len()),
            tokens: Vec::new(),
            genome: desc.genome.clone(),
            token_blocked: desc.token_blocked,
        })
    }

    fn build_token(
        &self,
        desc: &TokenDescription,
        context: &mut UnitContext,
    ) -> Result<Token, ConstructionError> {
        check_energy(EntityKind::Token, desc.id, desc.energy)?;

        Ok(Token {
            id: context.new_id(),
            carrier: None,
            energy: desc.energy,
            memory: desc.memory.clone(),
        })
    }

    fn build_particle(
        &self,
        desc: &ParticleDescription,
        context: &mut UnitContext,
    ) -> Result<Particle, ConstructionError> {
        let kind = EntityKind::Particle;
        check_vec(kind, desc.id, "position", desc.pos)?;
        check_vec(kind, desc.id, "velocity", desc.vel)?;
        check_energy(kind, desc.id, desc.energy)?;
        check_color(kind, desc.id, desc.color)?;

        Ok(Particle {
            id: context.new_id(),
            pos: context.wrap_position(desc.pos),
            vel: desc.vel,
            energy: desc.energy,
            color: desc.color,
        })
    }
}

// --- Validation helpers ---

fn check_vec(
    kind: EntityKind,
    id: u64,
    field: &'static str,
    value: Vec2,
) -> Result<(), ConstructionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConstructionError::NonFinite {
            kind: kind.as_str(),
            id,
            field,
        })
    }
}

fn check_scalar(
    kind: EntityKind,
    id: u64,
    field: &'static str,
    value: f32,
) -> Result<(), ConstructionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConstructionError::NonFinite {
            kind: kind.as_str(),
            id,
            field,
        })
    }
}

fn check_energy(kind: EntityKind, id: u64, energy: f64) -> Result<(), ConstructionError> {
    if energy.is_finite() && energy >= 0.0 {
        Ok(())
    } else {
        Err(ConstructionError::InvalidEnergy {
            kind: kind.as_str(),
            id,
            energy,
        })
    }
}

fn check_color(kind: EntityKind, id: u64, color: u8) -> Result<(), ConstructionError> {
    if (color as usize) < MAX_COLORS {
        Ok(())
    } else {
        Err(ConstructionError::ColorOutOfRange {
            kind: kind.as_str(),
            id,
            color,
            max: MAX_COLORS,
        })
    }
}
