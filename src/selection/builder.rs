//! Two-pass reconstruction of selections.
//!
//! Pass 1 builds every described entity through an [`EntityFactory`] and
//! records `old id -> new id` in an [`IdRemapper`]. Pass 2 walks the
//! descriptions again and resolves cluster membership, bond partners and
//! token carriers through the remapper. Nothing is rewired before the map is
//! complete, so descriptions may reference entities that appear later in the
//! batch.

use super::Selection;
use crate::entities::*;
use crate::error::SelectionError;
use crate::utils::centroid;
use glam::Vec2;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
struct KindMap<K> {
    ids: HashMap<u64, u64>,
    keys: HashMap<u64, K>,
}

impl<K> Default for KindMap<K> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            keys: HashMap::new(),
        }
    }
}

impl<K: Copy> KindMap<K> {
    fn assign(&mut self, kind: EntityKind, old: u64, new: u64) -> Result<(), SelectionError> {
        if self.ids.insert(old, new).is_some() {
            return Err(SelectionError::DuplicateId {
                kind: kind.as_str(),
                id: old,
            });
        }
        Ok(())
    }

    fn key(&self, old: u64) -> Option<K> {
        self.keys.get(&old).copied()
    }
}

/// Old-to-new correlation for one build operation.
#[derive(Debug, Default)]
pub struct IdRemapper {
    clusters: KindMap<ClusterKey>,
    cells: KindMap<CellKey>,
    tokens: KindMap<TokenKey>,
    particles: KindMap<ParticleKey>,
}

impl IdRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the fresh id of a constructed entity. Each old id may appear
    /// once per kind.
    pub fn assign(&mut self, kind: EntityKind, old: u64, new: u64) -> Result<(), SelectionError> {
        match kind {
            EntityKind::Cluster => self.clusters.assign(kind, old, new),
            EntityKind::Cell => self.cells.assign(kind, old, new),
            EntityKind::Token => self.tokens.assign(kind, old, new),
            EntityKind::Particle => self.particles.assign(kind, old, new),
        }
    }

    pub fn new_id(&self, kind: EntityKind, old: u64) -> Option<u64> {
        let ids = match kind {
            EntityKind::Cluster => &self.clusters.ids,
            EntityKind::Cell => &self.cells.ids,
            EntityKind::Token => &self.tokens.ids,
            EntityKind::Particle => &self.particles.ids,
        };
        ids.get(&old).copied()
    }

    pub fn cluster(&self, old: u64) -> Option<ClusterKey> {
        self.clusters.key(old)
    }

    pub fn cell(&self, old: u64) -> Option<CellKey> {
        self.cells.key(old)
    }

    pub fn token(&self, old: u64) -> Option<TokenKey> {
        self.tokens.key(old)
    }

    pub fn particle(&self, old: u64) -> Option<ParticleKey> {
        self.particles.key(old)
    }
}

/// Entities created by one [`SelectionBuilder::build`] call.
#[derive(Debug, Clone, Default)]
pub struct BuiltSelection {
    pub clusters: Vec<ClusterKey>,
    pub cells: Vec<CellKey>,
    pub tokens: Vec<TokenKey>,
    pub particles: Vec<ParticleKey>,
    /// Old cluster id to new cluster id.
    pub cluster_ids: HashMap<u64, u64>,
    /// Old cell id to new cell id.
    pub cell_ids: HashMap<u64, u64>,
    /// References whose target was not part of the batch.
    pub dropped_references: usize,
}

impl BuiltSelection {
    pub fn selection(&self) -> Selection {
        Selection {
            clusters: self.clusters.clone(),
            cells: self.cells.clone(),
            particles: self.particles.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionBuilder<F = StandardEntityFactory> {
    factory: F,
}

impl SelectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: EntityFactory> SelectionBuilder<F> {
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// Decodes `bytes` and builds the contained selection around `target`.
    pub fn build_from_bytes(
        &self,
        context: &mut UnitContext,
        bytes: &[u8],
        target: Vec2,
    ) -> Result<BuiltSelection, SelectionError> {
        let descriptions = super::decode(bytes)?;
        self.build(context, &descriptions, target)
    }

    /// Rebuilds `descriptions` inside `context`, shifted so that their common
    /// center lands on `target`.
    ///
    /// An invalid description or a duplicate id fails the whole batch before
    /// anything is inserted. References to entities outside the batch are
    /// dropped and counted in [`BuiltSelection::dropped_references`]; a token
    /// whose carrier is missing is dropped with it.
    pub fn build(
        &self,
        context: &mut UnitContext,
        descriptions: &[EntityDescription],
        target: Vec2,
    ) -> Result<BuiltSelection, SelectionError> {
        let offset = centroid(descriptions.iter().filter_map(EntityDescription::position))
            .map_or(Vec2::ZERO, |center| target - center);

        let mut remapper = IdRemapper::new();
        let mut entities = Vec::with_capacity(descriptions.len());
        for desc in descriptions {
            let entity = self.factory.build(desc, context)?;
            remapper.assign(desc.kind(), desc.id(), entity.id())?;
            entities.push(entity);
        }

        let mut result = BuiltSelection::default();
        for (desc, entity) in descriptions.iter().zip(entities) {
            let old = desc.id();
            match entity {
                Entity::Cluster(mut cluster) => {
                    cluster.pos = context.wrap_position(cluster.pos + offset);
                    let key = context.insert_cluster(cluster);
                    remapper.clusters.keys.insert(old, key);
                    result.clusters.push(key);
                }
                Entity::Cell(mut cell) => {
                    cell.pos = context.wrap_position(cell.pos + offset);
                    let key = context.insert_cell(cell);
                    remapper.cells.keys.insert(old, key);
                    result.cells.push(key);
                }
                Entity::Token(token) => {
                    let key = context.insert_token(token);
                    remapper.tokens.keys.insert(old, key);
                    result.tokens.push(key);
                }
                Entity::Particle(mut particle) => {
                    particle.pos = context.wrap_position(particle.pos + offset);
                    let key = context.insert_particle(particle);
                    remapper.particles.keys.insert(old, key);
                    result.particles.push(key);
                }
            }
        }

        for desc in descriptions {
            result.dropped_references += match desc {
                EntityDescription::Cell(cell) => rewire_cell(context, &remapper, cell),
                EntityDescription::Token(token) => rewire_token(context, &remapper, token),
                EntityDescription::Cluster(_) | EntityDescription::Particle(_) => 0,
            };
        }
        result.tokens.retain(|&key| context.token(key).is_some());
        if result.dropped_references > 0 {
            log::debug!(
                "Dropped {} references to entities outside the selection",
                result.dropped_references
            );
        }

        result.cluster_ids = remapper.clusters.ids;
        result.cell_ids = remapper.cells.ids;
        Ok(result)
    }
}

fn rewire_cell(context: &mut UnitContext, remapper: &IdRemapper, desc: &CellDescription) -> usize {
    let Some(key) = remapper.cell(desc.id) else {
        return 0;
    };
    let mut dropped = 0;
    if let Some(cluster_id) = desc.cluster_id {
        let attached = remapper
            .cluster(cluster_id)
            .is_some_and(|cluster| context.attach_to_cluster(key, cluster));
        if !attached {
            log::debug!("cell {}: cluster {} not in selection", desc.id, cluster_id);
            dropped += 1;
        }
    }
    for &partner in &desc.bonds {
        let bonded = remapper
            .cell(partner)
            .is_some_and(|partner| context.bond(key, partner));
        if !bonded {
            log::debug!("cell {}: bond to {} not restored", desc.id, partner);
            dropped += 1;
        }
    }
    dropped
}

fn rewire_token(context: &mut UnitContext, remapper: &IdRemapper, desc: &TokenDescription) -> usize {
    let Some(key) = remapper.token(desc.id) else {
        return 0;
    };
    let attached = remapper
        .cell(desc.carrier_id)
        .is_some_and(|carrier| context.attach_token(key, carrier));
    if attached {
        0
    } else {
        log::debug!("token {}: carrier {} not in selection", desc.id, desc.carrier_id);
        context.remove_token(key);
        1
    }
}

/// Describes the selected entities so they can be encoded and rebuilt.
///
/// Selected clusters are described with all of their cells and tokens.
/// Individually selected cells keep their references to unselected clusters
/// and bond partners; those references are dropped when the description is
/// rebuilt.
pub fn describe(context: &UnitContext, selection: &Selection) -> Vec<EntityDescription> {
    let mut descriptions = Vec::new();
    let mut described = HashSet::new();

    for cluster in selection.clusters.iter().filter_map(|&key| context.cluster(key)) {
        descriptions.push(
            ClusterDescription {
                id: cluster.id,
                pos: cluster.pos,
                vel: cluster.vel,
                angle: cluster.angle,
                angular_vel: cluster.angular_vel,
            }
            .into(),
        );
        for &cell in &cluster.cells {
            describe_cell(context, cell, &mut described, &mut descriptions);
        }
    }
    for &cell in &selection.cells {
        describe_cell(context, cell, &mut described, &mut descriptions);
    }
    for particle in selection.particles.iter().filter_map(|&key| context.particle(key)) {
        descriptions.push(
            ParticleDescription {
                id: particle.id,
                pos: particle.pos,
                vel: particle.vel,
                energy: particle.energy,
                color: particle.color,
            }
            .into(),
        );
    }
    descriptions
}

fn describe_cell(
    context: &UnitContext,
    key: CellKey,
    described: &mut HashSet<CellKey>,
    descriptions: &mut Vec<EntityDescription>,
) {
    if !described.insert(key) {
        return;
    }
    let Some(cell) = context.cell(key) else {
        return;
    };
    descriptions.push(
        CellDescription {
            id: cell.id,
            cluster_id: cell
                .cluster
                .and_then(|cluster| context.cluster(cluster))
                .map(|cluster| cluster.id),
            pos: cell.pos,
            energy: cell.energy,
            color: cell.color,
            age: cell.age,
            max_connections: cell.max_connections,
            bonds: cell
                .bonds
                .iter()
                .filter_map(|&partner| context.cell(partner))
                .map(|partner| partner.id)
                .collect(),
            genome: cell.genome.clone(),
            token_blocked: cell.token_blocked,
        }
        .into(),
    );
    for token in cell.tokens.iter().filter_map(|&token| context.token(token)) {
        descriptions.push(
            TokenDescription {
                id: token.id,
                carrier_id: cell.id,
                energy: token.energy,
                memory: token.memory.clone(),
            }
            .into(),
        );
    }
}
