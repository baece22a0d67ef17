//! Immutable change descriptions of simulation entities.
//!
//! Ids inside descriptions are correlation keys: they only have to be unique
//! per entity kind within one batch, and references between descriptions
//! (cluster membership, bond partners, token carriers) use them.

use crate::constants::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Cluster,
    Cell,
    Token,
    Particle,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Cluster => "cluster",
            EntityKind::Cell => "cell",
            EntityKind::Token => "token",
            EntityKind::Particle => "particle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDescription {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
}

impl ClusterDescription {
    pub fn new(id: u64, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDescription {
    pub id: u64,
    pub cluster_id: Option<u64>,
    pub pos: Vec2,
    pub energy: f64,
    pub color: u8,
    pub age: u32,
    pub max_connections: u32,
    /// Ids of bond partners.
    pub bonds: Vec<u64>,
    /// Non-empty genomes mark self-replicating cells.
    pub genome: Vec<u8>,
    pub token_blocked: bool,
}

impl CellDescription {
    pub fn new(id: u64, pos: Vec2) -> Self {
        Self {
            id,
            cluster_id: None,
            pos,
            energy: DEFAULT_CELL_ENERGY,
            color: 0,
            age: 0,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bonds: Vec::new(),
            genome: Vec::new(),
            token_blocked: false,
        }
    }

    pub fn in_cluster(mut self, cluster_id: u64) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_bonds(mut self, bonds: impl IntoIterator<Item = u64>) -> Self {
        self.bonds = bonds.into_iter().collect();
        self
    }

    pub fn with_genome(mut self, genome: Vec<u8>) -> Self {
        self.genome = genome;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescription {
    pub id: u64,
    pub carrier_id: u64,
    pub energy: f64,
    pub memory: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDescription {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy: f64,
    pub color: u8,
}

impl ParticleDescription {
    pub fn new(id: u64, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            energy: DEFAULT_PARTICLE_ENERGY,
            color: 0,
        }
    }
}

/// One entry of a serialized selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityDescription {
    Cluster(ClusterDescription),
    Cell(CellDescription),
    Token(TokenDescription),
    Particle(ParticleDescription),
}

impl EntityDescription {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDescription::Cluster(_) => EntityKind::Cluster,
            EntityDescription::Cell(_) => EntityKind::Cell,
            EntityDescription::Token(_) => EntityKind::Token,
            EntityDescription::Particle(_) => EntityKind::Particle,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            EntityDescription::Cluster(desc) => desc.id,
            EntityDescription::Cell(desc) => desc.id,
            EntityDescription::Token(desc) => desc.id,
            EntityDescription::Particle(desc) => desc.id,
        }
    }

    /// Tokens have no position of their own.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            EntityDescription::Cluster(desc) => Some(desc.pos),
            EntityDescription::Cell(desc) => Some(desc.pos),
            EntityDescription::Token(_) => None,
            EntityDescription::Particle(desc) => Some(desc.pos),
        }
    }
}

impl From<ClusterDescription> for EntityDescription {
    fn from(desc: ClusterDescription) -> Self {
        EntityDescription::Cluster(desc)
    }
}

impl From<CellDescription> for EntityDescription {
    fn from(desc: CellDescription) -> Self {
        EntityDescription::Cell(desc)
    }
}

impl From<TokenDescription> for EntityDescription {
    fn from(desc: TokenDescription) -> Self {
        EntityDescription::Token(desc)
    }
}

impl From<ParticleDescription> for EntityDescription {
    fn from(desc: ParticleDescription) -> Self {
        EntityDescription::Particle(desc)
    }
}
