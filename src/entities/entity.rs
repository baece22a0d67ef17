//! Live entities owned by a [`UnitContext`](super::UnitContext).

use glam::Vec2;
use slotmap::new_key_type;

new_key_type! {
    pub struct ClusterKey;
    pub struct CellKey;
    pub struct TokenKey;
    pub struct ParticleKey;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub cells: Vec<CellKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: u64,
    pub cluster: Option<ClusterKey>,
    pub pos: Vec2,
    pub energy: f64,
    pub color: u8,
    pub age: u32,
    pub max_connections: u32,
    pub bonds: Vec<CellKey>,
    pub tokens: Vec<TokenKey>,
    pub genome: Vec<u8>,
    pub token_blocked: bool,
}

impl Cell {
    pub fn is_self_replicator(&self) -> bool {
        !self.genome.is_empty()
    }

    pub fn has_free_connection(&self) -> bool {
        (self.bonds.len() as u32) < self.max_connections
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: u64,
    /// Unresolved until the token is attached to a cell.
    pub carrier: Option<CellKey>,
    pub energy: f64,
    pub memory: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub energy: f64,
    pub color: u8,
}

/// A freshly constructed entity of any kind, not yet inserted anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Cluster(Cluster),
    Cell(Cell),
    Token(Token),
    Particle(Particle),
}

impl Entity {
    pub fn id(&self) -> u64 {
        match self {
            Entity::Cluster(cluster) => cluster.id,
            Entity::Cell(cell) => cell.id,
            Entity::Token(token) => token.id,
            Entity::Particle(particle) => particle.id,
        }
    }
}
