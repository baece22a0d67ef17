use super::entity::*;
use glam::Vec2;
use slotmap::SlotMap;

/// Owning spatial context for live entities.
///
/// The universe is toroidal: every stored position lies in
/// `[0, size.x) x [0, size.y)`. Entities reference each other through slot
/// map keys, and the removal helpers unlink those references so that no key
/// ever points at a removed entity.
#[derive(Debug, Clone)]
pub struct UnitContext {
    size: Vec2,
    next_id: u64,
    clusters: SlotMap<ClusterKey, Cluster>,
    cells: SlotMap<CellKey, Cell>,
    tokens: SlotMap<TokenKey, Token>,
    particles: SlotMap<ParticleKey, Particle>,
}

impl UnitContext {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            next_id: 1,
            clusters: SlotMap::with_key(),
            cells: SlotMap::with_key(),
            tokens: SlotMap::with_key(),
            particles: SlotMap::with_key(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Hands out the next entity id. Ids are never reused within a context.
    pub fn new_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn wrap_position(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x.rem_euclid(self.size.x), pos.y.rem_euclid(self.size.y))
    }

    pub fn clear(&mut self) {
        self.clusters.clear();
        self.cells.clear();
        self.tokens.clear();
        self.particles.clear();
    }

    // --- Read access ---

    pub fn clusters(&self) -> &SlotMap<ClusterKey, Cluster> {
        &self.clusters
    }

    pub fn cells(&self) -> &SlotMap<CellKey, Cell> {
        &self.cells
    }

    pub fn tokens(&self) -> &SlotMap<TokenKey, Token> {
        &self.tokens
    }

    pub fn particles(&self) -> &SlotMap<ParticleKey, Particle> {
        &self.particles
    }

    pub fn cluster(&self, key: ClusterKey) -> Option<&Cluster> {
        self.clusters.get(key)
    }

    pub fn cell(&self, key: CellKey) -> Option<&Cell> {
        self.cells.get(key)
    }

    pub fn token(&self, key: TokenKey) -> Option<&Token> {
        self.tokens.get(key)
    }

    pub fn particle(&self, key: ParticleKey) -> Option<&Particle> {
        self.particles.get(key)
    }

    pub fn cluster_mut(&mut self, key: ClusterKey) -> Option<&mut Cluster> {
        self.clusters.get_mut(key)
    }

    pub fn cell_mut(&mut self, key: CellKey) -> Option<&mut Cell> {
        self.cells.get_mut(key)
    }

    pub fn particle_mut(&mut self, key: ParticleKey) -> Option<&mut Particle> {
        self.particles.get_mut(key)
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (CellKey, &mut Cell)> {
        self.cells.iter_mut()
    }

    // --- Insertion ---
    // Inserted entities must not carry keys yet; links are made through the
    // helpers below.

    pub fn insert_cluster(&mut self, mut cluster: Cluster) -> ClusterKey {
        cluster.cells.clear();
        self.clusters.insert(cluster)
    }

    pub fn insert_cell(&mut self, mut cell: Cell) -> CellKey {
        cell.cluster = None;
        cell.bonds.clear();
        cell.tokens.clear();
        self.cells.insert(cell)
    }

    pub fn insert_token(&mut self, mut token: Token) -> TokenKey {
        token.carrier = None;
        self.tokens.insert(token)
    }

    pub fn insert_particle(&mut self, particle: Particle) -> ParticleKey {
        self.particles.insert(particle)
    }

    // --- Linking ---

    /// Makes `cell` a member of `cluster`, leaving any previous cluster.
    pub fn attach_to_cluster(&mut self, cell: CellKey, cluster: ClusterKey) -> bool {
        if !self.clusters.contains_key(cluster) {
            return false;
        }
        let previous = match self.cells.get_mut(cell) {
            Some(c) => c.cluster.replace(cluster),
            None => return false,
        };
        if let Some(previous) = previous.and_then(|key| self.clusters.get_mut(key)) {
            previous.cells.retain(|&k| k != cell);
        }
        if let Some(target) = self.clusters.get_mut(cluster) {
            if !target.cells.contains(&cell) {
                target.cells.push(cell);
            }
        }
        true
    }

    /// Bonds two distinct cells symmetrically. Returns `false` when either
    /// cell is missing or has no free connection; an existing bond is kept.
    pub fn bond(&mut self, a: CellKey, b: CellKey) -> bool {
        if a == b {
            return false;
        }
        let (Some(cell_a), Some(cell_b)) = (self.cells.get(a), self.cells.get(b)) else {
            return false;
        };
        if cell_a.bonds.contains(&b) {
            return true;
        }
        if !cell_a.has_free_connection() || !cell_b.has_free_connection() {
            return false;
        }
        if let Some(cell) = self.cells.get_mut(a) {
            cell.bonds.push(b);
        }
        if let Some(cell) = self.cells.get_mut(b) {
            cell.bonds.push(a);
        }
        true
    }

    pub fn are_bonded(&self, a: CellKey, b: CellKey) -> bool {
        self.cells.get(a).is_some_and(|cell| cell.bonds.contains(&b))
    }

    pub fn attach_token(&mut self, token: TokenKey, carrier: CellKey) -> bool {
        if !self.tokens.contains_key(token) {
            return false;
        }
        let Some(cell) = self.cells.get_mut(carrier) else {
            return false;
        };
        cell.tokens.push(token);
        if let Some(token) = self.tokens.get_mut(token) {
            token.carrier = Some(carrier);
        }
        true
    }

    // --- Removal ---

    /// Removes a cell with its tokens. A cluster left without cells is
    /// removed as well.
    pub fn remove_cell(&mut self, key: CellKey) -> Option<Cell> {
        let cell = self.cells.remove(key)?;
        for partner in &cell.bonds {
            if let Some(partner) = self.cells.get_mut(*partner) {
                partner.bonds.retain(|&k| k != key);
            }
        }
        for token in &cell.tokens {
            self.tokens.remove(*token);
        }
        if let Some(cluster_key) = cell.cluster {
            let now_empty = match self.clusters.get_mut(cluster_key) {
                Some(cluster) => {
                    cluster.cells.retain(|&k| k != key);
                    cluster.cells.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.clusters.remove(cluster_key);
            }
        }
        Some(cell)
    }

    /// Removes a cluster together with all of its cells.
    pub fn remove_cluster(&mut self, key: ClusterKey) -> Option<Cluster> {
        let removed = self.clusters.get(key)?.clone();
        for &cell in &removed.cells {
            self.remove_cell(cell);
        }
        // Removing the last member already drops the cluster.
        self.clusters.remove(key);
        Some(removed)
    }

    pub fn remove_token(&mut self, key: TokenKey) -> Option<Token> {
        let token = self.tokens.remove(key)?;
        if let Some(cell) = token.carrier.and_then(|carrier| self.cells.get_mut(carrier)) {
            cell.tokens.retain(|&k| k != key);
        }
        Some(token)
    }

    pub fn remove_particle(&mut self, key: ParticleKey) -> Option<Particle> {
        self.particles.remove(key)
    }
}
