//! Simulation entities: descriptions, live entities, their owning context and
//! the factory that turns one into the other.

mod context;
mod description;
mod entity;
mod factory;

pub use context::UnitContext;
pub use description::*;
pub use entity::*;
pub use factory::{EntityFactory, StandardEntityFactory};

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn cell(ctx: &mut UnitContext, max_connections: u32) -> CellKey {
        let mut desc = CellDescription::new(0, Vec2::ZERO);
        desc.max_connections = max_connections;
        let cell = StandardEntityFactory.build_cell(&desc, ctx).unwrap();
        ctx.insert_cell(cell)
    }

    #[test]
    fn bonds_are_symmetric_and_respect_capacity() {
        let mut ctx = UnitContext::new(Vec2::splat(10.0));
        let a = cell(&mut ctx, 1);
        let b = cell(&mut ctx, 2);
        let c = cell(&mut ctx, 2);

        assert!(ctx.bond(a, b));
        assert!(ctx.bond(b, a));
        assert!(ctx.are_bonded(b, a));
        assert_eq!(ctx.cell(a).unwrap().bonds.len(), 1);
        assert!(!ctx.bond(a, c));
        assert!(!ctx.bond(c, c));
    }

    #[test]
    fn removing_a_cell_unlinks_everything() {
        let mut ctx = UnitContext::new(Vec2::splat(10.0));
        let cluster = StandardEntityFactory
            .build_cluster(&ClusterDescription::new(0, Vec2::ZERO), &mut ctx)
            .unwrap();
        let cluster = ctx.insert_cluster(cluster);
        let a = cell(&mut ctx, 4);
        let b = cell(&mut ctx, 4);
        ctx.attach_to_cluster(a, cluster);
        ctx.attach_to_cluster(b, cluster);
        ctx.bond(a, b);
        let token = StandardEntityFactory
            .build_token(
                &TokenDescription {
                    id: 0,
                    carrier_id: 0,
                    energy: 1.0,
                    memory: Vec::new(),
                },
                &mut ctx,
            )
            .unwrap();
        let token = ctx.insert_token(token);
        ctx.attach_token(token, a);

        ctx.remove_cell(a);

        assert!(ctx.token(token).is_none());
        assert!(ctx.cell(b).unwrap().bonds.is_empty());
        assert_eq!(ctx.cluster(cluster).unwrap().cells, vec![b]);

        ctx.remove_cell(b);
        assert!(ctx.cluster(cluster).is_none());
    }
}
