use cellforge::entities::*;
use cellforge::selection::{BuiltSelection, Selection, SelectionBuilder, decode, describe, encode};
use glam::Vec2;
use std::collections::HashMap;

fn key_of(ctx: &UnitContext, built: &BuiltSelection, new_id: u64) -> CellKey {
    built
        .cells
        .iter()
        .copied()
        .find(|&key| ctx.cell(key).is_some_and(|cell| cell.id == new_id))
        .unwrap()
}

fn bond_count(ctx: &UnitContext, cells: &[CellKey]) -> usize {
    cells.iter().map(|&key| ctx.cell(key).unwrap().bonds.len()).sum::<usize>() / 2
}

/// Builds the chain A - B - C - D as loose cells with description ids 1..=4.
fn chain(ctx: &mut UnitContext) -> BuiltSelection {
    let descriptions: Vec<EntityDescription> = vec![
        CellDescription::new(1, Vec2::new(100.0, 100.0)).with_bonds([2]).into(),
        CellDescription::new(2, Vec2::new(101.0, 100.0)).with_bonds([1, 3]).into(),
        CellDescription::new(3, Vec2::new(102.0, 100.0)).with_bonds([2, 4]).into(),
        CellDescription::new(4, Vec2::new(103.0, 100.0)).with_bonds([3]).into(),
    ];
    SelectionBuilder::new()
        .build(ctx, &descriptions, Vec2::new(101.5, 100.0))
        .unwrap()
}

#[test]
fn copying_part_of_a_chain_drops_the_outside_bond() {
    let mut ctx = UnitContext::new(Vec2::splat(1000.0));
    let original = chain(&mut ctx);
    let a = key_of(&ctx, &original, original.cell_ids[&1]);
    let b = key_of(&ctx, &original, original.cell_ids[&2]);
    let c = key_of(&ctx, &original, original.cell_ids[&3]);

    let selection = Selection {
        cells: vec![a, b, c],
        ..Default::default()
    };
    let bytes = encode(&describe(&ctx, &selection)).unwrap();
    let copy = SelectionBuilder::new()
        .build_from_bytes(&mut ctx, &bytes, Vec2::new(500.0, 500.0))
        .unwrap();

    assert_eq!(copy.cells.len(), 3);
    assert_eq!(copy.dropped_references, 1);
    assert_eq!(bond_count(&ctx, &copy.cells), 2);
    let live_ids: Vec<u64> = [a, b, c].iter().map(|&key| ctx.cell(key).unwrap().id).collect();
    for &key in &copy.cells {
        assert!(!live_ids.contains(&ctx.cell(key).unwrap().id));
    }
    // The source chain is untouched.
    assert_eq!(bond_count(&ctx, &original.cells), 3);
}

#[test]
fn rebuilt_copy_keeps_the_topology() {
    let mut ctx = UnitContext::new(Vec2::splat(1000.0));
    let original = chain(&mut ctx);
    let bytes = encode(&describe(&ctx, &original.selection())).unwrap();
    let live_to_copy = SelectionBuilder::new()
        .build(&mut ctx, &decode(&bytes).unwrap(), Vec2::new(300.0, 300.0))
        .unwrap();

    assert_eq!(live_to_copy.dropped_references, 0);
    // Compose description id -> live id -> copy id.
    let composed: HashMap<u64, u64> = original
        .cell_ids
        .iter()
        .map(|(&described, live)| (described, live_to_copy.cell_ids[live]))
        .collect();
    for (x, y) in [(1, 2), (2, 3), (3, 4)] {
        let x = key_of(&ctx, &live_to_copy, composed[&x]);
        let y = key_of(&ctx, &live_to_copy, composed[&y]);
        assert!(ctx.are_bonded(x, y));
    }
    let first = key_of(&ctx, &live_to_copy, composed[&1]);
    let last = key_of(&ctx, &live_to_copy, composed[&4]);
    assert!(!ctx.are_bonded(first, last));

    let positions: Vec<Vec2> = live_to_copy
        .cells
        .iter()
        .map(|&key| ctx.cell(key).unwrap().pos)
        .collect();
    let center = positions.iter().copied().sum::<Vec2>() / positions.len() as f32;
    assert!((center - Vec2::new(300.0, 300.0)).length() < 1e-3);
}

#[test]
fn clusters_and_tokens_survive_a_round_trip() {
    let mut ctx = UnitContext::new(Vec2::splat(1000.0));
    let descriptions: Vec<EntityDescription> = vec![
        ClusterDescription::new(1, Vec2::new(50.0, 50.0)).into(),
        CellDescription::new(1, Vec2::new(49.0, 50.0)).in_cluster(1).with_bonds([2]).into(),
        CellDescription::new(2, Vec2::new(51.0, 50.0)).in_cluster(1).into(),
        TokenDescription {
            id: 1,
            carrier_id: 2,
            energy: 4.0,
            memory: vec![1, 2, 3],
        }
        .into(),
        ParticleDescription::new(1, Vec2::new(60.0, 50.0)).into(),
    ];
    let live = SelectionBuilder::new()
        .build(&mut ctx, &descriptions, Vec2::new(50.0, 50.0))
        .unwrap();

    let bytes = encode(&describe(&ctx, &live.selection())).unwrap();
    let copy = SelectionBuilder::new()
        .build_from_bytes(&mut ctx, &bytes, Vec2::new(800.0, 800.0))
        .unwrap();

    assert_eq!(copy.dropped_references, 0);
    assert_eq!((copy.clusters.len(), copy.cells.len()), (1, 2));
    assert_eq!((copy.tokens.len(), copy.particles.len()), (1, 1));
    let cluster = ctx.cluster(copy.clusters[0]).unwrap();
    assert_eq!(cluster.cells.len(), 2);
    assert_eq!(bond_count(&ctx, &copy.cells), 1);
    let token = ctx.token(copy.tokens[0]).unwrap();
    assert_eq!(token.memory, vec![1, 2, 3]);
    assert!(copy.cells.contains(&token.carrier.unwrap()));
    assert_eq!(ctx.clusters().len(), 2);
    assert_eq!(ctx.tokens().len(), 2);
}

#[test]
fn corrupt_bytes_are_an_error() {
    let mut ctx = UnitContext::new(Vec2::splat(1000.0));
    let result = SelectionBuilder::new().build_from_bytes(&mut ctx, &[0xff, 0x01], Vec2::ZERO);

    assert!(result.is_err());
    assert!(ctx.cells().is_empty());
}
