use super::*;
use crate::catalog::Catalog;
use crate::shape::Shape;
use std::collections::HashSet;

fn instances(catalog: &Catalog, ids: &[&str]) -> Vec<SelectedItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| SelectedItem::new(catalog.require(id).unwrap(), i as u32))
        .collect()
}

fn custom_item(id: &str, rows: Vec<Vec<u8>>) -> CatalogItem {
    let shape = Shape::new(rows).unwrap();
    CatalogItem {
        id: id.to_string(),
        name: id.to_string(),
        blocks: shape.cell_count() as u32,
        shape,
    }
}

fn positions(placements: &[SelectedItem]) -> Vec<(usize, usize)> {
    placements
        .iter()
        .map(|selected| {
            let position = selected.position.unwrap();
            (position.x, position.y)
        })
        .collect()
}

fn assert_disjoint_and_in_bounds(placements: &[SelectedItem], size: TruckSize) {
    let mut seen = HashSet::new();
    for selected in placements {
        let position = selected.position.unwrap();
        for (col, row) in selected.shape().occupied_cells() {
            let cell = (position.x + col, position.y + row);
            assert!(cell.0 < size.dimension() && cell.1 < size.dimension());
            assert!(seen.insert(cell), "cell {:?} covered twice", cell);
        }
    }
}

/// desk, sofa, bed, box, chair, tv
fn sample(catalog: &Catalog) -> Vec<SelectedItem> {
    instances(catalog, &["desk", "sofa", "bed", "box", "chair", "tv"])
}

#[test]
fn test_empty_list_fits_smallest_truck() {
    let result = fit_items_in_truck(&[], TruckSize::Small);

    assert!(result.success);
    assert!(result.placements.is_empty());
}

#[test]
fn test_first_fit_scans_rows_then_columns() {
    let catalog = Catalog::furniture();
    let items = instances(&catalog, &["desk", "box", "sofa"]);

    let result = fit_items_in_truck(&items, TruckSize::Small);

    assert!(result.success);
    assert_eq!(positions(&result.placements), vec![(0, 0), (2, 0), (3, 0)]);
}

#[test]
fn test_items_keep_input_order() {
    let catalog = Catalog::furniture();
    let items = sample(&catalog);

    let result = fit_items_in_truck(&items, TruckSize::Small);

    assert!(result.success);
    let ids: Vec<&str> = result
        .placements
        .iter()
        .map(|selected| selected.instance_id.as_str())
        .collect();
    assert_eq!(ids, vec!["desk-0", "sofa-1", "bed-2", "box-3", "chair-4", "tv-5"]);
    assert_eq!(
        positions(&result.placements),
        vec![(0, 0), (2, 0), (0, 2), (5, 0), (5, 1), (2, 2)]
    );
}

#[test]
fn test_empty_cells_of_a_shape_can_be_reused() {
    let catalog = Catalog::furniture();
    let notched = custom_item(
        "notched",
        vec![vec![1, 1, 1, 1, 1, 1], vec![1, 0, 1, 1, 1, 1]],
    );
    let items = vec![
        SelectedItem::new(&notched, 0),
        SelectedItem::new(catalog.require("box").unwrap(), 1),
    ];

    let result = fit_items_in_truck(&items, TruckSize::Small);

    assert!(result.success);
    assert_eq!(positions(&result.placements), vec![(0, 0), (1, 1)]);
}

#[test]
fn test_failure_discards_partial_placements() {
    let catalog = Catalog::furniture();
    let bar = custom_item("bar", vec![vec![1; 7]]);
    let items = vec![
        SelectedItem::new(catalog.require("box").unwrap(), 0),
        SelectedItem::new(&bar, 1),
    ];

    let result = fit_items_in_truck(&items, TruckSize::Small);
    assert!(!result.success);
    assert!(result.placements.is_empty());

    let result = fit_items_in_truck(&items, TruckSize::Medium);
    assert!(result.success);
    assert_eq!(positions(&result.placements), vec![(0, 0), (1, 0)]);
}

#[test]
fn test_thirty_six_boxes_fill_the_small_truck_exactly() {
    let catalog = Catalog::furniture();
    let boxes = instances(&catalog, &["box"; 36]);

    let result = fit_items_in_truck(&boxes, TruckSize::Small);
    assert!(result.success);
    assert_eq!(result.placements.last().unwrap().position, Some(Position { x: 5, y: 5 }));

    let boxes = instances(&catalog, &["box"; 37]);
    assert!(!fit_items_in_truck(&boxes, TruckSize::Small).success);
    assert!(fit_items_in_truck(&boxes, TruckSize::Medium).success);
}

#[test]
fn test_four_by_three_item_fits_small_truck() {
    let catalog = Catalog::furniture();
    let dining = instances(&catalog, &["dining"]);

    let result = fit_items_in_truck(&dining, TruckSize::Small);

    assert!(result.success);
    assert_eq!(positions(&result.placements), vec![(0, 0)]);
}

#[test]
fn test_oversized_item_never_fits() {
    let wide = custom_item("wide", vec![vec![1; 13]]);
    let tall = custom_item("tall", vec![vec![1]; 13]);

    for size in TruckSize::ALL {
        assert!(!fit_items_in_truck(&[SelectedItem::new(&wide, 0)], size).success);
        assert!(!fit_items_in_truck(&[SelectedItem::new(&tall, 0)], size).success);
    }
}

#[test]
fn test_fit_is_deterministic_and_refit_is_stable() {
    let catalog = Catalog::furniture();
    let items = sample(&catalog);

    let first = fit_items_in_truck(&items, TruckSize::Small);
    let second = fit_items_in_truck(&items, TruckSize::Small);
    assert_eq!(first, second);

    let refit = fit_items_in_truck(&first.placements, TruckSize::Small);
    assert!(refit.success);
    assert_eq!(positions(&refit.placements), positions(&first.placements));
}

#[test]
fn test_success_carries_over_to_larger_trucks() {
    let catalog = Catalog::furniture();
    let items = sample(&catalog);

    for size in TruckSize::Small.and_larger() {
        let result = fit_items_in_truck(&items, size);
        assert!(result.success, "sample should fit in {}", size);
        assert_disjoint_and_in_bounds(&result.placements, size);
    }
}

#[test]
fn test_mixed_load_has_no_overlap() {
    let catalog = Catalog::furniture();
    let items = instances(
        &catalog,
        &[
            "wardrobe", "washer", "bed", "dining", "washer", "fridge", "bike", "sofa", "box",
            "washer", "desk", "tv",
        ],
    );

    let result = fit_items_in_truck(&items, TruckSize::ExtraLarge);

    assert!(result.success);
    assert_eq!(result.placements.len(), items.len());
    assert_disjoint_and_in_bounds(&result.placements, TruckSize::ExtraLarge);
}

#[test]
fn test_add_to_empty_load_starts_small() {
    let catalog = Catalog::furniture();

    let load = LoadState::new()
        .add_item(catalog.require("box").unwrap())
        .unwrap();

    assert_eq!(load.truck_size, TruckSize::Small);
    assert_eq!(load.items.len(), 1);
    assert_eq!(load.items[0].instance_id, "box-0");
    assert_eq!(load.items[0].position, Some(Position { x: 0, y: 0 }));
    assert_eq!(load.next_instance, 1);
}

#[test]
fn test_thirty_seventh_box_escalates_to_medium() {
    let catalog = Catalog::furniture();
    let item = catalog.require("box").unwrap();

    let mut load = LoadState::new();
    for _ in 0..36 {
        load = load.add_item(item).unwrap();
    }
    assert_eq!(load.truck_size, TruckSize::Small);

    let load = load.add_item(item).unwrap();
    assert_eq!(load.truck_size, TruckSize::Medium);
    assert_eq!(load.items.len(), 37);
    assert_eq!(load.items[36].position, Some(Position { x: 4, y: 4 }));
    assert_disjoint_and_in_bounds(&load.items, TruckSize::Medium);
}

#[test]
fn test_adding_never_shrinks_the_truck() {
    let catalog = Catalog::furniture();
    let one_box = instances(&catalog, &["box"]);
    let load = LoadState {
        items: fit_items_in_truck(&one_box, TruckSize::Large).placements,
        truck_size: TruckSize::Large,
        next_instance: 1,
    };

    let load = load.add_item(catalog.require("box").unwrap()).unwrap();

    assert_eq!(load.truck_size, TruckSize::Large);
    assert_eq!(positions(&load.items), vec![(0, 0), (1, 0)]);
}

#[test]
fn test_empty_load_ignores_stale_truck_size() {
    let catalog = Catalog::furniture();
    let load = LoadState {
        truck_size: TruckSize::ExtraLarge,
        ..LoadState::default()
    };

    let load = load.add_item(catalog.require("desk").unwrap()).unwrap();

    assert_eq!(load.truck_size, TruckSize::Small);
}

#[test]
fn test_oversized_add_is_rejected_and_state_kept() {
    let catalog = Catalog::furniture();
    let wide = custom_item("wide", vec![vec![1; 13]]);

    assert!(matches!(
        LoadState::new().add_item(&wide),
        Err(PackerError::CapacityExceeded { item }) if item == "wide"
    ));

    let load = LoadState::new()
        .add_item(catalog.require("sofa").unwrap())
        .unwrap();
    let before = load.clone();
    assert!(load.add_item(&wide).is_err());
    assert_eq!(load, before);
}

#[test]
fn test_block_estimate_differs_from_shape_check() {
    let catalog = Catalog::furniture();
    let bed = catalog.require("bed").unwrap();

    let mut load = LoadState::new();
    for _ in 0..4 {
        load = load.add_item(bed).unwrap();
    }

    assert_eq!(load.total_blocks(), 32);
    assert_eq!(
        TruckSize::smallest_for_blocks(load.total_blocks()),
        Some(TruckSize::Small)
    );
    assert_eq!(load.truck_size, TruckSize::Medium);
    assert_eq!(positions(&load.items), vec![(0, 0), (2, 0), (4, 0), (6, 0)]);
}

#[test]
fn test_removing_only_item_resets_to_small() {
    let catalog = Catalog::furniture();
    let load = LoadState::new()
        .add_item(catalog.require("wardrobe").unwrap())
        .unwrap();

    let load = load.remove_item(0).unwrap();

    assert!(load.is_empty());
    assert_eq!(load.truck_size, TruckSize::Small);
}

#[test]
fn test_remove_downsizes_and_repacks() {
    let catalog = Catalog::furniture();
    let item = catalog.require("box").unwrap();
    let mut load = LoadState::new();
    for _ in 0..37 {
        load = load.add_item(item).unwrap();
    }
    assert_eq!(load.truck_size, TruckSize::Medium);

    let load = load.remove_item(0).unwrap();

    assert_eq!(load.truck_size, TruckSize::Small);
    assert_eq!(load.items.len(), 36);
    assert_eq!(load.items[0].instance_id, "box-1");
    assert_eq!(load.items[0].position, Some(Position { x: 0, y: 0 }));
}

#[test]
fn test_remove_recomputes_every_position() {
    let catalog = Catalog::furniture();
    let mut load = LoadState::new();
    for id in ["desk", "sofa", "box"] {
        load = load.add_item(catalog.require(id).unwrap()).unwrap();
    }
    assert_eq!(positions(&load.items), vec![(0, 0), (2, 0), (5, 0)]);

    let load = load.remove_item(0).unwrap();

    assert_eq!(positions(&load.items), vec![(0, 0), (3, 0)]);
    assert_eq!(load.items[0].instance_id, "sofa-1");
}

#[test]
fn test_remove_out_of_range() {
    let load = LoadState::new();

    assert!(matches!(
        load.remove_item(0),
        Err(PackerError::InvalidInput(_))
    ));
}

#[test]
fn test_instance_ids_are_not_reused() {
    let catalog = Catalog::furniture();
    let item = catalog.require("box").unwrap();

    let load = LoadState::new()
        .add_item(item)
        .unwrap()
        .add_item(item)
        .unwrap()
        .remove_item(0)
        .unwrap()
        .add_item(item)
        .unwrap();

    let ids: Vec<&str> = load
        .items
        .iter()
        .map(|selected| selected.instance_id.as_str())
        .collect();
    assert_eq!(ids, vec!["box-1", "box-2"]);
    assert_ne!(load.items[0].color, load.items[1].color);
}

#[test]
fn test_reset() {
    let catalog = Catalog::furniture();
    let mut load = LoadState::new();
    for _ in 0..5 {
        load = load.add_item(catalog.require("dining").unwrap()).unwrap();
    }
    assert_ne!(load.truck_size, TruckSize::Small);

    let load = load.reset();

    assert!(load.is_empty());
    assert_eq!(load.truck_size, TruckSize::Small);
}

#[test]
fn test_quote_uses_current_truck() {
    let catalog = Catalog::furniture();
    let load = LoadState::new()
        .add_item(catalog.require("sofa").unwrap())
        .unwrap()
        .add_item(catalog.require("bed").unwrap())
        .unwrap();

    let quote = load.quote(10);

    assert_eq!(quote.truck_size, TruckSize::Small);
    assert_eq!(quote.blocks, 14);
    assert_eq!(quote.total_price, 45_000 + 15_000);
}

#[test]
fn test_grid_rebuilt_from_positions() {
    let catalog = Catalog::furniture();
    let load = LoadState::new()
        .add_item(catalog.require("washer").unwrap())
        .unwrap();

    let grid = load.grid();

    assert_eq!(grid.dimension(), 6);
    assert_eq!(grid.occupied_count(), 3);
    assert_eq!(
        grid.cell(0, 1),
        Some(&Cell::Occupied("washer-0".to_string()))
    );
}

#[test]
fn test_load_state_json_shape() {
    let catalog = Catalog::furniture();
    let load = LoadState::new()
        .add_item(catalog.require("chair").unwrap())
        .unwrap();

    let json = serde_json::to_value(&load).unwrap();

    assert_eq!(json["truck_size"], "S");
    assert_eq!(json["items"][0]["id"], "chair");
    assert_eq!(json["items"][0]["instance_id"], "chair-0");
    assert_eq!(json["items"][0]["position"]["x"], 0);
    assert_eq!(json["items"][0]["shape"], serde_json::json!([[1], [1]]));

    let back: LoadState = serde_json::from_value(json).unwrap();
    assert_eq!(back, load);
}

#[test]
fn test_add_with_exhausted_instance_counter_is_rejected() {
    let catalog = Catalog::furniture();
    let load = LoadState {
        next_instance: u32::MAX,
        ..LoadState::new()
    };

    let result = load.add_item(catalog.require("box").unwrap());

    assert!(matches!(result, Err(PackerError::InvalidInput(_))));
    assert!(load.is_empty());
}

#[test]
fn test_total_blocks_saturates() {
    let item = CatalogItem {
        blocks: u32::MAX,
        ..custom_item("safe", vec![vec![1]])
    };
    let load = LoadState {
        items: vec![SelectedItem::new(&item, 0), SelectedItem::new(&item, 1)],
        ..LoadState::new()
    };

    assert_eq!(load.total_blocks(), u32::MAX);
}

/// Loads up to XL so that dropping the first desk leaves a set that first-fit
/// cannot pack into any truck.
fn load_that_cannot_repack_after_removal(catalog: &Catalog) -> LoadState {
    let ids = [
        "desk", "dining", "dining", "chair", "desk", "dining", "dining", "wardrobe", "wardrobe",
        "dining", "wardrobe", "wardrobe", "dining",
    ];
    ids.iter().fold(LoadState::new(), |load, id| {
        load.add_item(catalog.require(id).unwrap()).unwrap()
    })
}

#[test]
fn test_remove_keeps_layout_when_no_truck_repacks() {
    let catalog = Catalog::furniture();
    let load = load_that_cannot_repack_after_removal(&catalog);
    assert_eq!(load.truck_size, TruckSize::ExtraLarge);
    assert_eq!(
        positions(&load.items),
        vec![
            (0, 0),
            (2, 0),
            (5, 0),
            (8, 0),
            (9, 0),
            (8, 2),
            (0, 4),
            (3, 4),
            (3, 6),
            (8, 6),
            (0, 8),
            (0, 10),
            (5, 8)
        ]
    );

    let remaining = load.items[1..].to_vec();
    for size in TruckSize::ALL {
        assert!(!fit_items_in_truck(&remaining, size).success);
    }

    let after = load.remove_item(0).unwrap();

    assert_eq!(after.truck_size, TruckSize::ExtraLarge);
    assert_eq!(after.items, remaining);
    assert_eq!(after.next_instance, load.next_instance);
    assert_disjoint_and_in_bounds(&after.items, after.truck_size);
}

#[test]
fn test_remove_fallback_rejects_overlapping_positions() {
    let catalog = Catalog::furniture();
    let item = catalog.require("box").unwrap();
    // 13 cells wide: never fits, so removal has to fall back to the old layout
    let pole = custom_item("pole", vec![vec![1; 13]]);
    let place = |selected: SelectedItem, x, y| SelectedItem {
        position: Some(Position { x, y }),
        ..selected
    };
    let load = LoadState {
        items: vec![
            place(SelectedItem::new(item, 0), 0, 0),
            place(SelectedItem::new(item, 1), 0, 0),
            place(SelectedItem::new(&pole, 2), 0, 2),
            place(SelectedItem::new(item, 3), 5, 5),
        ],
        truck_size: TruckSize::ExtraLarge,
        next_instance: 4,
    };

    match load.remove_item(3) {
        Err(PackerError::InvalidInput(message)) => assert!(message.contains("box-1")),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_remove_fallback_rejects_unplaced_items() {
    let catalog = Catalog::furniture();
    let pole = custom_item("pole", vec![vec![1; 13]]);
    let load = LoadState {
        items: vec![
            SelectedItem::new(&pole, 0),
            SelectedItem::new(catalog.require("box").unwrap(), 1),
        ],
        truck_size: TruckSize::ExtraLarge,
        next_instance: 2,
    };

    assert!(matches!(
        load.remove_item(1),
        Err(PackerError::InvalidInput(_))
    ));
}
