use geojson::Value;
use rhumb_grid::math::distance;
use rhumb_grid::{
    assemble_cells, build_mesh, center_of, AxisOrder, Coordinate, CornerSet, GridConfig,
    GridError, GridOverlay,
};

fn scenario_corners() -> CornerSet {
    CornerSet::new(
        Coordinate::new(24.049985, 37.741001),
        Coordinate::new(24.061347, 37.740620),
        Coordinate::new(24.049854, 37.738067),
        Coordinate::new(24.060932, 37.737709),
    )
    .unwrap()
}

fn ring(value: &Value) -> &Vec<Vec<f64>> {
    match value {
        Value::Polygon(rings) => {
            assert_eq!(rings.len(), 1);
            &rings[0]
        }
        other => panic!("expected polygon, got {:?}", other),
    }
}

#[test]
fn test_two_by_two_scenario() {
    let corners = scenario_corners();
    let config = GridConfig::new(2, 2).unwrap();

    let mesh = build_mesh(&corners, config).unwrap();
    assert_eq!(mesh.point_rows().len(), 3);
    assert!(mesh.point_rows().iter().all(|row| row.len() == 3));

    let cells = assemble_cells(&mesh);
    assert_eq!(cells.len(), 4);

    let overlay = GridOverlay::compute(&corners, config, AxisOrder::LatLon).unwrap();
    assert_eq!(overlay.source.data.features.len(), 4);
    for feature in &overlay.source.data.features {
        let ring = ring(&feature.geometry.as_ref().unwrap().value);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    assert_eq!(center_of(&mesh), mesh[1][1]);
    assert_eq!(overlay.center, mesh[1][1]);
}

#[test]
fn test_single_cell_is_the_corners() {
    let corners = scenario_corners();
    let mesh = build_mesh(&corners, GridConfig::new(1, 1).unwrap()).unwrap();
    assert_eq!(mesh.point_count(), 4);

    assert_eq!(mesh[0][0], corners.top_left);
    assert!(distance(mesh[0][1], corners.top_right) < 1.0);
    assert!(distance(mesh[1][0], corners.bottom_left) < 1.0);
    assert!(distance(mesh[1][1], corners.bottom_right) < 1.0);

    assert_eq!(assemble_cells(&mesh).len(), 1);
}

#[test]
fn test_mesh_shape_and_corners_for_many_configs() {
    let corners = CornerSet::default();
    for (rows, columns) in [(1, 5), (3, 1), (7, 9), (14, 40)] {
        let mesh = build_mesh(&corners, GridConfig::new(rows, columns).unwrap()).unwrap();
        let (rows, columns) = (rows as usize, columns as usize);

        assert_eq!(mesh.point_rows().len(), rows + 1);
        assert!(mesh.point_rows().iter().all(|row| row.len() == columns + 1));

        assert_eq!(mesh[0][0], corners.top_left);
        assert!(distance(mesh[0][columns], corners.top_right) < 1.0);
        assert!(distance(mesh[rows][0], corners.bottom_left) < 1.0);
        assert!(distance(mesh[rows][columns], corners.bottom_right) < 1.0);
    }
}

#[test]
fn test_adjacent_cells_share_points() {
    let mesh = build_mesh(&CornerSet::default(), GridConfig::new(4, 6).unwrap()).unwrap();
    let cells = assemble_cells(&mesh);
    assert_eq!(cells.len(), 24);

    for (k, cell) in cells.iter().enumerate() {
        assert_eq!((cell.row, cell.column), (k / 6, k % 6));
        if cell.column + 1 < 6 {
            let right = &cells[k + 1];
            assert_eq!(cell.top_right, right.top_left);
            assert_eq!(cell.bottom_right, right.bottom_left);
        }
        if cell.row + 1 < 4 {
            let below = &cells[k + 6];
            assert_eq!(cell.bottom_left, below.top_left);
            assert_eq!(cell.bottom_right, below.top_right);
        }
    }
}

#[test]
fn test_feature_order_matches_cells() {
    let overlay = GridOverlay::compute(
        &CornerSet::default(),
        GridConfig::new(3, 3).unwrap(),
        AxisOrder::LatLon,
    )
    .unwrap();

    for (cell, feature) in overlay.cells.iter().zip(&overlay.source.data.features) {
        let ring = ring(&feature.geometry.as_ref().unwrap().value);
        assert_eq!(ring[0], vec![cell.top_left.latitude, cell.top_left.longitude]);
        assert_eq!(ring[1], vec![cell.top_right.latitude, cell.top_right.longitude]);
        assert_eq!(ring[2], vec![cell.bottom_right.latitude, cell.bottom_right.longitude]);
        assert_eq!(ring[3], vec![cell.bottom_left.latitude, cell.bottom_left.longitude]);
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let corners = scenario_corners();
    let config = GridConfig::default();
    let first = GridOverlay::compute(&corners, config, AxisOrder::LatLon).unwrap();
    let second = GridOverlay::compute(&corners, config, AxisOrder::LatLon).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.source.to_json().unwrap(),
        second.source.to_json().unwrap()
    );
}

#[test]
fn test_invalid_configuration_fails_fast() {
    assert!(matches!(
        GridConfig::new(0, 1),
        Err(GridError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GridConfig::new(1, -2),
        Err(GridError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_concurrent_callers_agree() {
    let corners = CornerSet::default();
    let config = GridConfig::new(5, 8).unwrap();
    let expected = GridOverlay::compute(&corners, config, AxisOrder::LonLat).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                GridOverlay::compute(&corners, config, AxisOrder::LonLat).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
