use std::collections::{BTreeMap, BTreeSet};

use fe_kernel::mesh_error::MeshError;
use fe_kernel::topology::{ReferenceCell, Topology};
use proptest::prelude::*;

// Two unit hexahedra side by side along x:
// bottom layer 0 1 2 / 3 4 5 at z = 0, top layer 6..11 at z = 1.
fn two_hexes() -> Vec<Vec<usize>> {
    vec![vec![0, 1, 4, 3, 6, 7, 10, 9], vec![1, 2, 5, 4, 7, 8, 11, 10]]
}

fn hex_coords(node: usize) -> [f64; 3] {
    let layer = node / 6;
    let i = node % 6;
    [(i % 3) as f64, (i / 3) as f64, layer as f64]
}

#[test]
fn top_dimension_is_the_input_connectivity() {
    let conn = vec![vec![3, 1, 0, 2], vec![2, 0, 4, 5]];
    let topo = Topology::hypercube(conn.clone(), 2).unwrap();
    assert_eq!(topo.cells_in_dim(2).unwrap(), conn.as_slice());
    assert_eq!(topo.max_cells(), conn.as_slice());
    assert_eq!(
        topo.cells_in_dim(0).unwrap(),
        &[vec![0], vec![1], vec![2], vec![3], vec![4], vec![5]]
    );
}

#[test]
fn single_quad_boundary_has_four_sides() {
    let topo = Topology::hypercube(vec![vec![0, 1, 2, 3]], 2).unwrap();
    assert_eq!(topo.facet_incidence(), &[1, 1, 1, 1]);
    let boundary = topo.boundary().unwrap();
    assert_eq!(boundary.dimension(), 1);
    assert_eq!(
        boundary.max_cells(),
        &[vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 0]]
    );
}

#[test]
fn hex_pair_counts_and_shared_face() {
    let topo = Topology::hypercube(two_hexes(), 3).unwrap();
    assert_eq!(topo.num_cells_in_dim(0).unwrap(), 12);
    assert_eq!(topo.num_cells_in_dim(1).unwrap(), 20);
    assert_eq!(topo.num_cells_in_dim(2).unwrap(), 11);
    assert_eq!(topo.facet_incidence().iter().filter(|&&c| c == 2).count(), 1);

    let faces = topo.cell_subentities(2).unwrap();
    let shared: Vec<usize> = faces[0]
        .iter()
        .filter(|f| faces[1].contains(f))
        .copied()
        .collect();
    assert_eq!(shared.len(), 1);
    let mut key = topo.cells_in_dim(2).unwrap()[shared[0]].clone();
    key.sort_unstable();
    assert_eq!(key, vec![1, 4, 7, 10]);

    let boundary = topo.boundary().unwrap();
    assert_eq!(boundary.reference_cell(), ReferenceCell::Quadrilateral);
    assert_eq!(boundary.num_cells_in_dim(2).unwrap(), 10);
    assert!(
        boundary
            .max_cells()
            .iter()
            .all(|f| !(f.contains(&1) && f.contains(&4) && f.contains(&7) && f.contains(&10)))
    );
}

#[test]
fn hex_boundary_faces_point_outward() {
    let topo = Topology::hypercube(two_hexes(), 3).unwrap();
    let boundary = topo.boundary().unwrap();
    let mesh_centre = [1.0, 0.5, 0.5];
    for face in boundary.max_cells() {
        let p: Vec<[f64; 3]> = face.iter().map(|&n| hex_coords(n)).collect();
        let a = [p[1][0] - p[0][0], p[1][1] - p[0][1], p[1][2] - p[0][2]];
        let b = [p[3][0] - p[0][0], p[3][1] - p[0][1], p[3][2] - p[0][2]];
        let normal = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];
        let centre: Vec<f64> = (0..3)
            .map(|k| p.iter().map(|q| q[k]).sum::<f64>() / 4.0 - mesh_centre[k])
            .collect();
        let dot: f64 = normal.iter().zip(&centre).map(|(n, c)| n * c).sum();
        assert!(dot > 0.0, "face {face:?} points inward");
    }
}

#[test]
fn closed_surface_has_empty_boundary() {
    let hex = Topology::hypercube(vec![(0..8).collect()], 3).unwrap();
    let skin = hex.boundary().unwrap();
    assert_eq!(skin.num_cells_in_dim(2).unwrap(), 6);
    assert!(skin.facet_incidence().iter().all(|&c| c == 2));
    let rim = skin.boundary().unwrap();
    assert_eq!(rim.dimension(), 1);
    assert!(rim.max_cells().is_empty());
}

#[test]
fn line_chain_boundary_is_its_ends() {
    let topo = Topology::hypercube(vec![vec![0, 1], vec![1, 2], vec![2, 3]], 1).unwrap();
    let ends = topo.boundary().unwrap();
    assert_eq!(ends.dimension(), 0);
    assert_eq!(ends.max_cells(), &[vec![0], vec![3]]);
    assert!(matches!(
        ends.boundary(),
        Err(MeshError::NotImplemented(_))
    ));
}

#[test]
fn malformed_connectivity() {
    assert!(matches!(
        Topology::hypercube(vec![vec![0, 1, 2, 3], vec![1, 2, 3]], 2),
        Err(MeshError::InvalidTopology(_))
    ));
    assert!(matches!(
        Topology::hypercube(vec![vec![0, 1, 2]], 2),
        Err(MeshError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        Topology::from_signed(&[vec![0, -1]], 1),
        Err(MeshError::InvalidTopology(_))
    ));
    assert!(Topology::hypercube(vec![vec![0]], 4).is_err());
}

#[test]
fn subset_keeps_order_and_rejects_bad_indices() {
    let topo = Topology::hypercube(vec![vec![0, 1], vec![1, 2], vec![2, 3]], 1).unwrap();
    let sub = topo.subset(&[2, 0]).unwrap();
    assert_eq!(sub.max_cells(), &[vec![2, 3], vec![0, 1]]);
    assert!(matches!(
        topo.subset(&[3]),
        Err(MeshError::IndexOutOfRange { what: "cell", index: 3, len: 3 })
    ));
}

/// Cells of a structured `nx x ny` quad grid or `nx x ny x nz` hex block.
fn structured_cells(dim: usize, n: [usize; 3]) -> Vec<Vec<usize>> {
    let id = |i: usize, j: usize, k: usize| i + (n[0] + 1) * (j + (n[1] + 1) * k);
    let nz = if dim == 3 { n[2] } else { 1 };
    let mut conn = Vec::new();
    for k in 0..nz {
        for j in 0..n[1] {
            for i in 0..n[0] {
                let bottom = vec![id(i, j, k), id(i + 1, j, k), id(i + 1, j + 1, k), id(i, j + 1, k)];
                if dim == 2 {
                    conn.push(bottom);
                } else {
                    let top = [id(i, j, k + 1), id(i + 1, j, k + 1), id(i + 1, j + 1, k + 1), id(i, j + 1, k + 1)];
                    conn.push(bottom.into_iter().chain(top).collect());
                }
            }
        }
    }
    conn
}

fn sorted_key(cell: &[usize]) -> Vec<usize> {
    let mut key = cell.to_vec();
    key.sort_unstable();
    key
}

/// Facet keys referenced by exactly one cell, counted cell by cell.
fn single_use_facets(cell: ReferenceCell, conn: &[Vec<usize>]) -> BTreeSet<Vec<usize>> {
    let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    for row in conn {
        for pattern in cell.sub_entities(cell.dimension() - 1) {
            let facet: Vec<usize> = pattern.iter().map(|&v| row[v]).collect();
            *counts.entry(sorted_key(&facet)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(key, _)| key)
        .collect()
}

fn pruned_block() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (2usize..=3, 1usize..=4, 1usize..=4, 1usize..=3).prop_flat_map(|(dim, nx, ny, nz)| {
        let conn = structured_cells(dim, [nx, ny, nz]);
        let len = conn.len();
        (
            Just(dim),
            Just(conn),
            prop::collection::vec(any::<bool>(), len),
        )
            .prop_map(|(dim, conn, keep)| {
                let kept: Vec<Vec<usize>> = conn
                    .into_iter()
                    .zip(keep)
                    .filter(|(_, k)| *k)
                    .map(|(c, _)| c)
                    .collect();
                (dim, kept)
            })
    })
}

proptest! {
    #[test]
    fn boundary_is_exactly_the_single_use_facets((dim, conn) in pruned_block()) {
        let topo = Topology::hypercube(conn.clone(), dim).unwrap();
        prop_assert_eq!(topo.max_cells(), conn.as_slice());

        let boundary = topo.boundary().unwrap();
        let found: Vec<Vec<usize>> = boundary.max_cells().iter().map(|f| sorted_key(f)).collect();
        let unique: BTreeSet<Vec<usize>> = found.iter().cloned().collect();
        prop_assert_eq!(unique.len(), found.len());
        prop_assert_eq!(unique, single_use_facets(topo.reference_cell(), &conn));
    }
}
