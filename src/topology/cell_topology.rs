//! Topology: incidence derived from a top-dimension connectivity list.
//!
//! A [`Topology`] is built once from the connectivity of its top-dimension
//! cells and a [`ReferenceCell`]. All lower-dimensional cells (vertices,
//! edges, faces) are derived by walking the reference cell's sub-entity
//! pattern table over every top cell and de-duplicating sub-entities by the
//! unordered set of their point indices. The structure is immutable after
//! construction.
//!
//! # Ordering
//! - Top-dimension cells are the input rows, in input order.
//! - Vertices (dimension 0) are the distinct referenced indices, ascending.
//! - Intermediate cells appear in first-seen order and keep the vertex order
//!   of the pattern that first produced them.
//!
//! # Boundary
//! A `(D-1)`-cell is a boundary facet iff exactly one top cell references it.
//! Facets shared by more than two cells are non-manifold: they are logged and
//! treated as interior.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use itertools::Itertools;

use crate::mesh_error::MeshError;
use crate::topology::cell_type::ReferenceCell;

/// Cell incidence of a mesh, for every dimension `0..=D`.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    cell: ReferenceCell,
    /// `cells[k]` are the cells of dimension `k`, each a tuple of point indices.
    cells: Vec<Vec<Vec<usize>>>,
    /// `subentities[k][c]` are the indices into `cells[k]` of the `k`-cells of top cell `c`.
    subentities: Vec<Vec<Vec<usize>>>,
    /// Number of top cells referencing each `(D-1)`-cell.
    facet_refcount: Vec<usize>,
}

impl Topology {
    /// Build a topology from `conn` using the hypercube shape of dimension `dim`.
    pub fn hypercube(conn: Vec<Vec<usize>>, dim: usize) -> Result<Self, MeshError> {
        let cell = ReferenceCell::hypercube(dim).ok_or_else(|| {
            MeshError::InvalidTopology(format!("no hypercube reference cell of dimension {dim}"))
        })?;
        Self::new(conn, cell)
    }

    /// Build a topology from signed connectivity rows.
    ///
    /// # Errors
    /// `InvalidTopology` if any index is negative, plus everything
    /// [`Topology::hypercube`] reports.
    pub fn from_signed(conn: &[Vec<i64>], dim: usize) -> Result<Self, MeshError> {
        Self::hypercube(unsigned_connectivity(conn)?, dim)
    }

    /// Build a topology of top cells shaped like `cell`.
    ///
    /// # Errors
    /// - `InvalidTopology` if rows have inconsistent lengths.
    /// - `DimensionMismatch` if the common row length differs from the
    ///   vertex count of `cell`.
    pub fn new(conn: Vec<Vec<usize>>, cell: ReferenceCell) -> Result<Self, MeshError> {
        validate_rows(&conn, cell)?;
        let dim = cell.dimension();

        let mut cells = Vec::with_capacity(dim + 1);
        let mut subentities = Vec::with_capacity(dim + 1);
        let mut facet_refcount = Vec::new();

        for k in 0..dim {
            if k == 0 {
                let (verts, sub) = derive_vertices(&conn);
                cells.push(verts);
                subentities.push(sub);
            } else {
                let (entities, sub, counts) = derive_entities(&conn, cell, k);
                if k + 1 == dim {
                    facet_refcount = counts;
                }
                cells.push(entities);
                subentities.push(sub);
            }
        }
        if dim == 1 {
            facet_refcount = vertex_refcount(&conn, &subentities[0], cells[0].len());
        }
        subentities.push((0..conn.len()).map(|i| vec![i]).collect());
        cells.push(conn);

        for (facet, &count) in facet_refcount.iter().enumerate() {
            if count > 2 {
                log::warn!(
                    "Non-manifold facet detected: facet={:?} dim={} incident_cells={count}",
                    cells[dim - 1][facet],
                    dim - 1
                );
            }
        }
        log::debug!(
            "Built {cell:?} topology: cells per dimension {:?}",
            cells.iter().map(Vec::len).collect::<Vec<_>>()
        );

        Ok(Self {
            cell,
            cells,
            subentities,
            facet_refcount,
        })
    }

    /// Top dimension `D`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.cell.dimension()
    }

    /// Shape of the top-dimension cells.
    #[inline]
    pub fn reference_cell(&self) -> ReferenceCell {
        self.cell
    }

    /// Cells of dimension `k`, `0 <= k <= D`.
    pub fn cells_in_dim(&self, k: usize) -> Result<&[Vec<usize>], MeshError> {
        self.cells
            .get(k)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::out_of_range("dimension", k, self.cells.len()))
    }

    /// Number of cells of dimension `k`.
    pub fn num_cells_in_dim(&self, k: usize) -> Result<usize, MeshError> {
        self.cells_in_dim(k).map(<[_]>::len)
    }

    /// Number of point indices per cell of dimension `k`.
    pub fn cell_size_in_dim(&self, k: usize) -> Result<usize, MeshError> {
        self.cell
            .sub_entity_shape(k)
            .map(ReferenceCell::vertex_count)
            .ok_or_else(|| MeshError::out_of_range("dimension", k, self.cells.len()))
    }

    /// Top-dimension cells, i.e. the construction connectivity.
    #[inline]
    pub fn max_cells(&self) -> &[Vec<usize>] {
        &self.cells[self.dimension()]
    }

    /// For every top cell, the indices into `cells_in_dim(k)` of its `k`-cells.
    pub fn cell_subentities(&self, k: usize) -> Result<&[Vec<usize>], MeshError> {
        self.subentities
            .get(k)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::out_of_range("dimension", k, self.subentities.len()))
    }

    /// Number of top cells incident to each `(D-1)`-cell (empty for `D == 0`).
    #[inline]
    pub fn facet_incidence(&self) -> &[usize] {
        &self.facet_refcount
    }

    /// The `(D-1)`-dimensional topology of facets referenced by exactly one top cell.
    ///
    /// # Errors
    /// `NotImplemented` for a 0-dimensional topology.
    pub fn boundary(&self) -> Result<Topology, MeshError> {
        let facet_cell = self
            .cell
            .facet_shape()
            .ok_or(MeshError::NotImplemented("boundary of a 0-dimensional topology"))?;
        let facets = &self.cells[self.dimension() - 1];
        let conn: Vec<Vec<usize>> = facets
            .iter()
            .zip(&self.facet_refcount)
            .filter(|&(_, &count)| count == 1)
            .map(|(facet, _)| facet.clone())
            .collect();
        log::debug!(
            "Boundary of {:?} topology: {} of {} facets",
            self.cell,
            conn.len(),
            facets.len()
        );
        Topology::new(conn, facet_cell)
    }

    /// A topology of the listed top cells only, in the listed order.
    ///
    /// # Errors
    /// `IndexOutOfRange` if any index does not name a top cell.
    pub fn subset(&self, indices: &[usize]) -> Result<Topology, MeshError> {
        let top = self.max_cells();
        let conn = indices
            .iter()
            .map(|&i| {
                top.get(i)
                    .cloned()
                    .ok_or_else(|| MeshError::out_of_range("cell", i, top.len()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("Subset of {} cells out of {}", conn.len(), top.len());
        Topology::new(conn, self.cell)
    }

    /// Concatenate the top cells of `self` and `other` and re-derive incidence.
    ///
    /// # Errors
    /// `DimensionMismatch` if the two topologies have different top dimensions.
    pub fn combine(&self, other: &Topology) -> Result<Topology, MeshError> {
        if self.cell != other.cell {
            return Err(MeshError::mismatch(
                "topological dimension",
                self.dimension(),
                other.dimension(),
            ));
        }
        let conn = self
            .max_cells()
            .iter()
            .chain(other.max_cells())
            .cloned()
            .collect();
        Topology::new(conn, self.cell)
    }
}

/// Convert signed connectivity rows, rejecting negative indices.
pub(crate) fn unsigned_connectivity(conn: &[Vec<i64>]) -> Result<Vec<Vec<usize>>, MeshError> {
    conn.iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.iter()
                .map(|&v| {
                    usize::try_from(v).map_err(|_| {
                        MeshError::InvalidTopology(format!(
                            "negative point index {v} in connectivity row {row}"
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn validate_rows(conn: &[Vec<usize>], cell: ReferenceCell) -> Result<(), MeshError> {
    let Some(first) = conn.first() else {
        return Ok(());
    };
    if let Some((row, bad)) = conn.iter().enumerate().find(|(_, c)| c.len() != first.len()) {
        return Err(MeshError::InvalidTopology(format!(
            "connectivity row {row} has {} entries, row 0 has {}",
            bad.len(),
            first.len()
        )));
    }
    if first.len() != cell.vertex_count() {
        return Err(MeshError::mismatch(
            "cell size",
            cell.vertex_count(),
            first.len(),
        ));
    }
    Ok(())
}

fn derive_vertices(conn: &[Vec<usize>]) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let verts: Vec<usize> = conn.iter().flatten().copied().sorted_unstable().dedup().collect();
    let position: HashMap<usize, usize> = verts.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let sub = conn
        .iter()
        .map(|row| row.iter().map(|v| position[v]).collect())
        .collect();
    (verts.into_iter().map(|v| vec![v]).collect(), sub)
}

fn derive_entities(
    conn: &[Vec<usize>],
    cell: ReferenceCell,
    k: usize,
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>, Vec<usize>) {
    let patterns = cell.sub_entities(k);
    let mut index: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut entities: Vec<Vec<usize>> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut sub = Vec::with_capacity(conn.len());

    for row in conn {
        let mut local = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let entity: Vec<usize> = pattern.iter().map(|&v| row[v]).collect();
            let key: Vec<usize> = entity.iter().copied().sorted_unstable().collect();
            let id = match index.entry(key) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    entities.push(entity);
                    counts.push(0);
                    *e.insert(entities.len() - 1)
                }
            };
            counts[id] += 1;
            local.push(id);
        }
        sub.push(local);
    }
    (entities, sub, counts)
}

// Facets of a 1-D topology are its vertices.
fn vertex_refcount(conn: &[Vec<usize>], sub: &[Vec<usize>], nverts: usize) -> Vec<usize> {
    let mut counts = vec![0; nverts];
    for (row, local) in conn.iter().zip(sub) {
        for (_, &id) in row.iter().zip(local).unique_by(|(v, _)| **v) {
            counts[id] += 1;
        }
    }
    counts
}
