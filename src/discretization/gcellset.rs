//! Geometric cell sets: a [`Topology`] plus element-type behavior.
//!
//! A [`GCellSet`] couples the connectivity of a collection of same-shaped
//! cells with their shape functions and the parametric-to-spatial Jacobian
//! calculus. What "the Jacobian" means depends on the dimension the caller
//! integrates in, not only on the cell shape: a line can be a rod (curve),
//! the generator of an axisymmetric surface, or the edge of a plate of some
//! thickness. [`GCellSet::jacobian_in_dim`] therefore takes the integration
//! dimension as an argument and dispatches on `(manifold dim, integration dim)`:
//!
//! | manifold | dim 0 | dim 1 | dim 2 | dim 3 |
//! |---|---|---|---|---|
//! | 0 (P1) | 1 | `o` | `o` | `2πr·o` or `o` |
//! | 1 (L2) | - | `‖J‖` | `‖J‖·2πr` or `‖J‖·o` | `‖J‖·2πr·o` or `‖J‖·o` |
//! | 2 (Q4) | - | - | `det J` or `‖J₀×J₁‖` | `S·2πr` or `S·o` |
//! | 3 (H8) | - | - | - | `det J` |
//!
//! where `o` is the other dimension, `r` the first spatial coordinate of the
//! integration point, and the first alternative applies to axisymmetric sets.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::discretization::element_type::ElementType;
use crate::discretization::other_dimension::OtherDimension;
use crate::discretization::quadrature::QuadratureRule;
use crate::geometry::linalg;
use crate::geometry::nodes::NodeSet;
use crate::mesh_error::MeshError;
use crate::topology::cell_topology::{Topology, unsigned_connectivity};

/// Content-derived identifier of a cell set.
///
/// Equal for sets with the same element type, connectivity, axisymmetry
/// flag and constant other dimension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellSetId(u64);

impl CellSetId {
    /// Raw hash value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Option record for building a cell set from loosely typed input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GCellSetOptions {
    /// Connectivity rows (signed so that malformed input can be reported).
    pub conn: Vec<Vec<i64>>,
    /// Constant other dimension; `1.0` when absent.
    pub other_dimension: Option<f64>,
    /// Axisymmetric modeling flag.
    pub axis_symm: bool,
}

/// A set of cells of one element type.
#[derive(Clone, Debug)]
pub struct GCellSet {
    element_type: ElementType,
    topology: Topology,
    other_dimension: OtherDimension,
    axis_symm: bool,
    id: CellSetId,
}

static_assertions::assert_impl_all!(GCellSet: Send, Sync);
static_assertions::assert_impl_all!(Topology: Send, Sync);

impl GCellSet {
    /// Build a set with the default other dimension (`1.0`), not axisymmetric.
    pub fn new(element_type: ElementType, conn: Vec<Vec<usize>>) -> Result<Self, MeshError> {
        Self::with_options(element_type, conn, OtherDimension::default(), false)
    }

    /// Build a set with an explicit other dimension and axisymmetry flag.
    pub fn with_options(
        element_type: ElementType,
        conn: Vec<Vec<usize>>,
        other_dimension: OtherDimension,
        axis_symm: bool,
    ) -> Result<Self, MeshError> {
        let topology = Topology::new(conn, element_type.reference_cell())?;
        Self::from_topology(element_type, topology, other_dimension, axis_symm)
    }

    /// Build a set from an option record.
    ///
    /// # Errors
    /// `InvalidTopology` for negative indices; `InvalidInput` for an other
    /// dimension that is not finite and positive.
    pub fn from_options(
        element_type: ElementType,
        options: &GCellSetOptions,
    ) -> Result<Self, MeshError> {
        let other_dimension = match options.other_dimension {
            Some(value) if !(value.is_finite() && value > 0.0) => {
                return Err(MeshError::InvalidInput(format!(
                    "other dimension must be finite and positive, got {value}"
                )));
            }
            Some(value) => OtherDimension::Constant(value),
            None => OtherDimension::default(),
        };
        let conn = unsigned_connectivity(&options.conn)?;
        Self::with_options(element_type, conn, other_dimension, options.axis_symm)
    }

    /// Wrap an existing topology.
    ///
    /// # Errors
    /// `DimensionMismatch` if the topology's dimension or top cell size
    /// disagrees with `element_type`.
    pub fn from_topology(
        element_type: ElementType,
        topology: Topology,
        other_dimension: OtherDimension,
        axis_symm: bool,
    ) -> Result<Self, MeshError> {
        if topology.dimension() != element_type.dim() {
            return Err(MeshError::mismatch(
                "topology dimension",
                element_type.dim(),
                topology.dimension(),
            ));
        }
        let size = topology.cell_size_in_dim(topology.dimension())?;
        if size != element_type.cell_size() {
            return Err(MeshError::mismatch("cell size", element_type.cell_size(), size));
        }
        let id = content_id(element_type, &topology, &other_dimension, axis_symm);
        Ok(Self {
            element_type,
            topology,
            other_dimension,
            axis_symm,
            id,
        })
    }

    /// Element type of the cells.
    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Manifold dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.element_type.dim()
    }

    /// Nodes per cell.
    #[inline]
    pub fn cell_size(&self) -> usize {
        self.element_type.cell_size()
    }

    /// Number of cells.
    #[inline]
    pub fn count(&self) -> usize {
        self.conn().len()
    }

    /// Connectivity of the cells, one row per cell.
    #[inline]
    pub fn conn(&self) -> &[Vec<usize>] {
        self.topology.max_cells()
    }

    /// Underlying topology.
    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Other dimension (thickness, area, or a function thereof).
    #[inline]
    pub fn other_dimension(&self) -> &OtherDimension {
        &self.other_dimension
    }

    /// Axisymmetric modeling flag.
    #[inline]
    pub fn axis_symm(&self) -> bool {
        self.axis_symm
    }

    /// Content-derived identifier.
    #[inline]
    pub fn id(&self) -> CellSetId {
        self.id
    }

    /// Parametric coordinates of the cell centre.
    pub fn centroid_parametric(&self) -> Vec<f64> {
        self.element_type.parametric_centroid()
    }

    /// Shape-function values at `param`, `n x 1`.
    pub fn bfun(&self, param: &[f64]) -> Result<DMatrix<f64>, MeshError> {
        self.element_type.bfun(param)
    }

    /// Parametric shape-function derivatives at `param`, `n x dim`.
    pub fn bfundpar(&self, param: &[f64]) -> Result<DMatrix<f64>, MeshError> {
        self.element_type.bfundpar(param)
    }

    /// Jacobian matrix `xᵗ · nder` (`sdim x dim`).
    ///
    /// `nder` is `n x dim` and `x` holds one row of coordinates per cell node.
    ///
    /// # Errors
    /// `InvalidInput` if the shapes do not fit the element type.
    pub fn jacobian_matrix(
        &self,
        nder: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, MeshError> {
        if nder.shape() != (self.cell_size(), self.dim()) {
            return Err(MeshError::InvalidInput(format!(
                "derivative matrix is {:?}, expected {:?}",
                nder.shape(),
                (self.cell_size(), self.dim())
            )));
        }
        if x.nrows() != self.cell_size() {
            return Err(MeshError::InvalidInput(format!(
                "coordinate matrix has {} rows, expected {}",
                x.nrows(),
                self.cell_size()
            )));
        }
        Ok(x.transpose() * nder)
    }

    /// Spatial shape-function derivatives `nder · J⁻¹`.
    ///
    /// # Errors
    /// `SingularMatrix` for a degenerate or collapsed cell; `InvalidInput`
    /// when the Jacobian is not square (cell embedded in a higher dimension).
    pub fn bfundsp(
        &self,
        nder: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, MeshError> {
        let j = self.jacobian_matrix(nder, x)?;
        Ok(nder * linalg::inverse(&j)?)
    }

    /// Jacobian of a point cell (always `1`).
    pub fn jacobian_point(
        &self,
        conn: &[usize],
        n: &DMatrix<f64>,
        j: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<f64, MeshError> {
        self.jacobian_in_dim(conn, n, j, x, 0)
    }

    /// Length scale factor for integrating along a curve.
    pub fn jacobian_curve(
        &self,
        conn: &[usize],
        n: &DMatrix<f64>,
        j: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<f64, MeshError> {
        self.jacobian_in_dim(conn, n, j, x, 1)
    }

    /// Area scale factor for integrating over a surface.
    pub fn jacobian_surface(
        &self,
        conn: &[usize],
        n: &DMatrix<f64>,
        j: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<f64, MeshError> {
        self.jacobian_in_dim(conn, n, j, x, 2)
    }

    /// Volume scale factor for integrating over a volume.
    pub fn jacobian_volume(
        &self,
        conn: &[usize],
        n: &DMatrix<f64>,
        j: &DMatrix<f64>,
        x: &DMatrix<f64>,
    ) -> Result<f64, MeshError> {
        self.jacobian_in_dim(conn, n, j, x, 3)
    }

    /// Scale factor for integrating in dimension `dim`.
    ///
    /// `conn` is the cell's connectivity, `n` the shape-function values and
    /// `j` the Jacobian matrix at the integration point, `x` the nodal
    /// coordinates of the cell.
    ///
    /// # Errors
    /// `UnsupportedDimension` when `dim` is below the manifold dimension or
    /// above 3.
    pub fn jacobian_in_dim(
        &self,
        conn: &[usize],
        n: &DMatrix<f64>,
        j: &DMatrix<f64>,
        x: &DMatrix<f64>,
        dim: usize,
    ) -> Result<f64, MeshError> {
        let manifold = self.dim();
        let other = || self.other_dimension.evaluate(conn, n, x);
        let ring = || -> Result<f64, MeshError> { Ok(2.0 * PI * radial_coordinate(n, x)?) };
        match (manifold, dim) {
            (0, 0) => Ok(1.0),
            (0, 1) | (0, 2) => Ok(other()),
            (0, 3) => {
                if self.axis_symm {
                    Ok(ring()? * other())
                } else {
                    Ok(other())
                }
            }
            (1, 1) => tangent_length(j),
            (1, 2) => {
                let curve = tangent_length(j)?;
                if self.axis_symm {
                    Ok(curve * ring()?)
                } else {
                    Ok(curve * other())
                }
            }
            (1, 3) => {
                let curve = tangent_length(j)?;
                if self.axis_symm {
                    Ok(curve * ring()? * other())
                } else {
                    Ok(curve * other())
                }
            }
            (2, 2) => surface_jacobian(j),
            (2, 3) => {
                let surface = surface_jacobian(j)?;
                if self.axis_symm {
                    Ok(surface * ring()?)
                } else {
                    Ok(surface * other())
                }
            }
            (3, 3) => {
                if j.shape() != (3, 3) {
                    return Err(MeshError::InvalidInput(format!(
                        "volume Jacobian must be 3x3, got {:?}",
                        j.shape()
                    )));
                }
                linalg::det(j)
            }
            _ => Err(MeshError::UnsupportedDimension {
                manifold,
                requested: dim,
            }),
        }
    }

    /// Boundary cell set: the facets referenced by exactly one cell.
    ///
    /// The boundary keeps this set's other dimension and axisymmetry flag.
    ///
    /// # Errors
    /// `NotImplemented` for element types without a boundary type.
    pub fn boundary(&self) -> Result<GCellSet, MeshError> {
        let boundary_type = self
            .element_type
            .boundary_type()
            .ok_or(MeshError::NotImplemented("boundary of a point cell set"))?;
        let topology = self.topology.boundary()?;
        GCellSet::from_topology(
            boundary_type,
            topology,
            self.other_dimension.clone(),
            self.axis_symm,
        )
    }

    /// A new set of the listed cells, in the listed order.
    ///
    /// # Errors
    /// `IndexOutOfRange` if an index does not name a cell.
    pub fn subset(&self, indices: &[usize]) -> Result<GCellSet, MeshError> {
        let topology = self.topology.subset(indices)?;
        GCellSet::from_topology(
            self.element_type,
            topology,
            self.other_dimension.clone(),
            self.axis_symm,
        )
    }

    /// Concatenate two sets of the same element type.
    ///
    /// The result keeps `self`'s other dimension and axisymmetry flag.
    ///
    /// # Errors
    /// `DimensionMismatch` if the element types differ.
    pub fn cat(&self, other: &GCellSet) -> Result<GCellSet, MeshError> {
        if self.element_type != other.element_type {
            return Err(MeshError::mismatch(
                "cell size",
                self.cell_size(),
                other.cell_size(),
            ));
        }
        log::trace!("Concatenating {} and {} cells", self.count(), other.count());
        let topology = self.topology.combine(&other.topology)?;
        GCellSet::from_topology(
            self.element_type,
            topology,
            self.other_dimension.clone(),
            self.axis_symm,
        )
    }

    /// Triangulation for visualization: each quad splits along its `2-0`
    /// diagonal into `(0, 1, 2)` and `(2, 3, 0)`; other types yield none.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        match self.element_type {
            ElementType::Q4 => self
                .conn()
                .iter()
                .flat_map(|c| [[c[0], c[1], c[2]], [c[2], c[3], c[0]]])
                .collect(),
            ElementType::P1 | ElementType::L2 | ElementType::H8 => Vec::new(),
        }
    }

    /// Integrate the `dim`-Jacobian over all cells: length, area or volume
    /// of the set (including other-dimension and axisymmetric factors).
    pub fn measure<G: NodeSet>(
        &self,
        geometry: &G,
        rule: &QuadratureRule,
        dim: usize,
    ) -> Result<f64, MeshError> {
        let mut total = 0.0;
        for conn in self.conn() {
            let x = geometry.gather(conn)?;
            for (point, weight) in rule.iter() {
                let n = self.bfun(point)?;
                let nder = self.bfundpar(point)?;
                let j = self.jacobian_matrix(&nder, &x)?;
                total += weight * self.jacobian_in_dim(conn, &n, &j, &x, dim)?;
            }
        }
        Ok(total)
    }
}

/// First spatial coordinate of the point with shape-function values `n`.
fn radial_coordinate(n: &DMatrix<f64>, x: &DMatrix<f64>) -> Result<f64, MeshError> {
    if n.nrows() != x.nrows() || x.ncols() == 0 {
        return Err(MeshError::InvalidInput(format!(
            "cannot interpolate {} nodal rows with {} shape functions",
            x.nrows(),
            n.nrows()
        )));
    }
    Ok((x.transpose() * n)[(0, 0)])
}

fn tangent_length(j: &DMatrix<f64>) -> Result<f64, MeshError> {
    if j.ncols() != 1 {
        return Err(MeshError::mismatch("tangent columns", 1, j.ncols()));
    }
    Ok(j.column(0).norm())
}

fn surface_jacobian(j: &DMatrix<f64>) -> Result<f64, MeshError> {
    if j.ncols() != 2 {
        return Err(MeshError::mismatch("tangent columns", 2, j.ncols()));
    }
    if j.nrows() == 2 {
        linalg::det(j)
    } else {
        linalg::cross_norm(j)
    }
}

fn content_id(
    element_type: ElementType,
    topology: &Topology,
    other_dimension: &OtherDimension,
    axis_symm: bool,
) -> CellSetId {
    let mut hasher = DefaultHasher::new();
    element_type.hash(&mut hasher);
    topology.max_cells().hash(&mut hasher);
    axis_symm.hash(&mut hasher);
    other_dimension.as_constant().map(f64::to_bits).hash(&mut hasher);
    CellSetId(hasher.finish())
}
