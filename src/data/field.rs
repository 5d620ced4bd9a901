//! Field: nodal values with prescribed components and equation numbers.
//!
//! A [`Field`] holds `nfens` nodes with `dim` components each, stored
//! row-major. Components may be prescribed (essential boundary conditions);
//! the free ones receive dense equation numbers once
//! [`Field::number_equations`] runs. Prescribing or releasing a component
//! invalidates the numbering, and every call that needs equation numbers
//! fails with [`MeshError::EquationsNotNumbered`] until the caller renumbers.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::data::bc::{EssentialBc, apply_essential_bcs};
use crate::data::numbering::{EquationNumbers, Numbering};
use crate::geometry::nodes::NodeSet;
use crate::mesh_error::MeshError;

/// Option record for building a field from loosely typed input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOptions {
    /// Number of nodes.
    pub nfens: usize,
    /// Components per node.
    pub dim: usize,
    /// Initial values, one row per node; zeros when absent.
    pub values: Option<Vec<Vec<f64>>>,
    /// Essential boundary conditions applied after construction.
    pub ebcs: Vec<EssentialBc>,
}

/// Right-hand side of a point-wise field operation.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// Another field of the same shape, combined node by node.
    Field(&'a Field),
    /// A scalar applied to every component.
    Scalar(f64),
    /// A `dim`-vector applied to every node.
    Vector(&'a [f64]),
}

impl<'a> From<&'a Field> for Operand<'a> {
    fn from(field: &'a Field) -> Self {
        Operand::Field(field)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(values: &'a [f64]) -> Self {
        Operand::Vector(values)
    }
}

/// Nodal field with prescribed components and equation numbering.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    dim: usize,
    values: Vec<f64>,
    prescribed: Vec<bool>,
    prescribed_values: Vec<f64>,
    numbering: Numbering,
}

static_assertions::assert_impl_all!(Field: Send, Sync);
static_assertions::assert_impl_all!(EquationNumbers: Send, Sync);

#[allow(clippy::should_implement_trait)]
impl Field {
    /// A field of `nfens` nodes with `dim` zero components each.
    ///
    /// # Errors
    /// `InvalidInput` if `dim == 0`.
    pub fn zeros(nfens: usize, dim: usize) -> Result<Self, MeshError> {
        if dim == 0 {
            return Err(MeshError::InvalidInput(
                "field must have at least one component".into(),
            ));
        }
        let len = nfens.checked_mul(dim).ok_or_else(|| {
            MeshError::InvalidInput(format!("field of {nfens} x {dim} components is too large"))
        })?;
        Ok(Self {
            dim,
            values: vec![0.0; len],
            prescribed: vec![false; len],
            prescribed_values: vec![0.0; len],
            numbering: Numbering::Unnumbered,
        })
    }

    /// A field with one row of values per node.
    ///
    /// # Errors
    /// `InvalidInput` for no rows or empty rows; `DimensionMismatch` for
    /// rows of different lengths.
    pub fn from_values(rows: &[Vec<f64>]) -> Result<Self, MeshError> {
        let dim = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| MeshError::InvalidInput("field needs at least one value row".into()))?;
        let mut field = Self::zeros(rows.len(), dim)?;
        for (node, row) in rows.iter().enumerate() {
            field.set_at(node, row)?;
        }
        Ok(field)
    }

    /// A geometry field holding the coordinates of `nodes`.
    pub fn from_nodes<N: NodeSet + ?Sized>(nodes: &N) -> Result<Self, MeshError> {
        let mut field = Self::zeros(nodes.count(), nodes.dim())?;
        for node in 0..nodes.count() {
            field.set_at(node, nodes.xyz_at(node)?)?;
        }
        Ok(field)
    }

    /// Build from an option record and apply its boundary conditions.
    ///
    /// The field is returned unnumbered.
    ///
    /// # Errors
    /// `InvalidInput` for `dim == 0` or a value table whose row count is not
    /// `nfens`; `DimensionMismatch` for a row that is not `dim` long;
    /// `IndexOutOfRange` for conditions outside the field.
    pub fn from_options(options: &FieldOptions) -> Result<Self, MeshError> {
        let mut field = Self::zeros(options.nfens, options.dim)?;
        if let Some(rows) = &options.values {
            if rows.len() != options.nfens {
                return Err(MeshError::InvalidInput(format!(
                    "value table has {} rows for {} nodes",
                    rows.len(),
                    options.nfens
                )));
            }
            for (node, row) in rows.iter().enumerate() {
                field.set_at(node, row)?;
            }
        }
        apply_essential_bcs(&mut field, &options.ebcs)?;
        Ok(field)
    }

    /// Number of nodes.
    #[inline]
    pub fn nfens(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Components per node.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// All values, row-major.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values of node `node`.
    pub fn at(&self, node: usize) -> Result<&[f64], MeshError> {
        let range = self.node_range(node)?;
        Ok(&self.values[range])
    }

    /// Overwrite the values of node `node`.
    ///
    /// Prescribed components are overwritten too; use
    /// [`Field::apply_prescribed_values`] to restore them.
    ///
    /// # Errors
    /// `IndexOutOfRange` for a bad node; `DimensionMismatch` if `row` is not
    /// `dim` long.
    pub fn set_at(&mut self, node: usize, row: &[f64]) -> Result<(), MeshError> {
        let range = self.node_range(node)?;
        if row.len() != self.dim {
            return Err(MeshError::mismatch("node values", self.dim, row.len()));
        }
        self.values[range].copy_from_slice(row);
        Ok(())
    }

    /// Prescribe `value` on `(node, component)` and drop the numbering.
    pub fn set_ebc(&mut self, node: usize, component: usize, value: f64) -> Result<(), MeshError> {
        let k = self.flat_index(node, component)?;
        self.prescribed[k] = true;
        self.prescribed_values[k] = value;
        self.numbering = Numbering::Unnumbered;
        Ok(())
    }

    /// Release `component` of `node`, or all of its components for `None`,
    /// and drop the numbering.
    pub fn clear_ebc(&mut self, node: usize, component: Option<usize>) -> Result<(), MeshError> {
        let range = match component {
            Some(c) => {
                let k = self.flat_index(node, c)?;
                k..k + 1
            }
            None => self.node_range(node)?,
        };
        for k in range {
            self.prescribed[k] = false;
            self.prescribed_values[k] = 0.0;
        }
        self.numbering = Numbering::Unnumbered;
        Ok(())
    }

    /// Prescribe a list of essential boundary conditions.
    ///
    /// Validation happens before any change; see [`apply_essential_bcs`].
    pub fn apply_ebcs(&mut self, ebcs: &[EssentialBc]) -> Result<(), MeshError> {
        apply_essential_bcs(self, ebcs)
    }

    /// Whether `(node, component)` is prescribed.
    pub fn is_prescribed(&self, node: usize, component: usize) -> Result<bool, MeshError> {
        Ok(self.prescribed[self.flat_index(node, component)?])
    }

    /// Prescribed value of `(node, component)`, if it is prescribed.
    pub fn prescribed_value(&self, node: usize, component: usize) -> Result<Option<f64>, MeshError> {
        let k = self.flat_index(node, component)?;
        Ok(self.prescribed[k].then_some(self.prescribed_values[k]))
    }

    /// Number of prescribed components.
    pub fn prescribed_count(&self) -> usize {
        self.prescribed.iter().filter(|&&p| p).count()
    }

    /// Copy every prescribed value into the value table.
    pub fn apply_prescribed_values(&mut self) {
        for ((value, &fixed), &prescribed) in self
            .values
            .iter_mut()
            .zip(&self.prescribed)
            .zip(&self.prescribed_values)
        {
            if fixed {
                *value = prescribed;
            }
        }
    }

    /// Assign equation numbers to the free components.
    ///
    /// Returns the number of free equations.
    pub fn number_equations(&mut self) -> usize {
        let numbers = EquationNumbers::assign(self.dim, &self.prescribed);
        let neqns = numbers.neqns();
        log::debug!(
            "Numbered field of {} nodes x {}: {neqns} free, {} prescribed",
            self.nfens(),
            self.dim,
            self.prescribed.len() - neqns
        );
        self.numbering = Numbering::Numbered(numbers);
        neqns
    }

    /// Whether equation numbers are current.
    #[inline]
    pub fn is_numbered(&self) -> bool {
        self.numbering.is_numbered()
    }

    /// Numbering state.
    #[inline]
    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    /// Number of free equations.
    ///
    /// # Errors
    /// `EquationsNotNumbered` before [`Field::number_equations`].
    pub fn neqns(&self) -> Result<usize, MeshError> {
        self.numbering.equations().map(EquationNumbers::neqns)
    }

    /// Equation number of `(node, component)`, `None` if prescribed.
    ///
    /// # Errors
    /// `IndexOutOfRange` for a bad node or component, otherwise
    /// `EquationsNotNumbered` before [`Field::number_equations`].
    pub fn eqnum(&self, node: usize, component: usize) -> Result<Option<usize>, MeshError> {
        let k = self.flat_index(node, component)?;
        Ok(self.numbering.equations()?.as_slice()[k])
    }

    /// Equation numbers of the nodes in `conn`, node-then-component.
    pub fn gather_eqnums_vector(&self, conn: &[usize]) -> Result<Vec<Option<usize>>, MeshError> {
        let eqnums = self.numbering.equations()?.as_slice();
        let mut out = Vec::with_capacity(conn.len() * self.dim);
        for &node in conn {
            out.extend_from_slice(&eqnums[self.node_range(node)?]);
        }
        Ok(out)
    }

    /// Values of the nodes in `conn`, one row per node.
    pub fn gather_values_matrix(&self, conn: &[usize]) -> Result<DMatrix<f64>, MeshError> {
        let mut out = DMatrix::zeros(conn.len(), self.dim);
        for (row, &node) in conn.iter().enumerate() {
            for (col, &value) in self.at(node)?.iter().enumerate() {
                out[(row, col)] = value;
            }
        }
        Ok(out)
    }

    /// Values of the nodes in `conn`, node-then-component.
    pub fn gather_values_vector(&self, conn: &[usize]) -> Result<Vec<f64>, MeshError> {
        let mut out = Vec::with_capacity(conn.len() * self.dim);
        for &node in conn {
            out.extend_from_slice(self.at(node)?);
        }
        Ok(out)
    }

    /// Prescribed values of the nodes in `conn`, node-then-component, with
    /// `0` for free components.
    pub fn gather_prescribed_values(&self, conn: &[usize]) -> Result<Vec<f64>, MeshError> {
        let mut out = Vec::with_capacity(conn.len() * self.dim);
        for &node in conn {
            let range = self.node_range(node)?;
            out.extend(
                self.prescribed[range.clone()]
                    .iter()
                    .zip(&self.prescribed_values[range])
                    .map(|(&fixed, &value)| if fixed { value } else { 0.0 }),
            );
        }
        Ok(out)
    }

    /// Write a solution vector of length `neqns` into the free components.
    ///
    /// Prescribed components are left as they are.
    ///
    /// # Errors
    /// `EquationsNotNumbered` before [`Field::number_equations`];
    /// `DimensionMismatch` if `vec.len() != neqns`.
    pub fn scatter_system_vector(&mut self, vec: &[f64]) -> Result<(), MeshError> {
        let numbers = self.numbering.equations()?;
        if vec.len() != numbers.neqns() {
            return Err(MeshError::mismatch("system vector", numbers.neqns(), vec.len()));
        }
        for (value, eq) in self.values.iter_mut().zip(numbers.as_slice()) {
            if let Some(eq) = *eq {
                *value = vec[eq];
            }
        }
        Ok(())
    }

    /// Point-wise combination `f(self, rhs)` into a new field.
    ///
    /// The result has no prescribed components and is unnumbered.
    ///
    /// # Errors
    /// `DimensionMismatch` if a field operand differs in node count or
    /// dimension, or a vector operand is not `dim` long.
    pub fn bop<'a, F>(&self, rhs: impl Into<Operand<'a>>, f: F) -> Result<Field, MeshError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let values: Vec<f64> = match rhs.into() {
            Operand::Field(other) => {
                if other.dim != self.dim {
                    return Err(MeshError::mismatch("field dimension", self.dim, other.dim));
                }
                if other.nfens() != self.nfens() {
                    return Err(MeshError::mismatch("node count", self.nfens(), other.nfens()));
                }
                self.values
                    .iter()
                    .zip(&other.values)
                    .map(|(&a, &b)| f(a, b))
                    .collect()
            }
            Operand::Scalar(s) => self.values.iter().map(|&a| f(a, s)).collect(),
            Operand::Vector(v) => {
                if v.len() != self.dim {
                    return Err(MeshError::mismatch("operand vector", self.dim, v.len()));
                }
                self.values
                    .chunks_exact(self.dim)
                    .flat_map(|row| row.iter().zip(v).map(|(&a, &b)| f(a, b)))
                    .collect()
            }
        };
        let len = values.len();
        Ok(Field {
            dim: self.dim,
            values,
            prescribed: vec![false; len],
            prescribed_values: vec![0.0; len],
            numbering: Numbering::Unnumbered,
        })
    }

    /// Point-wise sum.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Field, MeshError> {
        self.bop(rhs, |a, b| a + b)
    }

    /// Point-wise difference.
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Field, MeshError> {
        self.bop(rhs, |a, b| a - b)
    }

    /// Point-wise product.
    pub fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Field, MeshError> {
        self.bop(rhs, |a, b| a * b)
    }

    /// Point-wise quotient (IEEE semantics for zero divisors).
    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Field, MeshError> {
        self.bop(rhs, |a, b| a / b)
    }

    /// Largest absolute component, `0` for an empty field.
    pub fn norm_max(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    fn node_range(&self, node: usize) -> Result<std::ops::Range<usize>, MeshError> {
        let nfens = self.nfens();
        if node >= nfens {
            return Err(MeshError::out_of_range("node", node, nfens));
        }
        Ok(node * self.dim..(node + 1) * self.dim)
    }

    fn flat_index(&self, node: usize, component: usize) -> Result<usize, MeshError> {
        if component >= self.dim {
            return Err(MeshError::out_of_range("component", component, self.dim));
        }
        Ok(self.node_range(node)?.start + component)
    }
}

impl NodeSet for Field {
    fn count(&self) -> usize {
        self.nfens()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn xyz_at(&self, index: usize) -> Result<&[f64], MeshError> {
        self.at(index)
    }
}
