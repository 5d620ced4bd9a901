//! Equation numbering of free degrees of freedom.
//!
//! Numbers are dense, `0..neqns`, assigned by a row-major scan over nodes and
//! then components. Prescribed components carry `None`. The result depends
//! only on the prescribed table, so equal tables give equal numberings.

use crate::mesh_error::MeshError;

/// Equation numbers of every node-component of a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquationNumbers {
    dim: usize,
    eqnums: Vec<Option<usize>>,
    neqns: usize,
}

impl EquationNumbers {
    /// Number the components whose `prescribed` flag is clear.
    ///
    /// `prescribed` is row-major with `dim` components per node.
    pub fn assign(dim: usize, prescribed: &[bool]) -> Self {
        let mut next = 0usize;
        let eqnums = prescribed
            .iter()
            .map(|&fixed| {
                if fixed {
                    None
                } else {
                    next += 1;
                    Some(next - 1)
                }
            })
            .collect();
        Self {
            dim,
            eqnums,
            neqns: next,
        }
    }

    /// Number of free equations.
    #[inline]
    pub fn neqns(&self) -> usize {
        self.neqns
    }

    /// Equation number of `(node, component)`; `None` if prescribed.
    ///
    /// # Errors
    /// `IndexOutOfRange` for a bad node or component.
    pub fn get(&self, node: usize, component: usize) -> Result<Option<usize>, MeshError> {
        if component >= self.dim {
            return Err(MeshError::out_of_range("component", component, self.dim));
        }
        let nfens = self.eqnums.len() / self.dim.max(1);
        if node >= nfens {
            return Err(MeshError::out_of_range("node", node, nfens));
        }
        Ok(self.eqnums[node * self.dim + component])
    }

    /// Row-major table of all equation numbers.
    #[inline]
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.eqnums
    }
}

/// Numbering state of a field.
///
/// Changing prescribed state moves a field back to `Unnumbered`; callers
/// renumber explicitly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Numbering {
    /// No valid equation numbers.
    #[default]
    Unnumbered,
    /// Numbers consistent with the current prescribed table.
    Numbered(EquationNumbers),
}

impl Numbering {
    /// Whether equation numbers are available.
    #[inline]
    pub fn is_numbered(&self) -> bool {
        matches!(self, Numbering::Numbered(_))
    }

    /// The equation numbers.
    ///
    /// # Errors
    /// `EquationsNotNumbered` in the `Unnumbered` state.
    pub fn equations(&self) -> Result<&EquationNumbers, MeshError> {
        match self {
            Numbering::Numbered(eq) => Ok(eq),
            Numbering::Unnumbered => Err(MeshError::EquationsNotNumbered),
        }
    }
}
