//! Essential (Dirichlet) boundary conditions on field components.

use serde::{Deserialize, Serialize};

use crate::data::field::Field;
use crate::mesh_error::MeshError;

/// A fixed value on one component, or on every component, of a node list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EssentialBc {
    /// Constrained nodes.
    pub nodes: Vec<usize>,
    /// Constrained component; `None` constrains all of them.
    #[serde(default)]
    pub component: Option<usize>,
    /// Prescribed value.
    #[serde(default)]
    pub value: f64,
}

impl EssentialBc {
    /// Constrain `component` of every node in `nodes` to `value`.
    pub fn new(nodes: impl Into<Vec<usize>>, component: usize, value: f64) -> Self {
        Self {
            nodes: nodes.into(),
            component: Some(component),
            value,
        }
    }

    /// Constrain every component of every node in `nodes` to `value`.
    pub fn all_components(nodes: impl Into<Vec<usize>>, value: f64) -> Self {
        Self {
            nodes: nodes.into(),
            component: None,
            value,
        }
    }

    fn components(&self, dim: usize) -> Result<std::ops::Range<usize>, MeshError> {
        match self.component {
            Some(c) if c >= dim => Err(MeshError::out_of_range("component", c, dim)),
            Some(c) => Ok(c..c + 1),
            None => Ok(0..dim),
        }
    }
}

/// Prescribe every condition in `ebcs` on `field`.
///
/// All conditions are validated before the field is touched, so a failure
/// leaves it unchanged.
///
/// # Errors
/// `IndexOutOfRange` for a node or component outside the field.
pub fn apply_essential_bcs(field: &mut Field, ebcs: &[EssentialBc]) -> Result<(), MeshError> {
    for bc in ebcs {
        bc.components(field.dim())?;
        if let Some(&node) = bc.nodes.iter().find(|&&n| n >= field.nfens()) {
            return Err(MeshError::out_of_range("node", node, field.nfens()));
        }
    }
    for bc in ebcs {
        for &node in &bc.nodes {
            for component in bc.components(field.dim())? {
                field.set_ebc(node, component, bc.value)?;
            }
        }
    }
    log::debug!(
        "Applied {} essential conditions: {} prescribed components",
        ebcs.len(),
        field.prescribed_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_component_leaves_field_untouched() {
        let mut field = Field::zeros(3, 2).unwrap();
        let ebcs = [
            EssentialBc::new([0], 0, 1.0),
            EssentialBc::new([1], 5, 1.0),
        ];
        let err = apply_essential_bcs(&mut field, &ebcs).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { what: "component", .. }));
        assert_eq!(field.prescribed_count(), 0);
    }

    #[test]
    fn all_components_condition() {
        let mut field = Field::zeros(3, 2).unwrap();
        apply_essential_bcs(&mut field, &[EssentialBc::all_components([2], -1.0)]).unwrap();
        assert_eq!(field.prescribed_count(), 2);
        assert_eq!(field.prescribed_value(2, 1).unwrap(), Some(-1.0));
        assert_eq!(field.prescribed_value(1, 1).unwrap(), None);
    }
}
