//! Validated node sets held by bound generators.

use crate::curves::{insert_anchor, validate_node_times};
use crate::error::{CurveError, CurveResult};

/// Non-empty, finite, strictly increasing node times.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTimes(Vec<f64>);

impl NodeTimes {
    /// Validates node times.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InsufficientNodes`] for an empty vector and
    /// [`CurveError::NonMonotonicNodes`] for unsorted or repeated times.
    pub fn new(times: Vec<f64>) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::InsufficientNodes {
                required: 1,
                got: 0,
            });
        }
        validate_node_times(&times)?;
        Ok(Self(times))
    }

    /// Returns the times.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f64>> for NodeTimes {
    type Error = CurveError;

    fn try_from(times: Vec<f64>) -> CurveResult<Self> {
        Self::new(times)
    }
}

impl From<NodeTimes> for Vec<f64> {
    fn from(nodes: NodeTimes) -> Self {
        nodes.0
    }
}

/// Real node times plus one anchor whose value is fixed.
///
/// The real nodes may be empty, in which case the curve is flat at the
/// anchor value.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredNodes {
    anchor: f64,
    nodes: Vec<f64>,
}

impl AnchoredNodes {
    /// Validates an anchor and its real nodes.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonMonotonicNodes`] if the real nodes are not
    /// strictly increasing or the anchor coincides with one of them.
    pub fn new(anchor: f64, nodes: Vec<f64>) -> CurveResult<Self> {
        insert_anchor(anchor, &nodes)?;
        Ok(Self { anchor, nodes })
    }

    /// Returns the anchor time.
    #[must_use]
    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    /// Returns the real node times.
    #[must_use]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Number of parameters: one per real node.
    #[must_use]
    pub fn number_of_parameters(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_times_validation() {
        assert!(NodeTimes::new(vec![1.0, 2.0]).is_ok());
        assert!(matches!(
            NodeTimes::new(Vec::new()),
            Err(CurveError::InsufficientNodes { .. })
        ));
        assert!(matches!(
            NodeTimes::new(vec![1.0, 1.0]),
            Err(CurveError::NonMonotonicNodes { .. })
        ));
    }

    #[test]
    fn test_anchored_nodes() {
        let nodes = AnchoredNodes::new(0.25, vec![1.0, 2.0]).unwrap();
        assert_eq!(nodes.number_of_parameters(), 2);
        assert_eq!(nodes.anchor(), 0.25);

        let empty = AnchoredNodes::new(0.25, Vec::new()).unwrap();
        assert_eq!(empty.number_of_parameters(), 0);

        assert!(AnchoredNodes::new(1.0, vec![1.0, 2.0]).is_err());
    }
}
