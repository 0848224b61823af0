use crate::backend::Backend;
use crate::error::GraphError;

/// Identifier of a node in a [`Graph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy)]
enum Node {
    Input(usize),
    Splat(f64),
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Div(NodeId, NodeId),
    Hypot(NodeId, NodeId),
    Scale(NodeId, f64),
    RemEuclid(NodeId, f64),
    Floor(NodeId),
    Ln(NodeId),
    Exp(NodeId),
}

/// Deferred computation graph over `f64` lanes.
///
/// Operations recorded through the [`Backend`] implementation append nodes
/// to an arena; nothing is computed until [`Graph::eval`]. The arena order
/// is topological by construction, so evaluation is a single forward pass.
/// A graph is built once and can be evaluated against any number of input
/// columns.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    num_inputs: usize,
}

impl Graph {
    /// An empty graph with no inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next input slot and return its node.
    ///
    /// Slots are numbered in registration order; [`Graph::eval`] binds its
    /// columns to slots in that same order.
    pub fn input(&mut self) -> NodeId {
        let slot = self.num_inputs;
        self.num_inputs += 1;
        self.push(Node::Input(slot))
    }

    /// Number of registered input slots.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Evaluate `outputs` with the input slots bound to `bindings`.
    ///
    /// # Arguments
    ///
    /// * `outputs` - Nodes whose lanes should be returned, in order.
    /// * `bindings` - One column per input slot, in slot order. All columns
    ///   must have the same length.
    ///
    /// # Returns
    ///
    /// One lane per requested output.
    ///
    /// # Errors
    ///
    /// If the number of bound columns does not match the number of input
    /// slots, or the columns disagree in length.
    pub fn eval(
        &self,
        outputs: &[NodeId],
        bindings: &[&[f64]],
    ) -> Result<Vec<Vec<f64>>, GraphError> {
        if bindings.len() != self.num_inputs {
            return Err(GraphError::InputArity(self.num_inputs, bindings.len()));
        }
        let len = bindings.first().map_or(0, |column| column.len());
        for column in bindings {
            if column.len() != len {
                return Err(GraphError::LaneMismatch(len, column.len()));
            }
        }

        let mut lanes: Vec<Vec<f64>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let lane = match *node {
                Node::Input(slot) => bindings[slot].to_vec(),
                Node::Splat(value) => vec![value; len],
                Node::Add(a, b) => Self::zip2(&lanes[a.0], &lanes[b.0], |x, y| x + y),
                Node::Sub(a, b) => Self::zip2(&lanes[a.0], &lanes[b.0], |x, y| x - y),
                Node::Mul(a, b) => Self::zip2(&lanes[a.0], &lanes[b.0], |x, y| x * y),
                Node::Div(a, b) => Self::zip2(&lanes[a.0], &lanes[b.0], |x, y| x / y),
                Node::Hypot(a, b) => Self::zip2(&lanes[a.0], &lanes[b.0], f64::hypot),
                Node::Scale(a, k) => lanes[a.0].iter().map(|&x| x * k).collect(),
                Node::RemEuclid(a, k) => lanes[a.0].iter().map(|&x| x.rem_euclid(k)).collect(),
                Node::Floor(a) => lanes[a.0].iter().map(|&x| x.floor()).collect(),
                Node::Ln(a) => lanes[a.0].iter().map(|&x| x.ln()).collect(),
                Node::Exp(a) => lanes[a.0].iter().map(|&x| x.exp()).collect(),
            };
            lanes.push(lane);
        }

        Ok(outputs.iter().map(|id| lanes[id.0].clone()).collect())
    }

    fn zip2(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()
    }
}

impl Backend for Graph {
    type Value = NodeId;

    fn splat(&mut self, value: f64) -> Self::Value {
        self.push(Node::Splat(value))
    }

    fn add(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.push(Node::Add(*a, *b))
    }

    fn sub(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.push(Node::Sub(*a, *b))
    }

    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.push(Node::Mul(*a, *b))
    }

    fn div(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.push(Node::Div(*a, *b))
    }

    fn scale(&mut self, a: &Self::Value, k: f64) -> Self::Value {
        self.push(Node::Scale(*a, k))
    }

    fn rem_euclid(&mut self, a: &Self::Value, k: f64) -> Self::Value {
        self.push(Node::RemEuclid(*a, k))
    }

    fn floor(&mut self, a: &Self::Value) -> Self::Value {
        self.push(Node::Floor(*a))
    }

    fn ln(&mut self, a: &Self::Value) -> Self::Value {
        self.push(Node::Ln(*a))
    }

    fn exp(&mut self, a: &Self::Value) -> Self::Value {
        self.push(Node::Exp(*a))
    }

    fn hypot(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.push(Node::Hypot(*a, *b))
    }
}
