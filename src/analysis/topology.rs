use crate::calibration::Step;
use crate::error::ModelError;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Builds the data-flow graph of a recipe: one node per name, one edge per
/// `input -> output` read. Names no step produces are calibrated inputs.
pub fn recipe_graph(steps: &[Step]) -> DiGraph<&'static str, ()> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<&'static str, NodeIndex> = HashMap::new();

    for step in steps {
        let out = *nodes.entry(step.output).or_insert_with(|| graph.add_node(step.output));
        for &input in step.inputs {
            let src = *nodes.entry(input).or_insert_with(|| graph.add_node(input));
            graph.add_edge(src, out, ());
        }
    }
    graph
}

/// Checks that the recipe can run front to back.
///
/// Rejects duplicate outputs, cycles, and any step that reads a value a later
/// step produces. Inputs that no step produces are left for the calibrator to
/// resolve against calibrated parameters.
pub fn verify_recipe(steps: &[Step]) -> Result<(), ModelError> {
    let mut producer: HashMap<&'static str, usize> = HashMap::new();
    for (i, step) in steps.iter().enumerate() {
        if let Some(first) = producer.insert(step.output, i) {
            return Err(ModelError::OrderingViolation(format!(
                "'{}' is produced by both step {} and step {}",
                step.output,
                first + 1,
                i + 1
            )));
        }
    }

    if is_cyclic_directed(&recipe_graph(steps)) {
        return Err(ModelError::OrderingViolation("recipe contains a dependency cycle".into()));
    }

    for (i, step) in steps.iter().enumerate() {
        for &input in step.inputs {
            if let Some(&j) = producer.get(input) {
                if j >= i {
                    return Err(ModelError::OrderingViolation(format!(
                        "step {} ('{}') reads '{}', which step {} produces",
                        i + 1,
                        step.output,
                        input,
                        j + 1
                    )));
                }
            }
        }
    }
    Ok(())
}

/// A dependency-respecting order of the recipe's outputs.
pub fn evaluation_order(steps: &[Step]) -> Result<Vec<&'static str>, ModelError> {
    let graph = recipe_graph(steps);
    let order = toposort(&graph, None)
        .map_err(|c| ModelError::OrderingViolation(format!("cycle through '{}'", graph[c.node_id()])))?;

    Ok(order
        .into_iter()
        .map(|n| graph[n])
        .filter(|name| steps.iter().any(|s| s.output == *name))
        .collect())
}
