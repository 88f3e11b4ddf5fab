use std::collections::HashMap;

use thiserror::Error;

use crate::core::gav::ProjectId;
use crate::graph::DependencyGraph;

/// The orderer stalled on a non-empty remainder: the listed projects form
/// or depend into a cycle. No partial order is produced.
#[derive(Debug, Clone, Error)]
#[error("found circular dependency among: {}", join_ids(.remaining))]
pub struct CycleError {
    pub remaining: Vec<ProjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub from: ProjectId,
    pub dependency: ProjectId,
}

// Restrict every dependency list to ids that are themselves keys; anything
// outside the submitted set is treated as already satisfied.
pub fn restricted(graph: &DependencyGraph) -> DependencyGraph {
    let mut edges = HashMap::new();
    for (project, deps) in &graph.edges {
        let kept: Vec<ProjectId> = deps
            .iter()
            .filter(|dep| graph.edges.contains_key(*dep))
            .cloned()
            .collect();
        edges.insert(project.clone(), kept);
    }
    DependencyGraph { edges }
}

/// Repeated layer extraction: each round collects the projects whose
/// remaining in-set dependency lists are empty, appends them
/// (lexicographically, so peers order deterministically), and removes them
/// from every remaining list. A round with no progress on a non-empty
/// remainder means a cycle.
pub fn build_order(graph: &DependencyGraph) -> Result<Vec<ProjectId>, CycleError> {
    let mut remaining = restricted(graph).edges;
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut ready: Vec<ProjectId> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(project, _)| project.clone())
            .collect();

        if ready.is_empty() {
            let mut stalled: Vec<ProjectId> = remaining.into_keys().collect();
            stalled.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            return Err(CycleError { remaining: stalled });
        }

        ready.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for project in &ready {
            remaining.remove(project);
        }
        for deps in remaining.values_mut() {
            deps.retain(|dep| !ready.contains(dep));
        }
        order.extend(ready);
    }

    Ok(order)
}

pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<ProjectId>> {
    let edges = restricted(graph).edges;
    let mut state: HashMap<ProjectId, VisitState> = HashMap::new();
    let mut stack: Vec<ProjectId> = Vec::new();
    let mut cycles = Vec::new();

    let mut nodes: Vec<&ProjectId> = edges.keys().collect();
    nodes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    for node in nodes {
        if state.contains_key(node) {
            continue;
        }
        visit_node(node, &edges, &mut state, &mut stack, &mut cycles);
    }

    cycles
}

// Every edge whose target is not a submitted project, i.e. the references
// the orderer drops as external.
pub fn external_references(graph: &DependencyGraph) -> Vec<ExternalReference> {
    let mut refs = Vec::new();
    for (project, deps) in &graph.edges {
        for dep in deps {
            if !graph.edges.contains_key(dep) {
                refs.push(ExternalReference {
                    from: project.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    refs.sort_by(|a, b| {
        a.from
            .as_str()
            .cmp(b.from.as_str())
            .then(a.dependency.as_str().cmp(b.dependency.as_str()))
    });
    refs.dedup();
    refs
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

fn visit_node(
    node: &ProjectId,
    edges: &HashMap<ProjectId, Vec<ProjectId>>,
    state: &mut HashMap<ProjectId, VisitState>,
    stack: &mut Vec<ProjectId>,
    cycles: &mut Vec<Vec<ProjectId>>,
) {
    if let Some(existing) = state.get(node) {
        if *existing == VisitState::Visiting {
            if let Some(pos) = stack.iter().position(|id| id == node) {
                cycles.push(stack[pos..].to_vec());
            }
        }
        return;
    }

    state.insert(node.clone(), VisitState::Visiting);
    stack.push(node.clone());
    if let Some(deps) = edges.get(node) {
        for dep in deps {
            visit_node(dep, edges, state, stack, cycles);
        }
    }
    stack.pop();
    state.insert(node.clone(), VisitState::Visited);
}

fn join_ids(ids: &[ProjectId]) -> String {
    ids.iter()
        .map(ProjectId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
