use crate::core::gav::ProjectId;
use crate::graph::DependencyGraph;

pub fn render_flat(graph: &DependencyGraph) -> String {
    let mut lines = Vec::new();
    for (project, deps) in &graph.edges {
        if deps.is_empty() {
            lines.push(project.as_str().to_string());
            continue;
        }
        for dep in deps {
            lines.push(format!("{} -> {}", project.as_str(), dep.as_str()));
        }
    }
    lines.sort();
    lines.dedup();

    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_dot(graph: &DependencyGraph) -> String {
    let mut out = String::from("digraph cadence {\n");

    let mut nodes: Vec<&ProjectId> = graph.edges.keys().collect();
    nodes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    for node in nodes {
        out.push_str(&format!("  \"{}\";\n", escape_dot(node.as_str())));
    }

    let mut edge_lines = Vec::new();
    for (from, deps) in &graph.edges {
        for dep in deps {
            edge_lines.push(format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot(from.as_str()),
                escape_dot(dep.as_str())
            ));
        }
    }
    edge_lines.sort();
    edge_lines.dedup();
    for line in edge_lines {
        out.push_str(&line);
    }

    out.push_str("}\n");
    out
}

fn escape_dot(label: &str) -> String {
    label.replace('"', "\\\"")
}
