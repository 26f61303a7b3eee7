//! Flow graph builder
//!
//! Turns one test case into a directed graph: a node per step, an edge from
//! each step's prerequisite to the step, and a labelled edge per branch. The
//! graph renders to a Mermaid flowchart for the external diagram renderer.
//!
//! # Example Output
//! ```text
//! flowchart TD
//!     S0["enter creds<br/>成功"]
//!     S1["submit<br/>成功"]
//!     S0 --> S1
//!     S1 -->|"invalid"| S0
//! ```

use serde::Serialize;
use tracing::debug;

use crate::entities::{ExpectedStatus, TestCase};

/// Style class definitions, one per expected status
const CLASS_DEFS: &[(ExpectedStatus, &str)] = &[
    (ExpectedStatus::Success, "fill:#e6f4ea,stroke:#34a853,color:#1e4620"),
    (ExpectedStatus::Failure, "fill:#fdecea,stroke:#d93025,color:#5f1410"),
    (ExpectedStatus::Exception, "fill:#fef7e0,stroke:#f9ab00,color:#5c3d00"),
];

/// A step node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    /// 0-based step index
    pub index: usize,
    pub action: String,
    /// Style class, derived from the step's expected status
    pub status: ExpectedStatus,
}

impl FlowNode {
    /// DSL identifier (`S<index>`)
    pub fn key(&self) -> String {
        node_key(self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Dependency,
    Branch,
}

/// A directed edge between two step indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Graph description of one test case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

fn node_key(index: usize) -> String {
    format!("S{}", index)
}

/// Build the flow graph of a test case
///
/// Nodes follow step order. Dependency edges come first in step order,
/// then branch edges in step order. Edges whose endpoint is not a step of
/// the case are dropped.
pub fn build_graph(case: &TestCase) -> FlowGraph {
    let len = case.steps.len();
    let in_bounds = |from: usize, to: usize| {
        let ok = from < len && to < len;
        if !ok {
            debug!("{}: dropping edge {} -> {} (case has {} steps)", case.id, from, to, len);
        }
        ok
    };

    let nodes = case
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| FlowNode {
            index,
            action: step.action.clone(),
            status: step.expected_status,
        })
        .collect();

    let dependency_edges = case.steps.iter().enumerate().filter_map(|(i, step)| {
        step.depends_on
            .filter(|&d| in_bounds(d, i))
            .map(|d| FlowEdge {
                from: d,
                to: i,
                kind: EdgeKind::Dependency,
                label: None,
            })
    });

    let branch_edges = case.steps.iter().enumerate().flat_map(|(i, step)| {
        step.branches
            .iter()
            .filter(move |b| in_bounds(i, b.next_step))
            .map(move |b| FlowEdge {
                from: i,
                to: b.next_step,
                kind: EdgeKind::Branch,
                label: Some(b.condition.clone()),
            })
    });

    let edges = dependency_edges.chain(branch_edges).collect();

    FlowGraph { nodes, edges }
}

/// Escape text for a quoted Mermaid label
///
/// `#` goes first so the entity codes inserted below stay intact.
fn escape_label(text: &str) -> String {
    text.replace('#', "#35;")
        .replace('"', "#quot;")
        .replace('\n', "<br/>")
}

impl FlowGraph {
    /// Render as a Mermaid flowchart
    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["flowchart TD".to_string()];

        for node in &self.nodes {
            lines.push(format!(
                "    {}[\"{}<br/>{}\"]",
                node.key(),
                escape_label(&node.action),
                node.status
            ));
        }

        for edge in &self.edges {
            let (from, to) = (node_key(edge.from), node_key(edge.to));
            match &edge.label {
                Some(label) => {
                    lines.push(format!("    {} -->|\"{}\"| {}", from, escape_label(label), to))
                }
                None => lines.push(format!("    {} --> {}", from, to)),
            }
        }

        for (status, style) in CLASS_DEFS {
            lines.push(format!("    classDef {} {}", status.as_str(), style));
        }

        for node in &self.nodes {
            lines.push(format!("    class {} {}", node.key(), node.status.as_str()));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::CaseId;
    use crate::entities::{Branch, Step};

    fn case_with(steps: Vec<Step>) -> TestCase {
        TestCase::new(CaseId::new(1), "Case", "", steps)
    }

    #[test]
    fn test_nodes_follow_step_order_with_classes() {
        let case = case_with(vec![
            Step::new("a", ExpectedStatus::Success, ""),
            Step::new("b", ExpectedStatus::Failure, ""),
            Step::new("c", ExpectedStatus::Exception, ""),
        ]);
        let graph = build_graph(&case);

        assert_eq!(graph.nodes.len(), 3);
        let statuses: Vec<_> = graph.nodes.iter().map(|n| n.status).collect();
        assert_eq!(
            statuses,
            vec![
                ExpectedStatus::Success,
                ExpectedStatus::Failure,
                ExpectedStatus::Exception
            ]
        );
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_dependency_edges_precede_branch_edges() {
        let case = case_with(vec![
            Step::new("a", ExpectedStatus::Success, "").with_branch(Branch::new("x", 2)),
            Step::new("b", ExpectedStatus::Success, "")
                .with_depends_on(0)
                .with_branch(Branch::new("y", 0))
                .with_branch(Branch::new("z", 2)),
            Step::new("c", ExpectedStatus::Success, "").with_depends_on(1),
        ]);
        let graph = build_graph(&case);

        let summary: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.from, e.to, e.kind, e.label.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, 1, EdgeKind::Dependency, None),
                (1, 2, EdgeKind::Dependency, None),
                (0, 2, EdgeKind::Branch, Some("x")),
                (1, 0, EdgeKind::Branch, Some("y")),
                (1, 2, EdgeKind::Branch, Some("z")),
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_edges_are_dropped() {
        let case = case_with(vec![
            Step::new("a", ExpectedStatus::Success, "").with_depends_on(4),
            Step::new("b", ExpectedStatus::Success, "")
                .with_branch(Branch::new("gone", 5))
                .with_branch(Branch::new("back", 0)),
        ]);
        let graph = build_graph(&case);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].label.as_deref(), Some("back"));
    }

    #[test]
    fn test_self_loops_are_kept() {
        let case = case_with(vec![Step::new("poll", ExpectedStatus::Success, "")
            .with_depends_on(0)
            .with_branch(Branch::new("not ready", 0))]);
        let graph = build_graph(&case);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_empty_case_renders_header_and_class_defs() {
        let dsl = build_graph(&case_with(Vec::new())).to_mermaid();
        assert!(dsl.starts_with("flowchart TD\n"));
        assert!(dsl.contains("classDef success"));
        assert!(!dsl.contains("class S"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let case = case_with(vec![
            Step::new("say \"hi\"", ExpectedStatus::Failure, "")
                .with_branch(Branch::new("a\nb", 0)),
        ]);
        let dsl = build_graph(&case).to_mermaid();
        assert!(dsl.contains("S0[\"say #quot;hi#quot;<br/>失败\"]"));
        assert!(dsl.contains("S0 -->|\"a<br/>b\"| S0"));
        assert!(dsl.contains("class S0 failure"));
    }

    #[test]
    fn test_hash_in_labels_is_not_an_entity_code() {
        let case = case_with(vec![
            Step::new("order #1;", ExpectedStatus::Success, "")
                .with_branch(Branch::new("#quot;", 0)),
        ]);
        let dsl = build_graph(&case).to_mermaid();
        assert!(dsl.contains("S0[\"order #35;1;<br/>成功\"]"));
        assert!(dsl.contains("S0 -->|\"#35;quot;\"| S0"));
    }
}
