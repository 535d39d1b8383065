use crate::color::{ColorCategory, ColorPolicy, KeywordPolicy};
use crate::diagnostics::Warning;
use crate::flow_graph::*;
use crate::step_ast::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltGraph {
    pub graph: FlowGraph,
    pub warnings: Vec<Warning>,
}

/// State threaded through the step sequence. `anchor` is the node the next
/// step chains off; ids come from the node count, so there is no separate
/// counter to keep in sync.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildState {
    pub graph: FlowGraph,
    pub anchor: Option<String>,
    pub warnings: Vec<Warning>,
}

pub fn build_graph(steps: &[Step]) -> BuiltGraph {
    build_graph_with_policy(steps, &KeywordPolicy)
}

pub fn build_graph_with_policy(steps: &[Step], policy: &dyn ColorPolicy) -> BuiltGraph {
    let state = steps
        .iter()
        .fold(BuildState::default(), |state, step| state.apply(step, policy));
    tracing::debug!(
        nodes = state.graph.nodes.len(),
        edges = state.graph.edges.len(),
        "built flow graph"
    );
    BuiltGraph {
        graph: state.graph,
        warnings: state.warnings,
    }
}

impl BuildState {
    pub fn apply(self, step: &Step, policy: &dyn ColorPolicy) -> Self {
        match step {
            Step::Action(action) => self.apply_action(action, policy),
            Step::Decision(decision) => self.apply_decision(decision, policy),
        }
    }

    fn apply_action(mut self, action: &Action, policy: &dyn ColorPolicy) -> Self {
        let color = policy.classify(&action.text);
        let id = self.push_node(&action.text, NodeShape::Rectangle, color);
        self.chain_to(&id);
        self.anchor = Some(id);
        self
    }

    fn apply_decision(mut self, decision: &Decision, policy: &dyn ColorPolicy) -> Self {
        let decision_id = self.push_node(
            &decision.question,
            NodeShape::Diamond,
            ColorCategory::Decision,
        );
        self.chain_to(&decision_id);

        let mut first_choice = None;
        for choice in &decision.choices {
            let color = policy.classify(&choice.outcome);
            let choice_id = self.push_node(&choice.outcome, NodeShape::Rectangle, color);
            self.graph.edges.push(DiagramEdge {
                from: decision_id.clone(),
                to: choice_id.clone(),
                label: Some(choice.label.clone()),
            });
            first_choice.get_or_insert(choice_id);
        }

        match first_choice {
            Some(id) => self.anchor = Some(id),
            None => {
                tracing::warn!(
                    question = %decision.question,
                    node = %decision_id,
                    "decision has no choices"
                );
                self.warnings.push(Warning::DecisionWithoutChoices {
                    question: decision.question.clone(),
                    node_id: decision_id,
                });
            }
        }
        self
    }

    fn push_node(&mut self, label: &str, shape: NodeShape, color: ColorCategory) -> String {
        let id = format!("node{}", self.graph.nodes.len());
        self.graph.nodes.push(DiagramNode {
            id: id.clone(),
            label: label.to_string(),
            shape,
            color,
        });
        id
    }

    fn chain_to(&mut self, id: &str) {
        if let Some(prev) = &self.anchor {
            self.graph.edges.push(DiagramEdge {
                from: prev.clone(),
                to: id.to_string(),
                label: None,
            });
        }
    }
}
