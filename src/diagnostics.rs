use std::fmt;

/// Non-fatal problems found while turning text into a graph.
///
/// Parsing and graph building never fail on malformed input; every
/// degenerate shape they tolerate is reported through one of these instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A `CHOICE:` line with no decision block above it. It is kept as a
    /// plain action carrying the literal line text.
    StrayChoice { line: usize, text: String },
    /// A decision with no choices. Its node is drawn but is never a chain
    /// anchor; the following step hangs off whatever preceded the decision.
    DecisionWithoutChoices { question: String, node_id: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::StrayChoice { line, text } => write!(
                f,
                "line {line}: `{text}` is not inside a DECISION block, treating it as a step"
            ),
            Warning::DecisionWithoutChoices { question, node_id } => write!(
                f,
                "decision `{question}` ({node_id}) has no CHOICE lines; the next step skips it"
            ),
        }
    }
}
