#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Action(Action),
    Decision(Decision),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub question: String,
    pub choices: Vec<Choice>,
}

/// One labeled branch out of a decision. `label` captions the edge,
/// `outcome` is the text of the node the edge points at.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub outcome: String,
}

pub const DEFAULT_CHOICE_LABEL: &str = "Choice";

impl Step {
    pub fn action(text: impl Into<String>) -> Self {
        Step::Action(Action { text: text.into() })
    }

    pub fn decision(question: impl Into<String>, choices: Vec<Choice>) -> Self {
        Step::Decision(Decision {
            question: question.into(),
            choices,
        })
    }
}

impl Choice {
    pub fn new(label: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: outcome.into(),
        }
    }
}
