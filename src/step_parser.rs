use winnow::prelude::*;
use winnow::ascii::Caseless;
use winnow::combinator::{alt, opt, preceded, terminated};
use winnow::token::{rest, take_until};

use crate::diagnostics::Warning;
use crate::step_ast::*;

/// What a single trimmed, non-empty line of flow notation says.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    DecisionHeader { question: String },
    ChoiceEntry { label: String, outcome: String },
    PlainAction { text: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSteps {
    pub steps: Vec<Step>,
    pub warnings: Vec<Warning>,
}

/// Parse raw notation text. Blank lines are dropped and every other line is
/// trimmed before classification; warnings refer to 1-based lines of `text`.
pub fn parse_steps(text: &str) -> ParsedSteps {
    let lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());
    scan(lines)
}

/// Parse lines that are already trimmed and non-blank.
pub fn parse_lines<'a, I>(lines: I) -> ParsedSteps
where
    I: IntoIterator<Item = &'a str>,
{
    scan(lines.into_iter().enumerate().map(|(i, line)| (i + 1, line)))
}

fn scan<'a>(lines: impl Iterator<Item = (usize, &'a str)>) -> ParsedSteps {
    let mut classified = lines
        .map(|(line_no, line)| (line_no, line, classify_line(line)))
        .peekable();
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    while let Some((line_no, line, kind)) = classified.next() {
        match kind {
            LineKind::PlainAction { text } => steps.push(Step::action(text)),
            LineKind::DecisionHeader { question } => {
                let mut choices = Vec::new();
                while let Some((_, _, LineKind::ChoiceEntry { label, outcome })) =
                    classified.next_if(|(_, _, k)| matches!(k, LineKind::ChoiceEntry { .. }))
                {
                    choices.push(Choice { label, outcome });
                }
                steps.push(Step::decision(question, choices));
            }
            LineKind::ChoiceEntry { .. } => {
                tracing::warn!(line = line_no, text = line, "CHOICE outside of a decision block");
                warnings.push(Warning::StrayChoice {
                    line: line_no,
                    text: line.to_string(),
                });
                steps.push(Step::action(line));
            }
        }
    }

    tracing::debug!(steps = steps.len(), warnings = warnings.len(), "parsed flow notation");
    ParsedSteps { steps, warnings }
}

/// Anything that is not a `DECISION:` or `CHOICE:` directive is an action.
pub fn classify_line(line: &str) -> LineKind {
    let mut input = line;
    alt((decision_header, choice_entry))
        .parse_next(&mut input)
        .unwrap_or_else(|_| LineKind::PlainAction {
            text: line.trim().to_string(),
        })
}

fn decision_header(input: &mut &str) -> winnow::Result<LineKind> {
    preceded(Caseless("DECISION:"), rest)
        .map(|question: &str| LineKind::DecisionHeader {
            question: question.trim().to_string(),
        })
        .parse_next(input)
}

fn choice_entry(input: &mut &str) -> winnow::Result<LineKind> {
    Caseless("CHOICE:").parse_next(input)?;
    let label = opt(terminated(take_until(0.., "->"), "->")).parse_next(input)?;
    let outcome = rest.parse_next(input)?;
    let label = match label {
        Some(label) => label.trim().to_string(),
        None => DEFAULT_CHOICE_LABEL.to_string(),
    };
    Ok(LineKind::ChoiceEntry {
        label,
        outcome: outcome.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classify_decision_header() {
        assert_eq!(
            classify_line("DECISION: Is the fee paid?"),
            LineKind::DecisionHeader {
                question: "Is the fee paid?".to_string()
            }
        );
    }

    #[test]
    fn classify_decision_header_is_case_insensitive() {
        assert_eq!(
            classify_line("decision:   Approved?  "),
            LineKind::DecisionHeader {
                question: "Approved?".to_string()
            }
        );
    }

    #[test]
    fn classify_choice_with_label() {
        assert_eq!(
            classify_line("CHOICE: Yes -> Schedule interview"),
            LineKind::ChoiceEntry {
                label: "Yes".to_string(),
                outcome: "Schedule interview".to_string()
            }
        );
    }

    #[test]
    fn classify_choice_without_label() {
        assert_eq!(
            classify_line("CHOICE: Go home"),
            LineKind::ChoiceEntry {
                label: "Choice".to_string(),
                outcome: "Go home".to_string()
            }
        );
    }

    #[test]
    fn classify_choice_splits_on_first_arrow() {
        assert_eq!(
            classify_line("Choice: A -> B -> C"),
            LineKind::ChoiceEntry {
                label: "A".to_string(),
                outcome: "B -> C".to_string()
            }
        );
    }

    #[test]
    fn classify_choice_with_empty_label() {
        assert_eq!(
            classify_line("CHOICE:-> Somewhere"),
            LineKind::ChoiceEntry {
                label: String::new(),
                outcome: "Somewhere".to_string()
            }
        );
    }

    #[test]
    fn classify_plain_action_keeps_ordinal() {
        assert_eq!(
            classify_line("3. Verify submitted documents"),
            LineKind::PlainAction {
                text: "3. Verify submitted documents".to_string()
            }
        );
    }

    #[test]
    fn classify_keeps_internal_whitespace() {
        assert_eq!(
            classify_line("Send   reminder"),
            LineKind::PlainAction {
                text: "Send   reminder".to_string()
            }
        );
    }

    #[test]
    fn classify_prefix_must_be_at_start() {
        assert_eq!(
            classify_line("Record DECISION: later"),
            LineKind::PlainAction {
                text: "Record DECISION: later".to_string()
            }
        );
    }

    #[test]
    fn classify_directive_without_colon_is_action() {
        assert_eq!(
            classify_line("DECISION Approved?"),
            LineKind::PlainAction {
                text: "DECISION Approved?".to_string()
            }
        );
        assert_eq!(
            classify_line("Choice of venue"),
            LineKind::PlainAction {
                text: "Choice of venue".to_string()
            }
        );
    }

    #[test]
    fn parse_decision_consumes_following_choices() {
        let parsed = parse_steps("DECISION: Q?\nCHOICE: Yes -> A\nCHOICE: No -> B\nNext\n");
        assert_eq!(
            parsed.steps,
            vec![
                Step::decision("Q?", vec![Choice::new("Yes", "A"), Choice::new("No", "B")]),
                Step::action("Next"),
            ]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn parse_blank_lines_do_not_end_choice_block() {
        let parsed = parse_steps("DECISION: Q?\n\n   \nCHOICE: Yes -> A\n\nCHOICE: No -> B\n");
        assert_eq!(
            parsed.steps,
            vec![Step::decision("Q?", vec![Choice::new("Yes", "A"), Choice::new("No", "B")])]
        );
    }

    #[test]
    fn parse_decision_without_choices() {
        let parsed = parse_steps("DECISION: Q?\nNext");
        assert_eq!(
            parsed.steps,
            vec![Step::decision("Q?", vec![]), Step::action("Next")]
        );
        assert!(parsed.warnings.is_empty(), "empty decisions are reported by the builder");
    }

    #[test]
    fn parse_only_blank_lines() {
        let parsed = parse_steps("\n   \n\t\n");
        assert!(parsed.steps.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn parse_stray_choice_becomes_literal_action() {
        let parsed = parse_steps("Start\n\nCHOICE: Yes -> A\n");
        assert_eq!(
            parsed.steps,
            vec![Step::action("Start"), Step::action("CHOICE: Yes -> A")]
        );
        assert_eq!(
            parsed.warnings,
            vec![Warning::StrayChoice {
                line: 3,
                text: "CHOICE: Yes -> A".to_string()
            }]
        );
    }

    #[test]
    fn parse_choice_after_action_is_stray() {
        let parsed = parse_steps("DECISION: Q?\nCHOICE: Yes -> A\nAction\nCHOICE: No -> B");
        assert_eq!(parsed.steps.len(), 3);
        assert_eq!(parsed.steps[2], Step::action("CHOICE: No -> B"));
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn parse_consecutive_decisions() {
        let parsed = parse_steps("DECISION: A?\nDECISION: B?\nCHOICE: Yes -> C");
        assert_eq!(
            parsed.steps,
            vec![
                Step::decision("A?", vec![]),
                Step::decision("B?", vec![Choice::new("Yes", "C")]),
            ]
        );
    }

    #[test]
    fn parse_lines_numbers_relative_to_slice() {
        let parsed = parse_lines(["Start", "CHOICE: Oops"]);
        assert_eq!(
            parsed.warnings,
            vec![Warning::StrayChoice {
                line: 2,
                text: "CHOICE: Oops".to_string()
            }]
        );
    }
}
