pub mod color;
pub mod config;
pub mod diagnostics;
pub mod display_width;
pub mod dot;
pub mod error;
pub mod flow_graph;
pub mod graph_builder;
pub mod palette;
pub mod renderer;
pub mod step_ast;
pub mod step_parser;

use crate::color::{ColorPolicy, KeywordPolicy};
use crate::config::Config;
use crate::diagnostics::Warning;
use crate::flow_graph::FlowGraph;
use crate::palette::Palette;
use crate::renderer::{ImageFormat, Renderer};
use crate::step_ast::Step;

pub use crate::error::{Error, Result};

/// The admission workflow used as a worked example.
pub const SAMPLE: &str = include_str!("../demos/admission.txt");

/// Parsed steps and the graph built from them, plus every warning raised
/// along the way (parser warnings first).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flow {
    pub steps: Vec<Step>,
    pub graph: FlowGraph,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub format: ImageFormat,
    pub image: Vec<u8>,
    pub warnings: Vec<Warning>,
}

pub fn build(input: &str) -> Flow {
    build_with_policy(input, &KeywordPolicy)
}

pub fn build_with_policy(input: &str, policy: &dyn ColorPolicy) -> Flow {
    let parsed = step_parser::parse_steps(input);
    let built = graph_builder::build_graph_with_policy(&parsed.steps, policy);
    let mut warnings = parsed.warnings;
    warnings.extend(built.warnings);
    Flow {
        steps: parsed.steps,
        graph: built.graph,
        warnings,
    }
}

/// DOT source for `input`, without running any renderer.
pub fn to_dot(input: &str, config: &Config) -> (String, Vec<Warning>) {
    let flow = build_with_policy(input, config.matching.policy());
    let dot = dot::write_dot(&flow.graph, &config.palette, config.wrap_width);
    (dot, flow.warnings)
}

/// Full pipeline with the Graphviz renderer described by `config`.
pub fn generate(input: &str, config: &Config) -> Result<Generation> {
    generate_with(input, config, &config.renderer())
}

pub fn generate_with(input: &str, config: &Config, renderer: &dyn Renderer) -> Result<Generation> {
    let flow = build_with_policy(input, config.matching.policy());
    let image = render_flow(&flow, config, renderer)?;
    Ok(Generation {
        format: config.renderer.format,
        image,
        warnings: flow.warnings,
    })
}

/// Render an already built flow. The warnings stay on `flow`, so callers
/// can report them before rendering and still have them if it fails.
pub fn render_flow(flow: &Flow, config: &Config, renderer: &dyn Renderer) -> Result<Vec<u8>> {
    renderer.render(&flow.graph, &config.palette, config.renderer.format)
}

/// Category names and their fill colors, for printing a key next to a diagram.
pub fn legend(palette: &Palette) -> Vec<(&'static str, &str)> {
    use crate::color::ColorCategory::*;
    [
        ("start/end", StartEnd),
        ("decision", Decision),
        ("action", Action),
        ("negative", Negative),
    ]
    .into_iter()
    .map(|(name, category)| (name, palette.fill(category)))
    .collect()
}
