use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::dot::write_dot;
use crate::error::{Error, Result};
use crate::flow_graph::FlowGraph;
use crate::palette::Palette;

pub const DEFAULT_PROGRAM: &str = "dot";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Pdf => "application/pdf",
        }
    }

    /// Fixed name the artifact is saved under.
    pub fn file_name(self) -> &'static str {
        match self {
            ImageFormat::Svg => "process_flow.svg",
            ImageFormat::Pdf => "process_flow.pdf",
        }
    }
}

/// Turns an abstract graph into a finished diagram document.
pub trait Renderer {
    fn render(&self, graph: &FlowGraph, palette: &Palette, format: ImageFormat) -> Result<Vec<u8>>;
}

/// Renders through an external Graphviz binary. The DOT document goes in
/// on stdin and the image comes back on stdout.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    wrap_width: Option<usize>,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            wrap_width: None,
        }
    }

    /// Arguments placed before the `-T<format>` flag.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_wrap_width(mut self, wrap_width: Option<usize>) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>> {
        tracing::debug!(program = %self.program, format = format.as_str(), "spawning renderer");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(format!("-T{}", format.as_str()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::RendererUnavailable {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let input = dot.to_string();
        // Detached: a descendant holding stdin open must not stall us.
        thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                // A renderer that exits without reading closes the pipe; its
                // exit status is what gets reported.
                let _ = stdin.write_all(input.as_bytes());
            }
        });
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        // `None` means the timeout is too large to represent: wait forever.
        let deadline = Instant::now().checked_add(self.timeout);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    abort(&mut child);
                    return Err(Error::Io(e));
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(program = %self.program, timeout = ?self.timeout, "renderer timed out, killing it");
                abort(&mut child);
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = self.drain(&stdout, deadline)?;
        let stderr = self.drain(&stderr, deadline)?;

        if !status.success() {
            return Err(Error::RendererFailed {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }

    /// Wait for a pipe to reach EOF. The renderer itself may have exited
    /// while something it spawned still holds the pipe open, so this is
    /// bounded by the same deadline.
    fn drain(&self, pipe: &Receiver<Vec<u8>>, deadline: Option<Instant>) -> Result<Vec<u8>> {
        let received = match deadline {
            Some(d) => pipe.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => pipe.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(buf) => Ok(buf),
            Err(RecvTimeoutError::Disconnected) => Ok(Vec::new()),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(program = %self.program, timeout = ?self.timeout, "renderer output still open at deadline");
                Err(self.timed_out())
            }
        }
    }

    fn timed_out(&self) -> Error {
        Error::RendererTimeout {
            program: self.program.clone(),
            timeout: self.timeout,
        }
    }
}

fn abort(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &FlowGraph, palette: &Palette, format: ImageFormat) -> Result<Vec<u8>> {
        let dot = write_dot(graph, palette, self.wrap_width);
        let image = self.run(&dot, format)?;
        tracing::info!(bytes = image.len(), format = format.as_str(), "rendered diagram");
        Ok(image)
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_is_default_format() {
        let format = ImageFormat::default();
        assert_eq!(format, ImageFormat::Svg);
        assert_eq!(format.content_type(), "image/svg+xml");
        assert_eq!(format.file_name(), "process_flow.svg");
    }

    #[test]
    fn pdf_format() {
        assert_eq!(ImageFormat::Pdf.as_str(), "pdf");
        assert_eq!(ImageFormat::Pdf.content_type(), "application/pdf");
    }

    #[test]
    fn builder_defaults() {
        let r = GraphvizRenderer::default();
        assert_eq!(r.program(), "dot");
        assert_eq!(r.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_program_is_unavailable() {
        let r = GraphvizRenderer::new("procflow-no-such-renderer");
        let err = r
            .render(&FlowGraph::default(), &Palette::default(), ImageFormat::Svg)
            .unwrap_err();
        assert!(
            matches!(err, Error::RendererUnavailable { ref program, .. } if program == "procflow-no-such-renderer"),
            "got: {err:?}"
        );
    }
}
