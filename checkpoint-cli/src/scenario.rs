//! Scenario files: a JSON description of how an error travels up a call stack.
//!
//! ```json
//! {
//!   "ignore_eof": false,
//!   "steps": [
//!     { "op": "raise", "message": "A" },
//!     { "op": "from", "at": { "file": "x.go", "line": 10 } },
//!     { "op": "wrap", "message": "B", "at": { "file": "x.go", "line": 11 } }
//!   ]
//! }
//! ```

use std::path::Path;

use checkpoint::{chain, Annotator, DefinedError, Link, NoSite, SharedError, Site};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("step {index}: line numbers start at 1")]
    InvalidLine { index: usize },
}

/// A pinned location for a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct At {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Replace the current error with a fresh defined error
    Raise { message: String },
    /// Replace the current error with an error from outside the chain
    Foreign { message: String },
    /// Replace the current error with the end-of-stream sentinel
    Eof,
    /// Annotate the current error
    From {
        #[serde(default)]
        at: Option<At>,
    },
    /// Wrap the current error, optionally described by a new error
    Wrap {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        at: Option<At>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Let the end-of-stream sentinels through unannotated
    #[serde(default)]
    pub ignore_eof: bool,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        for (index, step) in self.steps.iter().enumerate() {
            let at = match step {
                Step::From { at } | Step::Wrap { at, .. } => at,
                _ => continue,
            };
            if at.as_ref().is_some_and(|at| at.line == 0) {
                return Err(ScenarioError::InvalidLine { index });
            }
        }
        Ok(())
    }

    /// Run all steps and return the final error, if any is left.
    pub fn run(&self) -> Option<SharedError> {
        let mut current: Option<SharedError> = None;

        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, ?step, "applying step");
            current = match step {
                Step::Raise { message } => Some(DefinedError::shared(message.clone())),
                Step::Foreign { message } => {
                    Some(checkpoint::shared(std::io::Error::other(message.clone())))
                }
                Step::Eof => Some(checkpoint::eof()),
                Step::From { at } => self.annotator(at.as_ref()).from(current),
                Step::Wrap { message, at } => {
                    let described = message.clone().map(DefinedError::shared);
                    self.annotator(at.as_ref()).wrap(current, described)
                }
            };
        }

        current
    }

    fn annotator(&self, at: Option<&At>) -> Annotator {
        let annotator = match at {
            Some(at) => Annotator::new().with_locator(Site::new(&at.file, at.line)),
            // Real sites would point into this binary, not into the scenario.
            None => Annotator::new().with_locator(NoSite),
        };
        if self.ignore_eof {
            annotator.with_option(checkpoint::ignore_eof())
        } else {
            annotator
        }
    }
}

/// One line of the link summary
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub kind: &'static str,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub message: String,
}

/// Everything the CLI prints about a finished scenario
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub trace: Option<String>,
    pub depth: usize,
    pub links: Vec<LinkReport>,
}

impl Report {
    pub fn new(err: Option<&SharedError>) -> Self {
        let Some(err) = err else {
            return Self {
                trace: None,
                depth: 0,
                links: Vec::new(),
            };
        };

        let links = chain::links(&**err)
            .map(|link| {
                let site = match link {
                    Link::Checkpoint(cp) => cp.site(),
                    Link::Foreign(_) => None,
                };
                LinkReport {
                    kind: link.kind().as_str(),
                    file: site.map(|s| s.file().to_string()),
                    line: site.map(|s| s.line()),
                    message: link.message(),
                }
            })
            .collect::<Vec<_>>();

        Self {
            trace: Some(err.to_string()),
            depth: links.len(),
            links,
        }
    }
}
