use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use std::{io::BufRead, str::FromStr};

use crate::{
    line_reader::LineReader,
    pnc_framework::importable::Importable,
    pnc_objects::node::{NodeId, NodeType},
};

pub const HEADER: &str = "net";

pub const FORMAT_SPECIFICATION: &str = "A Petri net is a line-based, tab-indented structure.
The first non-empty line is exactly `net'.
Each node starts with a line `node' indented by one tab, followed by properties indented by two tabs:
`type=place' or `type=transition', `id=<integer>', and optionally `label=<text>', `tokens=<natural>' (initial marking) and `end_tokens=<natural>' (final marking).
Each arc starts with a line `arc' indented by one tab, followed by the properties `from=<id>' and `to=<id>'.
Blank lines are ignored.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub node_type: NodeType,
    pub id: NodeId,
    pub label: String,
    pub tokens: Option<u64>,
    pub end_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcRecord {
    pub from: NodeId,
    pub to: NodeId,
}

/// A net as it was written down: node and arc records in file order, not yet checked for structural consistency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetDescription {
    pub nodes: Vec<NodeRecord>,
    pub arcs: Vec<ArcRecord>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Node,
    Arc,
}

struct Record {
    kind: RecordKind,
    line_number: usize,
    properties: IndexMap<String, String>,
}

impl Record {
    fn require(&self, name: &str) -> Result<&str> {
        self.properties
            .get(name)
            .map(|value| value.as_str())
            .ok_or_else(|| {
                anyhow!(
                    "record starting at line {} has no `{}`",
                    self.line_number,
                    name
                )
            })
    }

    fn parse_required<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self.require(name)?;
        value.parse::<T>().map_err(|_| {
            anyhow!(
                "record starting at line {} has an invalid `{}`; found `{}`",
                self.line_number,
                name,
                value
            )
        })
    }

    fn parse_optional<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.properties.get(name) {
            Some(_) => Ok(Some(self.parse_required(name)?)),
            None => Ok(None),
        }
    }

    fn finish(self, description: &mut NetDescription) -> Result<()> {
        match self.kind {
            RecordKind::Node => {
                let node_type = self.parse_required::<NodeType>("type").with_context(|| {
                    format!("node type must be `{}` or `{}`", NodeType::Place, NodeType::Transition)
                })?;
                description.nodes.push(NodeRecord {
                    node_type,
                    id: self.parse_required("id")?,
                    label: self.properties.get("label").cloned().unwrap_or_default(),
                    tokens: self.parse_optional("tokens")?,
                    end_tokens: self.parse_optional("end_tokens")?,
                });
            }
            RecordKind::Arc => {
                description.arcs.push(ArcRecord {
                    from: self.parse_required("from")?,
                    to: self.parse_required("to")?,
                });
            }
        }
        Ok(())
    }
}

impl Importable for NetDescription {
    fn import(reader: &mut dyn BufRead) -> Result<Self> {
        let mut lreader = LineReader::new(reader);
        let mut description = NetDescription::default();
        let mut seen_header = false;
        let mut current: Option<Record> = None;

        while lreader.next_line()? {
            let line_number = lreader.get_last_line_number();
            let depth = lreader.get_indentation();
            let line = lreader.get_last_line().trim();

            match depth {
                0 => {
                    if !line.eq_ignore_ascii_case(HEADER) {
                        return Err(anyhow!(
                            "line {} should be exactly `{}`, but found `{}`",
                            line_number,
                            HEADER,
                            line
                        ));
                    }
                    if seen_header {
                        return Err(anyhow!(
                            "second net found at line {}; a file can contain only one net",
                            line_number
                        ));
                    }
                    seen_header = true;
                }
                1 => {
                    if !seen_header {
                        return Err(anyhow!(
                            "line {} appears before the `{}` header",
                            line_number,
                            HEADER
                        ));
                    }
                    if let Some(record) = current.take() {
                        record.finish(&mut description)?;
                    }

                    let kind = match line.to_lowercase().as_str() {
                        "node" => RecordKind::Node,
                        "arc" => RecordKind::Arc,
                        _ => {
                            return Err(anyhow!(
                                "line {} should be `node` or `arc`, but found `{}`",
                                line_number,
                                line
                            ));
                        }
                    };
                    current = Some(Record {
                        kind,
                        line_number,
                        properties: IndexMap::new(),
                    });
                }
                2 => {
                    let record = current.as_mut().ok_or_else(|| {
                        anyhow!(
                            "property at line {} does not belong to a node or an arc",
                            line_number
                        )
                    })?;
                    let (name, value) = line.split_once('=').ok_or_else(|| {
                        anyhow!(
                            "line {} should be of the form `name=value`, but found `{}`",
                            line_number,
                            line
                        )
                    })?;

                    let name = name.trim().to_string();
                    if record.properties.contains_key(&name) {
                        return Err(anyhow!(
                            "property `{}` is repeated at line {}",
                            name,
                            line_number
                        ));
                    }
                    record.properties.insert(name, value.trim().to_string());
                }
                _ => {
                    return Err(anyhow!(
                        "line {} is indented by {} tabs, while at most 2 are allowed",
                        line_number,
                        depth
                    ));
                }
            }
        }

        if let Some(record) = current.take() {
            record.finish(&mut description)?;
        }

        if !seen_header {
            return Err(anyhow!("no net found; the input should start with `{}`", HEADER));
        }

        Ok(description)
    }
}

impl FromStr for NetDescription {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut reader = std::io::Cursor::new(s);
        Self::import(&mut reader)
    }
}
