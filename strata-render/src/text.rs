//! Plain-text box-drawing output of rendered rows.
//!
//! Every column is two characters wide: the shape itself and a filler that
//! carries horizontal edges to the next column.

use strata_core::{Commit, CommitSet, RenderConfig, StrataResult, TextConfig};
use strata_dag::Dag;

use crate::line::{LinkLine, NodeLine, PadLine};
use crate::render_dag;
use crate::renderer::GraphRow;

/// Renders [`GraphRow`]s as terminal lines.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    config: TextConfig,
}

impl TextRenderer {
    pub fn new(config: TextConfig) -> StrataResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Lay out `dag` and render it in one go.
    pub fn render(
        &self,
        dag: &Dag,
        subset: Option<&CommitSet>,
        render_config: &RenderConfig,
    ) -> StrataResult<String> {
        let rows = render_dag(dag, subset, render_config)?;
        Ok(self.render_rows(dag, &rows).join("\n"))
    }

    /// One string per output line, trailing whitespace removed.
    pub fn render_rows(&self, dag: &Dag, rows: &[GraphRow]) -> Vec<String> {
        let mut out = Vec::new();
        for row in rows {
            let commit = dag.get(&row.hash);
            let glyph = self.glyph(commit);
            let mut messages = message_lines(row, commit).into_iter();

            let node: String = row
                .node_line
                .iter()
                .flat_map(|l| [node_char(*l, glyph), ' '])
                .collect();
            out.push(self.with_message(&node, messages.next()));

            for message in messages {
                let pad: String = row
                    .top_pad_lines
                    .iter()
                    .flat_map(|l| [pad_char(*l), ' '])
                    .collect();
                out.push(self.with_message(&pad, Some(message)));
            }

            if let Some(link_line) = &row.link_line {
                let link: String = link_line
                    .iter()
                    .flat_map(|l| [link_char(*l), filler_char(*l)])
                    .collect();
                out.push(link.trim_end().to_string());
            }

            if let Some(term_line) = &row.term_line {
                for mark in ['╎', '~'] {
                    let term: String = term_line
                        .iter()
                        .enumerate()
                        .flat_map(|(i, is_term)| {
                            let c = if *is_term {
                                mark
                            } else {
                                pad_char(row.pad_lines.get(i).copied().unwrap_or_default())
                            };
                            [c, ' ']
                        })
                        .collect();
                    out.push(term.trim_end().to_string());
                }
            }

            if row.has_ancestor_pad() {
                let pad: String = row
                    .pad_lines
                    .iter()
                    .flat_map(|l| [pad_char(*l), ' '])
                    .collect();
                out.push(pad.trim_end().to_string());
            }
        }
        out
    }

    fn glyph(&self, commit: Option<&Commit>) -> char {
        match commit {
            Some(c) if c.is_you_are_here => self.config.you_are_here_glyph,
            Some(c) if c.is_obsolete() => self.config.obsolete_glyph,
            Some(c) if c.is_head => self.config.head_glyph,
            _ => self.config.node_glyph,
        }
    }

    fn with_message(&self, graph: &str, message: Option<String>) -> String {
        let graph = graph.trim_end();
        match message {
            Some(message) if !message.is_empty() => {
                format!("{}{}{}", graph, " ".repeat(self.config.message_gap), message)
            }
            _ => graph.to_string(),
        }
    }
}

/// Short hash plus title, then the remaining description lines.
/// "You are here" rows show only their description.
fn message_lines(row: &GraphRow, commit: Option<&Commit>) -> Vec<String> {
    let Some(commit) = commit else {
        return vec![row.hash.short().to_string()];
    };
    if commit.is_you_are_here {
        return commit.description.lines().map(str::to_string).collect();
    }
    let title = commit.title();
    let mut lines = vec![if title.is_empty() {
        commit.hash.short().to_string()
    } else {
        format!("{} {}", commit.hash.short(), title)
    }];
    lines.extend(commit.description.lines().skip(1).map(str::to_string));
    lines
}

fn node_char(line: NodeLine, glyph: char) -> char {
    match line {
        NodeLine::Blank => ' ',
        NodeLine::Ancestor => '╎',
        NodeLine::Parent => '│',
        NodeLine::Node => glyph,
    }
}

fn pad_char(line: PadLine) -> char {
    match line {
        PadLine::Blank => ' ',
        PadLine::Ancestor => '╎',
        PadLine::Parent => '│',
    }
}

fn link_char(line: LinkLine) -> char {
    if line.is_crossing() {
        return if (line & LinkLine::VERTICAL).is_dashed() {
            '╎'
        } else {
            '│'
        };
    }
    match (line.goes_up(), line.goes_down(), line.goes_left(), line.goes_right()) {
        (true, true, false, false) => {
            if (line & LinkLine::VERTICAL).is_dashed() {
                '╎'
            } else {
                '│'
            }
        }
        (false, false, true, true) => {
            if (line & LinkLine::HORIZONTAL).is_dashed() {
                '┄'
            } else {
                '─'
            }
        }
        (true, true, false, true) => '├',
        (true, true, true, false) => '┤',
        (true, true, true, true) => '┼',
        (false, true, true, true) => '┬',
        (true, false, true, true) => '┴',
        (false, true, false, true) => '╭',
        (false, true, true, false) => '╮',
        (true, false, false, true) => '╰',
        (true, false, true, false) => '╯',
        (true, false, false, false) => '╵',
        (false, true, false, false) => '╷',
        (false, false, true, false) => '╴',
        (false, false, false, true) => '╶',
        (false, false, false, false) => ' ',
    }
}

/// Character between this column and the next.
fn filler_char(line: LinkLine) -> char {
    let solid = LinkLine::HORIZ_PARENT | LinkLine::RIGHT_MERGE_PARENT | LinkLine::RIGHT_FORK_PARENT;
    let dashed =
        LinkLine::HORIZ_ANCESTOR | LinkLine::RIGHT_MERGE_ANCESTOR | LinkLine::RIGHT_FORK_ANCESTOR;
    if line.intersects(solid) {
        '─'
    } else if line.intersects(dashed) {
        '┄'
    } else {
        ' '
    }
}
