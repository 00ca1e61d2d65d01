//! Fuzz test for the graph renderer
//!
//! Decodes arbitrary bytes into a commit graph (cycles, missing parents and
//! self references included) plus a subset, and renders it. Rendering must
//! either fail with an error or produce rows whose lines agree in width.
//!
//! Run with: cargo +nightly fuzz run render_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_core::{Commit, CommitSet, Phase, RenderConfig, TieBreak};
use strata_dag::Dag;
use strata_render::{render_dag, LayoutDigest, TextRenderer};

/// Three bytes per commit: parent count and flags, then two parent picks.
/// Picks may point forward, so cycles are possible.
fn decode(data: &[u8]) -> (Dag, CommitSet, RenderConfig) {
    let chunks: Vec<&[u8]> = data.chunks_exact(3).take(64).collect();
    let n = chunks.len().max(1);
    let mut dag = Dag::new();
    let mut subset = CommitSet::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let flags = chunk[0];
        let mut parents = Vec::new();
        for pick in chunk[1..].iter().take((flags % 3) as usize) {
            // Values past the commit count name parents that are not loaded.
            let p = *pick as usize % (n + 4);
            parents.push(format!("c{}", p));
        }
        let mut commit = Commit::new(format!("c{}", i), parents);
        if flags & 0x08 != 0 {
            commit = commit.with_phase(Phase::Public);
        }
        // Self parents are rejected by the DAG; skip those commits.
        if dag.add(commit).is_ok() && flags & 0x10 == 0 {
            subset.insert(format!("c{}", i).into());
        }
    }
    let flags = data.first().copied().unwrap_or(0);
    let config = RenderConfig {
        reserve_public_column: flags & 0x20 != 0,
        ignore_anonymous_parents: flags & 0x40 != 0,
        tie_break: if flags & 0x80 != 0 {
            TieBreak::HashOrder
        } else {
            TieBreak::NewestFirst
        },
    };
    (dag, subset, config)
}

fuzz_target!(|data: &[u8]| {
    let (dag, subset, config) = decode(data);

    for subset in [None, Some(&subset)] {
        let Ok(rows) = render_dag(&dag, subset, &config) else {
            continue;
        };
        for row in &rows {
            let width = row.node_line.len();
            assert!(row.node_column < width, "node column out of range");
            assert_eq!(row.pad_lines.len(), width);
            assert_eq!(row.top_pad_lines.len(), width);
            if let Some(link) = &row.link_line {
                assert_eq!(link.len(), width);
            }
            if let Some(term) = &row.term_line {
                assert_eq!(term.len(), width);
            }
            assert!(row.parent_columns.iter().all(|c| *c < width));
        }

        // Rendering is deterministic.
        let again = render_dag(&dag, subset, &config).expect("second render");
        assert_eq!(LayoutDigest::of(&rows), LayoutDigest::of(&again));

        let _ = TextRenderer::default().render_rows(&dag, &rows);
    }
});
