use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use strata_core::{Commit, CommitSet, RenderConfig, TieBreak};
use strata_dag::Dag;
use strata_render::{render_dag, LayoutDigest, TextRenderer};

/// `stacks` draft stacks of `depth` commits each, hanging off a public
/// trunk, with a merge commit closing every other stack.
fn bench_dag(trunk: usize, stacks: usize, depth: usize) -> Dag {
    let mut commits = Vec::new();
    for i in 0..trunk {
        let parents: Vec<String> = if i == 0 {
            Vec::new()
        } else {
            vec![format!("t{}", i - 1)]
        };
        commits.push(Commit::new(format!("t{}", i), parents).with_phase(strata_core::Phase::Public));
    }
    for s in 0..stacks {
        let base = format!("t{}", (s * 7) % trunk);
        for d in 0..depth {
            let parent = if d == 0 {
                base.clone()
            } else {
                format!("s{}-{}", s, d - 1)
            };
            commits.push(Commit::new(format!("s{}-{}", s, d), [parent]));
        }
        if s % 2 == 1 {
            commits.push(Commit::new(
                format!("m{}", s),
                [format!("s{}-{}", s, depth - 1), format!("s{}-{}", s - 1, depth - 1)],
            ));
        }
    }
    Dag::from_commits(commits).expect("build bench dag")
}

fn bench_render(c: &mut Criterion) {
    let dag = bench_dag(200, 40, 8);
    let config = RenderConfig {
        tie_break: TieBreak::HashOrder,
        ..RenderConfig::default()
    };

    c.bench_function("render/full_dag", |b| {
        b.iter(|| {
            let rows = render_dag(black_box(&dag), None, &config).expect("render");
            black_box(rows.len());
        });
    });

    let subset: CommitSet = dag
        .all()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % 3 == 0)
        .map(|(_, h)| h)
        .collect();
    c.bench_function("render/subset_dag", |b| {
        b.iter(|| {
            let rows = render_dag(black_box(&dag), Some(&subset), &config).expect("render subset");
            black_box(rows.len());
        });
    });

    let rows = render_dag(&dag, None, &config).expect("render");
    let text = TextRenderer::default();
    c.bench_function("render/text", |b| {
        b.iter(|| {
            let lines = text.render_rows(&dag, black_box(&rows));
            black_box(lines.len());
        });
    });
    c.bench_function("render/digest", |b| {
        b.iter(|| black_box(LayoutDigest::of(black_box(&rows))));
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
