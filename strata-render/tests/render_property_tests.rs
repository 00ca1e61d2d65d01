use proptest::prelude::*;
use strata_core::{CommitSet, RenderConfig};
use strata_dag::Dag;
use strata_render::{render_dag, LayoutDigest, RowTiles, TextRenderer};
use strata_test_utils::assertions::{assert_rows_cover, assert_rows_well_formed};
use strata_test_utils::generators::{arb_dag, arb_dag_with_subset, arb_render_config};

/// A row gets a terminator only if one of its parents never reconnects to
/// the rendered set.
fn has_dangling_parent(dag: &Dag, subset: &CommitSet, hash: &strata_core::CommitHash) -> bool {
    dag.parent_hashes(hash).iter().any(|p| {
        !dag.contains(p)
            || (!subset.contains(p)
                && dag
                    .ancestors(&CommitSet::from([p.clone()]))
                    .is_disjoint(subset))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn full_render_is_well_formed(dag in arb_dag(), config in arb_render_config()) {
        let rows = render_dag(&dag, None, &config).unwrap();
        assert_rows_cover(&rows, &dag.all());
        assert_rows_well_formed(&rows);
    }

    #[test]
    fn subset_render_is_well_formed(
        (dag, subset) in arb_dag_with_subset(),
        config in arb_render_config(),
    ) {
        let rows = render_dag(&dag, Some(&subset), &config).unwrap();
        assert_rows_cover(&rows, &subset);
        assert_rows_well_formed(&rows);
    }

    #[test]
    fn terminators_only_where_chains_end((dag, subset) in arb_dag_with_subset()) {
        let rows = render_dag(&dag, Some(&subset), &RenderConfig::default()).unwrap();
        for row in &rows {
            let dangling = has_dangling_parent(&dag, &subset, &row.hash);
            prop_assert_eq!(row.term_line.is_some(), dangling, "row {}", row.hash);
        }
    }

    #[test]
    fn ignored_anonymous_parents_never_terminate((dag, subset) in arb_dag_with_subset()) {
        let config = RenderConfig {
            ignore_anonymous_parents: true,
            ..RenderConfig::default()
        };
        let rows = render_dag(&dag, Some(&subset), &config).unwrap();
        prop_assert!(rows.iter().all(|r| r.term_line.is_none()));
    }

    #[test]
    fn rerender_is_identical(dag in arb_dag(), config in arb_render_config()) {
        let first = render_dag(&dag, None, &config).unwrap();
        let second = render_dag(&dag, None, &config).unwrap();
        prop_assert_eq!(LayoutDigest::of(&first), LayoutDigest::of(&second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_output_has_a_line_per_row_at_least(dag in arb_dag()) {
        let rows = render_dag(&dag, None, &RenderConfig::default()).unwrap();
        let lines = TextRenderer::default().render_rows(&dag, &rows);
        prop_assert!(lines.len() >= rows.len());
        prop_assert!(lines.iter().all(|l| l == l.trim_end()));
    }

    #[test]
    fn tiles_match_row_widths(dag in arb_dag()) {
        let rows = render_dag(&dag, None, &RenderConfig::default()).unwrap();
        for row in &rows {
            let tiles = RowTiles::of(row);
            prop_assert_eq!(tiles.node.len(), row.width());
            prop_assert_eq!(tiles.pad.len(), row.width());
            if let Some(link) = &tiles.link {
                prop_assert_eq!(link.len(), row.width());
            }
            // The node tile omits its upper stub on head rows and its lower
            // stub on root rows.
            let node = &tiles.node[row.node_column];
            prop_assert_eq!(node.iter().any(|e| e.y1 < 0), !row.is_head);
            prop_assert_eq!(node.iter().any(|e| e.y2 > 0), !row.is_root);
        }
    }
}
