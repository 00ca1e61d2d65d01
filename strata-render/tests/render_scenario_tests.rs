use strata_core::{commit_set, Commit, EdgeKind, RenderConfig, TieBreak};
use strata_dag::Dag;
use strata_render::{render_dag, LinkLine, PadLine, TextRenderer};
use strata_test_utils::assertions::{assert_dag_error, assert_rows_well_formed};
use strata_test_utils::fixtures::{
    dag_from_edges, diamond, fork, hash_order_config, linear_chain, stack_on_trunk,
};

fn text(dag: &Dag, config: &RenderConfig) -> Vec<String> {
    let rows = render_dag(dag, None, config).unwrap();
    assert_rows_well_formed(&rows);
    TextRenderer::default().render_rows(dag, &rows)
}

#[test]
fn linear_chain_stays_in_one_column() {
    let dag = linear_chain(6);
    let rows = render_dag(&dag, None, &hash_order_config()).unwrap();
    assert!(rows.iter().all(|r| r.node_column == 0 && r.width() == 1));
    assert!(rows[0].is_head);
    assert!(rows[5].is_root);
}

#[test]
fn fork_draws_second_child_beside_first() {
    assert_eq!(
        text(&fork(), &hash_order_config()),
        vec!["o  B", "│ o  C", "├─╯", "o  A"]
    );
}

#[test]
fn diamond_merges_and_forks() {
    let dag = diamond();
    let rows = render_dag(&dag, None, &hash_order_config()).unwrap();
    assert!(rows[0].merge);
    let link = rows[0].link_line.as_ref().unwrap();
    assert!(link[0].contains(LinkLine::RIGHT_MERGE_PARENT));
    assert!(!link[0].contains(LinkLine::LEFT_MERGE_PARENT));
    assert_eq!(
        text(&dag, &hash_order_config()),
        vec!["o  D", "├─╮", "o │  B", "│ o  C", "├─╯", "o  A"]
    );
}

#[test]
fn public_trunk_keeps_first_column() {
    assert_eq!(
        text(&stack_on_trunk(), &hash_order_config()),
        vec![
            "o  P3",
            "o  P2",
            "│ +  You are here",
            "│ @  D2 second draft",
            "│ o  D1 first draft",
            "├─╯",
            "o  P1",
        ]
    );
}

#[test]
fn without_reservation_drafts_take_first_column() {
    let config = RenderConfig {
        reserve_public_column: false,
        ..hash_order_config()
    };
    let rows = render_dag(&stack_on_trunk(), None, &config).unwrap();
    let p3 = rows.iter().find(|r| r.hash.as_str() == "P3").unwrap();
    assert_eq!(p3.node_column, 0);
    assert_rows_well_formed(&rows);
}

#[test]
fn elided_commit_becomes_dashed_edge() {
    let dag = dag_from_edges(&[("A", &[]), ("B", &["A"]), ("C", &["B"])]);
    let subset = commit_set(["A", "C"]);
    let rows = render_dag(&dag, Some(&subset), &hash_order_config()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].hash.as_str(), "C");
    assert_eq!(rows[0].pad_lines, vec![PadLine::Ancestor]);
    assert_eq!(rows[1].incoming_edge, Some(EdgeKind::Ancestor));
    assert!(rows.iter().all(|r| r.hash.as_str() != "B"));
    assert!(rows.iter().all(|r| r.term_line.is_none()));
}

#[test]
fn elided_root_ends_in_terminator() {
    let dag = dag_from_edges(&[("A", &[]), ("B", &["A"]), ("C", &["B"])]);
    let subset = commit_set(["B", "C"]);
    let rows = render_dag(&dag, Some(&subset), &hash_order_config()).unwrap();
    assert_eq!(rows[1].term_line, Some(vec![true]));
    let lines = TextRenderer::default().render_rows(&dag, &rows);
    assert_eq!(lines, vec!["o  C", "o  B", "╎", "~"]);
}

#[test]
fn newest_first_orders_siblings_by_date() {
    use chrono::{TimeZone, Utc};
    let dag = Dag::from_commits([
        Commit::new("A", Vec::<&str>::new()),
        Commit::new("B", ["A"]).with_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        Commit::new("C", ["A"]).with_date(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
    ])
    .unwrap();
    let config = RenderConfig {
        tie_break: TieBreak::NewestFirst,
        ..RenderConfig::default()
    };
    let rows = render_dag(&dag, None, &config).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.hash.as_str()).collect();
    assert_eq!(order, vec!["C", "B", "A"]);
}

#[test]
fn config_file_drives_layout() {
    let config = RenderConfig::from_toml_str(
        r#"
        reserve_public_column = false
        tie_break = "hash_order"
        "#,
    )
    .unwrap();
    assert_eq!(
        text(&fork(), &config),
        vec!["o  B", "│ o  C", "├─╯", "o  A"]
    );
}

#[test]
fn cyclic_input_is_rejected() {
    let dag = dag_from_edges(&[("A", &["B"]), ("B", &["A"])]);
    assert_dag_error(&render_dag(&dag, None, &hash_order_config()));
}

#[test]
fn unknown_subset_member_is_rejected() {
    let dag = fork();
    let subset = commit_set(["A", "Z"]);
    assert_dag_error(&render_dag(&dag, Some(&subset), &hash_order_config()));
}
