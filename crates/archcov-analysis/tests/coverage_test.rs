//! Coverage metric, element naming and the summary text.

use archcov_analysis::coverage::stats::render_summary;
use archcov_analysis::coverage::{max_level, reported_nodes, CoverageCalculator};
use archcov_analysis::synthesis::PortKind;
use archcov_analysis::LedgerNode;
use archcov_core::config::AnalysisConfig;

fn node(level: u32, name: &str, parent: Option<&str>, ports: u32) -> LedgerNode {
    let mut node = LedgerNode::new(level, name);
    node.parent_name = parent.map(str::to_string);
    for _ in 0..ports {
        node.count_port(PortKind::Structural);
    }
    node
}

#[test]
fn test_level_one_weighs_interface_ports() {
    let mut top = node(1, "A", None, 3);
    top.count_port(PortKind::Interface);
    top.count_port(PortKind::Interface);

    let calculator = CoverageCalculator::default();
    assert!((calculator.effective_port_count(&top) - 5.4).abs() < 1e-9);

    let weighted = CoverageCalculator::new(&AnalysisConfig {
        interface_port_weight: Some(2.0),
        ..Default::default()
    });
    assert!((weighted.effective_port_count(&top) - 7.0).abs() < 1e-9);

    // Below level 1 every port counts once.
    let mut deeper = node(2, "B", Some("A"), 3);
    deeper.count_port(PortKind::Interface);
    assert_eq!(calculator.effective_port_count(&deeper), 4.0);
}

#[test]
fn test_coverage_is_zero_without_children_or_child_ports() {
    let mut nodes = vec![
        node(1, "Lonely", None, 4),
        node(1, "Silent", None, 4),
        node(2, "Mute", Some("Silent"), 0),
        node(2, "Leaf", Some("Other"), 2),
    ];
    CoverageCalculator::default().compute(&mut nodes);

    assert_eq!(nodes[0].child_count, 0);
    assert_eq!(nodes[0].coverage, 0.0);
    assert_eq!(nodes[1].child_count, 1);
    assert_eq!(nodes[1].child_port_sum, 0);
    assert_eq!(nodes[1].coverage, 0.0);
}

#[test]
fn test_children_are_matched_one_level_down_only() {
    let mut nodes = vec![
        node(1, "A", None, 2),
        node(2, "B", Some("A"), 1),
        node(2, "C", Some("A"), 3),
        node(3, "B", Some("C"), 5),
        node(3, "Z", Some("A"), 7),
        node(4, "W", Some("B"), 1),
    ];
    CoverageCalculator::default().compute(&mut nodes);

    assert_eq!(nodes[0].coverage, 2.0 * 2.0 * 4.0);
    assert_eq!(nodes[1].coverage, 0.0);
    assert_eq!(nodes[2].coverage, 3.0 * 1.0 * 5.0);
    // the level-3 `B` owns `W` even though a level-2 `B` exists
    assert_eq!(nodes[3].child_count, 1);
    assert_eq!(nodes[3].coverage, 5.0);
    assert_eq!(nodes[5].coverage, 0.0);
}

#[test]
fn test_compute_is_repeatable() {
    let mut nodes = vec![node(1, "A", None, 2), node(2, "B", Some("A"), 3)];
    let calculator = CoverageCalculator::default();
    calculator.compute(&mut nodes);
    let once = nodes.clone();
    calculator.compute(&mut nodes);
    assert_eq!(nodes, once);
}

#[test]
fn test_reported_nodes_are_named_after_the_model() {
    let mut x = node(2, "X", Some("A"), 1);
    x.add_use("Y", 2);
    let nodes = vec![
        node(1, "A", None, 2),
        node(2, "Y", Some("A"), 1),
        x,
        node(3, "k", Some("X"), 2),
    ];
    assert_eq!(max_level(&nodes), 3);

    let reported = reported_nodes(&nodes, "Model");
    let names: Vec<&str> = reported.iter().map(|r| r.element_name.as_str()).collect();
    assert_eq!(names, vec!["Model", "Model.X", "Model.Y"]);
    assert_eq!(reported[1].path, "A.X");
    assert_eq!(reported[1].qualified_uses(), vec![("Model.Y".to_string(), 2)]);
}

#[test]
fn test_single_level_reports_nothing() {
    let nodes = vec![node(1, "A", None, 2), node(1, "B", None, 1)];
    assert!(reported_nodes(&nodes, "Model").is_empty());
    assert!(reported_nodes(&[], "Model").is_empty());
    assert_eq!(render_summary(&nodes), "");
}

#[test]
fn test_summary_lines_sorted_by_level_then_name() {
    let mut top = node(1, "A", None, 2);
    top.count_port(PortKind::Interface);
    let mut nodes = vec![
        top,
        node(2, "Y", Some("A"), 1),
        node(2, "X", Some("A"), 2),
        node(3, "k", Some("X"), 4),
    ];
    CoverageCalculator::default().compute(&mut nodes);

    assert_eq!(
        render_summary(&nodes),
        "[L1] Name: A\tL1Ports(Weighted)=3.2\tL2Count=2\tL2Ports=3\n\
         [L2] Name: X\tL2Ports=2\tL3Count=1\tL3Ports=4\n\
         [L2] Name: Y\tL2Ports=1\tL3Count=0\tL3Ports=0\n"
    );
}
