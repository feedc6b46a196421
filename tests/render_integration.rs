//! End-to-end tests: tree document in, SVG out

use orgchart::layout::connectors;
use orgchart::{
    compute, generate, render_tree, render_with_config, GeneratorConfig, LayoutConfig, OrgTree,
    RenderConfig, Stylesheet, SvgConfig,
};
use pretty_assertions::assert_eq;

/// CEO with two managers, each with eight individual contributors
fn two_grids() -> String {
    let mut doc = String::from("[root]\nid = \"ceo\"\nname = \"Ada King\"\nrole = \"CEO\"\n");
    for m in 0..2 {
        doc.push_str(&format!(
            "\n[[root.children]]\nid = \"m{m}\"\nname = \"Manager {m}\"\nrole = \"Manager\"\n"
        ));
        for r in 0..8 {
            doc.push_str(&format!(
                "\n[[root.children.children]]\nid = \"m{m}-r{r}\"\nname = \"Report {r}\"\nrole = \"Developer\"\n"
            ));
        }
    }
    doc
}

fn tree() -> OrgTree {
    OrgTree::from_toml_str(&two_grids(), Default::default()).expect("Should parse")
}

fn card_count(svg: &str) -> usize {
    svg.matches("<g id=").count()
}

#[test]
fn test_two_managers_render_every_card() {
    let svg = render_with_config(&two_grids(), &RenderConfig::default()).expect("Should render");
    assert_eq!(card_count(&svg), 19);
    assert_eq!(svg.matches(r#"data-layout="vertical""#).count(), 16);
    assert_eq!(svg.matches(r#"data-layout="horizontal""#).count(), 2);
    assert_eq!(svg.matches("oc-connector oc-vertical").count(), 16);
    assert_eq!(svg.matches("oc-connector oc-horizontal").count(), 2);
}

#[test]
fn test_managers_separated_by_gap_and_grids() {
    let tree = tree();
    let config = LayoutConfig::default();
    let layout = compute(&tree, &config).unwrap();

    let m0 = layout.placement(tree.find("m0").unwrap()).unwrap();
    let m1 = layout.placement(tree.find("m1").unwrap()).unwrap();
    let separation = m1.x - m0.x;
    assert!(separation >= config.gap_x + m0.subtree.width / 2.0 + m1.subtree.width / 2.0);

    // grids of 4 + 4 never reach the other manager's cards
    let m0_cards: Vec<_> = (0..8)
        .map(|r| layout.card_bounds(&tree, tree.find(&format!("m0-r{r}")).unwrap()).unwrap())
        .collect();
    let m1_cards: Vec<_> = (0..8)
        .map(|r| layout.card_bounds(&tree, tree.find(&format!("m1-r{r}")).unwrap()).unwrap())
        .collect();
    for a in &m0_cards {
        for b in &m1_cards {
            assert!(!a.intersects(b));
        }
    }
}

#[test]
fn test_toggle_collapses_and_reexpands() {
    let mut tree = tree();
    let config = RenderConfig::default();

    assert!(!tree.toggle("m0").unwrap());
    let svg = render_tree(&tree, &config).unwrap();
    assert_eq!(card_count(&svg), 11);
    assert!(!svg.contains(r#"id="m0-r0""#));
    assert!(svg.contains("oc-toggle oc-collapsed"));

    assert!(tree.toggle("m0").unwrap());
    let svg = render_tree(&tree, &config).unwrap();
    assert_eq!(card_count(&svg), 19);
}

#[test]
fn test_collapsed_root_renders_alone() {
    let mut tree = tree();
    tree.toggle("ceo").unwrap();
    let layout = compute(&tree, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.len(), 1);
    assert!(connectors(&tree, &layout).is_empty());

    // collapse is sticky for the descendants
    tree.toggle("ceo").unwrap();
    let layout = compute(&tree, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.len(), 3);
}

#[test]
fn test_connectors_start_at_parent_bottom() {
    let tree = tree();
    let layout = compute(&tree, &LayoutConfig::default()).unwrap();
    for connector in connectors(&tree, &layout) {
        let parent = layout.card_bounds(&tree, connector.parent).unwrap();
        let d = connector.path.to_svg_d();
        let expected = format!("M{:.2} {:.2}", parent.center().x, parent.bottom());
        assert!(d.starts_with(&expected), "{d} should start at {expected}");
    }
}

#[test]
fn test_custom_stylesheet_colors_connectors() {
    let stylesheet = Stylesheet::from_str(
        r##"
[colors]
connector = "#ff0000"
"##,
    )
    .expect("Should parse stylesheet");
    let config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_svg(SvgConfig::default().without_class_prefix());
    let svg = render_with_config(&two_grids(), &config).unwrap();
    assert!(svg.contains(r##"stroke="#ff0000""##));
    assert!(svg.contains(r#"class="connector horizontal""#));
}

#[test]
fn test_generated_tree_round_trips_and_renders() {
    let generated = generate(&GeneratorConfig::new(11).with_max_depth(3)).unwrap();
    let document = generated.to_toml_string().unwrap();
    let parsed = OrgTree::from_toml_str(&document, Default::default()).unwrap();

    assert_eq!(parsed.len(), generated.len());
    assert_eq!(parsed.visible().count(), generated.visible().count());

    let svg = render_tree(&parsed, &RenderConfig::default()).unwrap();
    assert_eq!(card_count(&svg), parsed.visible().count());
}
