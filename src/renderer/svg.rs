//! SVG generation from tree layouts

use crate::layout::{connectors, BoundingBox, Connector, Placement, TreeLayout};
use crate::stylesheet::Stylesheet;
use crate::tree::{NodeId, OrgTree};

use super::SvgConfig;

/// Avatar circle radius
const AVATAR_RADIUS: f64 = 18.0;
/// Left inset of the avatar center inside a card
const AVATAR_INSET: f64 = 28.0;
/// Left inset of the text column inside a card
const TEXT_INSET: f64 = 56.0;
/// Baseline of the first text line and distance between lines
const FIRST_LINE: f64 = 28.0;
const LINE_HEIGHT: f64 = 18.0;
/// Radius of the expand/collapse indicator
const TOGGLE_RADIUS: f64 = 10.0;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    cards: Vec<String>,
    connections: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            cards: vec![],
            connections: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet, sorted by token
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut tokens: Vec<_> = stylesheet.colors.iter().collect();
        tokens.sort();

        let mut css = String::from(":root {\n");
        for (token, value) in tokens {
            css.push_str(&format!("    --{}: {};\n", token, value));
        }
        css.push_str("  }");
        let prefix = self.prefix();
        css.push_str(&format!(
            "\n  .{prefix}name {{ font-weight: 600; }} .{prefix}detail {{ font-size: 11px; }}"
        ));
        self.styles.push(css);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn class(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push_card_line(&mut self, line: String) {
        let indented = format!("{}{}", self.indent_str(), line);
        self.cards.push(indented);
    }

    /// Open a card group
    pub fn start_card(&mut self, id: &str, classes: &[String], style: Option<&str>) {
        let class_list = std::iter::once(self.class("card"))
            .chain(classes.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        let style_attr = style
            .map(|s| format!(r#" data-layout="{}""#, s))
            .unwrap_or_default();
        self.push_card_line(format!(
            r#"<g id="{}" class="{}"{}>"#,
            escape_xml(id),
            class_list,
            style_attr
        ));
        self.indent += 1;
    }

    /// Close a card group
    pub fn end_card(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push_card_line("</g>".to_string());
    }

    /// Add the card body rectangle
    pub fn add_card_body(&mut self, bounds: &BoundingBox, fill: &str, stroke: &str) {
        let class = self.class("card-body");
        let r = self.config.corner_radius;
        self.push_card_line(format!(
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}"/>"#,
            class, bounds.x, bounds.y, bounds.width, bounds.height, r, fill, stroke
        ));
    }

    /// Add an avatar circle with centered initials
    pub fn add_avatar(&mut self, cx: f64, cy: f64, fill: &str, initials: &str, text_fill: &str) {
        let class = self.class("avatar");
        self.push_card_line(format!(
            r#"<circle class="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            class, cx, cy, AVATAR_RADIUS, fill
        ));
        let text_class = self.class("initials");
        self.push_card_line(format!(
            r#"<text class="{}" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="{}">{}</text>"#,
            text_class,
            cx,
            cy,
            text_fill,
            escape_xml(initials)
        ));
    }

    /// Add one text line of a card
    pub fn add_text(&mut self, class: &str, text: &str, x: f64, y: f64, fill: &str) {
        let class = self.class(class);
        self.push_card_line(format!(
            r#"<text class="{}" x="{}" y="{}" fill="{}">{}</text>"#,
            class,
            x,
            y,
            fill,
            escape_xml(text)
        ));
    }

    /// Add the expand/collapse indicator centered on a card's bottom edge
    pub fn add_toggle(&mut self, cx: f64, cy: f64, expanded: bool, child_count: usize, colors: (&str, &str)) {
        let (fill, stroke) = colors;
        let state = if expanded { "expanded" } else { "collapsed" };
        let class = format!("{} {}", self.class("toggle"), self.class(state));
        self.push_card_line(format!(
            r#"<g class="{}" data-children="{}">"#,
            class, child_count
        ));
        self.indent += 1;
        self.push_card_line(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}"/>"#,
            cx, cy, TOGGLE_RADIUS, fill, stroke
        ));
        // chevron points down when collapsed, up when expanded
        let tip = if expanded { -2.0 } else { 2.0 };
        self.push_card_line(format!(
            r#"<path d="M{} {} L{} {} L{} {}" fill="none" stroke="{}" stroke-width="1.5" stroke-linecap="round"/>"#,
            cx - 4.0,
            cy - tip,
            cx,
            cy + tip,
            cx + 4.0,
            cy - tip,
            stroke
        ));
        self.indent -= 1;
        self.push_card_line("</g>".to_string());
    }

    /// Add a path for a connector
    pub fn add_connector(&mut self, connector: &Connector, stroke: &str) {
        let class = format!(
            "{} {}",
            self.class("connector"),
            self.class(connector.style.as_str())
        );
        self.connections.push(format!(
            r#"{}<path class="{}" d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            self.indent_str(),
            class,
            connector.path.to_svg_d(),
            stroke
        ));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let vb = viewbox.expand(self.config.viewbox_padding);
        let nl = self.newline();

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb.x, vb.y, vb.width, vb.height
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        // Connectors first so cards cover their ends
        for conn in &self.connections {
            svg.push_str(conn);
            svg.push_str(nl);
        }
        for card in &self.cards {
            svg.push_str(card);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a laid-out tree to an SVG string (with default stylesheet)
pub fn render_svg(tree: &OrgTree, layout: &TreeLayout, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(tree, layout, config, &Stylesheet::default())
}

/// Render a laid-out tree to an SVG string with a custom stylesheet
pub fn render_svg_with_stylesheet(
    tree: &OrgTree,
    layout: &TreeLayout,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_stylesheet(stylesheet);

    let stroke = stylesheet.resolve_or_default("connector");
    for connector in connectors(tree, layout) {
        builder.add_connector(&connector, &stroke);
    }

    for id in tree.visible() {
        if let Some(placement) = layout.placement(id) {
            render_card(tree, layout, id, placement, stylesheet, &mut builder);
        }
    }

    let bounds = layout
        .bounds(tree)
        .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    log::debug!(
        cards = layout.len(), width = bounds.width, height = bounds.height;
        "SVG document rendered",
    );
    builder.build(bounds)
}

/// Render a single card to the builder
fn render_card(
    tree: &OrgTree,
    layout: &TreeLayout,
    id: NodeId,
    placement: &Placement,
    stylesheet: &Stylesheet,
    builder: &mut SvgBuilder,
) {
    let node = tree.node(id);
    let Some(bounds) = layout.card_bounds(tree, id) else {
        return;
    };

    let mut classes = vec![];
    if node.is_root() {
        classes.push(builder.class("root"));
    }
    builder.start_card(
        node.key.as_str(),
        &classes,
        placement.style.map(|s| s.as_str()),
    );

    let border = stylesheet.resolve_or_default("card-border");
    builder.add_card_body(
        &bounds,
        &stylesheet.resolve_or_default("card-background"),
        &border,
    );

    let avatar_color = node
        .person
        .color
        .clone()
        .unwrap_or_else(|| stylesheet.depth_color(tree.depth(id)));
    builder.add_avatar(
        bounds.x + AVATAR_INSET,
        bounds.center().y,
        &avatar_color,
        &node.person.initials(),
        &stylesheet.resolve_or_default("text-light"),
    );

    let lines = [
        ("name", &node.person.name, "text-1"),
        ("role", &node.person.role, "text-2"),
        ("detail", &node.person.department, "text-2"),
        ("detail", &node.person.email, "text-3"),
    ];
    let text_x = bounds.x + TEXT_INSET;
    let mut baseline = bounds.y + FIRST_LINE;
    for (class, text, token) in lines {
        if text.is_empty() {
            continue;
        }
        if baseline > bounds.bottom() - 6.0 {
            break;
        }
        builder.add_text(class, text, text_x, baseline, &stylesheet.resolve_or_default(token));
        baseline += LINE_HEIGHT;
    }

    if node.has_children() {
        builder.add_toggle(
            placement.x,
            bounds.bottom(),
            node.expanded,
            node.children().len(),
            (
                &stylesheet.resolve_or_default("card-background"),
                &stylesheet.resolve_or_default("accent-1"),
            ),
        );
    }

    builder.end_card();
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
