//! SVG wireframe of resolved grid geometry.
//!
//! Draws every section as an annotated panel: header strip, item slots with
//! their inset content, and a dashed outline of the on-screen part for
//! sections that scroll horizontally.
//!
//! # Example
//!
//! ```
//! use zengrid::presets::PhotoGridConfig;
//! use zengrid::svg::render_geometry_svg;
//! use zengrid::{Size, compute_layout};
//!
//! let viewport = Size::new(390.0, 844.0);
//! let sections = PhotoGridConfig::default().sections(viewport, 8, 10);
//! let geometry = compute_layout(&sections, viewport).unwrap();
//!
//! let svg = render_geometry_svg(&geometry);
//! assert!(svg.starts_with("<svg"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt::Debug;

use crate::compose::SectionGeometry;
use crate::geometry::Rect;

/// Width the widest section is scaled to.
const MAX_PANEL_W: f64 = 600.0;
/// Horizontal margin.
const MARGIN_X: f64 = 40.0;
/// Top margin.
const MARGIN_TOP: f64 = 30.0;
/// Height of the label above each section.
const LABEL_H: f64 = 22.0;
/// Vertical gap between sections.
const PANEL_GAP: f64 = 30.0;

/// Render a complete SVG document for the given sections.
pub fn render_geometry_svg<G: Debug>(geometry: &[SectionGeometry<G>]) -> String {
    if geometry.is_empty() {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    }

    let widest = geometry
        .iter()
        .map(|s| s.bounds.width)
        .fold(0.0_f64, f64::max);
    let scale = if widest > 0.0 { MAX_PANEL_W / widest } else { 1.0 };

    let mut total_h = MARGIN_TOP;
    for (i, section) in geometry.iter().enumerate() {
        total_h += LABEL_H + section.bounds.height * scale;
        if i < geometry.len() - 1 {
            total_h += PANEL_GAP;
        }
    }
    total_h += MARGIN_TOP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(8192);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .index { font-size: 10px; fill: #fff; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .header { fill: #cfcfcf; stroke: #999; stroke-width: 1; }
  .slot { fill: none; stroke: #2c6faa; stroke-width: 0.5; }
  .inner { fill: #6ba3d6; }
  .visible { fill: none; stroke: #d6336c; stroke-width: 1.5; stroke-dasharray: 6,3; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .header { fill: #3d3d3d; stroke: #555; }
    .slot { stroke: #5a9fd4; }
    .inner { fill: #3a72a4; }
    .visible { stroke: #f06595; }
  }
</style>
"##,
    );

    let mut y = MARGIN_TOP;
    for (i, section) in geometry.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label">{}</text>"#,
            MARGIN_X,
            y + 14.0,
            escape_xml(&format!("{:?}", section.id))
        ));
        let mut note = format!(
            "{} of {} slots, {:?}",
            section.items.len(),
            section.capacity,
            section.scroll
        );
        if section.truncated > 0 {
            note.push_str(&format!(", {} truncated", section.truncated));
        }
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="annotation" text-anchor="end">{}</text>"#,
            MARGIN_X + MAX_PANEL_W,
            y + 14.0,
            escape_xml(&note)
        ));
        svg.push('\n');
        y += LABEL_H;

        // Map content coordinates of this section into the panel.
        let origin = section.bounds;
        let place = |r: &Rect| {
            (
                MARGIN_X + (r.x - origin.x) * scale,
                y + (r.y - origin.y) * scale,
                r.width * scale,
                r.height * scale,
            )
        };

        push_rect(&mut svg, place(&section.bounds), "outer");
        if let Some(header) = &section.header {
            push_rect(&mut svg, place(header), "header");
        }
        for item in &section.items {
            push_rect(&mut svg, place(&item.content), "inner");
            let (x, iy, w, h) = place(&item.frame);
            push_rect(&mut svg, (x, iy, w, h), "slot");
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="index" text-anchor="middle">{}</text>"#,
                x + w / 2.0,
                iy + h / 2.0 + 4.0,
                item.index
            ));
            svg.push('\n');
        }
        if section.scroll.is_orthogonal() {
            push_rect(&mut svg, place(&section.visible), "visible");
        }

        y += section.bounds.height * scale;
        if i < geometry.len() - 1 {
            y += PANEL_GAP;
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_rect(svg: &mut String, (x, y, w, h): (f64, f64, f64, f64), class: &str) {
    svg.push_str(&format!(
        r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" class="{class}"/>"#
    ));
    svg.push('\n');
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
