use std::fmt::Write;

use crate::packer::LoadState;
use crate::shape::Shape;
use crate::types::Position;

const CELL: usize = 40;
const MARGIN: usize = 20;
const HEADER: usize = 30;

/// Draws the truck floor with every packed item as an SVG document.
///
/// Each occupied cell becomes one square in the item's color; the item
/// name is written at its origin. Items without a position are skipped.
pub fn render_svg(load: &LoadState) -> Result<String, std::fmt::Error> {
    let mut svg = String::new();
    let dimension = load.truck_size.dimension();
    let floor = dimension * CELL;
    let svg_width = floor + 2 * MARGIN;
    let svg_height = floor + 2 * MARGIN + HEADER;

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;
    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">Truck {} ({}x{}) | {} items | {} blocks</text>"##,
        MARGIN,
        MARGIN + 10,
        load.truck_size,
        dimension,
        dimension,
        load.items.len(),
        load.total_blocks()
    )?;

    let top = MARGIN + HEADER;
    writeln!(
        &mut svg,
        r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#fff" stroke="#333" stroke-width="2"/>"##,
        MARGIN, top, floor, floor
    )?;

    for selected in &load.items {
        let Some(position) = selected.position else {
            continue;
        };
        // Loads arrive from clients; an item sticking out of the floor is not drawn.
        let Some(cells) = floor_cells(selected.shape(), position, dimension) else {
            continue;
        };

        let color = escape(&selected.color);
        for (cx, cy) in cells {
            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="#333" stroke-width="1" opacity="0.85"/>"##,
                MARGIN + cx * CELL,
                top + cy * CELL,
                CELL,
                CELL,
                color
            )?;
        }

        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#111">{}</text>"##,
            MARGIN + position.x * CELL + 3,
            top + position.y * CELL + 12,
            escape(&selected.item.name)
        )?;
    }

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

/// Floor coordinates of every occupied cell, or `None` if any falls outside.
fn floor_cells(
    shape: &Shape,
    position: Position,
    dimension: usize,
) -> Option<Vec<(usize, usize)>> {
    shape
        .occupied_cells()
        .map(|(col, row)| {
            let x = position.x.checked_add(col).filter(|&x| x < dimension)?;
            let y = position.y.checked_add(row).filter(|&y| y < dimension)?;
            Some((x, y))
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
