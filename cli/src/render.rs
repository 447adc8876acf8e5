//! Terminal rendering of a grid snapshot.

use std::fmt::Write;

use tile_slide_core::{Grid, Tile, FREE_SPACE};

const RESET: &str = "\x1b[0m";

/// Background colour per tile value, as 24-bit RGB.
const PALETTE: [(Tile, (u8, u8, u8)); 11] = [
    (2, (0xee, 0xe4, 0xda)),
    (4, (0xee, 0xe1, 0xc9)),
    (8, (0xf3, 0xb2, 0x7a)),
    (16, (0xf6, 0x96, 0x64)),
    (32, (0xf7, 0x7c, 0x5f)),
    (64, (0xf7, 0x5f, 0x3b)),
    (128, (0xed, 0xd0, 0x73)),
    (256, (0xed, 0xcc, 0x62)),
    (512, (0xed, 0xc9, 0x50)),
    (1024, (0xed, 0xc5, 0x3f)),
    (2048, (0xed, 0xc2, 0x2e)),
];

/// Anything past 2048 shares one dark tile.
const BEYOND: (u8, u8, u8) = (0x3c, 0x3a, 0x32);

pub fn tile_color(value: Tile) -> Option<(u8, u8, u8)> {
    if value == FREE_SPACE {
        return None;
    }
    Some(
        PALETTE
            .iter()
            .find(|(tile, _)| *tile == value)
            .map_or(BEYOND, |(_, rgb)| *rgb),
    )
}

/// Render the grid as a boxed table, blank cells for free space.
pub fn render(grid: &Grid, color: bool) -> String {
    if !color {
        return grid.to_string();
    }

    let border = format!("+{}", "------+".repeat(grid.size()));
    let mut out = String::new();
    let _ = writeln!(out, "{}", border);
    for row in grid.rows() {
        out.push('|');
        for &value in row {
            match tile_color(value) {
                None => out.push_str("      "),
                Some((r, g, b)) => {
                    // Dark text on the light early tiles, light text after
                    let fg = if value <= 4 { "30" } else { "97" };
                    let _ = write!(
                        out,
                        "\x1b[48;2;{};{};{}m\x1b[{}m{:^6}{}",
                        r, g, b, fg, value, RESET
                    );
                }
            }
            out.push('|');
        }
        out.push('\n');
        let _ = writeln!(out, "{}", border);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(tile_color(0), None);
        assert_eq!(tile_color(2), Some((0xee, 0xe4, 0xda)));
        assert_eq!(tile_color(2048), Some((0xed, 0xc2, 0x2e)));
        assert_eq!(tile_color(4096), Some(BEYOND));
    }

    #[test]
    fn test_plain_render_matches_display() {
        let grid = Grid::from_rows(&[[2u32, 0], [0, 8]]).unwrap();
        assert_eq!(render(&grid, false), grid.to_string());
    }

    #[test]
    fn test_colored_render_escapes_only_tiles() {
        let grid = Grid::from_rows(&[[2u32, 0], [0, 8]]).unwrap();
        let out = render(&grid, true);
        assert_eq!(out.matches(RESET).count(), 2);
        assert!(out.contains("|      |"));
        assert!(out.starts_with("+------+------+\n"));
    }
}
