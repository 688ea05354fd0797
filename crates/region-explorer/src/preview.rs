//! Terminal preview of a rendering
//!
//! The composite is resampled to a square of `width` cells and printed with
//! the false-negative axis pointing up, so `(fp, fn) = (0, 0)` lands in the
//! bottom-left corner.

use colored::{ColoredString, Colorize};
use privacy_regions::{Rendering, Rgba};

const FILLED: &str = "██";
const EMPTY: &str = "· ";

/// Source indices sampled for `width` output cells
fn sample_positions(resolution: usize, width: usize) -> Vec<usize> {
    let width = width.clamp(1, resolution.max(1));
    if width == 1 {
        return vec![0];
    }
    (0..width)
        .map(|i| i * (resolution - 1) / (width - 1))
        .collect()
}

/// Palette indices of the resampled composite, top row first
pub fn sample(rendering: &Rendering, width: usize) -> Vec<Vec<usize>> {
    let positions = sample_positions(rendering.resolution, width);
    positions
        .iter()
        .rev()
        .map(|&row| {
            positions
                .iter()
                .map(|&col| rendering.index_at(row, col))
                .collect()
        })
        .collect()
}

fn paint(text: &str, colour: Rgba) -> ColoredString {
    text.truecolor(colour.red(), colour.green(), colour.blue())
}

/// Coloured preview lines, one per sampled row
pub fn lines(rendering: &Rendering, width: usize) -> Vec<String> {
    sample(rendering, width)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|index| {
                    if index == 0 {
                        EMPTY.dimmed().to_string()
                    } else {
                        paint(FILLED, rendering.palette.get(index)).to_string()
                    }
                })
                .collect()
        })
        .collect()
}

pub fn print(rendering: &Rendering, width: usize) {
    println!("{}", rendering.title.bold());
    println!("{}", "fn ↑".dimmed());
    for line in lines(rendering, width) {
        println!("{}", line);
    }
    println!("{}", "fp →".dimmed());

    if !rendering.legend.is_empty() {
        println!();
        for (entry, layer) in rendering.legend.iter().zip(&rendering.layers) {
            println!(
                "  {} {:<48} {:>6.2}%",
                paint(FILLED, entry.colour),
                entry.label,
                100.0 * layer.mask.area()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use privacy_regions::{Compositor, Constraint, GridConfig, Region};

    // fp ≤ 0.3: the left third of the grid
    fn left_band() -> Rendering {
        let mut compositor =
            Compositor::new(GridConfig::default().with_resolution(10)).unwrap();
        compositor
            .add(
                Region::new(vec![Constraint::half_plane(-1.0, 0.0, -0.3)]).unwrap(),
                "left",
            )
            .unwrap();
        compositor.render("band", None, true).unwrap()
    }

    #[test]
    fn test_sample_positions() {
        assert_eq!(sample_positions(10, 10), (0..10).collect::<Vec<_>>());
        assert_eq!(sample_positions(10, 4), vec![0, 3, 6, 9]);
        assert_eq!(sample_positions(10, 40).len(), 10);
        assert_eq!(sample_positions(10, 1), vec![0]);
    }

    #[test]
    fn test_sample_orientation() {
        let rendering = left_band();
        let cells = sample(&rendering, 10);
        assert_eq!(cells.len(), 10);
        // fp = 0, 1/9, 2/9, 3/9 ≤ 0.3 is false for 3/9
        for row in &cells {
            assert!(row[..3].iter().all(|&i| i != 0));
            assert!(row[3..].iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn test_lines_count() {
        let rendering = left_band();
        assert_eq!(lines(&rendering, 5).len(), 5);
    }
}
