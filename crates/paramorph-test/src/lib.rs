//! paramorph-test - Regression test framework for paramorph
//!
//! Every regression test builds a [`RegParams`], records numbered checks
//! against it and asserts on [`RegParams::cleanup`]. Three modes are
//! supported:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (inspection only)
//!
//! # Usage
//!
//! ```ignore
//! use paramorph_test::RegParams;
//!
//! let mut rp = RegParams::new("dilate_para");
//! rp.compare_values(5.0, dilated.count_nonzero() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use paramorph_core::BGrid;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // paramorph-test is at crates/paramorph-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Build a binary grid from an ASCII picture
///
/// Rows are separated by newlines; `#` or `1` marks foreground, anything
/// else is background. Row `y` becomes axis 1, column `x` axis 0, so the
/// picture reads the way the grid is indexed with `[x, y]`. Blank lines and
/// leading/trailing whitespace are ignored.
///
/// # Panics
///
/// Panics if the rows have different lengths or the picture is empty.
pub fn grid_from_ascii(picture: &str) -> BGrid {
    let rows: Vec<&str> = picture
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert!(!rows.is_empty(), "empty picture");
    let width = rows[0].chars().count();
    assert!(
        rows.iter().all(|r| r.chars().count() == width),
        "ragged picture"
    );

    let data: Vec<u8> = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| u8::from(c == '#' || c == '1')))
        .collect();
    BGrid::from_data(&[width, rows.len()], data).expect("picture dimensions are valid")
}

/// Render a 2-D binary grid as an ASCII picture (inverse of [`grid_from_ascii`])
///
/// # Panics
///
/// Panics if the grid is not 2-D.
pub fn grid_to_ascii(grid: &BGrid) -> String {
    assert_eq!(grid.ndim(), 2, "only 2-D grids can be rendered");
    let width = grid.dims()[0];
    grid.data()
        .chunks(width)
        .map(|row| {
            row.iter()
                .map(|&v| if v != 0 { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
