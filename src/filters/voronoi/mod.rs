//! Voronoi cell images and image fracturing.
//!
//! Both filters scatter random sites over the canvas, build their Voronoi
//! diagram and paint every bounded region. Regions reaching past the
//! diagram's outer box are skipped, so cells along the canvas edge are often
//! left unpainted.
//!
//! Without a seed every run scatters different sites.

mod cells;
mod diagram;
mod fracture;

pub use cells::{voronoi_cells, CellStyle, VoronoiCellOptions};
pub use diagram::{random_sites, Diagram, Point, Region};
pub use fracture::{fracture, BorderStyle, Fracture, FractureOptions};

use crate::error::{RetroError, Result};

/// Site count for a cell size: `round(1000 / size)`, at least one.
pub fn cell_count(size: f32) -> Result<usize> {
    if !size.is_finite() || size <= 0.0 {
        return Err(RetroError::config(
            format!("Cell size must be positive, got {}", size),
            "Smaller sizes give more cells; 0.1 gives 10000",
        ));
    }
    Ok(((1000.0 / size as f64).round() as usize).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(cell_count(0.1).unwrap(), 10_000);
        assert_eq!(cell_count(3.0).unwrap(), 333);
        assert_eq!(cell_count(1e9).unwrap(), 1);
        assert!(cell_count(0.0).is_err());
        assert!(cell_count(-2.0).is_err());
        assert!(cell_count(f32::NAN).is_err());
    }
}
