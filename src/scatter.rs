use super::{axis_range, ReportError, Table};
use std::ops::Range;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const FONT_DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const PLOT_SIZE: (u32, u32) = (640, 480);

/// Which rows of the table are kept for a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completeness {
    /// drop the rows missing either the x or the y value
    Both,
    /// drop only the rows missing the x value;
    /// a row with a missing y stays selected but draws no marker
    /// and is left out of both axis ranges
    XOnly,
}

/// A scatter plot of two table columns, written to a fixed file name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterSpec {
    pub x: &'static str,
    pub y: &'static str,
    pub filename: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub title: &'static str,
    pub completeness: Completeness,
}

pub const SCATTER_SPECS: [ScatterSpec; 3] = [
    ScatterSpec {
        x: "constraints",
        y: "prove_ms",
        filename: "prove_vs_constraints.png",
        x_label: "constraints",
        y_label: "prove_ms",
        title: "Prove time vs constraints",
        completeness: Completeness::Both,
    },
    ScatterSpec {
        x: "params",
        y: "memory_mb",
        filename: "memory_vs_params.png",
        x_label: "params",
        y_label: "memory_mb",
        title: "Memory vs params",
        completeness: Completeness::XOnly,
    },
    ScatterSpec {
        x: "params",
        y: "evm_gas",
        filename: "evm_gas_vs_params.png",
        x_label: "params",
        y_label: "evm_gas",
        title: "EVM gas vs params",
        completeness: Completeness::Both,
    },
];

impl ScatterSpec {
    /// the (x, y) points to plot, in row order,
    /// or None when one of the two columns is not in the table
    pub fn select(&self, table: &Table) -> Option<Vec<(f64, Option<f64>)>> {
        let xs = &table.column(self.x)?.values;
        let ys = &table.column(self.y)?.values;
        let points = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(&x, &y)| match (x, y, self.completeness) {
                (Some(x), Some(y), _) => Some((x, Some(y))),
                (Some(x), None, Completeness::XOnly) => Some((x, None)),
                _ => None,
            })
            .collect();
        Some(points)
    }

    /// Draws the scatter plot into `outdir`, overwriting any previous file.
    /// Returns Ok(None) without touching the filesystem if the table lacks a column.
    pub fn render(&self, table: &Table, outdir: &Path) -> Result<Option<PathBuf>, ReportError> {
        let points = match self.select(table) {
            Some(points) => points,
            None => {
                let missing: Vec<&str> = [self.x, self.y]
                    .iter()
                    .copied()
                    .filter(|c| table.column(c).is_none())
                    .collect();
                info!(plot = self.filename, ?missing, "skipping, columns not in table");
                return Ok(None);
            }
        };
        debug!(
            plot = self.filename,
            points = points.len(),
            dropped = table.len() - points.len(),
            "selected rows"
        );
        register_fonts()?;
        let fout = outdir.join(self.filename);
        match self.draw_scatter(&fout, &points) {
            Ok(()) => {
                info!(path = %fout.display(), "plot written");
                Ok(Some(fout))
            }
            Err(e) => {
                error!(path = %fout.display(), "plotting failed: {}", e);
                Err(ReportError::Render {
                    path: fout,
                    message: e.to_string(),
                })
            }
        }
    }

    /// plots the points to png;
    /// the drawing area lives only inside this call and is dropped on every return
    fn draw_scatter(
        &self,
        fout: &Path,
        points: &[(f64, Option<f64>)],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (x_range, y_range) = plot_ranges(points);
        let root = BitMapBackend::new(fout, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
            .label_style(("sans-serif", 14))
            .x_desc(self.x_label)
            .y_desc(self.y_label)
            .draw()?;
        chart.draw_series(
            points
                .iter()
                .filter_map(|&(x, y)| y.map(|y| Circle::new((x, y), 4, BLUE.filled()))),
        )?;
        // write errors only surface through present()
        root.present()?;
        Ok(())
    }
}

/// x and y axis ranges over the points that draw a marker
pub fn plot_ranges(points: &[(f64, Option<f64>)]) -> (Range<f64>, Range<f64>) {
    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter_map(|&(x, y)| y.map(|y| (x, y)))
        .unzip();
    (axis_range(&xs), axis_range(&ys))
}

/// Registers the embedded DejaVu Sans as the sans-serif font;
/// calling it again just replaces the same entry.
pub fn register_fonts() -> Result<(), ReportError> {
    register_sans_serif(FONT_DEJAVU_SANS)
}

fn register_sans_serif(font: &'static [u8]) -> Result<(), ReportError> {
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, font)
        .map_err(|e| ReportError::Font {
            source: Box::new(e),
        })
}
