//! Static Chart Renderer
//! Draws the month-over-month volume trend as a PNG line chart.
//!
//! Layout:
//! 1. Line with circle markers, one point per month
//! 2. X-axis: month labels (rotated), caption "Month-Year"
//! 3. Y-axis: account count, caption "Account Count"
//! 4. Light grid on both axes

use crate::data::{format_number, VolumeSeries};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

// Colors
const LINE_COLOR: RGBColor = RGBColor(0, 122, 204);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// 10 x 4 aspect, matching the on-screen chart
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 400;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No volume points to plot")]
    Empty,
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

pub struct VolumeChartRenderer;

impl VolumeChartRenderer {
    /// Y-axis bounds with padding. Flat series get a band around the value.
    pub fn y_range(series: &VolumeSeries) -> Option<(f64, f64)> {
        let (min, max) = series.count_range()?;
        let pad = if max > min {
            (max - min) * 0.1
        } else {
            (max.abs() * 0.05).max(1.0)
        };
        Some((min - pad, max + pad))
    }

    /// Render the series to PNG bytes. Months without a count are skipped.
    pub fn render_png(series: &VolumeSeries, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        let (y_min, y_max) = Self::y_range(series).ok_or(ChartError::Empty)?;
        let points: Vec<(i32, f64)> = series
            .plottable()
            .into_iter()
            .map(|(i, c)| (i as i32, c))
            .collect();
        let labels = series.labels();
        let x_max = (labels.len().saturating_sub(1) as i32).max(1);

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .x_label_area_size(90)
                .y_label_area_size(80)
                .build_cartesian_2d(0i32..x_max, y_min..y_max)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .x_labels(labels.len().max(2))
                .x_label_formatter(&|x: &i32| {
                    usize::try_from(*x)
                        .ok()
                        .and_then(|i| labels.get(i).cloned())
                        .unwrap_or_default()
                })
                .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
                .y_label_formatter(&|y: &f64| format_number(y.round()))
                .x_desc("Month-Year")
                .y_desc("Account Count")
                .axis_desc_style(("sans-serif", 16))
                .bold_line_style(GRID_COLOR.mix(0.7))
                .light_line_style(GRID_COLOR.mix(0.3))
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
                .map_err(draw_err)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, LINE_COLOR.filled())),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render and write a PNG file.
    pub fn save_png(
        series: &VolumeSeries,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        let bytes = Self::render_png(series, width, height)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
