//! Plain-text rendering of the two screens.

use appart_core::screens::Bar;
use appart_core::Apartment;

pub fn apartment_line(apartment: &Apartment) -> String {
    let id = apartment
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "#{id:<4} N° {} | {} | Loyer: {} Ariary ({})",
        apartment.num_app,
        apartment.design,
        apartment.loyer,
        apartment.observation()
    )
}

/// Widest bar the chart will draw, in cells.
pub const MAX_BAR_WIDTH: usize = 512;

/// Horizontal bars scaled so the largest value spans `width` cells.
pub fn bar_chart(bars: &[Bar], width: usize) -> Vec<String> {
    let width = width.min(MAX_BAR_WIDTH);
    let label_width = bars.iter().map(|bar| bar.label.chars().count()).max().unwrap_or(0);
    let peak = bars.iter().map(|bar| bar.value).fold(0.0_f64, f64::max);

    bars.iter()
        .map(|bar| {
            let cells = if peak > 0.0 && bar.value > 0.0 {
                ((bar.value / peak) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<label_width$} | {}{} {}",
                bar.label,
                "█".repeat(cells),
                " ".repeat(width.saturating_sub(cells)),
                bar.value
            )
        })
        .collect()
}
