use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::SpeciesColors;
use crate::figures::{Figure, Series};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Histogram plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current figure in the central panel.
pub fn figure_plot(ui: &mut Ui, state: &AppState) {
    let Some(figure) = state.current_figure() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a particle list to view spectra  (File → Open…)");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&figure.title);
    });

    histogram_plot(ui, figure, state.current, &state.colors);
}

/// Draw every series of `figure` as touching bars, one bar per bin.
///
/// Empty histograms still draw their (zero-height) bars so the axis range
/// reflects the binning.
fn histogram_plot(ui: &mut Ui, figure: &Figure, index: usize, colors: &SpeciesColors) {
    Plot::new(("histogram_plot", index))
        .legend(Legend::default())
        .x_axis_label(figure.x_label)
        .y_axis_label(figure.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &figure.series {
                plot_ui.bar_chart(bar_chart(series, colors));
            }
        });
}

fn bar_chart(series: &Series, colors: &SpeciesColors) -> BarChart {
    let color = colors.color_for(series.species);
    let bars: Vec<Bar> = series
        .histogram
        .bins()
        .zip(&series.histogram.counts)
        .map(|((lo, hi), &count)| {
            Bar::new(0.5 * (lo + hi), count)
                .width(hi - lo)
                .name(format!("[{lo:.4}, {hi:.4})"))
        })
        .collect();

    BarChart::new(bars)
        .name(&series.name)
        .color(color)
}
