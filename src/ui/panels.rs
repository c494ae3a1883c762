use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::histogram::Normalization;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – figure list and species summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Figures");
    ui.separator();

    if state.table.is_none() {
        ui.label("No particle list loaded.");
        return;
    }

    let titles: Vec<String> = state.figures.iter().map(|f| f.title.clone()).collect();
    ScrollArea::vertical()
        .id_salt("figure_list")
        .max_height(ui.available_height() * 0.5)
        .show(ui, |ui: &mut Ui| {
            for (i, title) in titles.iter().enumerate() {
                let mut text = RichText::new(format!("{}. {title}", i + 1));
                if state.figures[i].is_empty() {
                    text = text.italics().color(Color32::GRAY);
                }
                if ui.selectable_label(state.current == i, text).clicked() {
                    state.select_figure(i);
                }
            }
        });

    ui.add_space(8.0);
    ui.heading("Species");
    ui.separator();
    species_table(ui, state);

    ui.add_space(8.0);
    ui.label(format!("|y| < {}", state.config.ymax));
    if state.config.skip_first_row {
        ui.label(RichText::new("first row skipped (legacy)").italics());
    }
}

fn species_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .id_salt("species_summary")
        .striped(true)
        .column(Column::auto())
        .columns(Column::auto().at_least(40.0), 4)
        .header(20.0, |mut header| {
            for name in ["Species", "Rows", "Bucketed", "|y|<ymax", "Non-finite y"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for row in &state.summary {
                body.row(18.0, |mut table_row| {
                    let color = state.colors.color_for(Some(row.species));
                    table_row.col(|ui| {
                        ui.label(RichText::new(row.species.label()).color(color));
                    });
                    table_row.col(|ui| {
                        ui.label(row.in_table.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(row.derived.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(row.midrapidity.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(row.non_finite_rapidity.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let n_figures = state.figures.len();
        if ui
            .add_enabled(state.current > 0, egui::Button::new("◀ Previous"))
            .clicked()
        {
            state.previous_figure();
        }
        if n_figures > 0 {
            ui.label(format!("{} / {n_figures}", state.current + 1));
        }
        if ui
            .add_enabled(state.current + 1 < n_figures, egui::Button::new("Next ▶"))
            .clicked()
        {
            state.next_figure();
        }

        ui.separator();

        let mut normalization = state.config.normalization;
        egui::ComboBox::from_id_salt("normalization")
            .selected_text(normalization.label())
            .show_ui(ui, |ui: &mut Ui| {
                for mode in Normalization::ALL {
                    ui.selectable_value(&mut normalization, mode, mode.label());
                }
            });
        state.set_normalization(normalization);

        ui.separator();

        if let (Some(table), Some(source)) = (&state.table, &state.source) {
            ui.label(format!("{} particles from {}", table.len(), source.display()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open particle list")
        .add_filter("Supported files", &["csv", "dat", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "dat", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load(&path) {
            log::error!("Failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
