/// egui rendering: the top bar, the side panel and the central plot.
pub mod panels;
pub mod plot;
