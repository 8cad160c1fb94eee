use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Color32, Rounding, Stroke};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;
use tracker_core::{
    Applied, Dashboard, Event, Fetcher, Metric, RefresherHandle, ThemeConfig, TrackerConfig,
};

use crate::widgets::{self, UiAction};

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub fetcher: Fetcher,
    pub events: mpsc::Receiver<Event>,
    pub refresher: Option<RefresherHandle>,
    pub config: TrackerConfig,
}

pub struct TrackerApp {
    runtime: Arc<Runtime>,
    fetcher: Fetcher,
    events: mpsc::Receiver<Event>,
    refresher: Option<RefresherHandle>,
    dashboard: Dashboard,
    theme: ThemeConfig,
}

impl TrackerApp {
    pub fn new(init: AppInit) -> Self {
        let mut dashboard = Dashboard::new(init.config.map);
        init.fetcher.dispatch_all(dashboard.start());
        Self {
            runtime: init.runtime,
            fetcher: init.fetcher,
            events: init.events,
            refresher: init.refresher,
            dashboard,
            theme: init.config.theme,
        }
    }

    fn setup_dark_theme(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        let bg_color = self.theme.background_color32();
        let panel_color = self.theme.panel_color32();
        let border_color = self.theme.border_color32();
        let text_color = self.theme.text_color32();
        let accent_color = self.theme.accent_color32();

        style.visuals.dark_mode = true;
        style.visuals.panel_fill = panel_color;
        style.visuals.window_fill = bg_color;
        style.visuals.extreme_bg_color = Color32::from_rgb(25, 25, 25);
        style.visuals.faint_bg_color = Color32::from_rgb(45, 45, 45);
        style.visuals.override_text_color = Some(text_color);

        style.visuals.widgets.noninteractive.bg_fill = panel_color;
        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, border_color);
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);

        style.visuals.widgets.inactive.bg_fill = Color32::from_rgb(50, 50, 50);
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, border_color);
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);

        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_color);
        style.visuals.widgets.active.bg_fill = accent_color;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        style.visuals.widgets.noninteractive.rounding = Rounding::same(3.0);
        style.visuals.widgets.inactive.rounding = Rounding::same(3.0);
        style.visuals.widgets.hovered.rounding = Rounding::same(3.0);
        style.visuals.widgets.active.rounding = Rounding::same(3.0);

        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);

        ctx.set_style(style);
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match self.dashboard.apply(event) {
                Applied::Requests(requests) => self.fetcher.dispatch_all(requests),
                Applied::Stale(channel) => debug!(?channel, "stale response ignored"),
                Applied::Updated(_) => {}
            }
        }
    }

    fn handle(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::SelectRegion(region) => {
                    let request = self.dashboard.select_region(region);
                    self.fetcher.dispatch(request);
                }
                UiAction::SelectMetric(metric) => {
                    if let Some(request) = self.dashboard.select_metric(metric) {
                        self.fetcher.dispatch(request);
                    }
                }
                UiAction::Retry(channel) => {
                    let request = self.dashboard.retry(channel);
                    self.fetcher.dispatch(request);
                }
                UiAction::MoveMap(viewport) => self.dashboard.set_viewport(viewport),
            }
        }
    }

    fn draw_right_panel(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let state = self.dashboard.state();
        egui::SidePanel::right("stats_panel")
            .min_width(320.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Live Cases by Country").strong().size(16.0));
                ui.separator();
                widgets::country_table(ui, state, actions);
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(format!("Worldwide new {}", state.metric))
                        .strong()
                        .size(16.0),
                );
                ui.separator();
                let size = egui::vec2(ui.available_width(), 220.0);
                widgets::delta_chart(ui, state, size, actions);
            });
    }

    fn draw_main_content(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let state = self.dashboard.state();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Covid-19 Tracker").size(22.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    widgets::region_dropdown(ui, state, actions);
                });
            });
            widgets::snapshot_status(ui, state, actions);
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                for metric in Metric::ALL {
                    widgets::info_box(ui, state, metric, actions);
                }
            });
            ui.add_space(10.0);
            let size = ui.available_size();
            widgets::world_map(ui, state, size, actions);
        });
    }
}

impl Drop for TrackerApp {
    fn drop(&mut self) {
        if let Some(handle) = self.refresher.take() {
            let _ = self.runtime.block_on(handle.stop());
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.setup_dark_theme(ctx);
        self.drain_events();

        let mut actions = Vec::new();
        self.draw_right_panel(ctx, &mut actions);
        self.draw_main_content(ctx, &mut actions);
        self.handle(actions);

        let state = self.dashboard.state();
        let waiting = state.snapshot.is_loading() || state.countries.is_loading() || state.chart.is_loading();
        // responses arrive off the UI thread, poll for them
        ctx.request_repaint_after(if waiting {
            Duration::from_millis(100)
        } else {
            Duration::from_secs(1)
        });
    }
}
