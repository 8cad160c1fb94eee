//! Rendering of the dashboard pieces. Every function reads `DashboardState`
//! and reports what the user did as `UiAction`s; none of them mutate state.

use chrono::NaiveDate;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use tracker_core::config::metric_color32;
use tracker_core::format::{format_axis, format_count, format_signed_count};
use tracker_core::series::value_range;
use tracker_core::{
    abbreviate, pretty_print_stat, Channel, ChartSeries, CountryTables, DashboardState,
    FetchFailure, FetchState, MapMarker, Metric, Region, Viewport,
};

const ERROR_COLOR: Color32 = Color32::from_rgb(229, 57, 53);

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectRegion(Region),
    SelectMetric(Metric),
    Retry(Channel),
    MoveMap(Viewport),
}

fn failure_notice(ui: &mut egui::Ui, failure: &FetchFailure, channel: Channel, actions: &mut Vec<UiAction>) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(format!("⚠ {:?}: {}", failure.kind, failure.message)).color(ERROR_COLOR).size(12.0));
        if ui.small_button("⟳ Retry").clicked() {
            actions.push(UiAction::Retry(channel));
        }
    });
}

pub fn region_dropdown(ui: &mut egui::Ui, state: &DashboardState, actions: &mut Vec<UiAction>) {
    let options = state.countries.loaded().map(|tables| tables.options.as_slice()).unwrap_or(&[]);
    let selected_name = options
        .iter()
        .find(|option| option.region == state.region)
        .map(|option| option.name.clone())
        .unwrap_or_else(|| state.region.to_string());

    let mut selected = state.region.clone();
    egui::ComboBox::from_id_source("region_dropdown")
        .width(220.0)
        .selected_text(selected_name)
        .show_ui(ui, |ui| {
            if options.is_empty() {
                ui.selectable_value(&mut selected, Region::Worldwide, "Worldwide");
            }
            for option in options {
                ui.selectable_value(&mut selected, option.region.clone(), &option.name);
            }
        });
    if selected != state.region {
        actions.push(UiAction::SelectRegion(selected));
    }
}

/// Counter card for one metric: today's increment and the running total.
pub fn info_box(ui: &mut egui::Ui, state: &DashboardState, metric: Metric, actions: &mut Vec<UiAction>) {
    let active = state.metric == metric;
    let accent = metric_color32(metric);
    let stroke = if active {
        Stroke::new(2.0, accent)
    } else {
        Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
    };

    let inner = egui::Frame::group(ui.style())
        .stroke(stroke)
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(180.0, 86.0));
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(metric.title()).weak().size(13.0));
                match &state.snapshot {
                    FetchState::Loaded(loaded) => {
                        let counts = &loaded.snapshot.counts;
                        ui.label(
                            egui::RichText::new(pretty_print_stat(counts.today(metric)))
                                .strong()
                                .size(24.0)
                                .color(accent),
                        );
                        let total = counts.total(metric).map(abbreviate).unwrap_or_else(|| "0".to_string());
                        ui.label(egui::RichText::new(format!("{total} Total")).size(12.0));
                    }
                    FetchState::Loading | FetchState::Idle => {
                        ui.spinner();
                    }
                    FetchState::Failed(_) => {
                        ui.label(egui::RichText::new("—").size(24.0));
                    }
                }
            });
        });

    let response = inner.response.interact(Sense::click());
    if response.clicked() && !active {
        actions.push(UiAction::SelectMetric(metric));
    }
}

pub fn snapshot_status(ui: &mut egui::Ui, state: &DashboardState, actions: &mut Vec<UiAction>) {
    if let Some(failure) = state.snapshot.failure() {
        failure_notice(ui, failure, Channel::Snapshot, actions);
    }
}

fn marker_color(marker: &MapMarker) -> Color32 {
    metric_color32(marker.metric)
}

/// Bubble map over a lat/long graticule. Drag pans, scroll zooms, hovering a
/// bubble shows its popup.
pub fn world_map(ui: &mut egui::Ui, state: &DashboardState, desired: Vec2, actions: &mut Vec<UiAction>) {
    let (response, painter) = ui.allocate_painter(desired, Sense::click_and_drag());
    let rect = response.rect;
    let painter = painter.with_clip_rect(rect);
    let size = (rect.width(), rect.height());
    let mut viewport = state.viewport;
    let to_screen = |viewport: &Viewport, lat: f64, lng: f64| {
        let (x, y) = viewport.project(tracker_core::GeoPoint::new(lat, lng), size);
        Pos2::new(rect.left() + x, rect.top() + y)
    };

    painter.rect_filled(rect, 4.0, Color32::from_rgb(24, 28, 34));
    let grid = Stroke::new(1.0, Color32::from_rgb(45, 52, 62));
    for lng in (-180..=180).step_by(30) {
        painter.line_segment(
            [to_screen(&viewport, 85.0, lng as f64), to_screen(&viewport, -85.0, lng as f64)],
            grid,
        );
    }
    for lat in (-60..=60).step_by(30) {
        painter.line_segment(
            [to_screen(&viewport, lat as f64, -179.9), to_screen(&viewport, lat as f64, 179.9)],
            grid,
        );
    }

    let markers = state
        .countries
        .loaded()
        .map(|tables| tables.markers.as_slice())
        .unwrap_or(&[]);
    let mut hovered: Option<&MapMarker> = None;
    let pointer = response.hover_pos();
    for marker in markers {
        let center = to_screen(&viewport, marker.center.lat, marker.center.lng);
        let radius = viewport.metres_to_pixels(marker.radius_metres, rect.width()).max(1.5);
        let color = marker_color(marker);
        painter.circle(center, radius, color.linear_multiply(0.3), Stroke::new(1.0, color));
        if let Some(pos) = pointer {
            if pos.distance(center) <= radius {
                hovered = Some(marker);
            }
        }
    }

    if let Some(pos) = pointer.filter(|pos| rect.contains(*pos)) {
        let local = pos - rect.min;
        let at = viewport.unproject((local.x, local.y), size);
        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -6.0),
            Align2::LEFT_BOTTOM,
            format!("{:.2}, {:.2}", at.lat, at.lng),
            FontId::monospace(11.0),
            Color32::from_gray(150),
        );
    }

    if state.countries.failure().is_some() {
        painter.text(rect.center(), Align2::CENTER_CENTER, "Map data unavailable", FontId::proportional(14.0), ERROR_COLOR);
    }

    if response.dragged() {
        let delta = response.drag_delta();
        viewport.pan(delta.x, delta.y, rect.width());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            viewport.zoom_by(if scroll > 0.0 { 0.25 } else { -0.25 });
        }
    }
    if viewport != state.viewport {
        actions.push(UiAction::MoveMap(viewport));
    }

    if let Some(marker) = hovered {
        response.on_hover_ui_at_pointer(|ui| {
            for (i, line) in marker.popup.iter().enumerate() {
                if i == 0 {
                    ui.label(egui::RichText::new(line).strong());
                } else {
                    ui.label(line);
                }
            }
            if let Some(flag) = &marker.flag {
                ui.label(egui::RichText::new(flag).weak().size(11.0));
            }
        });
    }
}

/// Ranked table of countries and their case counts.
pub fn country_table(ui: &mut egui::Ui, state: &DashboardState, actions: &mut Vec<UiAction>) {
    match &state.countries {
        FetchState::Loaded(CountryTables { ranked, .. }) => {
            egui::ScrollArea::vertical()
                .id_source("country_table")
                .max_height(320.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    egui::Grid::new("country_grid").striped(true).num_columns(2).show(ui, |ui| {
                        for country in ranked {
                            let label = ui.add(egui::Label::new(&country.country).sense(Sense::click()));
                            if label.clicked() {
                                if let Some(code) = country.iso2() {
                                    actions.push(UiAction::SelectRegion(Region::Country(code.to_string())));
                                }
                            }
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(egui::RichText::new(format_count(country.value(Metric::Cases))).strong());
                            });
                            ui.end_row();
                        }
                    });
                });
        }
        FetchState::Failed(failure) => failure_notice(ui, failure, Channel::Countries, actions),
        FetchState::Loading | FetchState::Idle => {
            ui.spinner();
        }
    }
}

fn date_label(date: NaiveDate) -> String {
    date.format("%m/%d/%y").to_string()
}

/// Line chart of day-over-day increments. Draws nothing for an empty series.
pub fn delta_chart(ui: &mut egui::Ui, state: &DashboardState, desired: Vec2, actions: &mut Vec<UiAction>) {
    let series = match &state.chart {
        FetchState::Loaded(series) => series,
        FetchState::Failed(failure) => {
            failure_notice(ui, failure, Channel::History, actions);
            return;
        }
        FetchState::Loading | FetchState::Idle => {
            ui.spinner();
            return;
        }
    };
    let Some((min, max)) = value_range(&series.points) else {
        return;
    };

    let (response, painter) = ui.allocate_painter(desired, Sense::hover());
    let frame = response.rect;
    let plot = Rect::from_min_max(frame.min + egui::vec2(44.0, 6.0), frame.max - egui::vec2(6.0, 18.0));
    let low = min.min(0) as f64;
    let high = (max as f64).max(low + 1.0);
    let last = series.points.len().saturating_sub(1).max(1) as f32;
    let to_screen = |index: usize, value: i64| {
        let x = plot.left() + plot.width() * index as f32 / last;
        let t = ((value as f64 - low) / (high - low)) as f32;
        Pos2::new(x, plot.bottom() - plot.height() * t)
    };

    let text_color = ui.visuals().weak_text_color();
    let axis_font = FontId::proportional(10.0);
    for step in 0..=3 {
        let value = low + (high - low) * step as f64 / 3.0;
        let y = plot.bottom() - plot.height() * step as f32 / 3.0;
        painter.text(Pos2::new(frame.left() + 40.0, y), Align2::RIGHT_CENTER, format_axis(value), axis_font.clone(), text_color);
    }
    if let (Some(first), Some(final_point)) = (series.points.first(), series.points.last()) {
        painter.text(Pos2::new(plot.left(), frame.bottom()), Align2::LEFT_BOTTOM, date_label(first.date), axis_font.clone(), text_color);
        painter.text(Pos2::new(plot.right(), frame.bottom()), Align2::RIGHT_BOTTOM, date_label(final_point.date), axis_font, text_color);
    }

    let color = metric_color32(series.metric);
    let line: Vec<Pos2> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| to_screen(i, point.value))
        .collect();
    painter.add(Shape::line(line, Stroke::new(1.5, color)));

    if let Some(pos) = response.hover_pos() {
        if plot.x_range().contains(pos.x) {
            let index = (((pos.x - plot.left()) / plot.width()) * last).round() as usize;
            if let Some(point) = series.points.get(index) {
                painter.circle_filled(to_screen(index, point.value), 3.0, color);
                chart_tooltip(response, series, index);
            }
        }
    }
}

fn chart_tooltip(response: egui::Response, series: &ChartSeries, index: usize) {
    let point = series.points[index];
    response.on_hover_ui_at_pointer(|ui| {
        ui.label(egui::RichText::new(point.date.format("%b %e, %Y").to_string()).strong());
        ui.label(format!("Value: {}", format_signed_count(point.value)));
    });
}
