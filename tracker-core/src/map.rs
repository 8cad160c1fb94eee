//! Map viewport, projection and bubble markers.
//!
//! The map uses a plain equirectangular projection: at zoom 2 the whole
//! 360 degrees of longitude fit the canvas width, and every zoom level
//! doubles the scale.

use serde::Serialize;

use crate::config::MapConfig;
use crate::format::format_count;
use crate::models::{CountrySummary, GeoPoint, Metric};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 10.0;
const METRES_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::world(&MapConfig::default())
    }
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn world(config: &MapConfig) -> Self {
        Self::new(config.default_center, config.default_zoom)
    }

    pub fn focused(point: GeoPoint, config: &MapConfig) -> Self {
        Self::new(point, config.country_zoom)
    }

    pub fn pixels_per_degree(&self, width: f32) -> f64 {
        (width as f64 / 360.0) * 2f64.powf(self.zoom - 2.0)
    }

    /// Screen position of `point` on a canvas of `size`, origin top-left.
    pub fn project(&self, point: GeoPoint, size: (f32, f32)) -> (f32, f32) {
        let scale = self.pixels_per_degree(size.0);
        let mut dlng = point.lng - self.center.lng;
        if dlng > 180.0 {
            dlng -= 360.0;
        } else if dlng < -180.0 {
            dlng += 360.0;
        }
        let x = size.0 as f64 / 2.0 + dlng * scale;
        let y = size.1 as f64 / 2.0 - (point.lat - self.center.lat) * scale;
        (x as f32, y as f32)
    }

    pub fn unproject(&self, pos: (f32, f32), size: (f32, f32)) -> GeoPoint {
        let scale = self.pixels_per_degree(size.0);
        let lng = self.center.lng + (pos.0 as f64 - size.0 as f64 / 2.0) / scale;
        let lat = self.center.lat - (pos.1 as f64 - size.1 as f64 / 2.0) / scale;
        GeoPoint::new(lat.clamp(-90.0, 90.0), wrap_longitude(lng))
    }

    /// Moves the center by a pixel drag.
    pub fn pan(&mut self, dx: f32, dy: f32, width: f32) {
        let scale = self.pixels_per_degree(width);
        self.center.lng = wrap_longitude(self.center.lng - dx as f64 / scale);
        self.center.lat = (self.center.lat + dy as f64 / scale).clamp(-85.0, 85.0);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn metres_to_pixels(&self, metres: f64, width: f32) -> f32 {
        (metres / METRES_PER_DEGREE * self.pixels_per_degree(width)) as f32
    }
}

fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub country: String,
    pub iso2: Option<String>,
    pub center: GeoPoint,
    pub radius_metres: f64,
    pub metric: Metric,
    pub flag: Option<String>,
    pub popup: Vec<String>,
}

pub fn marker_radius(value: i64, metric: Metric) -> f64 {
    (value.max(0) as f64).sqrt() * metric.radius_multiplier()
}

pub fn popup_lines(country: &CountrySummary) -> Vec<String> {
    vec![
        country.country.clone(),
        format!("Cases: {}", format_count(country.value(Metric::Cases))),
        format!("Recovered: {}", format_count(country.value(Metric::Recovered))),
        format!("Deaths: {}", format_count(country.value(Metric::Deaths))),
    ]
}

/// One bubble per country, sized by the square root of `metric`.
pub fn build_markers(countries: &[CountrySummary], metric: Metric) -> Vec<MapMarker> {
    countries
        .iter()
        .map(|country| MapMarker {
            country: country.country.clone(),
            iso2: country.country_info.iso2.clone(),
            center: country.country_info.point(),
            radius_metres: marker_radius(country.value(metric), metric),
            metric,
            flag: country.country_info.flag.clone(),
            popup: popup_lines(country),
        })
        .collect()
}
