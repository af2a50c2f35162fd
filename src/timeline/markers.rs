use crate::timeline::TimeMapper;
use crate::utils::format_marker_label;

/// Tolerance when deciding whether a sub-marker lands on a main marker
const COINCIDENCE_EPSILON: f64 = 1e-6;

/// Ruler spacing, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpacing {
    pub interval: f64,
    pub sub_interval: f64,
}

/// One ruler tick. Main ticks carry a label, sub ticks do not.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub time: f64,
    pub x: f64,
    pub label: Option<String>,
}

impl Marker {
    pub fn is_main(&self) -> bool {
        self.label.is_some()
    }
}

pub fn marker_spacing(original_duration: f64) -> MarkerSpacing {
    let (interval, sub_interval) = if original_duration <= 10.0 {
        (1.0, 0.25)
    } else if original_duration <= 30.0 {
        (2.0, 0.5)
    } else if original_duration <= 60.0 {
        (5.0, 1.0)
    } else if original_duration <= 120.0 {
        (10.0, 2.0)
    } else {
        (30.0, 5.0)
    };
    MarkerSpacing {
        interval,
        sub_interval,
    }
}

fn is_multiple_of(time: f64, interval: f64) -> bool {
    let ratio = time / interval;
    (ratio - ratio.round()).abs() < COINCIDENCE_EPSILON
}

/// Number of whole steps of `step` that fit in `[0, duration]`
fn step_count(duration: f64, step: f64) -> u64 {
    (duration / step + COINCIDENCE_EPSILON).floor() as u64
}

/// All ruler ticks from 0 to the source duration, sorted by pixel position.
///
/// Times are computed as `index * step` rather than accumulated, so long
/// sources do not drift off their grid.
pub fn generate_markers(mapper: &TimeMapper) -> Vec<Marker> {
    let duration = mapper.original_duration();
    if !(duration > 0.0) || !duration.is_finite() {
        return Vec::new();
    }
    let spacing = marker_spacing(duration);

    let main = (0..=step_count(duration, spacing.interval)).map(|i| {
        let time = i as f64 * spacing.interval;
        Marker {
            time,
            x: mapper.pixel_of_time(time),
            label: Some(format_marker_label(time)),
        }
    });

    let sub = (0..=step_count(duration, spacing.sub_interval))
        .map(|i| i as f64 * spacing.sub_interval)
        .filter(|time| !is_multiple_of(*time, spacing.interval))
        .map(|time| Marker {
            time,
            x: mapper.pixel_of_time(time),
            label: None,
        });

    let mut markers: Vec<Marker> = main.chain(sub).collect();
    markers.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.time.total_cmp(&b.time)));
    markers
}
