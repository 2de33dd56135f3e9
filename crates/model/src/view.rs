//! View configuration: one provider product/region/parameter combination.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A named download unit. One view produces one directory of
/// sequentially numbered frame images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Provider image type (e.g. "models").
    pub viewtype: String,

    /// Forecast product (e.g. "ecmwf-full").
    pub product: String,

    /// Provider domain/region identifier.
    pub region: String,

    /// Forecast parameter (e.g. "precip_24hr_inch").
    pub parameter: String,

    /// Allowed cycle start hours, UTC.
    #[serde(default)]
    pub cyclehours: BTreeSet<u32>,

    /// Maximum lead time in hours; 0 keeps every frame of the cycle.
    #[serde(default)]
    pub timespanhours: u32,

    /// IANA time zone for the frame time label.
    #[serde(default)]
    pub time_label_timezone: Option<String>,

    /// Pixel position of the frame time label.
    #[serde(default)]
    pub time_label_cords: LabelCoords,
}

/// Pixel position of a label; non-positive values disable labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCoords {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Resolved time label settings for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLabel {
    pub timezone: Tz,
    pub x: i32,
    pub y: i32,
}

impl View {
    /// The label to stamp on each frame, if the view asks for one.
    ///
    /// Labels are drawn only when both coordinates are positive. A missing
    /// time zone falls back to UTC; an unknown one is an error.
    pub fn time_label(&self) -> Result<Option<TimeLabel>, String> {
        let LabelCoords { x, y } = self.time_label_cords;
        if x <= 0 || y <= 0 {
            return Ok(None);
        }

        let timezone = match self.time_label_timezone.as_deref() {
            None | Some("") => Tz::UTC,
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| format!("unknown time zone '{name}'"))?,
        };

        Ok(Some(TimeLabel { timezone, x, y }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> View {
        View {
            viewtype: "models".to_string(),
            product: "ecmwf-full".to_string(),
            region: "pacific_nw".to_string(),
            parameter: "precip".to_string(),
            cyclehours: BTreeSet::from([0, 12]),
            timespanhours: 72,
            time_label_timezone: Some("America/Los_Angeles".to_string()),
            time_label_cords: LabelCoords { x: 420, y: 25 },
        }
    }

    #[test]
    fn test_time_label_resolves_zone() {
        let label = view().time_label().unwrap().unwrap();
        assert_eq!(label.timezone, chrono_tz::America::Los_Angeles);
        assert_eq!((label.x, label.y), (420, 25));
    }

    #[test]
    fn test_time_label_disabled_without_coordinates() {
        let mut v = view();
        v.time_label_cords = LabelCoords::default();
        assert_eq!(v.time_label().unwrap(), None);

        v.time_label_cords = LabelCoords { x: 200, y: 0 };
        assert_eq!(v.time_label().unwrap(), None);
    }

    #[test]
    fn test_time_label_rejects_unknown_zone() {
        let mut v = view();
        v.time_label_timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(v.time_label().is_err());
    }

    #[test]
    fn test_time_label_defaults_to_utc() {
        let mut v = view();
        v.time_label_timezone = None;
        assert_eq!(v.time_label().unwrap().unwrap().timezone, Tz::UTC);
    }
}
