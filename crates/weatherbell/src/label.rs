//! Localized time labels drawn onto frames.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use arkstorm_model::view::TimeLabel;
use chrono::{DateTime, Utc};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

pub const LABEL_FONT_SIZE: f32 = 24.0;
pub const LABEL_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// e.g. `Sat, 4 Feb 9:25 PM PST`
pub const LABEL_FORMAT: &str = "%a, %-d %b %-I:%M %p %Z";

/// Format a frame time in the label's time zone.
pub fn format_label(timestamp: DateTime<Utc>, label: &TimeLabel) -> String {
    timestamp
        .with_timezone(&label.timezone)
        .format(LABEL_FORMAT)
        .to_string()
}

/// Draw `text` with its baseline starting at the label position.
pub fn draw_label(image: &mut RgbaImage, label: &TimeLabel, text: &str) -> Result<(), String> {
    let font = FontRef::try_from_slice(LABEL_FONT)
        .map_err(|e| format!("embedded label font is invalid: {e}"))?;
    let scale = PxScale::from(LABEL_FONT_SIZE);

    // draw_text_mut positions the glyph box's top edge; shift up by the
    // ascent so `label.y` is the baseline.
    let ascent = font.as_scaled(scale).ascent().round() as i32;
    draw_text_mut(
        image,
        LABEL_COLOR,
        label.x,
        label.y - ascent,
        scale,
        &font,
        text,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn label(timezone: Tz) -> TimeLabel {
        TimeLabel {
            timezone,
            x: 20,
            y: 30,
        }
    }

    #[test]
    fn test_format_label_in_pacific_time() {
        let ts = Utc.timestamp_opt(1_675_574_734, 0).unwrap();
        assert_eq!(
            format_label(ts, &label(chrono_tz::America::Los_Angeles)),
            "Sat, 4 Feb 9:25 PM PST"
        );
    }

    #[test]
    fn test_format_label_in_utc() {
        let ts = Utc.timestamp_opt(1_675_447_200, 0).unwrap();
        assert_eq!(format_label(ts, &label(Tz::UTC)), "Fri, 3 Feb 6:00 PM UTC");
    }

    #[test]
    fn test_draw_label_marks_pixels_near_position() {
        let mut image = RgbaImage::from_pixel(200, 60, Rgba([0, 0, 0, 255]));
        draw_label(&mut image, &label(Tz::UTC), "Fri").unwrap();

        let red = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .collect::<Vec<_>>();
        assert!(!red.is_empty());
        assert!(red.iter().all(|(x, y, _)| *x >= 20 && *y <= 36));
    }
}
