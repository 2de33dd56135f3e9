//! Chapter listings for published video descriptions.

use std::fmt::Write;

use arkstorm_model::video::OutputClip;

/// Format a start time as `M:SS`, truncating fractional seconds.
pub fn format_timestamp(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// `header`, a blank line, then one `M:SS Name` line per clip.
pub fn describe(header: &str, clips: &[OutputClip]) -> String {
    let mut description = format!("{header}\n\n");
    for clip in clips {
        let _ = writeln!(
            description,
            "{} {}",
            format_timestamp(clip.start_time_secs),
            clip.name
        );
    }
    description
}
