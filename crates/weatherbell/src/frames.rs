//! Frame listing and time-window selection.

use std::sync::OnceLock;

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::frame::{Cycle, Frame};
use arkstorm_model::view::View;
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

use crate::api::{post_string_list, ImageApiRequest};
use crate::session::SessionToken;
use crate::transport::ProviderTransport;
use crate::Endpoints;

/// Fetch the frame names of `cycle`, in provider order.
pub async fn fetch_frame_names<T: ProviderTransport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    session: &SessionToken,
    view: &View,
    cycle: Cycle,
) -> ArkstormResult<Vec<String>> {
    let mut request = ImageApiRequest::new("forecast", view);
    request.init = Some(cycle.to_string());
    post_string_list(transport, &endpoints.api_url, session, &request).await
}

/// Fetch the frame list of `cycle` and cut it to the view's time window.
pub async fn fetch_frame_window<T: ProviderTransport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    session: &SessionToken,
    view: &View,
    cycle: Cycle,
) -> ArkstormResult<Vec<Frame>> {
    let names = fetch_frame_names(transport, endpoints, session, view, cycle).await?;
    let frames = select_frame_window(&names, &endpoints.image_base, view, cycle)?;
    tracing::info!(
        cycle = %cycle,
        available = names.len(),
        selected = frames.len(),
        timespan_hours = view.timespanhours,
        "Selected frame window"
    );
    Ok(frames)
}

/// Build frames from `names`, keeping the prefix that falls within
/// `view.timespanhours` of the cycle start.
///
/// Precondition: `names` is chronological; debug builds assert it. The walk
/// stops at the first frame past the cutoff without looking further, and
/// release builds keep an out-of-order list as given. A timespan of 0
/// disables the cutoff and keeps every frame.
pub fn select_frame_window(
    names: &[String],
    image_base: &str,
    view: &View,
    cycle: Cycle,
) -> ArkstormResult<Vec<Frame>> {
    let cutoff = cycle.unix() + i64::from(view.timespanhours) * 3600;
    let mut frames: Vec<Frame> = Vec::with_capacity(names.len());

    for name in names {
        let timestamp = parse_frame_timestamp(name)?;
        if view.timespanhours > 0 && timestamp.timestamp() > cutoff {
            break;
        }
        debug_assert!(
            frames.last().map_or(true, |prev| prev.timestamp <= timestamp),
            "provider frame list is not chronological at {name}"
        );
        frames.push(Frame {
            url: frame_url(image_base, view, cycle, name),
            timestamp,
        });
    }

    Ok(frames)
}

/// Parse the leading Unix timestamp of a `<timestamp>-<id>` frame name.
pub fn parse_frame_timestamp(name: &str) -> ArkstormResult<DateTime<Utc>> {
    static FRAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = FRAME_RE.get_or_init(|| Regex::new(r"^(\d+)-").expect("valid regex"));

    let secs = re
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .ok_or_else(|| ArkstormError::parse(format!("frame name {name:?} has no timestamp")))?;

    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| ArkstormError::parse(format!("frame timestamp {secs} is out of range")))
}

/// Storage URL of a frame image.
pub fn frame_url(image_base: &str, view: &View, cycle: Cycle, name: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}/{}/{}.png",
        image_base.trim_end_matches('/'),
        view.viewtype,
        view.product,
        view.region,
        view.parameter,
        cycle,
        name
    )
}
