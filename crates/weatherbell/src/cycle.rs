//! Forecast cycle listing and selection.

use std::collections::BTreeSet;

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::frame::Cycle;
use arkstorm_model::view::View;

use crate::api::{post_string_list, ImageApiRequest};
use crate::session::SessionToken;
use crate::transport::ProviderTransport;
use crate::Endpoints;

/// Fetch the available cycles for a view, most recent first.
pub async fn fetch_cycle_list<T: ProviderTransport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    session: &SessionToken,
    view: &View,
) -> ArkstormResult<Vec<String>> {
    let request = ImageApiRequest::new("init", view);
    let cycles = post_string_list(transport, &endpoints.api_url, session, &request).await?;
    tracing::debug!(cycles = cycles.len(), product = %view.product, "Fetched cycle list");
    Ok(cycles)
}

/// Pick the first cycle whose UTC start hour is allowed.
///
/// Precondition: `cycles` is ordered most-recent-first, as the provider
/// returns it. This is first-match in that order, so the result is the
/// latest allowed cycle only while that ordering holds.
pub fn select_latest_cycle(
    cycles: &[String],
    allowed_hours: &BTreeSet<u32>,
) -> ArkstormResult<Cycle> {
    if cycles.is_empty() {
        return Err(ArkstormError::no_matching_cycle("cycle list is empty"));
    }

    for raw in cycles {
        let cycle: Cycle = raw.parse().map_err(|_| {
            ArkstormError::no_matching_cycle(format!("unparsable cycle value {raw:?}"))
        })?;
        let hour = cycle.hour_utc().ok_or_else(|| {
            ArkstormError::no_matching_cycle(format!("cycle {raw} is out of range"))
        })?;
        if allowed_hours.contains(&hour) {
            return Ok(cycle);
        }
    }

    Err(ArkstormError::no_matching_cycle(format!(
        "none of {} cycles start at hours {:?}",
        cycles.len(),
        allowed_hours
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycles() -> Vec<String> {
        ["1675447200", "1675425600", "1675404000", "1675382400"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn hours(h: &[u32]) -> BTreeSet<u32> {
        h.iter().copied().collect()
    }

    #[test]
    fn test_selects_first_matching_hour() {
        let selected = select_latest_cycle(&cycles(), &hours(&[0, 12])).unwrap();
        assert_eq!(selected.unix(), 1_675_425_600);

        let selected = select_latest_cycle(&cycles(), &hours(&[6])).unwrap();
        assert_eq!(selected.unix(), 1_675_404_000);

        let selected = select_latest_cycle(&cycles(), &hours(&[18])).unwrap();
        assert_eq!(selected.unix(), 1_675_447_200);
    }

    #[test]
    fn test_no_matching_hour() {
        let err = select_latest_cycle(&cycles(), &hours(&[10])).unwrap_err();
        assert!(matches!(err, ArkstormError::NoMatchingCycle { .. }));
    }

    #[test]
    fn test_empty_list() {
        assert!(matches!(
            select_latest_cycle(&[], &hours(&[18])),
            Err(ArkstormError::NoMatchingCycle { .. })
        ));
    }

    #[test]
    fn test_garbage_values() {
        let garbage: Vec<String> = ["acv", "asdf", "gsdf0", "24fs"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(matches!(
            select_latest_cycle(&garbage, &hours(&[18])),
            Err(ArkstormError::NoMatchingCycle { .. })
        ));
    }

    #[test]
    fn test_order_decides_between_matches() {
        let reversed: Vec<String> = cycles().into_iter().rev().collect();
        let selected = select_latest_cycle(&reversed, &hours(&[0, 12])).unwrap();
        assert_eq!(selected.unix(), 1_675_382_400);
    }
}
