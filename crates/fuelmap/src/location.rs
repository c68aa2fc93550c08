use tokio::sync::watch;

use fuelmap_api::Location;
use fuelmap_core::{Live, LocationProvider};

/// Location provider fed explicitly by the caller (platform glue, tests).
pub struct ManualLocationProvider {
    location_tx: watch::Sender<Option<Location>>,
}

impl ManualLocationProvider {
    pub fn new() -> Self {
        let (location_tx, _) = watch::channel(None);
        Self { location_tx }
    }

    /// Publish a new fix; `(0, 0)` is normalized to unknown.
    pub fn set_location(&self, location: Option<Location>) {
        let location = location.and_then(Location::known);
        self.location_tx.send_if_modified(|current| {
            if *current == location {
                false
            } else {
                *current = location;
                true
            }
        });
    }
}

impl Default for ManualLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationProvider for ManualLocationProvider {
    fn current_location(&self) -> Live<Option<Location>> {
        Live::from(self.location_tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_origin_is_reported_as_unknown() {
        let provider = ManualLocationProvider::new();
        let mut live = provider.current_location();
        assert_eq!(live.get(), None);

        provider.set_location(Some(Location::new(0.0, 0.0)));
        provider.set_location(Some(Location::new(53.9, 27.5)));
        assert_eq!(live.next().await, Some(Some(Location::new(53.9, 27.5))));
    }
}
