//! Report retrieval and daylight lookup
//!
//! Fetches raw METAR/TAF text from aviationweather.gov. Retrieval never fails
//! an evaluation: any transport or HTTP problem is logged and turned into a
//! placeholder text, which the parsing core reads as "no data".

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sunrise::{SolarDay, SolarEvent};
use tracing::{debug, info, instrument, warn};

use crate::airports::Coordinates;
use crate::cache::{ReportCache, report_key};
use crate::config::WeatherConfig;
use crate::error::RunwayWindError;
use crate::report::{ReportKind, latest_taf};

pub const METAR_NOT_AVAILABLE: &str = "METAR not available";
pub const TAF_NOT_AVAILABLE: &str = "TAF not available";
pub const TAF_NOT_ISSUED: &str = "TAF not issued for this station";

/// Whether `text` is one of the placeholders used for missing reports
#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == METAR_NOT_AVAILABLE || text == TAF_NOT_AVAILABLE || text == TAF_NOT_ISSUED
}

fn not_available(kind: ReportKind) -> String {
    match kind {
        ReportKind::Metar => METAR_NOT_AVAILABLE.to_string(),
        ReportKind::Taf => TAF_NOT_AVAILABLE.to_string(),
    }
}

/// Report text from a response body, keeping only the latest TAF when the
/// lookback window returned several
fn report_text(kind: ReportKind, body: &str) -> Option<String> {
    let text = match kind {
        ReportKind::Metar => body.trim(),
        ReportKind::Taf => latest_taf(body),
    };
    (!text.is_empty()).then(|| text.to_string())
}

/// Raw report text for one airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReports {
    pub metar: String,
    pub taf: String,
}

/// METAR/TAF client with retry and an optional report cache
pub struct ReportClient {
    client: ClientWithMiddleware,
    config: WeatherConfig,
    cache: Option<ReportCache>,
    cache_ttl: Duration,
}

impl ReportClient {
    /// Create a new client
    pub fn new(
        config: WeatherConfig,
        cache: Option<ReportCache>,
        cache_ttl: Duration,
    ) -> Result<Self, RunwayWindError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RunwayWindError::fetch(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            config,
            cache,
            cache_ttl,
        })
    }

    /// Fetch METAR and TAF for one airport concurrently
    pub async fn fetch_reports(&self, icao: &str) -> RawReports {
        let (metar, taf) = futures::join!(
            self.fetch(ReportKind::Metar, icao),
            self.fetch(ReportKind::Taf, icao)
        );
        RawReports { metar, taf }
    }

    /// Fetch one report, from the cache when fresh
    #[instrument(skip(self))]
    pub async fn fetch(&self, kind: ReportKind, icao: &str) -> String {
        let key = report_key(kind, icao);

        if let Some(cache) = &self.cache {
            match cache.get::<String>(&key).await {
                Ok(Some(text)) => {
                    debug!("Using cached {} for {}", kind, icao);
                    return text;
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed for {}: {}", key, e),
            }
        }

        let text = self.fetch_remote(kind, icao).await;

        if let Some(cache) = &self.cache {
            if !is_placeholder(&text) {
                if let Err(e) = cache.put(&key, text.clone(), self.cache_ttl).await {
                    warn!("Failed to cache {}: {}", key, e);
                }
            }
        }

        text
    }

    async fn fetch_remote(&self, kind: ReportKind, icao: &str) -> String {
        let (base_url, hours) = match kind {
            ReportKind::Metar => (&self.config.metar_url, self.config.metar_hours_before_now),
            ReportKind::Taf => (&self.config.taf_url, self.config.taf_hours_before_now),
        };
        let url = format!(
            "{}?ids={}&format=raw&hoursBeforeNow={}",
            base_url,
            icao.to_ascii_uppercase(),
            hours
        );

        info!("Fetching {} for {}", kind, icao);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} request for {} failed: {}", kind, icao, e);
                return not_available(kind);
            }
        };

        let status = response.status();
        if kind == ReportKind::Taf && status == StatusCode::NOT_FOUND {
            // Many fields (military ones especially) never issue a TAF
            return TAF_NOT_ISSUED.to_string();
        }
        if !status.is_success() {
            warn!("{} request for {} returned {}", kind, icao, status);
            return not_available(kind);
        }

        match response.text().await {
            Ok(body) => report_text(kind, &body).unwrap_or_else(|| {
                debug!("Empty {} response for {}", kind, icao);
                not_available(kind)
            }),
            Err(e) => {
                warn!("Failed to read {} body for {}: {}", kind, icao, e);
                not_available(kind)
            }
        }
    }
}

/// Sunrise and sunset of one day, UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Daylight {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl Daylight {
    #[must_use]
    pub fn is_daylight(&self, at: DateTime<Utc>) -> bool {
        at >= self.sunrise && at <= self.sunset
    }
}

/// Sunrise and sunset at `location` on `date`.
///
/// `None` for invalid coordinates and for polar day or night.
#[must_use]
pub fn daylight(location: &Coordinates, date: NaiveDate) -> Option<Daylight> {
    let coordinates = sunrise::Coordinates::new(location.latitude, location.longitude)?;
    let solar_day = SolarDay::new(coordinates, date);

    let sunrise = solar_day.event_time(SolarEvent::Sunrise)?;
    let sunset = solar_day.event_time(SolarEvent::Sunset)?;

    Some(Daylight { sunrise, sunset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use rstest::rstest;

    #[rstest]
    #[case(METAR_NOT_AVAILABLE, true)]
    #[case(TAF_NOT_AVAILABLE, true)]
    #[case(TAF_NOT_ISSUED, true)]
    #[case("  ", true)]
    #[case("METAR LIRF 121150Z 24015KT 9999 FEW030", false)]
    fn test_is_placeholder(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_placeholder(text), expected);
    }

    #[test]
    fn test_report_text_keeps_latest_taf() {
        let body = "TAF LIRF 121700Z 1218/1324 24010KT 9999\nTAF LIRF 121100Z 1212/1318 24010KT 0800 FG\n";
        assert_eq!(
            report_text(ReportKind::Taf, body).as_deref(),
            Some("TAF LIRF 121700Z 1218/1324 24010KT 9999")
        );
        assert_eq!(report_text(ReportKind::Taf, "  \n"), None);
    }

    #[test]
    fn test_report_text_keeps_every_metar() {
        let body = "METAR LIRF 121150Z 24015KT 9999\nMETAR LIRF 121120Z 25018KT 9999\n";
        assert_eq!(
            report_text(ReportKind::Metar, body).as_deref(),
            Some("METAR LIRF 121150Z 24015KT 9999\nMETAR LIRF 121120Z 25018KT 9999")
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReportClient::new(WeatherConfig::default(), None, Duration::from_secs(300));
        assert!(client.is_ok());
    }

    #[test]
    fn test_daylight_rome_midsummer() {
        let rome = Coordinates {
            latitude: 41.80,
            longitude: 12.25,
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let day = daylight(&rome, date).unwrap();

        assert!((3..=4).contains(&day.sunrise.hour()));
        assert!((18..=19).contains(&day.sunset.hour()));
        assert!(day.is_daylight(Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap()));
        assert!(!day.is_daylight(Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap()));
    }

    #[test]
    fn test_daylight_invalid_coordinates() {
        let nowhere = Coordinates {
            latitude: 95.0,
            longitude: 12.0,
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        assert!(daylight(&nowhere, date).is_none());
    }
}
