//! Weather forecast helpers for the KMA ultra-short-term forecast API.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Hours at which forecasts are published (KST)
pub const FORECAST_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

const KST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Korea Standard Time, UTC+9
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

pub fn kst_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

pub fn kst_today() -> NaiveDate {
    kst_now().date_naive()
}

/// `[start, end)` of a KST calendar day, in UTC.
pub fn kst_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN) - Duration::seconds(i64::from(KST_OFFSET_SECONDS));
    let start = start.and_utc();
    (start, start + Duration::days(1))
}

/// Base date (`YYYYMMDD`) and base time (`HH00`) of the latest published
/// forecast at `now`. Before 02:00 the previous day's 23:00 forecast is used.
pub fn forecast_base(now: DateTime<FixedOffset>) -> (String, String) {
    let hour = now.hour();
    match FORECAST_HOURS.iter().rev().find(|h| **h <= hour) {
        Some(h) => (now.format("%Y%m%d").to_string(), format!("{:02}00", h)),
        None => {
            let yesterday = now - Duration::days(1);
            (yesterday.format("%Y%m%d").to_string(), "2300".to_string())
        }
    }
}

pub fn sky_label(code: &str) -> &'static str {
    match code.trim() {
        "1" => "맑음",
        "2" => "구름조금",
        "3" => "구름많음",
        "4" => "흐림",
        _ => "알 수 없음",
    }
}

pub fn precipitation_label(code: &str) -> &'static str {
    match code.trim() {
        "1" => "비",
        "2" => "비/눈",
        "3" => "눈",
        "4" => "소나기",
        _ => "없음",
    }
}

/// Raw forecast values as codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeatherCodes {
    pub temperature: String,
    pub sky: String,
    pub precipitation: String,
    pub humidity: String,
}

impl Default for WeatherCodes {
    fn default() -> Self {
        Self {
            temperature: "N/A".into(),
            sky: "1".into(),
            precipitation: "0".into(),
            humidity: "N/A".into(),
        }
    }
}

impl WeatherCodes {
    /// Fold forecast items `(category, value)` into codes. The first value
    /// seen for a category wins, which is the nearest forecast hour.
    pub fn from_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut codes = Self::default();
        let mut seen = [false; 4];
        for (category, value) in items {
            let slot = match category {
                "T1H" | "TMP" => 0,
                "SKY" => 1,
                "PTY" => 2,
                "REH" => 3,
                _ => continue,
            };
            if seen[slot] {
                continue;
            }
            seen[slot] = true;
            let target = match slot {
                0 => &mut codes.temperature,
                1 => &mut codes.sky,
                2 => &mut codes.precipitation,
                _ => &mut codes.humidity,
            };
            *target = value.to_string();
        }
        codes
    }
}

/// Weather of an account's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Weather {
    pub address: String,
    pub weather: WeatherCodes,
}

/// Display form with labels and units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeatherDisplay {
    pub address: String,
    pub temperature: String,
    pub sky: String,
    pub precipitation: String,
    pub humidity: String,
}

impl From<&Weather> for WeatherDisplay {
    fn from(w: &Weather) -> Self {
        Self {
            address: w.address.clone(),
            temperature: format!("{}°C", w.weather.temperature),
            sky: sky_label(&w.weather.sky).to_string(),
            precipitation: precipitation_label(&w.weather.precipitation).to_string(),
            humidity: format!("{}%", w.weather.humidity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        kst().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_forecast_base_picks_latest_hour() {
        assert_eq!(
            forecast_base(at(2025, 3, 10, 9, 30)),
            ("20250310".to_string(), "0800".to_string())
        );
        assert_eq!(
            forecast_base(at(2025, 3, 10, 23, 59)),
            ("20250310".to_string(), "2300".to_string())
        );
        assert_eq!(
            forecast_base(at(2025, 3, 10, 2, 0)),
            ("20250310".to_string(), "0200".to_string())
        );
    }

    #[test]
    fn test_forecast_base_before_first_slot_uses_previous_day() {
        assert_eq!(
            forecast_base(at(2025, 3, 1, 1, 15)),
            ("20250228".to_string(), "2300".to_string())
        );
    }

    #[test]
    fn test_kst_day_bounds() {
        let (start, end) = kst_day_bounds(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 15, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_labels() {
        assert_eq!(sky_label("1"), "맑음");
        assert_eq!(sky_label("4"), "흐림");
        assert_eq!(sky_label("9"), "알 수 없음");
        assert_eq!(precipitation_label("2"), "비/눈");
        assert_eq!(precipitation_label("7"), "없음");
    }

    #[test]
    fn test_codes_from_items() {
        let codes = WeatherCodes::from_items(vec![
            ("T1H", "3"),
            ("T1H", "5"),
            ("SKY", "3"),
            ("PTY", "0"),
            ("REH", "45"),
            ("LGT", "0"),
        ]);
        assert_eq!(codes.temperature, "3");
        assert_eq!(codes.sky, "3");
        assert_eq!(codes.humidity, "45");
    }

    #[test]
    fn test_display_form() {
        let weather = Weather {
            address: "서울특별시 종로구 청운효자동".into(),
            weather: WeatherCodes {
                temperature: "3".into(),
                sky: "4".into(),
                precipitation: "1".into(),
                humidity: "80".into(),
            },
        };
        let display = WeatherDisplay::from(&weather);
        assert_eq!(display.temperature, "3°C");
        assert_eq!(display.sky, "흐림");
        assert_eq!(display.precipitation, "비");
        assert_eq!(display.humidity, "80%");
    }
}
