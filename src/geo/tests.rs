#[cfg(test)]
mod solar_tests {
    use crate::common::constants::test_constants::*;
    use crate::geo::solar::*;
    use crate::geo::{Location, Twilight};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn stockholm(twilight: Twilight) -> Location {
        Location {
            latitude: TEST_LATITUDE,
            longitude: TEST_LONGITUDE,
            timezone: Some(TEST_TIMEZONE.parse().unwrap()),
            twilight,
        }
    }

    fn equinox() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[test]
    fn test_official_window_at_equinox() {
        let window = sun_window(equinox(), &stockholm(Twilight::Official)).unwrap();
        // Roughly 06:00 and 18:10 local (CET) at the equinox
        assert!((330..=390).contains(&window.sunrise.minutes()), "{window:?}");
        assert!((1065..=1125).contains(&window.sunset.minutes()), "{window:?}");
    }

    #[test]
    fn test_civil_twilight_widens_window() {
        let official = sun_window(equinox(), &stockholm(Twilight::Official)).unwrap();
        let civil = sun_window(equinox(), &stockholm(Twilight::Civil)).unwrap();
        assert!(civil.sunrise < official.sunrise);
        assert!(civil.sunset > official.sunset);
    }

    #[test]
    fn test_window_is_deterministic() {
        let location = stockholm(Twilight::Civil);
        assert_eq!(
            sun_window(equinox(), &location).unwrap(),
            sun_window(equinox(), &location).unwrap()
        );
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        let mut location = stockholm(Twilight::Civil);
        location.latitude = 91.0;
        assert!(sun_window(equinox(), &location).is_err());

        let mut location = stockholm(Twilight::Civil);
        location.longitude = -181.0;
        assert!(sun_window(equinox(), &location).is_err());
    }

    #[test]
    fn test_events_on_other_dates_are_rejected() {
        let location = stockholm(Twilight::Civil);
        // What the solar equations yield when the sun never crosses the threshold
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert!(window_from_events(equinox(), epoch, epoch, &location).is_err());
    }

    #[test]
    fn test_midnight_crossing_window_is_rejected() {
        let location = Location {
            timezone: Some(chrono_tz::UTC),
            ..stockholm(Twilight::Official)
        };
        let rise = Utc.with_ymd_and_hms(2024, 3, 20, 6, 0, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2024, 3, 21, 0, 30, 0).unwrap();
        assert!(window_from_events(equinox(), rise, set, &location).is_err());
    }

    #[test]
    fn test_events_truncate_to_minute_in_location_zone() {
        let location = Location {
            timezone: Some(chrono_tz::UTC),
            ..stockholm(Twilight::Official)
        };
        let rise = Utc.with_ymd_and_hms(2024, 3, 20, 6, 30, 59).unwrap();
        let set = Utc.with_ymd_and_hms(2024, 3, 20, 20, 30, 1).unwrap();
        let window = window_from_events(equinox(), rise, set, &location).unwrap();
        assert_eq!(window.sunrise.minutes(), 390);
        assert_eq!(window.sunset.minutes(), 1230);
    }
}

#[cfg(test)]
mod location_tests {
    use crate::geo::{Location, Twilight};
    use chrono::{Local, TimeZone, Utc};

    #[test]
    fn test_twilight_names() {
        assert_eq!(Twilight::parse("civil"), Some(Twilight::Civil));
        assert_eq!(Twilight::parse("official"), Some(Twilight::Official));
        assert_eq!(Twilight::parse("nautical"), None);
        assert_eq!(Twilight::Civil.to_string(), "civil");
    }

    #[test]
    fn test_local_minute_follows_location_zone() {
        let location = Location {
            timezone: Some(chrono_tz::Asia::Tokyo),
            ..Location::new(35.6762, 139.6503)
        };
        // 23:30 UTC is 08:30 the next day in Tokyo
        let now = Utc
            .with_ymd_and_hms(2024, 1, 10, 23, 30, 0)
            .unwrap()
            .with_timezone(&Local);
        let (date, minute) = location.local_date_and_minute(now);
        assert_eq!(date.to_string(), "2024-01-11");
        assert_eq!(minute.minutes(), 8 * 60 + 30);
        assert_eq!(location.timezone_name(), "Asia/Tokyo");
    }
}
