use proptest::prelude::*;

use crate::{
    classify,
    config::AnalysisConfig,
    decode::{interval, time_of_day},
    stream::StreamAggregator,
    tests::fixtures::{rmc_at, sentence},
};

fn nmea_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[$]?(GN|GP|BD|XX)(RMC|GGA|GSA|GSV|TXT|UNK)(,[0-9A-Z.]{0,10}){0,20}(\\*[0-9A-Fa-f]{0,3})?",
        "uart-1: ([$][A-Z]{5},[0-9]{0,4}(\\?\\?)?){0,4}",
        ".*",
    ]
}

fn fix_time() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60, 0u32..60, 0u32..100)
        .prop_map(|(h, m, s, cs)| format!("{h:02}{m:02}{s:02}.{cs:02}"))
}

proptest! {
    #[test]
    fn classify_never_panics(line in nmea_like()) {
        let _ = classify(&line);
    }

    #[test]
    fn missing_delimiter_fails_checksum(line in "[$][^*]{0,80}") {
        let result = classify(&line).unwrap();
        prop_assert!(!result.checksum_ok());
        prop_assert!(!result.valid());
    }

    #[test]
    fn generated_sentences_have_valid_checksum(payload in "[A-Z]{5}(,[0-9A-Z. ]{0,10}){0,15}") {
        let result = classify(&sentence(&payload)).unwrap();
        prop_assert!(result.checksum_ok());
    }

    #[test]
    fn stream_counters_are_consistent(lines in prop::collection::vec(nmea_like(), 0..60)) {
        let stats = StreamAggregator::run(AnalysisConfig::default(), &lines).stats;

        prop_assert!(stats.valid_count <= stats.total);
        prop_assert!(stats.checksum_error_count <= stats.invalid_count());
        prop_assert!(stats.format_error_count <= stats.invalid_count());
        prop_assert!(
            stats.invalid_count() <= stats.checksum_error_count + stats.format_error_count
        );
        prop_assert!(stats.type_counts.values().sum::<usize>() <= stats.total);
        prop_assert_eq!(stats.lat_samples.len(), stats.lon_samples.len());
        for lat in &stats.lat_samples {
            prop_assert!((-90.0..=90.0).contains(lat));
        }
        for lon in &stats.lon_samples {
            prop_assert!((-180.0..=180.0).contains(lon));
        }
    }

    #[test]
    fn fix_intervals_stay_in_window(times in prop::collection::vec(fix_time(), 0..30)) {
        let lines: Vec<String> = times.iter().map(|t| rmc_at(t)).collect();
        let stats = StreamAggregator::run(AnalysisConfig::default(), &lines).stats;

        prop_assert_eq!(stats.valid_count, times.len());
        prop_assert!(stats.rmc_intervals.len() < times.len().max(1));
        for gap in &stats.rmc_intervals {
            prop_assert!(0.5 < *gap && *gap < 2.0);
        }
    }

    #[test]
    fn intervals_are_never_negative(prev in fix_time(), curr in fix_time()) {
        let gap = interval(time_of_day(&prev).unwrap(), time_of_day(&curr).unwrap());
        prop_assert!((0.0..86_400.0).contains(&gap));
    }
}
