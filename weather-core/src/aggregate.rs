//! Reduction of 3-hourly forecast samples into per-day summaries.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::{
    model::{DaySummary, ForecastSample},
    time::day_key,
};

/// Group samples by UTC calendar date and summarise each day.
///
/// The result has one entry per date present in the input, ascending, and
/// does not depend on the order of `samples`.
pub fn summarize_forecast(samples: &[ForecastSample]) -> Vec<DaySummary> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        buckets.entry(day_key(&sample.time)).or_default().push(sample);
    }

    let summaries: Vec<DaySummary> = buckets
        .into_iter()
        .map(|(date, group)| summarize_day(date, &group))
        .collect();

    tracing::debug!(samples = samples.len(), days = summaries.len(), "aggregated forecast");
    summaries
}

// `group` is never empty: buckets are only created when a sample is pushed.
fn summarize_day(date: NaiveDate, group: &[&ForecastSample]) -> DaySummary {
    let (min_temp, max_temp, sum) = group.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), s| (min.min(s.temperature), max.max(s.temperature), sum + s.temperature),
    );

    let typical_condition =
        most_common(group.iter().map(|s| s.condition.as_str())).unwrap_or_default().to_string();
    let typical_icon = most_common(group.iter().filter_map(|s| s.icon.as_deref())).map(str::to_string);

    DaySummary {
        date,
        min_temp,
        max_temp,
        avg_temp: sum / group.len() as f64,
        typical_condition,
        typical_icon,
    }
}

/// Most frequent value. Ties go to the lexicographically smallest value so the
/// winner is the same for any ordering of the input.
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const DAY: i64 = 86_400;
    const HOUR: i64 = 3_600;
    // 2024-03-10 00:00:00 UTC
    const DAY1: i64 = 1_710_028_800;

    fn sample(ts: i64, temp: f64, cond: &str) -> ForecastSample {
        ForecastSample {
            time: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
            temperature: temp,
            condition: cond.to_string(),
            icon: None,
        }
    }

    fn with_icon(mut s: ForecastSample, icon: &str) -> ForecastSample {
        s.icon = Some(icon.to_string());
        s
    }

    fn five_day_run() -> Vec<ForecastSample> {
        let conds = ["clear sky", "few clouds", "light rain", "clear sky", "overcast clouds"];
        (0..40)
            .map(|i| {
                let ts = DAY1 + 9 * HOUR + i * 3 * HOUR;
                let temp = 5.0 + ((i * 7) % 13) as f64 - 0.25 * i as f64;
                sample(ts, temp, conds[(i % 5) as usize])
            })
            .collect()
    }

    #[test]
    fn three_samples_one_day() {
        let samples = vec![
            sample(DAY1, 10.0, "clear"),
            sample(DAY1 + 3 * HOUR, 20.0, "clear"),
            sample(DAY1 + 6 * HOUR, 15.0, "rain"),
        ];

        let days = summarize_forecast(&samples);
        assert_eq!(days.len(), 1);

        let day = &days[0];
        assert_eq!(day.date.to_string(), "2024-03-10");
        assert_eq!(day.min_temp, 10.0);
        assert_eq!(day.max_temp, 20.0);
        assert_eq!(day.avg_temp, 15.0);
        assert_eq!(day.typical_condition, "clear");
        assert_eq!(day.typical_icon, None);
    }

    #[test]
    fn empty_input_gives_no_days() {
        assert!(summarize_forecast(&[]).is_empty());
    }

    #[test]
    fn single_sample_day() {
        let days = summarize_forecast(&[sample(DAY1 + 12 * HOUR, -3.5, "snow")]);
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.min_temp, -3.5);
        assert_eq!(day.max_temp, -3.5);
        assert_eq!(day.avg_temp, -3.5);
        assert_eq!(day.typical_condition, "snow");
    }

    #[test]
    fn one_summary_per_distinct_date_ascending() {
        let days = summarize_forecast(&five_day_run());

        // 09:00 on day 1 + 40 * 3h spans six calendar dates.
        assert_eq!(days.len(), 6);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn avg_is_between_min_and_max() {
        for day in summarize_forecast(&five_day_run()) {
            assert!(day.min_temp <= day.avg_temp, "{day:?}");
            assert!(day.avg_temp <= day.max_temp, "{day:?}");
        }
    }

    #[test]
    fn missing_days_are_not_filled_in() {
        let samples = vec![sample(DAY1, 1.0, "a"), sample(DAY1 + 3 * DAY, 2.0, "b")];
        let days = summarize_forecast(&samples);
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-03-10", "2024-03-13"]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = five_day_run();
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut interleaved: Vec<ForecastSample> =
            forward.iter().step_by(2).chain(forward.iter().skip(1).step_by(2)).cloned().collect();
        interleaved.rotate_left(7);

        let expected = summarize_forecast(&forward);
        assert_eq!(summarize_forecast(&reversed), expected);
        assert_eq!(summarize_forecast(&interleaved), expected);
    }

    #[test]
    fn strict_majority_wins_regardless_of_order() {
        let mut samples = vec![
            sample(DAY1, 1.0, "rain"),
            sample(DAY1 + 3 * HOUR, 1.0, "clear"),
            sample(DAY1 + 6 * HOUR, 1.0, "rain"),
            sample(DAY1 + 9 * HOUR, 1.0, "snow"),
        ];
        for _ in 0..samples.len() {
            assert_eq!(summarize_forecast(&samples)[0].typical_condition, "rain");
            samples.rotate_left(1);
        }
    }

    #[test]
    fn tie_resolves_to_one_of_the_leaders() {
        let samples = vec![
            sample(DAY1, 1.0, "rain"),
            sample(DAY1 + 3 * HOUR, 1.0, "clear"),
            sample(DAY1 + 6 * HOUR, 1.0, "drizzle"),
            sample(DAY1 + 9 * HOUR, 1.0, "rain"),
            sample(DAY1 + 12 * HOUR, 1.0, "clear"),
        ];
        let winner = summarize_forecast(&samples)[0].typical_condition.clone();
        assert!(winner == "rain" || winner == "clear");
    }

    #[test]
    fn icon_majority_ignores_samples_without_icon() {
        let samples = vec![
            sample(DAY1, 1.0, "rain"),
            sample(DAY1 + 3 * HOUR, 1.0, "rain"),
            with_icon(sample(DAY1 + 6 * HOUR, 1.0, "rain"), "10d"),
            with_icon(sample(DAY1 + 9 * HOUR, 1.0, "clear"), "01d"),
            with_icon(sample(DAY1 + 12 * HOUR, 1.0, "rain"), "10d"),
        ];
        let day = &summarize_forecast(&samples)[0];
        assert_eq!(day.typical_icon.as_deref(), Some("10d"));
    }

    #[test]
    fn most_common_of_nothing_is_none() {
        assert_eq!(most_common(std::iter::empty::<&str>()), None);
    }
}
