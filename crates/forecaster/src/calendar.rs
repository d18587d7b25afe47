use crate::error::ForecastError;
use chrono::{Datelike, Days, Months, NaiveDate};
use core_types::{Frequency, SeriesPoint};

/// The bucket that follows `date`.
pub fn next_period(frequency: Frequency, date: NaiveDate) -> Result<NaiveDate, ForecastError> {
    let next = match frequency {
        Frequency::Quarter => date.checked_add_months(Months::new(3)),
        Frequency::Month => date.checked_add_months(Months::new(1)),
        Frequency::Week => date.checked_add_days(Days::new(7)),
    };
    next.ok_or(ForecastError::Calendar(date))
}

/// Number of buckets in one seasonal cycle (a year).
pub fn season_length(frequency: Frequency) -> usize {
    match frequency {
        Frequency::Quarter => 4,
        Frequency::Month => 12,
        Frequency::Week => 52,
    }
}

/// Position of `date` within the yearly cycle, in `0..season_length`.
pub fn season_index(frequency: Frequency, date: NaiveDate) -> usize {
    match frequency {
        Frequency::Quarter => (date.month0() / 3) as usize,
        Frequency::Month => date.month0() as usize,
        // ISO week 53 folds into week 52.
        Frequency::Week => (date.iso_week().week0() as usize).min(51),
    }
}

/// Sorts the series, merges duplicate periods and inserts zero-valued
/// buckets for missing periods between the first and last observation.
/// Fails once the result would exceed `max_len` buckets.
pub fn regularize(
    points: &[SeriesPoint],
    frequency: Frequency,
    max_len: usize,
) -> Result<Vec<SeriesPoint>, ForecastError> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.period);

    let mut out: Vec<SeriesPoint> = Vec::with_capacity(sorted.len().min(max_len));
    let push = |out: &mut Vec<SeriesPoint>, point: SeriesPoint| {
        if out.len() >= max_len {
            return Err(ForecastError::InvalidParameter(format!(
                "history spans more than {max_len} {} buckets",
                frequency.sql_unit()
            )));
        }
        out.push(point);
        Ok(())
    };

    for point in sorted {
        if let Some(last) = out.last_mut() {
            if last.period == point.period {
                last.value += point.value;
                continue;
            }
            let mut cursor = next_period(frequency, last.period)?;
            while cursor < point.period {
                push(&mut out, SeriesPoint { period: cursor, value: 0.0 })?;
                cursor = next_period(frequency, cursor)?;
            }
        }
        push(&mut out, point)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn steps_each_bucket_size() {
        assert_eq!(next_period(Frequency::Quarter, date(2024, 10, 1)).unwrap(), date(2025, 1, 1));
        assert_eq!(next_period(Frequency::Month, date(2024, 12, 1)).unwrap(), date(2025, 1, 1));
        assert_eq!(next_period(Frequency::Week, date(2024, 12, 30)).unwrap(), date(2025, 1, 6));
    }

    #[test]
    fn season_indices_stay_in_range() {
        assert_eq!(season_index(Frequency::Quarter, date(2024, 8, 1)), 2);
        assert_eq!(season_index(Frequency::Month, date(2024, 12, 1)), 11);
        // 2020-12-28 is in ISO week 53.
        assert_eq!(season_index(Frequency::Week, date(2020, 12, 28)), 51);
        assert_eq!(season_index(Frequency::Week, date(2024, 1, 1)), 0);
    }

    #[test]
    fn regularize_fills_gaps_and_merges_duplicates() {
        let points = vec![
            SeriesPoint { period: date(2024, 4, 1), value: 3.0 },
            SeriesPoint { period: date(2024, 1, 1), value: 1.0 },
            SeriesPoint { period: date(2024, 1, 1), value: 2.0 },
        ];
        let out = regularize(&points, Frequency::Month, 4).unwrap();
        let periods: Vec<_> = out.iter().map(|p| p.period).collect();
        assert_eq!(
            periods,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]
        );
        let values: Vec<_> = out.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![3.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn regularize_stops_at_the_length_limit() {
        let points = vec![
            SeriesPoint { period: date(1, 1, 1), value: 1.0 },
            SeriesPoint { period: date(2024, 1, 1), value: 1.0 },
        ];
        let err = regularize(&points, Frequency::Week, 2600).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));

        let err = regularize(&points[..1], Frequency::Week, 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }
}
