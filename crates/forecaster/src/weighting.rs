use core_types::{GroupedRow, SeriesPoint};

/// Builds the series to fit. With `ponder` each bucket contributes the sum
/// of its records' weights, otherwise its raw count.
pub fn apply_ponderation(rows: &[GroupedRow], ponder: bool) -> Vec<SeriesPoint> {
    rows.iter()
        .map(|r| SeriesPoint {
            period: r.period,
            value: if ponder { r.pond } else { r.count as f64 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn ponder_switches_between_counts_and_weights() {
        let rows = vec![GroupedRow {
            period: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            count: 4,
            pond: 6.5,
        }];
        assert_eq!(apply_ponderation(&rows, false)[0].value, 4.0);
        assert_eq!(apply_ponderation(&rows, true)[0].value, 6.5);
    }
}
