//! Fixed seasonal revenue multipliers and calendar helpers.

/// Expected revenue multiplier per calendar month, January first.
pub const SEASONAL_FACTORS: [f64; 12] =
    [0.74, 0.78, 1.08, 1.01, 1.15, 0.97, 0.92, 0.88, 1.12, 1.22, 1.39, 1.46];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const SEASONAL_DRIVERS: [&[&str]; 12] = [
    &["New Year promotions", "Budget refreshes"],
    &["Valentine campaigns", "Q1 push"],
    &["Spring launches", "Q1 close"],
    &["Spring campaigns", "Tax season"],
    &["Mother's Day", "Spring peak"],
    &["Summer launches", "Q2 close"],
    &["Summer peak", "Vacation impact"],
    &["Back-to-school", "Summer clearance"],
    &["Fall launches", "Q3 close"],
    &["Halloween", "Q4 preparation"],
    &["Black Friday", "Holiday season"],
    &["Holiday peak", "Year-end close"],
];

pub const PEAK_SEASON_DRIVERS: [&str; 3] = ["Holiday season", "Year-end close", "Q4 push"];

pub const LOW_SEASON_ACTIONS: [&str; 3] =
    ["Increase marketing spend", "Launch promotions", "Focus on retention"];

/// Calendar position of a ledger key. A key without a year sorts before
/// every dated key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: Option<i32>,
    pub month: u8,
}

/// Parses a ledger key into a [`MonthKey`].
///
/// Accepts full names and three-letter abbreviations in any case, bare
/// numerals `1..=12`, and `YYYY-MM` or `MM/YYYY` style keys.
pub fn month_key_from(key: &str) -> Option<MonthKey> {
    let normalized = key.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(index) = MONTH_NAMES.iter().position(|name| {
        let name = name.to_ascii_lowercase();
        normalized == name || (normalized.len() == 3 && name.starts_with(&normalized))
    }) {
        return Some(MonthKey { year: None, month: index as u8 + 1 });
    }

    let parts: Vec<&str> = normalized.split(&['-', '/'][..]).collect();
    match parts.as_slice() {
        [month] => Some(MonthKey { year: None, month: parse_month(month)? }),
        [year, month] if year.len() == 4 => {
            Some(MonthKey { year: Some(year.parse().ok()?), month: parse_month(month)? })
        }
        [month, year] if year.len() == 4 => {
            Some(MonthKey { year: Some(year.parse().ok()?), month: parse_month(month)? })
        }
        _ => None,
    }
}

fn parse_month(value: &str) -> Option<u8> {
    match value.parse::<u8>() {
        Ok(month @ 1..=12) => Some(month),
        _ => None,
    }
}

pub fn month_name(month: u8) -> &'static str {
    MONTH_NAMES.get(usize::from(month).wrapping_sub(1)).copied().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_keys_parse_in_common_shapes() {
        let month = |month| Some(MonthKey { year: None, month });
        let dated = |year, month| Some(MonthKey { year: Some(year), month });

        assert_eq!(month_key_from("january"), month(1));
        assert_eq!(month_key_from("MAR"), month(3));
        assert_eq!(month_key_from("12"), month(12));
        assert_eq!(month_key_from("2024-07"), dated(2024, 7));
        assert_eq!(month_key_from("07/2024"), dated(2024, 7));
        assert_eq!(month_key_from("q3"), None);
        assert_eq!(month_key_from("13"), None);
        assert_eq!(month_key_from("2024-13"), None);
        assert_eq!(month_key_from("ma"), None);
    }

    #[test]
    fn dated_keys_order_by_year_before_month() {
        let december = month_key_from("2023-12");
        let january = month_key_from("2024-01");
        let undated = month_key_from("december");

        assert!(january > december);
        assert!(december > undated);
    }

    #[test]
    fn month_name_handles_out_of_range() {
        assert_eq!(month_name(11), "November");
        assert_eq!(month_name(0), "Unknown");
    }

    #[test]
    fn december_has_the_strongest_factor() {
        let peak = SEASONAL_FACTORS
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index);

        assert_eq!(peak, Some(11));
    }
}
