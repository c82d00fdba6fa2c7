use std::sync::LazyLock;

use regex::Regex;

use super::sheet::Cell;

static CITY_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:city\s*[_-]?\s*)?(\d+)").expect("city pattern is a valid regex")
});

/// Maps a city cell to the `City<N>` token. Empty cells yield an empty string.
pub fn canon_city(cell: &Cell) -> String {
    if cell.is_empty() {
        return String::new();
    }
    canon_city_str(&cell.render())
}

pub fn canon_city_str(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }

    if let Some(digits) = CITY_NUMBER.captures(value).and_then(|caps| caps.get(1)) {
        let digits = digits.as_str().trim_start_matches('0');
        return format!("City{}", if digits.is_empty() { "0" } else { digits });
    }

    if let Ok(number) = value.parse::<f64>() {
        if number.is_finite() {
            return format!("City{}", number.trunc() as i64);
        }
    }

    value.replace(' ', "")
}
