//! Marathi calendar dates for spoken responses

use time::{Date, Month, OffsetDateTime};

const MONTHS: [&str; 12] = [
    "जानेवारी",
    "फेब्रुवारी",
    "मार्च",
    "एप्रिल",
    "मे",
    "जून",
    "जुलै",
    "ऑगस्ट",
    "सप्टेंबर",
    "ऑक्टोबर",
    "नोव्हेंबर",
    "डिसेंबर",
];

const DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Render a number with Devanagari digits.
pub fn devanagari_digits(n: i64) -> String {
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => DIGITS[d as usize],
            None => c,
        })
        .collect()
}

pub fn month_name(month: Month) -> &'static str {
    MONTHS[u8::from(month) as usize - 1]
}

/// Long-form Marathi date, e.g. `१६ ऑक्टोबर, २०२६`.
pub fn format_marathi_date(date: Date) -> String {
    format!(
        "{} {}, {}",
        devanagari_digits(date.day().into()),
        month_name(date.month()),
        devanagari_digits(date.year().into())
    )
}

/// Where the controller gets "today" from.
pub trait DateSource {
    fn today(&self) -> Date;
}

/// The host's local calendar date, falling back to UTC when the local offset
/// cannot be determined.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDate;

impl DateSource for SystemDate {
    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

/// A pinned date, for demos and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDate(pub Date);

impl DateSource for FixedDate {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_format_marathi_date() {
        assert_eq!(format_marathi_date(date!(2026 - 10 - 16)), "१६ ऑक्टोबर, २०२६");
        assert_eq!(format_marathi_date(date!(2025 - 01 - 05)), "५ जानेवारी, २०२५");
    }

    #[test]
    fn test_digits() {
        assert_eq!(devanagari_digits(2950), "२९५०");
        assert_eq!(devanagari_digits(0), "०");
    }

    #[test]
    fn test_fixed_date_source() {
        let src = FixedDate(date!(2024 - 07 - 01));
        assert_eq!(src.today(), date!(2024 - 07 - 01));
        assert_eq!(month_name(src.today().month()), "जुलै");
    }
}
