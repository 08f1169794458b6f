//! Display helpers shared by components. Pure, so they test without a browser.

/// Parse a numeric input, flooring anything missing, invalid or zero at 1
pub fn floor_amount(input: &str) -> u128 {
    input.trim().parse::<u128>().unwrap_or(0).max(1)
}

/// Same floor for whole-day durations
pub fn floor_days(input: &str) -> u64 {
    input.trim().parse::<u64>().unwrap_or(0).max(1)
}

/// CSS width for a progress bar; the read model already clamps, this rounds
pub fn progress_width(percentage: Option<f64>) -> String {
    let pct = percentage.unwrap_or(0.0).clamp(0.0, 100.0);
    format!("{}%", pct.round() as u32)
}

/// "0x5aAe…eAed"
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Hex text compares case-insensitively; checksummed and lowercase forms match
pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// `eth_chainId` answers with a hex quantity such as "0x1b59"
pub fn parse_hex_quantity(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

/// Factory creation time as a short date
pub fn created_label(unix_seconds: u64) -> String {
    i64::try_from(unix_seconds)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("Created %b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Deadline as a calendar date, e.g. "Mon Jan 06 2025"
pub fn deadline_date(unix_seconds: u64) -> String {
    i64::try_from(unix_seconds)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%a %b %d %Y").to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

/// Edit controls are offered only to the connected owner. Advisory: the
/// contract checks ownership on every call.
pub fn can_edit(account: Option<&str>, owner: Option<&str>) -> bool {
    match (account, owner) {
        (Some(account), Some(owner)) => same_address(account, owner),
        _ => false,
    }
}

/// The empty-tier notice gives way to the edit controls in edit mode
pub fn show_no_tiers(tier_count: usize, edit_mode: bool) -> bool {
    tier_count == 0 && !edit_mode
}

pub fn backers_label(backers: u64) -> String {
    match backers {
        1 => "1 backer".to_string(),
        n => format!("{} backers", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_amount() {
        assert_eq!(floor_amount("0"), 1);
        assert_eq!(floor_amount(""), 1);
        assert_eq!(floor_amount("-5"), 1);
        assert_eq!(floor_amount(" 250 "), 250);
        assert_eq!(floor_days("abc"), 1);
        assert_eq!(floor_days("30"), 30);
    }

    #[test]
    fn test_progress_width() {
        assert_eq!(progress_width(None), "0%");
        assert_eq!(progress_width(Some(33.4)), "33%");
        assert_eq!(progress_width(Some(99.6)), "100%");
        assert_eq!(progress_width(Some(250.0)), "100%");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            "0x5aAe…eAed"
        );
        assert_eq!(short_address("0x12"), "0x12");
    }

    #[test]
    fn test_same_address_ignores_case() {
        assert!(same_address(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        ));
        assert!(!same_address("0x01", "0x02"));
    }

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x1b59"), Some(7001));
        assert_eq!(parse_hex_quantity("1b59"), None);
        assert_eq!(parse_hex_quantity("0xzz"), None);
    }

    #[test]
    fn test_can_edit_only_as_owner() {
        let owner = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(can_edit(Some("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"), Some(owner)));
        assert!(!can_edit(Some("0x0101010101010101010101010101010101010101"), Some(owner)));
        assert!(!can_edit(None, Some(owner)));
        // owner not loaded yet, or its read failed
        assert!(!can_edit(Some(owner), None));
    }

    #[test]
    fn test_show_no_tiers() {
        assert!(show_no_tiers(0, false));
        assert!(!show_no_tiers(0, true));
        assert!(!show_no_tiers(2, false));
        assert!(!show_no_tiers(2, true));
    }

    #[test]
    fn test_deadline_date() {
        assert_eq!(deadline_date(1_736_121_600), "Mon Jan 06 2025");
        assert_eq!(deadline_date(u64::MAX), "unavailable");
    }

    #[test]
    fn test_labels() {
        assert_eq!(backers_label(1), "1 backer");
        assert_eq!(backers_label(0), "0 backers");
        assert_eq!(created_label(1_736_121_600), "Created Jan 06, 2025");
    }
}
