use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};

/// Truncate an address to "0xabcd...ef12" format
pub fn truncate_address(addr: &Address) -> String {
    truncate_hex(&format!("{addr}"))
}

fn truncate_hex(s: &str) -> String {
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s.to_string()
    }
}

/// Format a wave count with comma separators, or a placeholder before the first read.
pub fn format_count(count: Option<U256>) -> String {
    match count {
        Some(n) => format_number(&n.to_string()),
        None => "\u{2026}".to_string(),
    }
}

/// Insert comma separators into a string of decimal digits
fn format_number(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a time as "Xm ago", "Xh ago", etc.
pub fn format_time_ago(time: &DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(*time).num_seconds();
    if diff < 0 {
        return "just now".to_string();
    }
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Format a time as a datetime string
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%b %d, %Y %H:%M:%S UTC").to_string()
}
