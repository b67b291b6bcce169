/// Timestamp format stored on link records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Random number with exactly `digits` decimal digits (1..=18)
pub fn random_numeric_id(digits: u32) -> u64 {
    let digits = digits.clamp(1, 18);
    let min = 10_u64.pow(digits - 1);
    let max = 10_u64.pow(digits) - 1;
    rand::random_range(min..=max)
}

/// Current local time in [`TIMESTAMP_FORMAT`]
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code() {
        let code = generate_random_code(16);
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_numeric_id_digits() {
        for _ in 0..100 {
            let id = random_numeric_id(8);
            assert!((10_000_000..=99_999_999).contains(&id));
        }
        assert!(random_numeric_id(1) <= 9);
    }

    #[test]
    fn test_local_timestamp_format() {
        let ts = local_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
