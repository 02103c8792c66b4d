//! 电话号码规范化
//!
//! 接受 `09XXXXXXXXX`、`+989XXXXXXXXX`、`9XXXXXXXXX` 三种写法（允许空白），
//! 统一输出 `09XXXXXXXXX`。注册时不合法即校验失败；销售录入时不合法则静默丢弃。

/// Normalize an Iranian mobile number to the canonical `09XXXXXXXXX` form.
///
/// Returns `None` when the input does not match `(+98|0)?9` + 9 digits after
/// whitespace stripping.
pub fn normalize_phone(input: &str) -> Option<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let rest = cleaned
        .strip_prefix("+98")
        .or_else(|| cleaned.strip_prefix('0'))
        .unwrap_or(&cleaned);

    if rest.len() == 10 && rest.starts_with('9') && rest.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("0{rest}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_forms_normalize_to_local_format() {
        assert_eq!(
            normalize_phone("+989123456789").as_deref(),
            Some("09123456789")
        );
        assert_eq!(
            normalize_phone("09123456789").as_deref(),
            Some("09123456789")
        );
        assert_eq!(
            normalize_phone("9123456789").as_deref(),
            Some("09123456789")
        );
    }

    #[test]
    fn whitespace_is_stripped_before_matching() {
        assert_eq!(
            normalize_phone(" 0912 345 6789 ").as_deref(),
            Some("09123456789")
        );
    }

    #[test]
    fn non_mobile_prefixes_are_rejected() {
        assert_eq!(normalize_phone("08123456789"), None);
        assert_eq!(normalize_phone("0212345678"), None);
    }

    #[test]
    fn wrong_lengths_and_garbage_are_rejected() {
        assert_eq!(normalize_phone("091234567"), None);
        assert_eq!(normalize_phone("091234567890"), None);
        assert_eq!(normalize_phone("+98912345678x"), None);
        assert_eq!(normalize_phone(""), None);
    }
}
