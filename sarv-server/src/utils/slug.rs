//! 在线菜单分享链接
//!
//! 公共菜单页通过 `{cafe-slug}--{user_id}` 形式的 slug 定位租户。
//! slug 中保留波斯字母，便于链接中仍可读出店名。

/// Convert a cafe name into a URL-safe slug. ASCII alphanumerics, digits and
/// Persian letters survive; everything else collapses into single dashes.
pub fn slugify_cafe_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dashes
    for c in name.trim().to_lowercase().chars() {
        let keep = c.is_ascii_alphanumeric() || ('\u{0600}'..='\u{06FF}').contains(&c);
        if keep {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "cafe".to_string()
    } else {
        slug
    }
}

/// Build the public menu slug for a tenant.
pub fn build_share_slug(name: &str, user_id: i64) -> String {
    format!("{}--{user_id}", slugify_cafe_name(name))
}

/// Extract the tenant id back out of a share slug.
///
/// The user id is everything after the LAST `--`; the readable part may
/// itself contain dashes.
pub fn parse_share_slug(slug: &str) -> Option<i64> {
    let idx = slug.rfind("--")?;
    slug[idx + 2..].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_parse_roundtrip() {
        let slug = build_share_slug("Sarv Cafe", 4211);
        assert_eq!(slug, "sarv-cafe--4211");
        assert_eq!(parse_share_slug(&slug), Some(4211));
    }

    #[test]
    fn persian_names_survive_slugification() {
        let slug = build_share_slug("کافه سرو", 7);
        assert!(slug.ends_with("--7"));
        assert!(slug.contains("کافه"));
        assert_eq!(parse_share_slug(&slug), Some(7));
    }

    #[test]
    fn readable_part_may_contain_dashes() {
        assert_eq!(parse_share_slug("two--part-name--99"), Some(99));
    }

    #[test]
    fn empty_or_missing_separator_is_rejected() {
        assert_eq!(parse_share_slug("no-separator-42"), None);
        assert_eq!(parse_share_slug("cafe--"), None);
        assert_eq!(parse_share_slug("cafe--abc"), None);
    }

    #[test]
    fn blank_name_falls_back() {
        assert_eq!(slugify_cafe_name("   "), "cafe");
        assert_eq!(slugify_cafe_name("!!!"), "cafe");
    }
}
