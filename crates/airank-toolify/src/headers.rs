//! Browser-like request headers per language

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

pub static EN: &[(&str, &str)] = &[
    ("User-Agent", USER_AGENT),
    ("Accept", "application/json"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Cookie", "locale=en; timezone=Asia/Shanghai; toolify_isLogin=false"),
];

pub static ZH: &[(&str, &str)] = &[
    ("User-Agent", USER_AGENT),
    ("Accept", "application/json"),
    (
        "Accept-Language",
        "zh-CN,zh;q=0.8,zh-TW;q=0.7,zh-HK;q=0.5,en-US;q=0.3,en;q=0.2",
    ),
    ("Cookie", "locale=zh; timezone=Asia/Shanghai; toolify_isLogin=false"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(headers: &'a [(&str, &'a str)], name: &str) -> Option<&'a str> {
        headers.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[test]
    fn locale_cookie_matches_language() {
        assert!(get(EN, "Cookie").unwrap().contains("locale=en"));
        assert!(get(ZH, "Cookie").unwrap().contains("locale=zh"));
    }

    #[test]
    fn chinese_is_preferred_for_zh() {
        assert!(get(ZH, "Accept-Language").unwrap().starts_with("zh-CN"));
        assert!(get(EN, "Accept-Language").unwrap().starts_with("en-US"));
    }

    #[test]
    fn user_agent_is_single_line() {
        let ua = get(EN, "User-Agent").unwrap();
        assert!(ua.starts_with("Mozilla/5.0"));
        assert!(ua.contains("(KHTML, like Gecko) Chrome/114"));
        assert!(!ua.contains("  "));
    }
}
