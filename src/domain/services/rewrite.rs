use crate::domain::model::RewriteRule;
use regex::Regex;
use std::sync::LazyLock;

static BASE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<base href="[^"]*">"#).expect("valid base href regex"));

/// 依序套用字面替換規則，回傳新內容與替換次數
pub fn apply_rewrites(content: &str, rules: &[RewriteRule]) -> (String, usize) {
    let mut result = content.to_string();
    let mut replacements = 0;

    for rule in rules {
        if rule.from.is_empty() {
            continue;
        }
        let hits = result.matches(rule.from.as_str()).count();
        if hits > 0 {
            result = result.replace(rule.from.as_str(), &rule.to);
            replacements += hits;
        }
    }

    (result, replacements)
}

/// 將所有 `<base href="...">` 設為指定值
pub fn set_base_href(content: &str, href: &str) -> String {
    let replacement = format!(r#"<base href="{}">"#, href);
    BASE_HREF
        .replace_all(content, regex::NoExpand(&replacement))
        .into_owned()
}
