use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

static WHITESPACE_BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid whitespace regex"));

/// 簡易 HTML 壓縮：移除註解 (保留 IE 條件註解)、去除標籤間空白、逐行 trim 並刪除空行
pub fn minify_html(content: &str) -> String {
    let without_comments = HTML_COMMENT.replace_all(content, |caps: &regex::Captures| {
        let comment = &caps[0];
        if comment.starts_with("<!--[if") {
            comment.to_string()
        } else {
            String::new()
        }
    });

    let collapsed = WHITESPACE_BETWEEN_TAGS.replace_all(&without_comments, "><");

    collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 重新序列化為緊湊 JSON，保留鍵順序與非 ASCII 字元
pub fn minify_json(content: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(serde_json::to_string(&value)?)
}
