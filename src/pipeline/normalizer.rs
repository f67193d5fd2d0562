//! 文本清洗
//!
//! 去掉页码行和 "Page N" 标记，折叠空白，并截断到 [`MAX_NORMALIZED_CHARS`]。

use anyhow::Result;
use regex::Regex;
use tracing::{debug, warn};

/// 清洗后文本的最大字符数
pub const MAX_NORMALIZED_CHARS: usize = 3000;

/// 清洗失败时返回的原文字符数
pub const FALLBACK_CHARS: usize = 1000;

/// 清洗原始提取文本
///
/// 永不失败：内部出错时返回原文前 [`FALLBACK_CHARS`] 个字符。
pub fn normalize(raw: &str) -> String {
    match try_normalize(raw) {
        Ok(cleaned) => {
            debug!(
                "文本清洗完成: {} -> {} 字符",
                raw.chars().count(),
                cleaned.chars().count()
            );
            cleaned
        }
        Err(e) => {
            warn!("文本清洗失败，返回截断原文: {}", e);
            take_chars(raw, FALLBACK_CHARS)
        }
    }
}

fn try_normalize(raw: &str) -> Result<String> {
    // 行级清理必须在折叠空白之前完成
    let page_marker_line = Regex::new(r"(?m)^[ \t]*-*[ \t]*Page[ \t]+\d+[ \t]*-*[ \t]*$")?;
    let number_line = Regex::new(r"(?m)^[ \t]*\d+[ \t]*$")?;
    let inline_page = Regex::new(r"\bPage \d+\b")?;
    let whitespace = Regex::new(r"\s+")?;

    let text = page_marker_line.replace_all(raw, "");
    let text = number_line.replace_all(&text, "");
    let text = inline_page.replace_all(&text, "");
    let text = whitespace.replace_all(&text, " ");

    Ok(take_chars(text.trim(), MAX_NORMALIZED_CHARS))
}

fn take_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(normalize("  Cells   divide.\n\n\tThey grow.  "), "Cells divide. They grow.");
    }

    #[test]
    fn test_strip_page_markers() {
        let raw = "\n--- Page 1 ---\nThe cell is small.\n12\nPage 2\nAbout 37 percent remains.";
        assert_eq!(normalize(raw), "The cell is small. About 37 percent remains.");
    }

    #[test]
    fn test_inline_page_marker_removed() {
        assert_eq!(normalize("see Page 4 for details"), "see for details");
    }

    #[test]
    fn test_truncate_to_cap() {
        let raw = "word ".repeat(1000);
        let cleaned = normalize(&raw);
        assert_eq!(cleaned.chars().count(), MAX_NORMALIZED_CHARS);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_multibyte_truncation() {
        let raw = "é".repeat(MAX_NORMALIZED_CHARS + 10);
        assert_eq!(normalize(&raw).chars().count(), MAX_NORMALIZED_CHARS);
    }
}
