//! PDF 文本提取 - 业务能力层
//!
//! `TextExtractor` 抽象"按页取文本"的能力，生产环境由 `pdf-extract` 实现，
//! 测试中可替换为固定文本。

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// 按页提取文本的能力
pub trait TextExtractor: Send + Sync {
    /// 返回每一页的原始文本，顺序与页码一致
    fn extract_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>>;
}

/// 基于 `pdf-extract` 的提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>> {
        // 损坏的 PDF 可能让底层库 panic
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(AppError::extraction(e.to_string())),
            Err(_) => Err(AppError::extraction("PDF parser aborted on malformed input")),
        }
    }
}

/// 提取结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// 带分页标记的全文
    pub text: String,
    pub page_count: usize,
    /// 有文本的页数
    pub pages_with_text: usize,
}

/// 提取整份文档
///
/// 空白页记录警告后跳过，其余页以 `--- Page N ---` 分隔拼接。
///
/// # 参数
/// - `extractor`: 提取器
/// - `bytes`: PDF 文件内容
///
/// # 返回
/// 返回提取结果；全部页面为空时 `text` 为空串，由调用方判定
pub fn extract_document(extractor: &dyn TextExtractor, bytes: &[u8]) -> AppResult<ExtractedDocument> {
    let pages = extractor.extract_pages(bytes)?;
    let page_count = pages.len();

    let mut sections = Vec::with_capacity(page_count);
    for (index, page) in pages.iter().enumerate() {
        let page_no = index + 1;
        let trimmed = page.trim();
        if trimmed.is_empty() {
            warn!("⚠️ 第 {} 页没有可提取的文本，已跳过", page_no);
            continue;
        }
        sections.push(format!("--- Page {} ---\n{}", page_no, trimmed));
    }

    debug!("📄 共 {} 页，{} 页有文本", page_count, sections.len());

    Ok(ExtractedDocument {
        pages_with_text: sections.len(),
        text: sections.join("\n\n"),
        page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl TextExtractor for FixedPages {
        fn extract_pages(&self, _bytes: &[u8]) -> AppResult<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    #[test]
    fn test_pages_joined_with_markers() {
        let extractor = FixedPages(vec!["First page text.", "   ", "Third page text."]);
        let doc = extract_document(&extractor, b"").unwrap();
        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.pages_with_text, 2);
        assert!(doc.text.starts_with("--- Page 1 ---\nFirst page text."));
        assert!(doc.text.contains("--- Page 3 ---\nThird page text."));
        assert!(!doc.text.contains("--- Page 2 ---"));
    }

    #[test]
    fn test_all_pages_empty() {
        let extractor = FixedPages(vec!["", "\n"]);
        let doc = extract_document(&extractor, b"").unwrap();
        assert!(doc.text.is_empty());
        assert_eq!(doc.pages_with_text, 0);
    }

    #[test]
    fn test_garbage_bytes_are_extraction_error() {
        let err = PdfTextExtractor
            .extract_pages(b"this is definitely not a pdf")
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction { .. }));
    }
}
