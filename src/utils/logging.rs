/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::{GenerationSource, Quiz};
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 PDF 出题服务启动");
    info!("🌐 监听地址: {}", config.bind_address());
    info!(
        "🤖 远程生成: {}",
        if config.llm_enabled() {
            format!("已启用 ({})", config.llm_model_name)
        } else {
            "未启用，使用本地启发式生成".to_string()
        }
    );
    info!("{}", "=".repeat(60));
}

/// 记录一次出题结果
///
/// # 参数
/// - `filename`: 上传的文件名
/// - `quiz`: 生成的测验
/// - `source`: 题目来源
/// - `elapsed_secs`: 耗时（秒）
pub fn log_quiz_generated(filename: &str, quiz: &Quiz, source: GenerationSource, elapsed_secs: f64) {
    let meta = &quiz.metadata;
    info!("{}", "─".repeat(60));
    info!(
        "✅ {} -> {} 道题 (来源: {}, 耗时 {:.2}s)",
        truncate_text(filename, 40),
        quiz.questions.len(),
        source,
        elapsed_secs
    );
    info!(
        "📊 难度分布: easy {} / medium {} / hard {}",
        meta.difficulty_distribution.easy, meta.difficulty_distribution.medium, meta.difficulty_distribution.hard
    );
    info!(
        "📚 学科: {}，复杂度: {:.2}",
        meta.subject_area, meta.complexity_score
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
