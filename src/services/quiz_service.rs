//! 出题服务 - 编排层
//!
//! 一次上传请求的完整处理：校验 → 提取 → 归一化 → 分析 → 远程优先出题（失败回退本地，
//! 数量不足时本地补齐）→ 下限检查 → 组装。

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, InputError};
use crate::models::{Difficulty, GenerationSource, Question, Quiz, SubjectArea};
use crate::pipeline::QuizPipeline;
use crate::services::llm_service::{into_questions, LlmService};
use crate::services::pdf_service::{extract_document, PdfTextExtractor, TextExtractor};
use crate::utils::logging::log_quiz_generated;

/// 出题请求
#[derive(Debug, Clone, Default)]
pub struct QuizRequest {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
    pub question_count: Option<usize>,
    pub difficulty: Option<Difficulty>,
    pub subject: Option<SubjectArea>,
}

/// 出题结果
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub quiz: Quiz,
    pub source: GenerationSource,
    pub filename: String,
    pub pages: usize,
    /// 提取文本的字符数
    pub text_length: usize,
    /// 归一化后的字符数
    pub cleaned_length: usize,
    pub processing_time_secs: f64,
}

/// 出题服务
pub struct QuizService {
    config: Config,
    extractor: Arc<dyn TextExtractor>,
    llm: Option<LlmService>,
}

impl QuizService {
    /// 使用 `pdf-extract` 提取器创建服务；配置了 API key 时启用远程生成
    pub fn new(config: Config) -> Self {
        Self::with_extractor(config, Arc::new(PdfTextExtractor))
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn TextExtractor>) -> Self {
        let llm = config.llm_enabled().then(|| LlmService::new(&config));
        Self {
            config,
            extractor,
            llm,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn remote_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// 处理一次出题请求，随机源取自系统熵
    pub async fn generate(&self, request: QuizRequest) -> AppResult<GeneratedQuiz> {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(request, &mut rng).await
    }

    /// 处理一次出题请求
    ///
    /// # 参数
    /// - `request`: 出题请求
    /// - `rng`: 随机源（测试中传入固定种子）
    ///
    /// # 返回
    /// 成功时返回完整的测验；输入错误、PDF 无法读取、题目不足时返回对应错误。
    /// 题目下限作用于最终候选池，无论题目来自远程还是本地。
    pub async fn generate_with_rng<R: RngCore + Send>(
        &self,
        request: QuizRequest,
        rng: &mut R,
    ) -> AppResult<GeneratedQuiz> {
        let started = Instant::now();
        let filename = validate_filename(request.filename.as_deref())?.to_string();
        info!("📥 收到文件: {} ({} 字节)", filename, request.bytes.len());

        let extractor = Arc::clone(&self.extractor);
        let bytes = request.bytes;
        let document = tokio::task::spawn_blocking(move || extract_document(extractor.as_ref(), &bytes))
            .await
            .map_err(|e| AppError::internal(format!("extraction task failed: {}", e)))??;

        if document.text.trim().is_empty() {
            return Err(InputError::EmptyText.into());
        }
        let text_length = document.text.chars().count();

        let pipeline = QuizPipeline::new(request.subject);
        let prepared = pipeline.prepare(&document.text);
        let cleaned_length = prepared.cleaned_length();
        debug!("文本长度: 原始 {} 字符, 清洗后 {} 字符", text_length, cleaned_length);
        if cleaned_length < self.config.min_text_length {
            return Err(InputError::TextTooShort {
                length: cleaned_length,
                minimum: self.config.min_text_length,
            }
            .into());
        }

        let content = &prepared.content;
        let count = self.config.clamp_question_count(request.question_count);

        let (candidates, source) = match self
            .remote_candidates(&prepared.cleaned_text, count, request.difficulty, request.subject, rng)
            .await
        {
            Some(mut questions) if questions.len() < count => {
                let shortfall = count - questions.len();
                let mut local = pipeline.candidates(content, shortfall, rng);
                local.shuffle(rng);
                local.truncate(shortfall);
                info!(
                    "🧩 远程只返回 {} 道题，本地补充 {} 道",
                    questions.len(),
                    local.len()
                );
                let source = if local.is_empty() {
                    GenerationSource::Remote
                } else {
                    GenerationSource::Mixed
                };
                questions.extend(local);
                (questions, source)
            }
            Some(questions) => (questions, GenerationSource::Remote),
            None => (
                pipeline.candidates(content, count, rng),
                GenerationSource::Heuristic,
            ),
        };

        if candidates.len() < self.config.min_question_floor {
            warn!(
                "❌ 内容不足: 仅生成 {} 道候选题, 至少需要 {} 道",
                candidates.len(),
                self.config.min_question_floor
            );
            return Err(AppError::InsufficientContent {
                generated: candidates.len(),
                required: self.config.min_question_floor,
            });
        }

        let mut quiz = pipeline.finish(candidates, count, content, rng);
        quiz.metadata = quiz.metadata.with_hints(request.difficulty, request.subject);

        let processing_time_secs = round2(started.elapsed().as_secs_f64());
        log_quiz_generated(&filename, &quiz, source, processing_time_secs);

        Ok(GeneratedQuiz {
            quiz,
            source,
            filename,
            pages: document.page_count,
            text_length,
            cleaned_length,
            processing_time_secs,
        })
    }

    /// 远程出题；未启用或任何失败都返回 `None`
    async fn remote_candidates<R: RngCore + Send>(
        &self,
        text: &str,
        count: usize,
        difficulty: Option<Difficulty>,
        subject: Option<SubjectArea>,
        rng: &mut R,
    ) -> Option<Vec<Question>> {
        let llm = self.llm.as_ref()?;
        info!("🤖 尝试远程生成 {} 道题", count);

        match llm.request_questions(text, count, difficulty, subject).await {
            Ok(items) => {
                let questions = into_questions(items, difficulty, rng);
                if questions.is_empty() {
                    warn!("🔄 远程结果没有可用题目，回退到本地生成");
                    None
                } else {
                    Some(questions)
                }
            }
            Err(e) => {
                let err = AppError::Remote(format!("{:#}", e));
                warn!("🔄 {}，回退到本地生成", err);
                None
            }
        }
    }
}

/// 校验上传文件名：必须存在且以 `.pdf` 结尾（不区分大小写）
pub fn validate_filename(filename: Option<&str>) -> Result<&str, InputError> {
    let name = filename
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(InputError::MissingFilename)?;
    if !name.to_lowercase().ends_with(".pdf") {
        return Err(InputError::NotPdf {
            filename: name.to_string(),
        });
    }
    Ok(name)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
