//! LLM 服务 - 业务能力层
//!
//! 只负责"远程出题"能力：调用大模型、解析 JSON、转换为 `Question`。
//! 任何失败都以 `anyhow::Error` 返回，由 `QuizService` 记录日志并回退到本地流水线。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（兼容 OpenAI API 的服务）
//! - 每次请求由 `tokio::time::timeout` 限时，失败后按固定间隔重试

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use lazy_static::lazy_static;
use rand::RngCore;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{
    BloomLevel, Category, Difficulty, Question, QuestionDraft, SubjectArea,
};
use crate::pipeline::synthesizers::options::assemble_options;
use crate::utils::truncate_text;

/// 选项不足 4 个时的补位干扰项
const PADDING_OPTIONS: [&str; 4] = [
    "None of the above",
    "All of the above",
    "Not mentioned in the text",
    "Cannot be determined from the text",
];

const SYSTEM_MESSAGE: &str =
    "You are an experienced educator who writes clear multiple choice questions from study material. \
     You always answer with a JSON array and nothing else.";

lazy_static! {
    static ref JSON_FENCE: Regex =
        Regex::new(r"(?s)```json\s*(.*?)```").expect("static regex must compile");
    static ref ANY_FENCE: Regex =
        Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)```").expect("static regex must compile");
}

/// 大模型返回的单个选项
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOption {
    pub text: String,
    #[serde(default, alias = "isCorrect")]
    pub is_correct: bool,
}

/// 大模型返回的单道题
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<RemoteOption>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "bloomLevel")]
    pub bloom_level: Option<String>,
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成题目
/// - 控制单次请求超时与重试次数
/// - 不关心回退策略，失败直接返回错误
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
            max_retries: config.llm_max_retries.max(1),
            retry_delay: Duration::from_millis(config.llm_retry_delay_ms),
        }
    }

    /// 通用的 LLM 调用函数（单次请求，不含超时与重试）
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(2048u32)
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| anyhow!("LLM API 调用失败: {}", e))?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 带超时和重试的 LLM 调用
    ///
    /// 每次尝试都受 `timeout` 限制，失败后等待 `retry_delay` 再试，共 `max_retries` 次。
    pub async fn send_with_retry(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        let mut last_error = anyhow!("LLM 未被调用");

        for attempt in 1..=self.max_retries {
            debug!("🤖 LLM 请求第 {}/{} 次", attempt, self.max_retries);
            match tokio::time::timeout(self.timeout, self.send_to_llm(user_message, system_message)).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => {
                    warn!("⚠️ LLM 第 {} 次请求失败: {}", attempt, e);
                    last_error = e;
                }
                Err(_) => {
                    warn!("⏱️ LLM 第 {} 次请求超时 ({}s)", attempt, self.timeout.as_secs());
                    last_error = anyhow!("LLM 请求超时 ({}s)", self.timeout.as_secs());
                }
            }

            if attempt < self.max_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(last_error).with_context(|| format!("LLM 调用在 {} 次尝试后仍失败", self.max_retries))
    }

    /// 请求大模型出题
    ///
    /// # 参数
    /// - `text`: 归一化后的文档文本
    /// - `count`: 题目数量
    /// - `difficulty`: 难度提示
    /// - `subject`: 学科提示
    ///
    /// # 返回
    /// 解析成功的原始题目列表（至少一条）
    pub async fn request_questions(
        &self,
        text: &str,
        count: usize,
        difficulty: Option<Difficulty>,
        subject: Option<SubjectArea>,
    ) -> Result<Vec<RemoteQuestion>> {
        let prompt = build_prompt(text, count, difficulty, subject);
        let response = self.send_with_retry(&prompt, Some(SYSTEM_MESSAGE)).await?;
        debug!("LLM 响应预览: {}", truncate_text(&response, 200));

        let items = extract_json_array(&response)
            .ok_or_else(|| anyhow!("无法从 LLM 响应中解析题目 JSON"))?;
        info!("🤖 LLM 返回 {} 道题", items.len());
        Ok(items)
    }
}

/// 构建出题提示词
pub fn build_prompt(
    text: &str,
    count: usize,
    difficulty: Option<Difficulty>,
    subject: Option<SubjectArea>,
) -> String {
    let subject = subject.unwrap_or_default();
    let difficulty = difficulty.unwrap_or(Difficulty::Medium);
    format!(
        r#"Create {count} multiple choice questions from this educational content about {subject}.

Return ONLY a JSON array in this exact format:
[
  {{
    "question": "What is the main concept discussed?",
    "options": [
      {{"text": "Correct answer", "isCorrect": true}},
      {{"text": "Wrong answer 1", "isCorrect": false}},
      {{"text": "Wrong answer 2", "isCorrect": false}},
      {{"text": "Wrong answer 3", "isCorrect": false}}
    ],
    "explanation": "Brief explanation",
    "difficulty": "easy|medium|hard",
    "category": "definition|factual|application|analysis|comparison",
    "bloom_level": "remember|understand|apply|analyze"
  }}
]

Requirements:
- Exactly {count} questions
- {difficulty} difficulty level
- 4 options per question, only 1 correct
- Test understanding, not memorization

Content: {text}"#
    )
}

/// 从响应文本中提取题目 JSON 数组
///
/// 依次尝试：```json 代码块、任意代码块、第一个 `[` 到最后一个 `]`、整段文本。
/// 第一个能解析为非空数组的候选胜出。
pub fn extract_json_array(response: &str) -> Option<Vec<RemoteQuestion>> {
    let mut candidates: Vec<&str> = Vec::new();
    if let Some(m) = JSON_FENCE.captures(response).and_then(|c| c.get(1)) {
        candidates.push(m.as_str());
    }
    if let Some(m) = ANY_FENCE.captures(response).and_then(|c| c.get(1)) {
        candidates.push(m.as_str());
    }
    if let (Some(start), Some(end)) = (response.find('['), response.rfind(']')) {
        if start < end {
            candidates.push(&response[start..=end]);
        }
    }
    candidates.push(response);

    candidates.into_iter().find_map(|candidate| {
        match serde_json::from_str::<Vec<RemoteQuestion>>(candidate.trim()) {
            Ok(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    })
}

/// 把大模型返回的题目转换为 `Question`
///
/// 要求 2~4 个非空选项且恰有一个正确答案；不合格的题目被丢弃。
/// 选项补齐到 4 个后洗牌。
pub fn into_questions(
    items: Vec<RemoteQuestion>,
    difficulty_hint: Option<Difficulty>,
    rng: &mut dyn RngCore,
) -> Vec<Question> {
    let total = items.len();
    let questions: Vec<Question> = items
        .into_iter()
        .filter_map(|item| convert(item, difficulty_hint, rng))
        .collect();
    if questions.len() < total {
        warn!("丢弃了 {} 道格式不合格的远程题目", total - questions.len());
    }
    questions
}

fn convert(item: RemoteQuestion, difficulty_hint: Option<Difficulty>, rng: &mut dyn RngCore) -> Option<Question> {
    let stem = item.question.trim();
    if stem.is_empty() || !(2..=4).contains(&item.options.len()) {
        return None;
    }
    if item.options.iter().any(|o| o.text.trim().is_empty()) {
        return None;
    }

    let mut correct = item.options.iter().filter(|o| o.is_correct);
    let correct_text = correct.next()?.text.trim().to_string();
    if correct.next().is_some() {
        return None;
    }

    let wrong: Vec<String> = item
        .options
        .iter()
        .filter(|o| !o.is_correct)
        .map(|o| o.text.trim().to_string())
        .collect();
    let padding: Vec<String> = PADDING_OPTIONS.iter().map(|s| s.to_string()).collect();
    let (options, correct_index) = assemble_options(&correct_text, wrong, &padding, rng);

    Question::new(QuestionDraft {
        question: stem.to_string(),
        options,
        correct_index,
        explanation: item.explanation.trim().to_string(),
        difficulty: item
            .difficulty
            .as_deref()
            .and_then(Difficulty::from_str)
            .or(difficulty_hint)
            .unwrap_or(Difficulty::Medium),
        category: item
            .category
            .as_deref()
            .and_then(Category::from_str)
            .unwrap_or(Category::Factual),
        bloom_level: item
            .bloom_level
            .as_deref()
            .and_then(BloomLevel::from_str)
            .unwrap_or(BloomLevel::Understand),
        source_sentence: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"[
      {
        "question": "What is the powerhouse of the cell?",
        "options": [
          {"text": "Mitochondria", "isCorrect": true},
          {"text": "Nucleus", "isCorrect": false},
          {"text": "Ribosome", "isCorrect": false},
          {"text": "Golgi body", "isCorrect": false}
        ],
        "explanation": "Mitochondria produce most cellular energy."
      }
    ]"#;

    #[test]
    fn test_extract_from_json_fence() {
        let response = format!("Here you go:\n```json\n{}\n```\nGood luck!", SAMPLE);
        let items = extract_json_array(&response).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].options[0].is_correct);
    }

    #[test]
    fn test_extract_from_plain_fence_and_bare_array() {
        let fenced = format!("```\n{}\n```", SAMPLE);
        assert!(extract_json_array(&fenced).is_some());

        let embedded = format!("Sure! {} Hope this helps.", SAMPLE);
        assert_eq!(extract_json_array(&embedded).unwrap().len(), 1);

        assert!(extract_json_array(SAMPLE).is_some());
    }

    #[test]
    fn test_extract_rejects_garbage_and_empty() {
        assert!(extract_json_array("I cannot help with that.").is_none());
        assert!(extract_json_array("[]").is_none());
        assert!(extract_json_array("[{\"foo\": 1}]").is_none());
    }

    #[test]
    fn test_convert_valid_item() {
        let items = extract_json_array(SAMPLE).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let questions = into_questions(items, Some(Difficulty::Hard), &mut rng);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert!(q.is_well_formed());
        assert_eq!(q.correct_answer, "Mitochondria");
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.category, Category::Factual);
        assert_eq!(q.bloom_level, BloomLevel::Understand);
    }

    #[test]
    fn test_convert_pads_two_options() {
        let items: Vec<RemoteQuestion> = serde_json::from_str(
            r#"[{"question": "Is water wet?", "options": [
                {"text": "Yes", "isCorrect": true}, {"text": "No", "isCorrect": false}
            ], "difficulty": "easy", "category": "analysis", "bloom_level": "analyze"}]"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let questions = into_questions(items, None, &mut rng);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.options.len(), 4);
        assert!(q.options.contains(&"None of the above".to_string()));
        assert!(q.options.contains(&"All of the above".to_string()));
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.category, Category::Analysis);
        assert_eq!(q.bloom_level, BloomLevel::Analyze);
    }

    #[test]
    fn test_convert_drops_invalid_items() {
        let items: Vec<RemoteQuestion> = serde_json::from_str(
            r#"[
              {"question": "Two correct?", "options": [
                {"text": "A", "isCorrect": true}, {"text": "B", "isCorrect": true}]},
              {"question": "None correct?", "options": [
                {"text": "A", "isCorrect": false}, {"text": "B", "isCorrect": false}]},
              {"question": "One option?", "options": [{"text": "A", "isCorrect": true}]},
              {"question": "", "options": [
                {"text": "A", "isCorrect": true}, {"text": "B", "isCorrect": false}]}
            ]"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(into_questions(items, None, &mut rng).is_empty());
    }

    #[test]
    fn test_prompt_mentions_count_and_hints() {
        let prompt = build_prompt("Cells divide.", 7, Some(Difficulty::Hard), Some(SubjectArea::Science));
        assert!(prompt.contains("Create 7 multiple choice questions"));
        assert!(prompt.contains("about science"));
        assert!(prompt.contains("hard difficulty level"));
        assert!(prompt.ends_with("Content: Cells divide."));
    }

    /// 测试真实 LLM 出题
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_request_questions_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_request_questions_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        assert!(config.llm_enabled(), "需要设置 LLM_API_KEY");
        let service = LlmService::new(&config);

        let text = "The mitochondria is the powerhouse of the cell. \
                    Approximately 37 percent of cellular energy is produced here.";
        let items = service
            .request_questions(text, 2, Some(Difficulty::Easy), Some(SubjectArea::Science))
            .await
            .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let questions = into_questions(items, Some(Difficulty::Easy), &mut rng);
        println!("✅ 远程生成 {} 道题", questions.len());
        assert!(questions.iter().all(|q| q.is_well_formed()));
    }
}
