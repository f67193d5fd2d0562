use std::fmt;

/// 学科领域
///
/// 顺序即关键词计数并列时的优先级（先出现者胜出）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectArea {
    Science,
    Mathematics,
    History,
    Literature,
    Technology,
    Business,
    General,
}

impl SubjectArea {
    /// 参与检测的学科（不含 General）
    pub const DETECTABLE: [SubjectArea; 6] = [
        SubjectArea::Science,
        SubjectArea::Mathematics,
        SubjectArea::History,
        SubjectArea::Literature,
        SubjectArea::Technology,
        SubjectArea::Business,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            SubjectArea::Science => "science",
            SubjectArea::Mathematics => "mathematics",
            SubjectArea::History => "history",
            SubjectArea::Literature => "literature",
            SubjectArea::Technology => "technology",
            SubjectArea::Business => "business",
            SubjectArea::General => "general",
        }
    }

    /// 检测用关键词
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SubjectArea::Science => &[
                "cell", "molecule", "atom", "energy", "experiment", "hypothesis", "organism",
                "chemical", "reaction", "physics", "biology", "chemistry", "protein", "species",
                "evolution", "gravity", "electron",
            ],
            SubjectArea::Mathematics => &[
                "equation", "theorem", "proof", "function", "variable", "calculate", "formula",
                "algebra", "geometry", "calculus", "integral", "derivative", "matrix", "probability",
                "statistics",
            ],
            SubjectArea::History => &[
                "century", "war", "empire", "revolution", "ancient", "dynasty", "king", "treaty",
                "civilization", "historical", "colonial", "medieval", "battle", "president",
            ],
            SubjectArea::Literature => &[
                "novel", "poem", "poetry", "author", "character", "narrative", "literary", "metaphor",
                "theme", "plot", "fiction", "prose", "stanza",
            ],
            SubjectArea::Technology => &[
                "computer", "software", "algorithm", "data", "network", "digital", "internet",
                "programming", "hardware", "system", "database", "code",
            ],
            SubjectArea::Business => &[
                "market", "company", "revenue", "profit", "customer", "management", "strategy",
                "finance", "investment", "economy", "sales", "business",
            ],
            SubjectArea::General => &[],
        }
    }

    /// 尝试从字符串解析学科（忽略大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "science" | "biology" | "chemistry" | "physics" => Some(SubjectArea::Science),
            "mathematics" | "math" | "maths" => Some(SubjectArea::Mathematics),
            "history" => Some(SubjectArea::History),
            "literature" | "english" => Some(SubjectArea::Literature),
            "technology" | "computer science" | "tech" => Some(SubjectArea::Technology),
            "business" | "economics" => Some(SubjectArea::Business),
            "general" => Some(SubjectArea::General),
            _ => None,
        }
    }
}

impl Default for SubjectArea {
    fn default() -> Self {
        SubjectArea::General
    }
}

impl fmt::Display for SubjectArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(SubjectArea::from_str("Math"), Some(SubjectArea::Mathematics));
        assert_eq!(SubjectArea::from_str(" biology "), Some(SubjectArea::Science));
        assert_eq!(SubjectArea::from_str("underwater basket weaving"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SubjectArea::History).unwrap();
        assert_eq!(json, "\"history\"");
    }
}
