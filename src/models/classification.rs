/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    UvInstruction,
    Scrape,
    Audio,
    Tabular,
    Fallback,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::UvInstruction => "UV 指令题",
            QuestionKind::Scrape => "抓取题",
            QuestionKind::Audio => "音频题",
            QuestionKind::Tabular => "表格题",
            QuestionKind::Fallback => "兜底题",
        };
        write!(f, "{}", name)
    }
}

/// 分类结果，附带各题型需要的参数
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// UV 指令题，`uv_url` 为需要请求的 JSON 地址
    UvInstruction { uv_url: String },
    /// 抓取题，`relative_path` 为数据页的相对路径（可能未找到）
    Scrape { relative_path: Option<String> },
    /// 音频题，`source_url` 为已解析的绝对地址
    Audio { source_url: String },
    /// 表格题，`cutoff` 为页面给出的阈值
    Tabular { cutoff: Option<f64> },
    /// 无法识别
    Fallback,
}

impl Classification {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Classification::UvInstruction { .. } => QuestionKind::UvInstruction,
            Classification::Scrape { .. } => QuestionKind::Scrape,
            Classification::Audio { .. } => QuestionKind::Audio,
            Classification::Tabular { .. } => QuestionKind::Tabular,
            Classification::Fallback => QuestionKind::Fallback,
        }
    }
}
