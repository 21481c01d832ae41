//! 页面提取结果
//!
//! 每次抓取生成一份，只读，用完即丢弃。

/// 页面结构的只读快照
///
/// 只保留定位提交地址、CSV 链接和音频所需的信息。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomView {
    /// 所有 `<a href>` 的原始值（文档顺序）
    pub links: Vec<String>,
    /// 所有 `<form action>` 的原始值（文档顺序）
    pub form_actions: Vec<String>,
    /// 所有非空的 `<audio src>`（文档顺序）
    pub audio_sources: Vec<String>,
    /// 是否存在由脚本动态填充域名的 `span.origin`
    pub has_origin_marker: bool,
}

/// 页面的可见文本与结构
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// 按文本节点分行的可见文本
    pub text: String,
    pub dom: DomView,
}

impl ExtractedContent {
    /// 以单个空格连接的文本，用于按空白切分的 token 匹配
    pub fn flat_text(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
