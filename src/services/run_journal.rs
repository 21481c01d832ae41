//! 求解记录服务 - 业务能力层
//!
//! 只负责"写求解记录"能力，不关心流程

use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::{debug, warn};

/// 求解记录服务
///
/// 职责：
/// - 每条测验链结束后追加一行记录
/// - 写入失败只记日志，不影响求解结果
pub struct RunJournal {
    journal_file_path: String,
}

impl RunJournal {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            journal_file_path: path.into(),
        }
    }

    /// 写入文件头（启动时调用一次，覆盖旧文件）
    pub fn init(&self) -> std::io::Result<()> {
        let header = format!(
            "{}\n测验链求解记录 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&self.journal_file_path, header)
    }

    /// 追加一条记录
    ///
    /// # 参数
    /// - `email`: 求解邮箱
    /// - `start_url`: 起始页面
    /// - `outcome`: 终止状态或错误类别
    /// - `hops`: 访问页数
    pub fn record(&self, email: &str, start_url: &str, outcome: &str, hops: usize) {
        let line = format!(
            "{} | {} | {} | {} | 页数 {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            email,
            start_url,
            outcome,
            hops
        );
        debug!("写入求解记录: {}", line.trim_end());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_file_path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            warn!("⚠️ 写入求解记录失败 ({}): {}", self.journal_file_path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_after_header() {
        let path = std::env::temp_dir().join(format!("quiz_solver_journal_{}.log", std::process::id()));
        let journal = RunJournal::with_path(path.to_string_lossy());

        journal.init().unwrap();
        journal.record("a@b.c", "https://quiz.example/1", "success", 3);
        journal.record("a@b.c", "https://quiz.example/9", "fetch_failure", 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("测验链求解记录"));
        assert!(content.contains("https://quiz.example/1 | success | 页数 3"));
        assert!(content.contains("https://quiz.example/9 | fetch_failure | 页数 1"));
        let _ = std::fs::remove_file(&path);
    }
}
