use std::path::PathBuf;
use thiserror::Error;

/// 切割流程的階段性錯誤
///
/// 探測與持久化階段的錯誤會中止整個流程；單一片段的轉檔失敗
/// 不屬於這裡，由排程器記錄在該任務上。
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("關鍵幀偵測失敗: {message}")]
    ProbeFailed { message: String },

    #[error("無法取得影片長度: {}", path.display())]
    DurationUnavailable { path: PathBuf },

    #[error("設定檔不存在: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("無法解析設定檔 {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("無法寫入計畫檔 {}: {message}", path.display())]
    PersistFailed { path: PathBuf, message: String },
}

/// 一次執行的收尾狀態
///
/// `Aborted` 表示使用者層級的中止（取消選取、設定檔不存在等），
/// 程式仍以退出碼 0 結束。
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    Aborted(String),
}
