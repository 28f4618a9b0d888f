use crate::config::types::SplitPlan;
use crate::error::SplitError;
use crate::tools::ensure_directory_exists;
use log::info;
use std::fs;
use std::path::Path;

/// 將切割計畫寫入文件
///
/// 先完整序列化並寫入暫存檔，再改名到目標路徑；文件不會以
/// 半寫入的狀態存在。
pub fn save_plan(plan: &SplitPlan, path: &Path) -> Result<(), SplitError> {
    let persist_error = |message: String| SplitError::PersistFailed {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent() {
        ensure_directory_exists(parent).map_err(|e| persist_error(e.to_string()))?;
    }

    let content =
        serde_json::to_string_pretty(plan).map_err(|e| persist_error(e.to_string()))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content).map_err(|e| persist_error(e.to_string()))?;
    fs::rename(&tmp_path, path).map_err(|e| persist_error(e.to_string()))?;

    info!("計畫已儲存: {}", path.display());
    Ok(())
}
