use crate::config::types::SplitPlan;
use crate::error::SplitError;
use log::info;
use std::fs;
use std::path::Path;

/// 從文件載入切割計畫
///
/// 解碼經過 schema 驗證：缺少或多出的欄位都會被拒絕。
pub fn load_plan(path: &Path) -> Result<SplitPlan, SplitError> {
    if !path.exists() {
        return Err(SplitError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| SplitError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let plan: SplitPlan = serde_json::from_str(&content).map_err(|e| SplitError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(
        "已載入計畫: {}（{} 個關鍵幀，{} 個片段）",
        path.display(),
        plan.keyframes.len(),
        plan.segments.len()
    );

    Ok(plan)
}
