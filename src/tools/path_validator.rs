use anyhow::{Result, bail};
use std::path::Path;

/// 視為影片的副檔名
const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "aaf", "asf", "avchd", "avi", "drc", "flv", "m2v", "m3u8", "m4p", "m4v", "mkv",
    "mng", "mov", "mp2", "mp4", "mpe", "mpeg", "mpg", "mpv", "mxf", "nsv", "ogg", "ogv", "qt",
    "rm", "rmvb", "roq", "svi", "vob", "webm", "wmv", "yuv",
];

#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

pub fn validate_video_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("檔案或路徑不存在: {}", path.display());
    }
    if path.is_dir() {
        bail!("路徑不能為目錄: {}", path.display());
    }
    if !is_video_file(path) {
        bail!("當前檔案不是影片: {}", path.display());
    }
    Ok(())
}

pub fn validate_output_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("輸出路徑不存在: {}", path.display());
    }
    if path.is_file() {
        bail!("輸出路徑不能為檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// 取得不含副檔名的檔名，作為輸出子目錄名稱
#[must_use]
pub fn video_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video")
        .to_string()
}
