use crate::error::SplitError;
use indicatif::ProgressBar;
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Deserialize)]
struct FfprobeFormat {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeFrames {
    frames: Option<Vec<FrameInfo>>,
}

#[derive(Deserialize)]
struct FrameInfo {
    key_frame: Option<i64>,
    // 舊版 ffprobe 輸出 pkt_pts_time，新版改為 pts_time
    pkt_pts_time: Option<String>,
    pts_time: Option<String>,
}

/// 使用 ffprobe 取得影片總長度（秒）
pub fn get_video_duration(path: &Path) -> Result<f64, SplitError> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| SplitError::ProbeFailed {
            message: format!("無法執行 ffprobe: {e}"),
        })?;

    if !output.status.success() {
        return Err(SplitError::ProbeFailed {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let probe: FfprobeFormat =
        serde_json::from_slice(&output.stdout).map_err(|e| SplitError::ProbeFailed {
            message: format!("無法解析 ffprobe 輸出: {e}"),
        })?;

    probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| SplitError::DurationUnavailable {
            path: path.to_path_buf(),
        })
}

/// 取得影片關鍵幀時間點（秒），依偵測順序排列，結尾附上影片總長度
///
/// 片尾的總長度不做去重，即使與最後一個關鍵幀相同也會附加。
pub fn get_video_keyframes(path: &Path) -> Result<Vec<f64>, SplitError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("正在識別影片關鍵幀...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = probe_keyframes(path);
    spinner.finish_and_clear();
    result
}

fn probe_keyframes(path: &Path) -> Result<Vec<f64>, SplitError> {
    let duration = get_video_duration(path)?;

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-i"])
        .arg(path)
        .args([
            "-select_streams",
            "v",
            "-show_entries",
            "frame=key_frame,pkt_pts_time,pts_time",
            "-of",
            "json",
        ])
        .output()
        .map_err(|e| SplitError::ProbeFailed {
            message: format!("無法執行 ffprobe: {e}"),
        })?;

    if !output.status.success() {
        return Err(SplitError::ProbeFailed {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let mut keyframes = parse_keyframe_json(&output.stdout)?;
    debug!("偵測到 {} 個關鍵幀，影片長度 {duration:.2} 秒", keyframes.len());

    keyframes.push(duration);
    Ok(keyframes)
}

/// 解析 ffprobe 的 frame 清單，保留 `key_frame == 1` 的時間點
///
/// 缺少時間戳的關鍵幀以 NaN 表示，於組段階段被略過。
fn parse_keyframe_json(stdout: &[u8]) -> Result<Vec<f64>, SplitError> {
    let probe: FfprobeFrames =
        serde_json::from_slice(stdout).map_err(|e| SplitError::ProbeFailed {
            message: format!("無法解析 ffprobe 輸出: {e}"),
        })?;

    let keyframes = probe
        .frames
        .unwrap_or_default()
        .into_iter()
        .filter(|frame| frame.key_frame == Some(1))
        .map(|frame| {
            frame
                .pkt_pts_time
                .or(frame.pts_time)
                .and_then(|t| t.parse::<f64>().ok())
                .unwrap_or(f64::NAN)
        })
        .collect();

    Ok(keyframes)
}
