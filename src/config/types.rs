use crate::tools::video_stem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 計畫文件的檔名，位於 `<輸出目錄>/<影片檔名>/` 之下
pub const PLAN_FILE_NAME: &str = "config.json";

/// 偵測到的關鍵幀與其選取狀態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyframeEntry {
    /// 依偵測順序的 1 起始編號
    pub id: u32,
    /// 關鍵幀時間點（秒）
    pub keyframe: f64,
    pub checked: bool,
}

/// 由相鄰時間點導出的片段區間 `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentInterval {
    /// 依區間順序的 1 起始編號
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub checked: bool,
}

/// 完整的切割計畫，即持久化文件的 schema
///
/// 建構完成後不再變動；重新選取會產生新的計畫。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitPlan {
    pub source_path: String,
    pub output_dir: String,
    pub keyframes: Vec<KeyframeEntry>,
    pub custom_frames: Vec<f64>,
    pub segments: Vec<SegmentInterval>,
}

impl KeyframeEntry {
    /// 依偵測順序編號，選取狀態以精確值比對 `checked` 集合
    #[must_use]
    pub fn from_timestamps(keyframes: &[f64], checked: &[f64]) -> Vec<Self> {
        keyframes
            .iter()
            .enumerate()
            .map(|(i, &keyframe)| Self {
                id: (i + 1) as u32,
                keyframe,
                checked: checked.contains(&keyframe),
            })
            .collect()
    }
}

impl SegmentInterval {
    /// 依區間順序編號，選取狀態以 `(start, end)` 精確值比對
    #[must_use]
    pub fn from_pairs(segments: &[(f64, f64)], checked: &[(f64, f64)]) -> Vec<Self> {
        segments
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| Self {
                id: (i + 1) as u32,
                start,
                end,
                checked: checked.iter().any(|&(s, e)| s == start && e == end),
            })
            .collect()
    }
}

impl SplitPlan {
    /// 所有關鍵幀時間點，不論選取狀態
    #[must_use]
    pub fn keyframe_timestamps(&self) -> Vec<f64> {
        self.keyframes.iter().map(|k| k.keyframe).collect()
    }

    /// 已選取的關鍵幀時間點
    #[must_use]
    pub fn checked_keyframes(&self) -> Vec<f64> {
        self.keyframes
            .iter()
            .filter(|k| k.checked)
            .map(|k| k.keyframe)
            .collect()
    }

    /// 已選取的片段區間，依 id 順序
    #[must_use]
    pub fn checked_segments(&self) -> Vec<(f64, f64)> {
        self.segments
            .iter()
            .filter(|s| s.checked)
            .map(|s| (s.start, s.end))
            .collect()
    }

    /// 解析後的輸出目錄：`<output_dir>/<影片檔名>`
    #[must_use]
    pub fn resolved_output_dir(&self) -> PathBuf {
        Path::new(&self.output_dir).join(video_stem(Path::new(&self.source_path)))
    }

    /// 計畫文件的完整路徑
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.resolved_output_dir().join(PLAN_FILE_NAME)
    }
}
