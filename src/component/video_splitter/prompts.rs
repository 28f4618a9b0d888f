use crate::tools::{validate_output_directory, validate_video_file};
use anyhow::{Result, anyhow};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect};
use std::path::Path;

/// 詢問影片路徑，驗證存在、非目錄且副檔名為影片
pub fn prompt_video_path(default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("請輸入影片路徑")
        .validate_with(|value: &String| -> Result<(), String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err("影片路徑不能為空".to_string());
            }
            validate_video_file(Path::new(trimmed)).map_err(|e| e.to_string())
        });

    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let value = input.interact_text()?;
    Ok(value.trim().to_string())
}

/// 詢問輸出目錄，驗證存在且非檔案
pub fn prompt_output_dir(default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("輸入影片輸出目錄")
        .validate_with(|value: &String| -> Result<(), String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err("輸出路徑不能為空".to_string());
            }
            validate_output_directory(Path::new(trimmed)).map_err(|e| e.to_string())
        });

    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let value = input.interact_text()?;
    Ok(value.trim().to_string())
}

/// 詢問自訂幀（秒），英文逗號分割，可留空
pub fn prompt_custom_frames(default: &[f64]) -> Result<Vec<f64>> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("輸入自訂幀 (秒)，英文逗號 (,) 分割")
        .allow_empty(true)
        .validate_with(|value: &String| -> Result<(), String> {
            parse_custom_frames(value).map(|_| ()).map_err(|e| e.to_string())
        });

    if !default.is_empty() {
        let default_text = default
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        input = input.default(default_text);
    }

    let value = input.interact_text()?;
    parse_custom_frames(&value)
}

/// 解析逗號分隔的秒數清單，空白項目會被忽略
pub fn parse_custom_frames(value: &str) -> Result<Vec<f64>> {
    let mut frames = Vec::new();

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let number: f64 = part
            .parse()
            .map_err(|_| anyhow!("輸入的必須為數字: {part}"))?;
        if !number.is_finite() {
            return Err(anyhow!("輸入的必須為數字: {part}"));
        }
        frames.push(number);
    }

    Ok(frames)
}

/// 選擇關鍵幀；`default_checked` 為空時預設全選
///
/// 回傳 `None` 表示使用者取消選取。
pub fn prompt_keyframes(keyframes: &[f64], default_checked: &[f64]) -> Result<Option<Vec<f64>>> {
    let items: Vec<String> = keyframes
        .iter()
        .enumerate()
        .map(|(i, &k)| format!("{:03}: {:06.2}秒", i + 1, k))
        .collect();
    let defaults: Vec<bool> = keyframes
        .iter()
        .map(|k| default_checked.is_empty() || default_checked.contains(k))
        .collect();

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("選擇關鍵幀")
        .items(&items)
        .defaults(&defaults)
        .interact_opt()?;

    Ok(selection.map(|indexes| indexes.into_iter().map(|i| keyframes[i]).collect()))
}

/// 選擇要輸出的片段；`default_checked` 為空時預設全選
///
/// 回傳 `None` 表示使用者取消選取。
pub fn prompt_segments(
    segments: &[(f64, f64)],
    default_checked: &[(f64, f64)],
) -> Result<Option<Vec<(f64, f64)>>> {
    let items: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            format!(
                "{:03}: {:06.2}秒 - {:06.2}秒，時長 {:06.2}秒",
                i + 1,
                start,
                end,
                end - start
            )
        })
        .collect();
    let defaults: Vec<bool> = segments
        .iter()
        .map(|&(start, end)| {
            default_checked.is_empty()
                || default_checked.iter().any(|&(s, e)| s == start && e == end)
        })
        .collect();

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("選擇影片片段")
        .items(&items)
        .defaults(&defaults)
        .interact_opt()?;

    Ok(selection.map(|indexes| indexes.into_iter().map(|i| segments[i]).collect()))
}
