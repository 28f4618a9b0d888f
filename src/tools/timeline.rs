/// 合併自訂幀與關鍵幀為遞增序列
///
/// 不去除重複值：同一時間點同時出現在兩個輸入時，合併結果會出現兩次。
#[must_use]
pub fn merge_frames(custom_frames: &[f64], keyframes: &[f64]) -> Vec<f64> {
    let mut merged: Vec<f64> = custom_frames
        .iter()
        .chain(keyframes.iter())
        .copied()
        .collect();
    merged.sort_by(f64::total_cmp);
    merged
}

/// 由相鄰時間點組成片段區間 `(start, end)`
///
/// 任一端為非有限值（NaN、無窮）的配對會被略過；相鄰的重複或
/// 逆序時間點會產生零長度或反向的區間，這裡不做過濾。
#[must_use]
pub fn build_segments(merged: &[f64]) -> Vec<(f64, f64)> {
    let mut segments = Vec::new();

    for i in 1..merged.len() {
        let start = merged[i - 1];
        let end = merged[i];

        if !start.is_finite() || !end.is_finite() {
            continue;
        }

        segments.push((start, end));
    }

    segments
}
