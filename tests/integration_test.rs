//! 整合測試 - 驗證時間軸、計畫建構與持久化的核心行為

use std::path::{Path, PathBuf};

use auto_video_split::component::video_splitter::{ClipCommand, parse_custom_frames};
use auto_video_split::config::{KeyframeEntry, SegmentInterval, SplitPlan, load_plan, save_plan};
use auto_video_split::error::SplitError;
use auto_video_split::tools::{build_segments, merge_frames};

fn sample_plan() -> SplitPlan {
    let keyframes = vec![0.0, 2.5, 5.0, 7.5, 10.0];
    let custom_frames = vec![1.25, 6.0];
    let merged = merge_frames(&custom_frames, &keyframes);
    let pairs = build_segments(&merged);

    SplitPlan {
        source_path: "/videos/demo.mp4".to_string(),
        output_dir: "/tmp/out".to_string(),
        keyframes: KeyframeEntry::from_timestamps(&keyframes, &[2.5, 7.5]),
        custom_frames,
        segments: SegmentInterval::from_pairs(&pairs, &pairs[..3]),
    }
}

/// 測試 1: 時間軸合併與組段
#[test]
fn test_timeline_merge_and_segments() {
    let keyframes = vec![1.0, 2.0, 2.0, 4.5, 4.5];
    let merged = merge_frames(&[], &keyframes);

    assert_eq!(merged.len(), keyframes.len(), "合併不去重");
    assert_eq!(merged, vec![1.0, 2.0, 2.0, 4.5, 4.5]);

    let segments = build_segments(&merged);
    assert_eq!(
        segments,
        vec![(1.0, 2.0), (2.0, 2.0), (2.0, 4.5), (4.5, 4.5)],
        "零長度片段應保留，不做過濾"
    );
}

/// 測試 2: 自訂幀與關鍵幀穿插
#[test]
fn test_timeline_interleaved_custom_frames() {
    let merged = merge_frames(&[3.0, 0.5], &[1.0, 2.0, 4.0]);
    assert_eq!(merged, vec![0.5, 1.0, 2.0, 3.0, 4.0]);

    let segments = build_segments(&merged);
    assert_eq!(segments.len(), merged.len() - 1);
    for (i, &(start, end)) in segments.iter().enumerate() {
        assert_eq!(start, merged[i]);
        assert_eq!(end, merged[i + 1]);
    }
}

/// 測試 3: 計畫建構的編號與選取狀態
#[test]
fn test_plan_construction() {
    let plan = sample_plan();

    for (i, entry) in plan.keyframes.iter().enumerate() {
        assert_eq!(entry.id, (i + 1) as u32, "關鍵幀編號應從 1 開始連續");
    }
    for (i, segment) in plan.segments.iter().enumerate() {
        assert_eq!(segment.id, (i + 1) as u32, "片段編號應從 1 開始連續");
    }

    assert_eq!(plan.checked_keyframes(), vec![2.5, 7.5]);
    assert_eq!(plan.checked_segments().len(), 3);

    // 相鄰片段首尾相接
    for pair in plan.segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "片段之間不應有空隙或重疊");
    }
}

/// 測試 4: 計畫文件往返
#[test]
fn test_plan_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let plan = sample_plan();
    save_plan(&plan, &path).unwrap();
    let loaded = load_plan(&path).unwrap();

    assert_eq!(loaded, plan, "往返後的計畫應與原計畫完全相同");
}

/// 測試 5: 不整除的浮點數也能精確往返
#[test]
fn test_plan_round_trip_awkward_floats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let keyframes = vec![0.1 + 0.2, 1.0 / 3.0, 2.1];
    let pairs = build_segments(&keyframes);
    let plan = SplitPlan {
        source_path: "/videos/demo.mp4".to_string(),
        output_dir: "/tmp/out".to_string(),
        keyframes: KeyframeEntry::from_timestamps(&keyframes, &keyframes),
        custom_frames: vec![],
        segments: SegmentInterval::from_pairs(&pairs, &pairs),
    };

    save_plan(&plan, &path).unwrap();
    let loaded = load_plan(&path).unwrap();

    assert_eq!(loaded, plan);
    // 精確值比對在往返後仍然成立
    assert_eq!(loaded.checked_segments(), plan.checked_segments());
}

/// 測試 6: 載入失敗的錯誤分類
#[test]
fn test_load_plan_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        load_plan(&missing),
        Err(SplitError::ConfigNotFound { .. })
    ));

    let invalid = dir.path().join("invalid.json");
    std::fs::write(&invalid, "not json at all").unwrap();
    assert!(matches!(
        load_plan(&invalid),
        Err(SplitError::ConfigParse { .. })
    ));

    // 未知欄位會被 schema 驗證拒絕
    let unknown = dir.path().join("unknown.json");
    std::fs::write(
        &unknown,
        r#"{
            "source_path": "/videos/demo.mp4",
            "output_dir": "/tmp/out",
            "keyframes": [],
            "custom_frames": [],
            "segments": [],
            "extra_field": true
        }"#,
    )
    .unwrap();
    assert!(matches!(
        load_plan(&unknown),
        Err(SplitError::ConfigParse { .. })
    ));

    // 缺少欄位同樣拒絕
    let partial = dir.path().join("partial.json");
    std::fs::write(&partial, r#"{ "source_path": "/videos/demo.mp4" }"#).unwrap();
    assert!(matches!(
        load_plan(&partial),
        Err(SplitError::ConfigParse { .. })
    ));
}

/// 測試 7: 計畫文件的路徑配置
#[test]
fn test_plan_document_layout() {
    let plan = SplitPlan {
        source_path: "/videos/my.movie.mp4".to_string(),
        output_dir: "/data/clips".to_string(),
        keyframes: vec![],
        custom_frames: vec![],
        segments: vec![],
    };

    assert_eq!(
        plan.document_path(),
        PathBuf::from("/data/clips/my.movie/config.json"),
        "文件位於 <輸出目錄>/<影片檔名>/config.json"
    );
}

/// 測試 8: 轉檔命令的固定參數
#[test]
fn test_clip_command_fixed_transform() {
    let clip = ClipCommand::new(Path::new("/videos/demo.mp4"), Path::new("/out"), 2, 3.0, 7.5);
    let cmd = clip.build_command();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    assert_eq!(clip.output_path(), Path::new("/out/2.mp4"));

    let expect_pair = |flag: &str, value: &str| {
        let i = args
            .iter()
            .position(|a| a == flag)
            .unwrap_or_else(|| panic!("缺少參數 {flag}"));
        assert_eq!(args[i + 1], value, "{flag} 的值不正確");
    };

    expect_pair("-ss", "3");
    expect_pair("-t", "4.5");
    expect_pair("-filter_complex", "hflip");
    expect_pair("-vcodec", "libx264");
    expect_pair("-acodec", "aac");
    expect_pair("-b:a", "64k");
}

/// 測試 9: 自訂幀輸入解析
#[test]
fn test_custom_frame_parsing() {
    assert_eq!(
        parse_custom_frames("1,2.5,10").unwrap(),
        vec![1.0, 2.5, 10.0]
    );
    assert!(parse_custom_frames("").unwrap().is_empty());
    assert!(parse_custom_frames("1,x").is_err());
}
