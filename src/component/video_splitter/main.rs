use super::prompts;
use super::task_scheduler::{ClipTask, TaskScheduler, TaskStatus};
use crate::config::{KeyframeEntry, SegmentInterval, SplitPlan, load_plan, save_plan};
use crate::error::RunOutcome;
use crate::tools::{build_segments, get_video_keyframes, merge_frames};
use anyhow::Result;
use console::style;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 影片切割元件
///
/// 互動建立（或從文件載入）切割計畫，持久化後交給排程器執行。
pub struct VideoSplitter {
    config_path: Option<PathBuf>,
    skip: bool,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoSplitter {
    #[must_use]
    pub const fn new(
        config_path: Option<PathBuf>,
        skip: bool,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config_path,
            skip,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<RunOutcome> {
        let plan = match &self.config_path {
            Some(path) => match load_plan(path) {
                Ok(plan) => Some(plan),
                // 明確指定的設定檔有問題時回報並正常結束
                Err(e) => return Ok(RunOutcome::Aborted(e.to_string())),
            },
            None => None,
        };

        if self.skip {
            if let Some(plan) = &plan {
                return self.run_skip(plan);
            }
        }

        self.run_interactive(plan.as_ref())
    }

    /// skip 模式：略過所有互動，直接重跑計畫中已選取的片段
    fn run_skip(&self, plan: &SplitPlan) -> Result<RunOutcome> {
        let source_path = Path::new(&plan.source_path);
        if !source_path.exists() {
            return Ok(RunOutcome::Aborted(format!(
                "影片檔案不存在: {}",
                source_path.display()
            )));
        }

        let segments = plan.checked_segments();
        if segments.is_empty() {
            return Ok(RunOutcome::Aborted("計畫中沒有已選取的片段".to_string()));
        }

        info!("skip 模式：重新執行 {} 個已選取片段", segments.len());
        self.transcode(source_path, &plan.resolved_output_dir(), &segments)?;
        Ok(RunOutcome::Completed)
    }

    fn run_interactive(&self, prior: Option<&SplitPlan>) -> Result<RunOutcome> {
        println!("{}", style("=== 影片關鍵幀切割 ===").cyan().bold());

        let source_path = prompts::prompt_video_path(prior.map(|p| p.source_path.as_str()))?;

        // 先前計畫已有關鍵幀時不重新探測
        let keyframes = match prior {
            Some(plan) if !plan.keyframes.is_empty() => plan.keyframe_timestamps(),
            _ => get_video_keyframes(Path::new(&source_path))?,
        };

        let prior_checked_keyframes = prior.map(SplitPlan::checked_keyframes).unwrap_or_default();
        let Some(checked_keyframes) =
            prompts::prompt_keyframes(&keyframes, &prior_checked_keyframes)?
        else {
            return Ok(RunOutcome::Aborted("已取消選取".to_string()));
        };

        let prior_custom = prior.map(|p| p.custom_frames.clone()).unwrap_or_default();
        let custom_frames = prompts::prompt_custom_frames(&prior_custom)?;

        // 片段由全部關鍵幀與自訂幀導出，選取狀態只影響執行階段
        let merged = merge_frames(&custom_frames, &keyframes);
        let segment_pairs = build_segments(&merged);

        let prior_checked_segments = prior.map(SplitPlan::checked_segments).unwrap_or_default();
        let Some(checked_segments) =
            prompts::prompt_segments(&segment_pairs, &prior_checked_segments)?
        else {
            return Ok(RunOutcome::Aborted("已取消選取".to_string()));
        };

        let output_dir = prompts::prompt_output_dir(prior.map(|p| p.output_dir.as_str()))?;

        let plan = SplitPlan {
            source_path,
            output_dir,
            keyframes: KeyframeEntry::from_timestamps(&keyframes, &checked_keyframes),
            custom_frames,
            segments: SegmentInterval::from_pairs(&segment_pairs, &checked_segments),
        };

        save_plan(&plan, &plan.document_path())?;

        self.transcode(
            Path::new(&plan.source_path),
            &plan.resolved_output_dir(),
            &checked_segments,
        )?;
        Ok(RunOutcome::Completed)
    }

    fn transcode(
        &self,
        source_path: &Path,
        output_dir: &Path,
        segments: &[(f64, f64)],
    ) -> Result<()> {
        println!("{}", style("開始切割任務...").cyan());

        let mut scheduler = TaskScheduler::new(
            source_path,
            output_dir,
            segments,
            Arc::clone(&self.shutdown_signal),
        )?;

        if let Err(e) = scheduler.run() {
            error!("切割任務執行失敗: {e}");
            return Err(e);
        }

        self.print_summary(scheduler.tasks());
        Ok(())
    }

    fn print_summary(&self, tasks: &[ClipTask]) {
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        let failed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count();

        println!();
        println!("{}", style("=== 切割任務摘要 ===").cyan().bold());
        println!("  總計: {} 個片段", tasks.len());
        println!("  成功: {} 個", style(completed).green());
        if failed > 0 {
            println!("  失敗: {} 個", style(failed).red());
            for task in tasks.iter().filter(|t| t.status == TaskStatus::Failed) {
                println!(
                    "    {} {}",
                    style(format!("[{}]", task.id)).red(),
                    task.error_message.as_deref().unwrap_or("未知錯誤")
                );
            }
        }

        info!("切割任務完成 - 成功: {completed}, 失敗: {failed}");
    }
}
