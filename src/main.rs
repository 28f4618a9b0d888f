use anyhow::Result;
use auto_video_split::component::VideoSplitter;
use auto_video_split::error::RunOutcome;
use auto_video_split::init;
use auto_video_split::signal::setup_shutdown_signal;
use clap::Parser;
use console::style;
use log::{info, warn};
use std::path::PathBuf;

/// 依偵測到的關鍵幀與自訂時間點切割影片
#[derive(Parser, Debug)]
#[command(name = "auto_video_split", version)]
struct Cli {
    /// 先前儲存的切割計畫路徑
    #[arg(long)]
    config: Option<PathBuf>,

    /// 搭配 --config：跳過互動流程，直接重新執行已選取的片段
    #[arg(long)]
    skip: bool,
}

fn main() -> Result<()> {
    init::init();
    let cli = Cli::parse();
    let shutdown_signal = setup_shutdown_signal();

    let splitter = VideoSplitter::new(cli.config, cli.skip, shutdown_signal);
    match splitter.run() {
        Ok(RunOutcome::Completed) => {
            info!("程式正常結束");
            Ok(())
        }
        Ok(RunOutcome::Aborted(reason)) => {
            eprintln!("{} {}", style("中止:").yellow().bold(), reason);
            warn!("執行中止: {reason}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("錯誤:").red().bold(), e);
            Err(e)
        }
    }
}
