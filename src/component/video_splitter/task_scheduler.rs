use super::cpu_monitor::CpuMonitor;
use super::ffmpeg_command::ClipCommand;
use crate::tools::ensure_directory_exists;
use anyhow::Result;
use console::Term;
use log::{error, info, warn};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use std::{fs, thread};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// 單一片段的轉檔任務
///
/// 狀態只會往前走：Pending -> Running -> Completed | Failed。
#[derive(Debug)]
pub struct ClipTask {
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub output_path: PathBuf,
    pub status: TaskStatus,
    pub error_message: Option<String>,
}

impl ClipTask {
    #[must_use]
    pub fn new(id: u32, start: f64, end: f64, source_path: &Path, output_dir: &Path) -> Self {
        let command = ClipCommand::new(source_path, output_dir, id, start, end);
        Self {
            id,
            start,
            end,
            output_path: command.output_path().to_path_buf(),
            status: TaskStatus::Pending,
            error_message: None,
        }
    }

    /// 任務標題，如 `01/04 001.50秒 - 004.00秒，時長 002.50秒`
    #[must_use]
    pub fn title(&self, total: usize) -> String {
        format!(
            "{:02}/{} {:06.2}秒 - {:06.2}秒，時長 {:06.2}秒",
            self.id,
            total,
            self.start,
            self.end,
            self.end - self.start
        )
    }
}

#[derive(Debug, Clone)]
struct ProgressState {
    title: String,
    current_ms: u64,
    total_ms: u64,
    speed: Option<f64>,
}

struct RunningProcess {
    child: Child,
    task_index: usize,
    progress: Arc<Mutex<ProgressState>>,
}

/// 以邏輯 CPU 數為並行上限的片段轉檔排程器
///
/// 任務依 id 順序啟動，完成順序不保證；單一任務失敗不影響其他
/// 任務，也不會重試。
pub struct TaskScheduler {
    source_path: PathBuf,
    output_dir: PathBuf,
    tasks: Vec<ClipTask>,
    running_processes: HashMap<u32, RunningProcess>,
    max_parallel: usize,
    cpu_monitor: CpuMonitor,
    term: Term,
    last_render_lines: usize,
    shutdown_signal: Arc<AtomicBool>,
}

impl TaskScheduler {
    pub fn new(
        source_path: &Path,
        output_dir: &Path,
        segments: &[(f64, f64)],
        shutdown_signal: Arc<AtomicBool>,
    ) -> Result<Self> {
        ensure_directory_exists(output_dir)?;

        let cpu_monitor = CpuMonitor::new();
        let max_parallel = cpu_monitor.worker_limit();

        let tasks = segments
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| {
                ClipTask::new((i + 1) as u32, start, end, source_path, output_dir)
            })
            .collect();

        Ok(Self {
            source_path: source_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            tasks,
            running_processes: HashMap::new(),
            max_parallel,
            cpu_monitor,
            term: Term::buffered_stdout(),
            last_render_lines: 0,
            shutdown_signal,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let started_at = Instant::now();
        info!(
            "開始切割任務，共 {} 個片段，並行上限 {}",
            self.tasks.len(),
            self.max_parallel
        );

        while !self.is_all_completed() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                self.handle_shutdown();
                return Ok(());
            }

            self.check_completed_processes();
            self.spawn_new_tasks();
            self.print_status();

            thread::sleep(Duration::from_millis(500));
        }

        let elapsed = started_at.elapsed();
        info!("所有切割任務已完成，耗時 {:.2} 秒", elapsed.as_secs_f64());
        println!("任務執行時間: {:.2} 秒", elapsed.as_secs_f64());

        Ok(())
    }

    fn is_all_completed(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| matches!(t.status, TaskStatus::Completed | TaskStatus::Failed))
            && self.running_processes.is_empty()
    }

    fn find_next_pending_task(&self) -> Option<usize> {
        self.tasks
            .iter()
            .position(|t| t.status == TaskStatus::Pending)
    }

    fn spawn_new_tasks(&mut self) {
        while self.running_processes.len() < self.max_parallel {
            let Some(task_index) = self.find_next_pending_task() else {
                break;
            };
            self.spawn_task(task_index);
        }
    }

    fn spawn_task(&mut self, task_index: usize) {
        let total = self.tasks.len();
        let task = &mut self.tasks[task_index];
        let command =
            ClipCommand::new(&self.source_path, &self.output_dir, task.id, task.start, task.end);

        let mut command = command.build_command();
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        match command.spawn() {
            Ok(mut child) => {
                task.status = TaskStatus::Running;

                info!(
                    "啟動片段轉檔 [{}]: {}",
                    task.id,
                    task.output_path.display()
                );

                let progress = Arc::new(Mutex::new(ProgressState {
                    title: task.title(total),
                    current_ms: 0,
                    total_ms: duration_ms(task.start, task.end),
                    speed: None,
                }));

                Self::spawn_progress_reader(child.stdout.take(), Arc::clone(&progress));

                self.running_processes.insert(
                    task.id,
                    RunningProcess {
                        child,
                        task_index,
                        progress,
                    },
                );
            }
            Err(e) => {
                task.status = TaskStatus::Failed;
                task.error_message = Some(format!("無法啟動 ffmpeg: {e}"));
                error!("無法啟動片段轉檔 [{}]: {e}", task.id);
            }
        }
    }

    /// 從 ffmpeg 的 -progress 輸出讀取進度
    fn spawn_progress_reader(stdout: Option<ChildStdout>, progress: Arc<Mutex<ProgressState>>) {
        let Some(stdout) = stdout else {
            return;
        };

        let mut reader = BufReader::new(stdout);
        thread::spawn(move || {
            let mut line = String::new();
            while let Ok(bytes) = reader.read_line(&mut line) {
                if bytes == 0 {
                    break;
                }

                if let Some((key, value)) = line.trim().split_once('=') {
                    let mut guard = progress.lock().ok();
                    if let Some(state) = guard.as_mut() {
                        match key {
                            "out_time_ms" => {
                                if let Some(v) = parse_out_time_ms(value) {
                                    state.current_ms = v;
                                }
                            }
                            "speed" => {
                                if let Some(v) = parse_speed(value) {
                                    state.speed = Some(v);
                                }
                            }
                            _ => {}
                        }
                    }
                }

                line.clear();
            }
        });
    }

    fn check_completed_processes(&mut self) {
        let mut completed_ids = Vec::new();

        for (id, process) in &mut self.running_processes {
            match process.child.try_wait() {
                Ok(Some(status)) => completed_ids.push((*id, status.success())),
                Ok(None) => {}
                Err(e) => {
                    warn!("無法檢查片段轉檔狀態 [{id}]: {e}");
                    completed_ids.push((*id, false));
                }
            }
        }

        for (id, exit_success) in completed_ids {
            if let Some(mut process) = self.running_processes.remove(&id) {
                let task = &mut self.tasks[process.task_index];

                if exit_success {
                    task.status = TaskStatus::Completed;
                    info!("片段完成 [{}]: {}", task.id, task.output_path.display());
                } else {
                    let stderr = process.child.stderr.take();
                    let error_msg = stderr
                        .map(|s| {
                            BufReader::new(s)
                                .lines()
                                .map_while(std::result::Result::ok)
                                .collect::<Vec<_>>()
                                .join("\n")
                        })
                        .filter(|msg| !msg.is_empty())
                        .unwrap_or_else(|| "未知錯誤".to_string());

                    task.status = TaskStatus::Failed;
                    task.error_message = Some(error_msg.clone());
                    error!("片段失敗 [{}]: {error_msg}", task.id);
                }
            }
        }
    }

    fn handle_shutdown(&mut self) {
        warn!("收到中斷信號，正在停止所有片段轉檔...");

        for (id, mut process) in self.running_processes.drain() {
            warn!("終止片段轉檔 [{id}]");
            let _ = process.child.kill();
            let _ = process.child.wait();

            let task = &self.tasks[process.task_index];
            if task.output_path.exists() {
                if let Err(e) = fs::remove_file(&task.output_path) {
                    error!(
                        "無法刪除中斷的輸出檔案 {}: {e}",
                        task.output_path.display()
                    );
                }
            }
        }
    }

    fn print_status(&mut self) {
        let pending = self.count_status(TaskStatus::Pending);
        let completed = self.count_status(TaskStatus::Completed);
        let failed = self.count_status(TaskStatus::Failed);

        let mut lines = Vec::new();
        lines.push(format!(
            "[狀態] 等待: {} | 執行中: {} | 完成: {} | 失敗: {} | CPU: {:.1}%",
            pending,
            self.running_processes.len(),
            completed,
            failed,
            self.cpu_monitor.current_usage()
        ));

        let mut progresses: Vec<ProgressState> = self
            .running_processes
            .values()
            .filter_map(|p| p.progress.lock().ok().map(|state| state.clone()))
            .collect();
        progresses.sort_by(|a, b| a.title.cmp(&b.title));

        for prog in &progresses {
            let percent = if prog.total_ms > 0 {
                let cur = prog.current_ms.min(prog.total_ms);
                format!("{:5.1}%", cur as f64 / prog.total_ms as f64 * 100.0)
            } else {
                "  ?.?%".to_string()
            };
            let speed = prog
                .speed
                .map(|s| format!("{s:.2}x"))
                .unwrap_or_else(|| "--".to_string());

            lines.push(format!("      {} speed:{} {}", percent, speed, prog.title));
        }

        // 清除上一輪再重繪，避免殘影
        let _ = self.term.clear_last_lines(self.last_render_lines);
        for line in &lines {
            let _ = self.term.write_line(line);
        }
        let _ = self.term.flush();
        self.last_render_lines = lines.len();
    }

    fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    #[must_use]
    pub fn tasks(&self) -> &[ClipTask] {
        &self.tasks
    }
}

fn duration_ms(start: f64, end: f64) -> u64 {
    let seconds = (end - start).max(0.0);
    (seconds * 1000.0).round() as u64
}

fn parse_out_time_ms(raw: &str) -> Option<u64> {
    // ffmpeg 的 out_time_ms 單位其實是微秒
    raw.parse::<u64>().ok().map(|us| us / 1000)
}

fn parse_speed(raw: &str) -> Option<f64> {
    raw.trim().trim_end_matches('x').parse::<f64>().ok()
}
