use std::thread;
use std::time::Duration;
use sysinfo::System;

/// 主機 CPU 資訊：提供轉檔並行上限與目前使用率
pub struct CpuMonitor {
    system: System,
}

impl CpuMonitor {
    #[must_use]
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_cpu_all();
        thread::sleep(Duration::from_millis(200));
        system.refresh_cpu_all();
        Self { system }
    }

    /// 可同時執行的轉檔任務數，等於邏輯 CPU 數
    #[must_use]
    pub fn worker_limit(&self) -> usize {
        self.system.cpus().len().max(1)
    }

    pub fn current_usage(&mut self) -> f32 {
        self.system.refresh_cpu_all();
        self.system.global_cpu_usage()
    }
}

impl Default for CpuMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_limit_at_least_one() {
        let monitor = CpuMonitor::new();
        assert!(monitor.worker_limit() >= 1);
    }
}
