use std::path::{Path, PathBuf};
use std::process::Command;

/// 單一片段的 ffmpeg 轉檔命令
///
/// 固定轉換：水平翻轉、H.264 視訊、AAC 64k 音訊，輸出 `<id>.mp4`。
pub struct ClipCommand {
    source_path: PathBuf,
    output_path: PathBuf,
    start: f64,
    duration: f64,
}

impl ClipCommand {
    #[must_use]
    pub fn new(source_path: &Path, output_dir: &Path, id: u32, start: f64, end: f64) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            output_path: output_dir.join(format!("{id}.mp4")),
            start,
            duration: end - start,
        }
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");

        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .args(["-ss", &self.start.to_string()])
            .arg("-i")
            .arg(&self.source_path)
            .arg("-y")
            .args(["-filter_complex", "hflip"])
            .args(["-vcodec", "libx264"])
            .args(["-acodec", "aac"])
            .args(["-b:a", "64k"])
            .args(["-t", &self.duration.to_string()])
            .args(["-progress", "pipe:1"]);
        cmd.arg(&self.output_path);

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_output_path_uses_segment_id() {
        let cmd = ClipCommand::new(Path::new("/videos/demo.mp4"), Path::new("/out"), 3, 1.0, 2.5);
        assert_eq!(cmd.output_path(), Path::new("/out/3.mp4"));
    }

    #[test]
    fn test_command_arguments() {
        let clip = ClipCommand::new(Path::new("/videos/demo.mp4"), Path::new("/out"), 1, 1.5, 4.0);
        let cmd = clip.build_command();
        let args = args_of(&cmd);

        assert_eq!(cmd.get_program(), "ffmpeg");

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "1.5");

        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "2.5", "-t 應為片段時長 end - start");

        for expected in ["hflip", "libx264", "aac", "64k"] {
            assert!(args.iter().any(|a| a == expected), "缺少參數 {expected}");
        }
        assert_eq!(args.last().unwrap(), "/out/1.mp4");
    }
}
