/// Format a second count as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours: 3661 seconds is `"61:01"`.
pub fn format_elapsed(elapsed_secs: u64) -> String {
    let minutes = elapsed_secs / 60;
    let seconds = elapsed_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
