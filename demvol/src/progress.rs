use indicatif::{ProgressBar, ProgressStyle};

/// Returns a progress bar over `length` samples, hidden if `quiet`.
pub fn bar(header: String, length: u64, quiet: bool) -> ProgressBar {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(length)
    };
    pb.set_prefix(header);
    pb.set_length(length);
    pb.set_style(
        ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}] {pos}/{len}")
            .expect("incorrect progress bar format string")
            .progress_chars("#>-"),
    );
    pb
}
