use std::{
    collections::HashMap,
    env,
    ffi::OsStr,
    io,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Output, Stdio},
    time::{Duration, Instant},
};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;

lazy_static::lazy_static! {
    static ref DOTS_STYLE: ProgressStyle =
        ProgressStyle::with_template("{spinner} {msg} {elapsed_precise}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
}

pub fn progress(msg: &str) -> ProgressBar {
    let w = ProgressBar::new_spinner();
    w.set_style(DOTS_STYLE.clone());
    w.enable_steady_tick(Duration::from_millis(80));
    w.set_message(msg.to_owned());
    w
}

/// Runs `cmd` inside `dir` with `env` layered over the inherited environment.
///
/// Both output streams are captured; the caller decides what a non-zero exit
/// means. When `spinner` is set a progress spinner is shown for the duration
/// of the call.
pub async fn command(
    cmd: &Path,
    args: &[&str],
    dir: &Path,
    env: &HashMap<String, String>,
    spinner: Option<&str>,
) -> io::Result<Output> {
    tracing::info!("{} {args:?} in {}", cmd.display(), dir.display());
    let mut command = Command::new(cmd);
    command
        .current_dir(dir)
        .args(args)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let pb = spinner.map(progress);

    let start_time = Instant::now();
    let output = command.output().await;
    let dur = start_time.elapsed();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let output = output?;
    tracing::debug!(
        "{} exited with {} after {}",
        cmd.display(),
        output.status,
        elapsed_time_str(&dur)
    );
    Ok(output)
}

/// Locates an executable called `name` in the directories listed by `PATH`.
pub fn find_in_path(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    find_in_dirs(name, env::split_paths(&paths))
}

pub fn find_in_dirs(
    name: impl AsRef<OsStr>,
    dirs: impl IntoIterator<Item = PathBuf>,
) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(name.as_ref()))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

pub fn elapsed_time_str(dur: &Duration) -> String {
    let seconds = dur.as_secs() % 60;
    let minutes = (dur.as_secs() / 60) % 60;
    let hours = (dur.as_secs() / 60) / 60;
    format!("{:0>2}:{:0>2}:{:0>2}", hours, minutes, seconds)
}
