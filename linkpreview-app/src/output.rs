use linkpreview_common::observability::expand_home;
use std::path::{Path, PathBuf};

/// Output directory: the flag, then the configured directory, then
/// `~/Desktop` on hosts that have `/Users`, then the working directory.
pub fn resolve_output_dir(flag: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    resolve_with(
        flag,
        configured,
        Path::new("/Users").exists(),
        dirs::home_dir(),
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    )
}

fn resolve_with(
    flag: Option<&Path>,
    configured: Option<&Path>,
    has_users_dir: bool,
    home: Option<PathBuf>,
    cwd: PathBuf,
) -> PathBuf {
    if let Some(dir) = flag {
        return expand_home(dir);
    }
    if let Some(dir) = configured {
        return expand_home(dir);
    }
    match home {
        Some(home) if has_users_dir => home.join("Desktop"),
        _ => cwd,
    }
}
