use std::{
    env,
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, Local};

pub const DEFAULT_OUTPUT_FILE: &str = "bing_index_results.csv";

/// Where results go when a run is interrupted.
///
/// The default output name gets a timestamped sibling so repeated interrupted
/// runs do not clobber each other; a chosen name gets an `_autosave` suffix.
pub fn autosave_path(output: &Path, now: DateTime<Local>) -> PathBuf {
    if output.file_name().is_some_and(|name| name == DEFAULT_OUTPUT_FILE) {
        return output.with_file_name(format!(
            "bing_autosave_{}.csv",
            now.format("%Y%m%d_%H%M%S")
        ));
    }
    with_suffix(output, "_autosave")
}

/// Where results go when the run aborts on an error.
pub fn error_path(output: &Path) -> PathBuf {
    with_suffix(output, "_error")
}

/// Whether two paths name the same file once `.`/`..` segments, relative
/// prefixes and (for existing paths) symlinks are resolved.
pub fn same_location(a: &Path, b: &Path) -> bool {
    resolve(a) == resolve(b)
}

fn resolve(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    match (resolved.parent(), resolved.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(real_parent) => real_parent.join(name),
            Err(_) => resolved,
        },
        _ => resolved,
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn default_output_gets_timestamped_autosave() {
        assert_eq!(
            autosave_path(Path::new("out/bing_index_results.csv"), now()),
            PathBuf::from("out/bing_autosave_20240102_030405.csv")
        );
    }

    #[test]
    fn custom_output_gets_suffix() {
        assert_eq!(
            autosave_path(Path::new("/data/report.csv"), now()),
            PathBuf::from("/data/report_autosave.csv")
        );
        assert_eq!(
            autosave_path(Path::new("report"), now()),
            PathBuf::from("report_autosave")
        );
    }

    #[test]
    fn same_location_sees_through_relative_spellings() {
        assert!(same_location(Path::new("./out.csv"), Path::new("out.csv")));
        assert!(same_location(
            Path::new("reports/../out.csv"),
            Path::new("out.csv")
        ));
        assert!(!same_location(Path::new("out.csv"), Path::new("other.csv")));
    }

    #[test]
    fn same_location_matches_absolute_and_relative_forms() {
        let cwd = env::current_dir().unwrap();
        assert!(same_location(&cwd.join("out.csv"), Path::new("./out.csv")));
    }

    #[test]
    fn error_path_keeps_extension() {
        assert_eq!(
            error_path(Path::new("report.csv")),
            PathBuf::from("report_error.csv")
        );
    }
}
