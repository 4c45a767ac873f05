//! Saving a rendered figure to one or more files.

use crate::engine::Figure;
use crate::error::{PlotError, Result};
use std::path::{Path, PathBuf};

/// Where to write a figure.
///
/// Either `path` (format taken from its extension), or `name` + `figure_dir`, which writes
/// `figure_dir/<fmt>/<name>.<fmt>` for each entry of `formats` (`png` when empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    pub path: Option<PathBuf>,
    pub name: Option<String>,
    pub figure_dir: Option<PathBuf>,
    pub formats: Vec<String>,
    /// Also copy every written file to `historical_dir/<fmt>/<timestamp>__<name>.<fmt>`.
    pub historical_dir: Option<PathBuf>,
}

/// One planned output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub format: String,
    pub path: PathBuf,
}

/// Resolve the output files without touching the filesystem.
pub fn plan_targets(opts: &SaveOptions) -> Result<Vec<Target>> {
    if let Some(path) = &opts.path {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                PlotError::Config(format!("output path has no extension: {}", path.display()))
            })?;
        return Ok(vec![Target {
            format: format.to_ascii_lowercase(),
            path: path.clone(),
        }]);
    }

    let (Some(name), Some(dir)) = (&opts.name, &opts.figure_dir) else {
        return Err(PlotError::Config(
            "must specify path or (name and figure dir)".into(),
        ));
    };
    let formats: Vec<&str> = if opts.formats.is_empty() {
        vec!["png"]
    } else {
        opts.formats.iter().map(String::as_str).collect()
    };
    Ok(formats
        .into_iter()
        .map(|fmt| Target {
            format: fmt.to_ascii_lowercase(),
            path: dir.join(fmt).join(format!("{name}.{fmt}")),
        })
        .collect())
}

/// Label used to prefix archived copies.
pub fn timestamp_label() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "figure".to_string())
}

/// Render `figure` to every target of `opts`, returning the written paths (archive copies
/// included).
pub fn save_figure(figure: &Figure, opts: &SaveOptions) -> Result<Vec<PathBuf>> {
    let targets = plan_targets(opts)?;
    let mut written = Vec::with_capacity(targets.len());

    for target in &targets {
        figure.save(&target.path)?;
        log::info!("saving figure: {}", target.path.display());
        written.push(target.path.clone());
    }

    if let Some(hist_dir) = &opts.historical_dir {
        let stamp = timestamp_label();
        for target in &targets {
            let name = opts.name.clone().unwrap_or_else(|| stem(&target.path));
            let copy = hist_dir
                .join(&target.format)
                .join(format!("{stamp}__{name}.{}", target.format));
            if let Some(parent) = copy.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&target.path, &copy)?;
            log::info!("archived figure: {}", copy.display());
            written.push(copy);
        }
    }
    Ok(written)
}
