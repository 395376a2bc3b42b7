//! Output locations for filled documents

use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{DoctemplateError, Result};

/// Where the filled copy of `template` is written
///
/// The file lands in the configured output directory next to the template
/// (or in `directory_override`), with the marker prefix removed from its name:
/// `letters/_offer.docx` becomes `letters/output/offer.docx`.
pub fn output_path(
    template: &Path,
    config: &OutputConfig,
    directory_override: Option<&Path>,
) -> Result<PathBuf> {
    let file_name = template
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            DoctemplateError::OutputPathInvalid(format!(
                "'{}' has no usable file name",
                template.display()
            ))
        })?;

    let stripped = if config.marker.is_empty() {
        file_name
    } else {
        file_name
            .strip_prefix(config.marker.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(file_name)
    };

    let directory = match directory_override {
        Some(directory) => directory.to_path_buf(),
        None => template
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&config.directory),
    };

    let output = directory.join(stripped);
    if output == template {
        return Err(DoctemplateError::OutputPathInvalid(format!(
            "output for '{}' would overwrite the template",
            template.display()
        )));
    }

    Ok(output)
}
