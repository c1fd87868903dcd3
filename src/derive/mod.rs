mod parameters;

pub use parameters::{capture, GenerationParameters, ParameterValue};

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use colored::*;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::DeriveError;

/// Renders a modelfile: the base model declaration followed by one
/// `PARAMETER` line per entry, in the order given.
pub fn render_modelfile<V: std::fmt::Display>(base_model: &str, parameters: &[(&str, V)]) -> String {
    let mut contents = format!("FROM {}\n", base_model);
    for (key, value) in parameters {
        let _ = writeln!(contents, "PARAMETER {} {}", key, value);
    }
    contents
}

/// Writes a modelfile for `base_model` with the given parameter overrides.
pub fn write_to_model_file<V: std::fmt::Display>(
    path: &Path,
    base_model: &str,
    parameters: &[(&str, V)],
) -> Result<(), DeriveError> {
    fs::write(path, render_modelfile(base_model, parameters)).map_err(|source| {
        DeriveError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("Wrote modelfile {}", path.display());
    Ok(())
}

/// Path of the modelfile for a derived model named `model_name`.
pub fn modelfile_path(directory: &Path, model_name: &str) -> PathBuf {
    directory.join(format!("{}.modelfile", model_name))
}

/// Runs `<tool> create <model_name> -f <modelfile>`, letting the tool's own
/// progress output reach the terminal.
pub async fn create_model(tool: &str, model_name: &str, modelfile: &Path) -> Result<(), DeriveError> {
    info!("Running {} create {} -f {}", tool, model_name, modelfile.display());
    let status = Command::new(tool)
        .arg("create")
        .arg(model_name)
        .arg("-f")
        .arg(modelfile)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|source| DeriveError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(DeriveError::Exit {
            tool: tool.to_string(),
            status,
        });
    }
    Ok(())
}

/// Writes the modelfile for a derived model and asks the tool to create it.
///
/// A failure is reported on `out` and never escapes: the menu carries on
/// either way. Returns whether the model was created.
pub async fn derive_model(
    tool: &str,
    directory: &Path,
    new_name: &str,
    base_model: &str,
    parameters: &GenerationParameters,
    out: &mut dyn Write,
) -> std::io::Result<bool> {
    let path = modelfile_path(directory, new_name);

    let result = match write_to_model_file(&path, base_model, &parameters.entries()) {
        Ok(()) => create_model(tool, new_name, &path).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            info!("Created model {} from {}", new_name, base_model);
            writeln!(
                out,
                "{}",
                format!("Model {} created successfully.", new_name).green()
            )?;
            Ok(true)
        }
        Err(e) => {
            error!("Failed to create model {}: {}", new_name, e);
            writeln!(out, "{}", format!("Error creating model: {}", e).red())?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modelfile_keeps_key_order() {
        let parameters = [
            ("temperature", ParameterValue::Float(0.7)),
            ("num_ctx", ParameterValue::Int(2048)),
        ];
        assert_eq!(
            render_modelfile("llama2", &parameters),
            "FROM llama2\nPARAMETER temperature 0.7\nPARAMETER num_ctx 2048\n"
        );
    }

    #[test]
    fn test_write_to_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = modelfile_path(dir.path(), "bar");
        let parameters = [
            ("temperature", ParameterValue::Float(0.7)),
            ("num_ctx", ParameterValue::Int(2048)),
        ];

        write_to_model_file(&path, "llama2", &parameters).unwrap();

        assert_eq!(path.file_name().unwrap(), "bar.modelfile");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FROM llama2\nPARAMETER temperature 0.7\nPARAMETER num_ctx 2048\n"
        );
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("bar.modelfile");
        let parameters: [(&str, ParameterValue); 0] = [];
        assert!(matches!(
            write_to_model_file(&path, "llama2", &parameters),
            Err(DeriveError::Write { .. })
        ));
    }

    fn sample_parameters() -> GenerationParameters {
        GenerationParameters {
            temperature: 0.7,
            context_length: 2048,
            top_k: 50,
            top_p: 0.9,
            min_p: 0.01,
        }
    }

    #[tokio::test]
    async fn test_derive_model_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let created = derive_model(
            "llamenu-no-such-tool",
            dir.path(),
            "bar",
            "llama2",
            &sample_parameters(),
            &mut out,
        )
        .await
        .unwrap();

        assert!(!created);
        assert!(String::from_utf8(out).unwrap().contains("Error creating model"));
        assert!(dir.path().join("bar.modelfile").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_derive_model_tool_exit_status() {
        let dir = tempfile::tempdir().unwrap();

        let mut out = Vec::new();
        let created = derive_model("true", dir.path(), "bar", "llama2", &sample_parameters(), &mut out)
            .await
            .unwrap();
        assert!(created);
        assert!(String::from_utf8(out).unwrap().contains("Model bar created successfully."));

        let mut out = Vec::new();
        let created = derive_model("false", dir.path(), "bar", "llama2", &sample_parameters(), &mut out)
            .await
            .unwrap();
        assert!(!created);
        assert!(String::from_utf8(out).unwrap().contains("exited with"));

        assert_eq!(
            fs::read_to_string(dir.path().join("bar.modelfile")).unwrap(),
            "FROM llama2\nPARAMETER temperature 0.7\nPARAMETER num_ctx 2048\n\
             PARAMETER top_k 50\nPARAMETER top_p 0.9\nPARAMETER min_p 0.01\n"
        );
    }
}
