//! External editor integration: pick an editor for a file and run it.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::{AppError, Result};

/// Editors tried, in order, after `$VISUAL` and `$EDITOR`.
const CONVENTIONAL_EDITORS: &[&str] = &["nvim", "vim", "vi", "nano", "less"];

/// How an editor expects to be told the line to jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorKind {
    /// vim, nvim, gvim and friends: `+N file`.
    Vim,
    /// nano: `+N file`.
    Nano,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditorCommand {
    program: String,
    args: Vec<String>,
    kind: EditorKind,
}

/// Split a command line with shell quoting rules. Unbalanced quotes and
/// blank commands give `None`.
fn parse_editor_command(command: &str) -> Option<EditorCommand> {
    let mut parts = shlex::split(command)?.into_iter();
    let program = parts.next().filter(|p| !p.is_empty())?;
    let args = parts.collect();
    let kind = editor_kind_from_program(&program);
    Some(EditorCommand {
        program,
        args,
        kind,
    })
}

fn editor_kind_from_program(program: &str) -> EditorKind {
    let name = Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
        .to_lowercase();

    if name.contains("vim") {
        EditorKind::Vim
    } else if name.contains("nano") {
        EditorKind::Nano
    } else {
        EditorKind::Other
    }
}

/// Arguments that open `path`, at `line` when the editor supports it.
fn location_args(kind: EditorKind, path: &Path, line: Option<usize>) -> Vec<String> {
    let path = path.to_string_lossy().to_string();
    match (kind, line.filter(|&l| l > 0)) {
        (EditorKind::Vim | EditorKind::Nano, Some(line)) => vec![format!("+{line}"), path],
        _ => vec![path],
    }
}

/// Whether `program` names something runnable: an existing absolute path,
/// or an executable file somewhere on `PATH`.
fn is_resolvable(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.is_absolute() {
        return candidate.exists();
    }
    let Some(path) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path).any(|dir| {
        executable_names(program)
            .into_iter()
            .any(|name| dir.join(name).is_file())
    })
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<PathBuf> {
    vec![PathBuf::from(program), PathBuf::from(format!("{program}.exe"))]
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<PathBuf> {
    vec![PathBuf::from(program)]
}

/// Editor command for files with the given extension.
///
/// Configured commands are used as written. Otherwise the first of
/// `$VISUAL`, `$EDITOR` and a list of common editors that can actually be
/// found on this system wins.
pub fn resolve_editor(extension: &str, config: &EditorConfig) -> Option<String> {
    if let Some(cmd) = config.command_for(extension) {
        return Some(cmd.to_owned());
    }

    let from_env = ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|var| env::var(var).ok());
    let conventional = CONVENTIONAL_EDITORS.iter().map(|s| (*s).to_owned());

    from_env.chain(conventional).find(|candidate| {
        parse_editor_command(candidate).is_some_and(|cmd| is_resolvable(&cmd.program))
    })
}

/// Open `path` in an editor and wait for it to exit.
///
/// Falls back to the platform's generic opener when no editor resolves.
/// Failures are logged and otherwise ignored, as is the exit status.
pub fn open_in_editor(path: &Path, line: Option<usize>, config: &EditorConfig) {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();

    let result = match resolve_editor(&extension, config).as_deref().and_then(parse_editor_command) {
        Some(editor) => run_editor(&editor, path, line),
        None => run_system_opener(path),
    };
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "could not open file");
    }
}

fn run_editor(editor: &EditorCommand, path: &Path, line: Option<usize>) -> Result<()> {
    info!(program = %editor.program, path = %path.display(), ?line, "launching editor");
    let status = Command::new(&editor.program)
        .args(&editor.args)
        .args(location_args(editor.kind, path, line))
        .status()
        .map_err(|e| AppError::Editor(format!("{}: {e}", editor.program)))?;
    debug!(%status, "editor exited");
    Ok(())
}

fn run_system_opener(path: &Path) -> Result<()> {
    info!(path = %path.display(), "no editor found, using system opener");
    let status = system_opener(path)
        .status()
        .map_err(|e| AppError::Editor(format!("system opener: {e}")))?;
    debug!(%status, "system opener exited");
    Ok(())
}

#[cfg(target_os = "macos")]
fn system_opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(windows)]
fn system_opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn system_opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_args() {
        let cmd = parse_editor_command("code --wait").unwrap();
        assert_eq!(cmd.program, "code");
        assert_eq!(cmd.args, vec!["--wait".to_string()]);
        assert_eq!(cmd.kind, EditorKind::Other);
        assert!(parse_editor_command("   ").is_none());
    }

    #[test]
    fn quoted_program_path_stays_one_word() {
        let cmd = parse_editor_command("\"/opt/My Editor/bin/edit\" --wait 'two words'").unwrap();
        assert_eq!(cmd.program, "/opt/My Editor/bin/edit");
        assert_eq!(cmd.args, vec!["--wait".to_string(), "two words".to_string()]);
        assert_eq!(cmd.kind, EditorKind::Other);
    }

    #[test]
    fn quoted_vim_keeps_line_jump() {
        let cmd = parse_editor_command("'/Applications/My Apps/nvim'").unwrap();
        assert_eq!(cmd.kind, EditorKind::Vim);
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(parse_editor_command("\"/opt/editor --wait").is_none());
    }

    #[test]
    fn vim_family_detected_by_substring() {
        assert_eq!(editor_kind_from_program("nvim"), EditorKind::Vim);
        assert_eq!(editor_kind_from_program("/usr/bin/gvim"), EditorKind::Vim);
        assert_eq!(editor_kind_from_program("NVIM.EXE"), EditorKind::Vim);
        assert_eq!(editor_kind_from_program("nano"), EditorKind::Nano);
        assert_eq!(editor_kind_from_program("emacs"), EditorKind::Other);
    }

    #[test]
    fn line_jump_only_for_capable_editors() {
        let path = Path::new("/tmp/a.txt");
        assert_eq!(
            location_args(EditorKind::Vim, path, Some(12)),
            vec!["+12".to_string(), "/tmp/a.txt".to_string()]
        );
        assert_eq!(
            location_args(EditorKind::Nano, path, Some(3)),
            vec!["+3".to_string(), "/tmp/a.txt".to_string()]
        );
        assert_eq!(
            location_args(EditorKind::Other, path, Some(12)),
            vec!["/tmp/a.txt".to_string()]
        );
        assert_eq!(
            location_args(EditorKind::Vim, path, None),
            vec!["/tmp/a.txt".to_string()]
        );
    }

    #[test]
    fn configured_extension_wins() {
        let mut config = EditorConfig {
            generic: Some("fallback-editor".into()),
            ..Default::default()
        };
        config
            .extensions
            .insert("md".into(), "definitely-not-installed --flag".into());
        assert_eq!(
            resolve_editor("md", &config).as_deref(),
            Some("definitely-not-installed --flag")
        );
        assert_eq!(
            resolve_editor("rs", &config).as_deref(),
            Some("fallback-editor")
        );
    }

    #[test]
    fn absolute_program_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("my-editor");
        std::fs::write(&exe, "").unwrap();
        assert!(is_resolvable(exe.to_str().unwrap()));
        assert!(!is_resolvable(dir.path().join("missing").to_str().unwrap()));
    }
}
