use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use braic_diagnostic::{Diagnostic, ImportError};
use braic_ir::Position;

/// The result of resolving a root source buffer: the single logical source
/// with every transitively imported file inlined, plus the ordered list of
/// absolute paths that were inlined (spec §4.1's contract).
#[derive(Clone, Debug, Default)]
pub struct Resolved {
    pub source: String,
    pub imported: Vec<PathBuf>,
}

const LIBRARY_DIR_NAMES: [&str; 3] = ["lib", "stdlib", "library"];

/// Resolve `root_source` (already read from `root_path` by the caller,
/// per spec §4.1's contract) into a single buffer with imports inlined.
pub fn resolve(root_source: &str, root_path: &Path) -> Result<Resolved, Diagnostic> {
    let mut resolver = Resolver {
        inlined: HashSet::new(),
        stack: Vec::new(),
        imported: Vec::new(),
    };
    let root_canonical = fs::canonicalize(root_path).unwrap_or_else(|_| root_path.to_path_buf());
    resolver.stack.push(root_canonical.clone());
    let source = resolver.resolve_text(root_source, &root_canonical)?;
    resolver.stack.pop();
    Ok(Resolved {
        source,
        imported: resolver.imported,
    })
}

struct Resolver {
    inlined: HashSet<PathBuf>,
    stack: Vec<PathBuf>,
    imported: Vec<PathBuf>,
}

impl Resolver {
    fn resolve_text(&mut self, text: &str, current_file: &Path) -> Result<String, Diagnostic> {
        let mut out = String::new();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx as u32 + 1;
            match parse_import_directive(line) {
                Some(quoted_path) => {
                    self.inline_import(&quoted_path, current_file, line_no, &mut out)?;
                }
                None => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    fn inline_import(
        &mut self,
        quoted_path: &str,
        current_file: &Path,
        line_no: u32,
        out: &mut String,
    ) -> Result<(), Diagnostic> {
        let file_display = current_file.display().to_string();
        let at = Position::new(line_no, 1);

        let found = search(quoted_path, current_file).ok_or_else(|| {
            Diagnostic::import(ImportError::NotFound {
                path: quoted_path.to_string(),
                file: file_display.clone(),
                at,
            })
        })?;
        let canonical = fs::canonicalize(&found).unwrap_or(found);

        if self.stack.contains(&canonical) {
            return Err(Diagnostic::import(ImportError::Circular {
                path: quoted_path.to_string(),
                file: file_display,
                at,
            }));
        }
        if self.inlined.contains(&canonical) {
            tracing::trace!(path = %canonical.display(), "import already inlined, eliding");
            out.push_str(&format!("// ... (already imported: {quoted_path})\n"));
            return Ok(());
        }

        let text = fs::read_to_string(&canonical).map_err(|e| {
            Diagnostic::import(ImportError::ReadError {
                path: quoted_path.to_string(),
                file: file_display,
                at,
                cause: e.to_string(),
            })
        })?;

        tracing::debug!(path = %canonical.display(), "resolving import");
        self.stack.push(canonical.clone());
        out.push_str(&format!("// BEGIN IMPORT: {quoted_path}\n"));
        let nested = self.resolve_text(&text, &canonical)?;
        out.push_str(&nested);
        out.push_str(&format!("// END IMPORT: {quoted_path}\n"));
        self.stack.pop();

        self.inlined.insert(canonical.clone());
        self.imported.push(canonical);
        Ok(())
    }
}

/// Search list order per spec §4.1: directory of the current file, cwd,
/// the running binary's directory, then `lib`/`stdlib`/`library` under cwd.
fn search(quoted_path: &str, current_file: &Path) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = current_file.parent() {
        candidates.push(dir.join(quoted_path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(quoted_path));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(quoted_path));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        for name in LIBRARY_DIR_NAMES {
            candidates.push(cwd.join(name).join(quoted_path));
        }
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// A line whose first non-whitespace token is the word `import` followed by
/// a quoted path (spec §4.1). Returns the unquoted path string.
fn parse_import_directive(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("import")?;
    // Reject identifiers that merely start with "import" (`importer`).
    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn inlines_a_single_import_with_annotations() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "util.br", "var u = 1;\n");
        let root = write_file(dir.path(), "main.br", "import \"util.br\";\nvar m = 2;\n");
        let root_src = fs::read_to_string(&root).unwrap();

        let resolved = resolve(&root_src, &root).unwrap();
        assert!(resolved.source.contains("BEGIN IMPORT: util.br"));
        assert!(resolved.source.contains("var u = 1;"));
        assert!(resolved.source.contains("END IMPORT: util.br"));
        assert!(resolved.source.contains("var m = 2;"));
        assert_eq!(resolved.imported.len(), 1);
    }

    #[test]
    fn duplicate_import_is_elided_not_reinlined() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "util.br", "var u = 1;\n");
        let root = write_file(
            dir.path(),
            "main.br",
            "import \"util.br\";\nimport \"util.br\";\n",
        );
        let root_src = fs::read_to_string(&root).unwrap();

        let resolved = resolve(&root_src, &root).unwrap();
        assert_eq!(resolved.source.matches("var u = 1;").count(), 1);
        assert!(resolved.source.contains("already imported"));
        assert_eq!(resolved.imported.len(), 1);
    }

    #[test]
    fn circular_import_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.br", "import \"a.br\";\n");
        let root = write_file(dir.path(), "a.br", "import \"b.br\";\n");
        let root_src = fs::read_to_string(&root).unwrap();

        let err = resolve(&root_src, &root).unwrap_err();
        assert!(err.to_string().contains("Circular import detected"));
    }

    #[test]
    fn missing_import_fails_with_file_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let root = write_file(dir.path(), "main.br", "var x = 1;\nimport \"missing.br\";\n");
        let root_src = fs::read_to_string(&root).unwrap();

        let err = resolve(&root_src, &root).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "util.br", "var u = 1;\n");
        let root = write_file(dir.path(), "main.br", "import \"util.br\";\nvar m = 2;\n");
        let root_src = fs::read_to_string(&root).unwrap();

        let first = resolve(&root_src, &root).unwrap();
        let second = resolve(&root_src, &root).unwrap();
        assert_eq!(first.source, second.source);
    }
}
