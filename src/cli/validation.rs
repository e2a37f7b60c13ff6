// validation.rs - Path and default value validation

use std::fs;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

/// Constraints applied to an explicitly supplied configuration path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRules {
    pub exists: bool,
    pub file_okay: bool,
    pub dir_okay: bool,
    pub writable: bool,
    pub readable: bool,
    pub resolve_path: bool,
}

impl Default for PathRules {
    fn default() -> Self {
        Self {
            exists: false,
            file_okay: true,
            dir_okay: false,
            writable: false,
            readable: true,
            resolve_path: false,
        }
    }
}

impl PathRules {
    fn kind(&self) -> &'static str {
        match (self.file_okay, self.dir_okay) {
            (true, false) => "File",
            (false, true) => "Directory",
            _ => "Path",
        }
    }

    /// Validate `path` for the option named `option`, returning the path to use.
    ///
    /// A path that does not exist is accepted unchanged unless `exists` is set.
    pub fn check(&self, option: &str, path: &Path) -> Result<PathBuf, clap::Error> {
        let path = if self.resolve_path {
            resolve(path)
        } else {
            path.to_path_buf()
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(_) if !self.exists => return Ok(path),
            Err(_) => return Err(self.invalid(option, &path, "does not exist")),
        };

        if !self.file_okay && metadata.is_file() {
            return Err(self.invalid(option, &path, "is a file"));
        }
        if !self.dir_okay && metadata.is_dir() {
            return Err(self.invalid(option, &path, "is a directory"));
        }
        if self.readable && !is_readable(&path, metadata.is_dir()) {
            return Err(self.invalid(option, &path, "is not readable"));
        }
        if self.writable && metadata.permissions().readonly() {
            return Err(self.invalid(option, &path, "is not writable"));
        }

        Ok(path)
    }

    fn invalid(&self, option: &str, path: &Path, reason: &str) -> clap::Error {
        clap::Error::raw(
            ErrorKind::ValueValidation,
            format!(
                "invalid value for '{}': {} '{}' {}.\n",
                option,
                self.kind(),
                path.display(),
                reason
            ),
        )
    }
}

fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn is_readable(path: &Path, is_dir: bool) -> bool {
    if is_dir {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}

/// Whether `arg` can hold more than one value
pub fn accepts_many(arg: &Arg) -> bool {
    matches!(arg.get_action(), ArgAction::Append)
        || arg.get_num_args().map(|range| range.max_values() > 1).unwrap_or(false)
}

/// Check `values` against the value parser of `arg`.
///
/// Values are run through a throwaway command carrying the same parser, so
/// possible-value lists and typed parsers reject them exactly as they would
/// reject the same text on the command line. `arg` must come from a built
/// command so that parsers implied by its action are in place.
pub fn check_default_values(arg: &Arg, values: &[String]) -> Result<(), String> {
    if values.len() > 1 && !accepts_many(arg) {
        return Err(format!("expected a single value but got {}", values.len()));
    }

    let value_arg = Arg::new("value")
        .long("value")
        .action(ArgAction::Append)
        .num_args(1)
        .allow_hyphen_values(true)
        .value_parser(arg.get_value_parser().clone());
    let cmd = Command::new("config")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(value_arg);

    for value in values {
        if let Err(e) = cmd.clone().try_get_matches_from([format!("--value={}", value)]) {
            let reason = std::error::Error::source(&e)
                .map(|source| format!(": {}", source))
                .unwrap_or_default();
            return Err(format!("invalid value '{}'{}", value, reason));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::value_parser;

    #[test]
    fn test_missing_path_allowed_by_default() {
        let rules = PathRules::default();
        let path = Path::new("/definitely/not/here/config");
        assert_eq!(rules.check("--config", path).unwrap(), path);
    }

    #[test]
    fn test_missing_path_rejected_when_required() {
        let rules = PathRules {
            exists: true,
            ..PathRules::default()
        };
        let err = rules.check("--config", Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = PathRules::default().check("--config", dir.path()).unwrap_err();
        assert!(err.to_string().contains("is a directory"));

        let rules = PathRules {
            dir_okay: true,
            ..PathRules::default()
        };
        assert!(rules.check("--config", dir.path()).is_ok());
    }

    #[test]
    fn test_resolve_path() {
        let rules = PathRules {
            resolve_path: true,
            ..PathRules::default()
        };
        let resolved = rules.check("--config", Path::new("relative.cfg")).unwrap();
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_resolve_path_with_exists() {
        let rules = PathRules {
            exists: true,
            resolve_path: true,
            ..PathRules::default()
        };
        let err = rules.check("--config", Path::new("no-such-config.cfg")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("does not exist"), "{}", message);
        let expected = std::env::current_dir().unwrap().join("no-such-config.cfg");
        assert!(message.contains(&expected.display().to_string()), "{}", message);

        // Tests run from the package root.
        let resolved = rules.check("--config", Path::new("Cargo.toml")).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize("Cargo.toml").unwrap());
    }

    #[test]
    fn test_read_only_file_rejected_when_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "count = 1\n").unwrap();
        let rules = PathRules {
            writable: true,
            ..PathRules::default()
        };
        assert!(rules.check("--config", &path).is_ok());

        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let err = rules.check("--config", &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("is not writable"));
        assert!(PathRules::default().check("--config", &path).is_ok());
    }

    #[test]
    fn test_check_default_values() {
        let count = Arg::new("count").long("count").value_parser(value_parser!(u32));
        assert!(check_default_values(&count, &["5".to_string()]).is_ok());

        let err = check_default_values(&count, &["five".to_string()]).unwrap_err();
        assert!(err.contains("invalid value 'five'"), "{}", err);

        let err = check_default_values(&count, &["1".to_string(), "2".to_string()]).unwrap_err();
        assert!(err.contains("single value"));

        let many = Arg::new("names").long("name").action(ArgAction::Append);
        assert!(check_default_values(&many, &["a".to_string(), "b".to_string()]).is_ok());
    }

    #[test]
    fn test_check_possible_values() {
        let level = Arg::new("level")
            .long("level")
            .value_parser(["low", "high"]);
        assert!(check_default_values(&level, &["low".to_string()]).is_ok());
        assert!(check_default_values(&level, &["medium".to_string()]).is_err());
    }
}
