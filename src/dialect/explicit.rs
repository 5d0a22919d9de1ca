use anyhow::anyhow;
use tracing::warn;

use crate::core::{FsBackend, Owner, Result, utils};
use crate::dialect::Dialect;
use crate::error::YamlDirsError;
use crate::tree::{Node, Scalar, lookup};

/// The attributed dialect: each node is a mapping that names itself.
///
/// ```yaml
/// - directory: bin
///   mode: 0o755
///   children:
///     - file: run.sh
///       content: "#!/bin/sh"
///       mode: 0o755
///       user: root
///       group: wheel
/// ```
///
/// A node must carry `directory` or `file` (`directory` wins when both are
/// present). `content` applies to files, `children` to directories. `mode`,
/// `user` and `group` are applied once the entry and its children exist;
/// when the process isn't allowed to apply them a warning is logged and the
/// walk goes on. Other keys are ignored.
#[derive(Debug, Copy, Clone, Default)]
pub struct Explicit;

impl Dialect for Explicit {
    fn make_mapping(&self, fs: &mut dyn FsBackend, entries: &[(Node, Node)]) -> Result<()> {
        // an empty value (`content:`, `children:`) counts as absent
        let attr = |key: &str| lookup(entries, key).filter(|v| !v.is_null());

        let name = if let Some(directory) = attr("directory") {
            let name = directory.to_text()?;
            fs.mkdir(&name)?;
            if let Some(children) = attr("children") {
                fs.pushd(&name)?;
                self.make_item(fs, children)?;
                fs.popd()?;
            }
            name
        } else if let Some(file) = attr("file") {
            let name = file.to_text()?;
            let content = match attr("content") {
                Some(content) => content.to_text()?,
                None => String::new(),
            };
            fs.mkfile(&name, &content)?;
            name
        } else {
            return Err(YamlDirsError::unknown_type(
                Node::Mapping(entries.to_vec()).to_string(),
                "mapping without `file` or `directory` key",
            )
            .into());
        };

        for (key, value) in entries {
            match key.as_str() {
                Some("mode") => {
                    let mode = parse_mode(value)?;
                    let result = fs.set_mode(&name, mode);
                    tolerate_denied(result, &name, "mode", &format!("{:o}", mode))?;
                }
                Some("user") => {
                    let user = parse_owner(value)?;
                    let result = fs.set_user(&name, &user);
                    tolerate_denied(result, &name, "user", &user.to_string())?;
                }
                Some("group") => {
                    let group = parse_owner(value)?;
                    let result = fs.set_group(&name, &group);
                    tolerate_denied(result, &name, "group", &group.to_string())?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Downgrades a permission failure to a warning.
fn tolerate_denied(result: Result<()>, name: &str, attribute: &str, value: &str) -> Result<()> {
    match result {
        Err(err) if utils::is_permission_denied(&err) => {
            warn!("Unable to set the {} {} to {}: {:#}", attribute, value, name, err);
            Ok(())
        }
        other => other,
    }
}

/// Accepts an integer (`0o644` in YAML) or octal digits in text (`"0644"`, `"0o644"`).
fn parse_mode(value: &Node) -> Result<u32> {
    match value {
        Node::Scalar(Scalar::Integer(n)) => {
            u32::try_from(*n).map_err(|_| anyhow!("invalid mode: {}", n))
        }
        Node::Scalar(Scalar::Text(text)) => {
            let digits = text.trim().trim_start_matches("0o");
            u32::from_str_radix(digits, 8).map_err(|_| anyhow!("invalid mode: {:?}", text))
        }
        other => Err(YamlDirsError::unknown_type(other.to_string(), other.type_name()).into()),
    }
}

/// Accepts a user/group name or a numeric id.
fn parse_owner(value: &Node) -> Result<Owner> {
    match value {
        Node::Scalar(Scalar::Text(name)) => Ok(Owner::Name(name.clone())),
        Node::Scalar(Scalar::Integer(id)) => u32::try_from(*id)
            .map(Owner::Id)
            .map_err(|_| anyhow!("invalid id: {}", id)),
        other => Err(YamlDirsError::unknown_type(other.to_string(), other.type_name()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DryRun, Op};
    use crate::dialect::{build_explicit, materialize};
    use tempdir::TempDir;
    use tracing_test::traced_test;

    fn dry_run(yaml: &str) -> Result<DryRun> {
        let tree = Node::from_yaml_str(yaml)?;
        let mut dry = DryRun::new();
        materialize(&mut dry, &Explicit, &tree)?;
        Ok(dry)
    }

    fn lines(dry: &DryRun) -> Vec<String> {
        dry.ops().iter().map(|op| op.to_string()).collect()
    }

    mod operations {
        use super::*;

        #[test]
        fn test_directory_with_children() -> Result<()> {
            let dry = dry_run(
                "
                directory: d
                children:
                  - file: f
                    content: x
                    mode: 0o644
                ",
            )?;
            assert_eq!(
                lines(&dry),
                ["mkdir d", "pushd d", r#"create file: f "x""#, "chmod 644 f", "popd"]
            );
            Ok(())
        }

        #[test]
        fn test_file_defaults_to_empty_content() -> Result<()> {
            let dry = dry_run("file: empty.txt")?;
            assert_eq!(lines(&dry), [r#"create file: empty.txt """#]);
            Ok(())
        }

        #[test]
        fn test_directory_without_children() -> Result<()> {
            let dry = dry_run("directory: lonely")?;
            assert_eq!(lines(&dry), ["mkdir lonely"]);
            Ok(())
        }

        #[test]
        fn test_metadata_applied_after_children() -> Result<()> {
            let dry = dry_run(
                "
                directory: ro
                mode: 0o555
                user: 1000
                group: staff
                children:
                  - file: inside
                ",
            )?;
            assert_eq!(
                dry.ops(),
                [
                    Op::Mkdir("ro".into()),
                    Op::Pushd("ro".into()),
                    Op::CreateFile {
                        name: "inside".into(),
                        content: "".into()
                    },
                    Op::Popd,
                    Op::SetMode {
                        name: "ro".into(),
                        mode: 0o555
                    },
                    Op::SetUser {
                        name: "ro".into(),
                        user: Owner::Id(1000)
                    },
                    Op::SetGroup {
                        name: "ro".into(),
                        group: Owner::Name("staff".into())
                    },
                ]
            );
            Ok(())
        }

        #[test]
        fn test_empty_children_is_absent() -> Result<()> {
            let dry = dry_run("directory: d\nchildren:")?;
            assert_eq!(lines(&dry), ["mkdir d"]);
            Ok(())
        }

        #[test]
        fn test_empty_content_is_absent() -> Result<()> {
            let dry = dry_run("file: f\ncontent:")?;
            assert_eq!(lines(&dry), [r#"create file: f """#]);
            Ok(())
        }

        #[test]
        fn test_children_ignored_on_file() -> Result<()> {
            let dry = dry_run(
                "
                file: f
                children:
                  - file: never
                ",
            )?;
            assert_eq!(lines(&dry), [r#"create file: f """#]);
            Ok(())
        }

        #[test]
        fn test_directory_wins_over_file() -> Result<()> {
            let dry = dry_run("directory: d\nfile: f")?;
            assert_eq!(lines(&dry), ["mkdir d"]);
            Ok(())
        }

        #[test]
        fn test_unknown_keys_ignored() -> Result<()> {
            let dry = dry_run("file: f\ncolour: blue\n42: answer")?;
            assert_eq!(lines(&dry), [r#"create file: f """#]);
            Ok(())
        }

        #[test]
        fn test_text_mode_is_octal() -> Result<()> {
            let dry = dry_run("file: f\nmode: '0o600'")?;
            assert_eq!(dry.ops()[1], Op::SetMode { name: "f".into(), mode: 0o600 });

            let dry = dry_run("file: f\nmode: '0640'")?;
            assert_eq!(dry.ops()[1], Op::SetMode { name: "f".into(), mode: 0o640 });
            Ok(())
        }

        #[test]
        fn test_invalid_mode() {
            let err = dry_run("file: f\nmode: rwx").unwrap_err();
            assert!(err.to_string().contains("invalid mode"));
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn test_missing_discriminator_is_unknown_type() {
            let err = dry_run("name: f\ncontent: x").unwrap_err();
            match err.downcast_ref::<YamlDirsError>() {
                Some(YamlDirsError::UnknownType { type_name, .. }) => {
                    assert!(type_name.contains("`file` or `directory`"));
                }
                None => panic!("unexpected error: {err}"),
            }
        }

        #[test]
        fn test_nested_missing_discriminator() {
            let err = dry_run("directory: d\nchildren:\n  - oops: 1").unwrap_err();
            assert!(err.downcast_ref::<YamlDirsError>().is_some());
        }

        #[test]
        fn test_bool_content_is_unknown_type() {
            let err = dry_run("file: f\ncontent: true").unwrap_err();
            assert!(err.downcast_ref::<YamlDirsError>().is_some());
        }

        #[test]
        #[traced_test]
        fn test_denied_metadata_is_a_warning() {
            let tree = Node::from_yaml_str(
                "
                directory: d
                children:
                  - file: f
                    content: x
                    mode: 0o644
                    user: root
                    group: 0
                ",
            )
            .unwrap();
            let mut dry = DryRun::new().deny_metadata(true);

            materialize(&mut dry, &Explicit, &tree).unwrap();

            assert_eq!(
                lines(&dry),
                ["mkdir d", "pushd d", r#"create file: f "x""#, "popd"]
            );
            assert!(logs_contain("Unable to set the mode 644 to f"));
            assert!(logs_contain("Unable to set the user root to f"));
            assert!(logs_contain("Unable to set the group 0 to f"));
        }

        #[test]
        fn test_other_metadata_errors_propagate() {
            let err = tolerate_denied(Err(anyhow!("no such user: ghost")), "f", "user", "ghost");
            assert!(err.is_err());
        }
    }

    mod host {
        use super::*;

        #[test]
        fn test_build_explicit_tree() -> Result<()> {
            let temp_dir = TempDir::new("explicit_test")?;
            let tree = Node::from_yaml_str(
                "
                directory: d
                children:
                  - file: f
                    content: x
                    mode: 0o644
                  - directory: empty
                ",
            )?;

            let fs = build_explicit(temp_dir.path(), &tree)?;

            let root = temp_dir.path();
            assert_eq!(fs.depth(), 0);
            assert!(root.join("d").is_dir());
            assert_eq!(std::fs::read_to_string(root.join("d/f"))?, "x");
            assert!(root.join("d/empty").is_dir());
            Ok(())
        }

        #[cfg(unix)]
        #[test]
        fn test_mode_applied_on_host() -> Result<()> {
            use std::os::unix::fs::PermissionsExt;

            let temp_dir = TempDir::new("explicit_test")?;
            let tree = Node::from_yaml_str("file: secret\ncontent: s3cr3t\nmode: 0o600")?;

            build_explicit(temp_dir.path(), &tree)?;

            let mode = std::fs::metadata(temp_dir.path().join("secret"))?
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);
            Ok(())
        }
    }
}
