use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::process::Command;
use tracing::{debug, trace};

use crate::{
    resolve::ModuleProbe,
    settings::Settings,
    system::{Completion, wait_interruptible},
    util::path::simplify_path,
};

use super::{
    Toolchain,
    build::{BuiltTool, package_dir, reserve_output_path},
    download::{DownloadError, DownloadedModule, parse_download_output},
    result::{ToolchainError, ToolchainResult},
};

const GO_BINARY_NAME: &str = "go";

/**
    The locally installed Go toolchain.

    Can be cheaply cloned while still referring to the same binary.
*/
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go: Arc<Path>,
}

impl GoToolchain {
    /**
        Creates a toolchain that uses the given `go` binary.
    */
    #[must_use]
    pub fn new(go: impl Into<PathBuf>) -> Self {
        Self {
            go: go.into().into(),
        }
    }

    /**
        Finds the `go` binary to use.

        Uses the binary from the given settings if one was
        configured, and otherwise searches the `PATH`.

        # Errors

        - If no binary was configured and none was found in the `PATH`.
    */
    pub fn locate(settings: &Settings) -> ToolchainResult<Self> {
        if let Some(go) = settings.go_binary() {
            debug!(?go, "using configured go binary");
            return Ok(Self::new(go));
        }
        let go = which::which(GO_BINARY_NAME)?;
        debug!(?go, "found go binary");
        Ok(Self::new(simplify_path(go)))
    }

    #[must_use]
    pub fn go_path(&self) -> &Path {
        &self.go
    }

    /**
        Downloads the module at exactly the given path and version
        into the module cache, using `go mod download -json`.

        # Errors

        - If `go` could not be started.
        - If there is no module at the given path and version.
    */
    pub async fn download(
        &self,
        path: &str,
        version: &str,
    ) -> Result<DownloadedModule, DownloadError> {
        let coordinate = format!("{path}@{version}");
        trace!(%coordinate, "running go mod download");

        let output = Command::new(self.go_path())
            .args(["mod", "download", "-json"])
            .arg(&coordinate)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(DownloadError::Spawn)?;

        let module = parse_download_output(
            &coordinate,
            output.status.success(),
            &output.stdout,
            &output.stderr,
        )?;
        debug!(
            path = module.path(),
            version = module.version(),
            sum = module.sum().unwrap_or_default(),
            "downloaded module"
        );
        Ok(module)
    }
}

impl ModuleProbe for GoToolchain {
    type Module = DownloadedModule;
    type Error = DownloadError;

    async fn probe(&self, path: &str, version: &str) -> Result<DownloadedModule, DownloadError> {
        self.download(path, version).await
    }
}

impl Toolchain for GoToolchain {
    async fn package_dir(&self, module: &DownloadedModule, tail: &str) -> ToolchainResult<PathBuf> {
        let module_dir = module
            .dir()
            .ok_or_else(|| ToolchainError::MissingModuleDir(module.path().to_string()))?;
        package_dir(&simplify_path(module_dir), tail).await
    }

    /**
        Builds the package with `go build`, into a temporary file.

        Build output is forwarded to the current stdout and stderr.
        The build is killed if we receive a signal while it runs,
        which is reported as [`ToolchainError::BuildInterrupted`].
    */
    async fn build(&self, package_dir: &Path) -> ToolchainResult<BuiltTool> {
        let output = reserve_output_path(package_dir)?;
        debug!(?package_dir, ?output, "running go build");

        let mut command = Command::new(self.go_path());
        command
            .args(["build", "-v", "-o"])
            .arg(&*output)
            .current_dir(package_dir);

        // NOTE: Returning an error drops the output path, which removes
        // anything a failed or interrupted build left behind
        match wait_interruptible(command).await? {
            Completion::Exited(status) if status.success() => {
                Ok(BuiltTool::from_temp_path(output))
            }
            Completion::Exited(status) => Err(ToolchainError::BuildFailure {
                dir: package_dir.to_path_buf(),
                status,
            }),
            Completion::Interrupted(code) => Err(ToolchainError::BuildInterrupted {
                dir: package_dir.to_path_buf(),
                code,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_prefers_configured_binary() {
        let settings = Settings::default().with_go_binary("/opt/go/bin/go");
        let toolchain = GoToolchain::locate(&settings).unwrap();
        assert_eq!(toolchain.go_path(), Path::new("/opt/go/bin/go"));
    }

    #[tokio::test]
    async fn missing_go_binary_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = GoToolchain::new(dir.path().join("no-such-go"));
        let err = toolchain
            .download("example.com/a", "latest")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Spawn(_)));
    }

    #[tokio::test]
    async fn package_dir_requires_module_dir() {
        let toolchain = GoToolchain::new("go");
        let module = DownloadedModule {
            path: "example.com/a".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            toolchain.package_dir(&module, "").await,
            Err(ToolchainError::MissingModuleDir(_))
        ));
    }

    #[cfg(unix)]
    mod fake_go {
        use std::{fs, os::unix::fs::PermissionsExt};

        use tempfile::TempDir;

        use crate::system::{EXIT_CODE_GOT_SIGNAL, lock_signal_listeners};

        use super::*;

        /**
            A directory with a `go` shell script running the given body,
            after recording its arguments and working directory.
        */
        struct FakeGo {
            dir: TempDir,
        }

        impl FakeGo {
            fn new(body: &str) -> Self {
                let dir = tempfile::tempdir().unwrap();
                let script = format!(
                    "#!/bin/sh\n\
                    pwd -P > \"{root}/cwd\"\n\
                    echo \"$@\" > \"{root}/args\"\n\
                    {body}\n",
                    root = dir.path().display(),
                );
                let go = dir.path().join("go");
                fs::write(&go, script).unwrap();
                fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();
                Self { dir }
            }

            fn toolchain(&self) -> GoToolchain {
                GoToolchain::new(self.dir.path().join("go"))
            }

            fn package(&self) -> PathBuf {
                let package = self.dir.path().join("pkg");
                fs::create_dir_all(&package).unwrap();
                package
            }

            fn args(&self) -> String {
                fs::read_to_string(self.dir.path().join("args"))
                    .unwrap()
                    .trim()
                    .to_string()
            }

            fn cwd(&self) -> PathBuf {
                PathBuf::from(
                    fs::read_to_string(self.dir.path().join("cwd"))
                        .unwrap()
                        .trim(),
                )
            }
        }

        #[tokio::test]
        async fn build_writes_binary_to_temp_output() {
            let _guard = lock_signal_listeners().await;
            let go = FakeGo::new(r#"printf tool > "$4""#);
            let package = go.package();

            let tool = go.toolchain().build(&package).await.unwrap();
            let path = tool.path().to_path_buf();
            assert_eq!(fs::read_to_string(&path).unwrap(), "tool");
            assert_eq!(go.args(), format!("build -v -o {}", path.display()));
            assert_eq!(go.cwd(), fs::canonicalize(&package).unwrap());

            tool.remove().unwrap();
            assert!(!path.exists());
        }

        #[tokio::test]
        async fn failed_build_is_reported_and_cleaned_up() {
            let _guard = lock_signal_listeners().await;
            let go = FakeGo::new(r#"printf partial > "$4"; exit 2"#);
            let package = go.package();

            let err = go.toolchain().build(&package).await.unwrap_err();
            let ToolchainError::BuildFailure { dir, status } = err else {
                panic!("expected a build failure");
            };
            assert_eq!(dir, package);
            assert_eq!(status.code(), Some(2));

            let output = go.args().rsplit(' ').next().unwrap().to_string();
            assert!(output.ends_with(std::env::consts::EXE_SUFFIX));
            assert!(!Path::new(&output).exists());
        }

        #[tokio::test]
        async fn interrupted_build_is_reported_and_cleaned_up() {
            let _guard = lock_signal_listeners().await;
            let go = FakeGo::new(r#"printf partial > "$4"; kill -TERM $PPID; sleep 5"#);
            let package = go.package();

            let err = go.toolchain().build(&package).await.unwrap_err();
            assert!(matches!(
                err,
                ToolchainError::BuildInterrupted { code, .. } if code == EXIT_CODE_GOT_SIGNAL + 15
            ));

            let output = go.args().rsplit(' ').next().unwrap().to_string();
            assert!(!Path::new(&output).exists());
        }

        #[tokio::test]
        async fn download_reports_json_error() {
            let go = FakeGo::new(
                r#"echo '{"Path": "example.com/a", "Error": "module example.com/a: not found"}'; exit 1"#,
            );

            let err = go
                .toolchain()
                .download("example.com/a", "latest")
                .await
                .unwrap_err();
            assert_eq!(go.args(), "mod download -json example.com/a@latest");
            assert!(matches!(
                err,
                DownloadError::NotFound { ref coordinate, ref message }
                    if coordinate == "example.com/a@latest"
                        && message == "module example.com/a: not found"
            ));
        }

        #[tokio::test]
        async fn download_decodes_module() {
            let go = FakeGo::new(
                r#"echo '{"Path": "example.com/a", "Version": "v1.0.0", "Dir": "/mod/example.com/a@v1.0.0", "Sum": "h1:abc="}'"#,
            );

            let module = go
                .toolchain()
                .download("example.com/a", "latest")
                .await
                .unwrap();
            assert_eq!(module.version(), "v1.0.0");
            assert_eq!(module.dir(), Some(Path::new("/mod/example.com/a@v1.0.0")));
            assert_eq!(module.sum(), Some("h1:abc="));
        }
    }
}
