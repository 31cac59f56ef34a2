use anyhow::Context;
use kickstart_core::{
    cleanup::{self, CleanupReport},
    config::Config,
    env_file::{self, EnvOutcome},
    manifest::{self, ManifestOutcome},
    paths,
    provision::{self, ProvisionOutcome, SetupRunner},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub skip_provision: bool,
    pub keep_self: bool,
    /// Suppress status lines (used for `--json`).
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Done(CleanupReport),
    Skipped,
}

/// What each step did, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub project_name: String,
    pub root: PathBuf,
    pub env: EnvOutcome,
    pub manifest: ManifestOutcome,
    pub provision: ProvisionOutcome,
    pub cleanup: CleanupOutcome,
}

/// `kickstart` — one-shot setup of a freshly instantiated template.
///
/// Seeds `.env`, renames the project in `pyproject.toml`, provisions the
/// environment through the dependency manager, then deletes the bootstrapper's
/// own files. Expected absences are reported and skipped; any other I/O error
/// stops the sequence where it happened.
pub fn run(root: &Path, runner: &mut dyn SetupRunner, opts: Options) -> anyhow::Result<Report> {
    let say = |line: String| {
        if !opts.quiet {
            println!("{line}");
        }
    };
    let rel = |p: &Path| p.strip_prefix(root).unwrap_or(p).display().to_string();

    let config = Config::load(root).context("failed to load bootstrap config")?;
    let project_name = paths::project_name(root)?;
    tracing::debug!(stage = "start", root = %root.display(), %project_name);

    say(format!("Bootstrapping '{project_name}' in: {}", root.display()));

    // 1. Seed .env from the checked-in example
    let env_path = config.env_file_path(root);
    let example_path = config.env_example_path(root);
    let env = env_file::seed(&env_path, &example_path)
        .with_context(|| format!("failed to seed {}", env_path.display()))?;
    match env {
        EnvOutcome::Created => say(format!(
            "  created: {} (from {})",
            rel(&env_path),
            rel(&example_path)
        )),
        EnvOutcome::Exists => say(format!("  exists:  {}", rel(&env_path))),
        EnvOutcome::NoExample => say(format!(
            "  skipped: {} ({} not found)",
            rel(&env_path),
            rel(&example_path)
        )),
    }
    tracing::debug!(stage = "env_seeded", ?env);

    // 2. Point the manifest at the new project name
    let manifest_path = config.manifest_path(root);
    let manifest = manifest::rewrite(&manifest_path, &project_name)
        .with_context(|| format!("failed to rewrite {}", manifest_path.display()))?;
    match &manifest {
        ManifestOutcome::Renamed { from } => say(format!(
            "  renamed: {} (\"{from}\" → \"{project_name}\")",
            rel(&manifest_path)
        )),
        ManifestOutcome::Unchanged => say(format!(
            "  exists:  {} (already named \"{project_name}\")",
            rel(&manifest_path)
        )),
        ManifestOutcome::NoNameField => say(format!(
            "  skipped: {} (no name field)",
            rel(&manifest_path)
        )),
        ManifestOutcome::Missing => say(format!(
            "  skipped: {} (not found)",
            rel(&manifest_path)
        )),
    }
    tracing::debug!(stage = "manifest_rewritten", ?manifest);

    // 3. Create the environment and install dependencies
    let program = &config.provision.program;
    let provision = if opts.skip_provision {
        say(format!("  skipped: {program} (provisioning disabled)"));
        ProvisionOutcome::Skipped
    } else {
        say(format!("\nProvisioning environment with {program}:"));
        let outcome = provision::provision(runner, root, &config.provision);
        report_provision(&outcome, &say);
        outcome
    };
    tracing::debug!(stage = "deps_provisioned");

    // 4. Remove the bootstrapper itself
    let cleanup = if opts.keep_self {
        say("  kept:    bootstrapper files".to_string());
        CleanupOutcome::Skipped
    } else {
        let mut targets = config.cleanup_paths(root);
        if let Some(exe) = cleanup::current_exe_in(root) {
            if !targets.contains(&exe) {
                targets.push(exe);
            }
        }
        let report = cleanup::remove_all(&targets);
        for p in &report.removed {
            say(format!("  removed: {}", rel(p)));
        }
        CleanupOutcome::Done(report)
    };
    tracing::debug!(stage = "self_deleted");

    say(format!("\n'{project_name}' is ready."));

    Ok(Report {
        project_name,
        root: root.to_path_buf(),
        env,
        manifest,
        provision,
        cleanup,
    })
}

fn report_provision(outcome: &ProvisionOutcome, say: &impl Fn(String)) {
    match outcome {
        ProvisionOutcome::Ran { program, steps } => {
            for step in steps {
                let cmd = format!("{program} {}", step.args.join(" "));
                if step.succeeded() {
                    say(format!("  ok:      {cmd}"));
                } else if let Some(err) = &step.error {
                    say(format!("  failed:  {cmd} ({err})"));
                } else if let Some(code) = step.exit_code {
                    say(format!("  failed:  {cmd} (exit {code})"));
                } else {
                    say(format!("  failed:  {cmd} (terminated)"));
                }
            }
        }
        ProvisionOutcome::NotFound { program } => {
            say(format!("  skipped: {program} not found on PATH"));
        }
        ProvisionOutcome::Skipped => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PYPROJECT: &str = "[project]\nname = \"old-name\"\nversion = \"0.1.0\"\n\n# deps\ndependencies = []\n";

    /// Records each call together with what the project looked like at that
    /// moment, so ordering between steps can be checked.
    #[derive(Default)]
    struct FakeRunner {
        calls: Vec<Vec<String>>,
        env_present: Vec<bool>,
        manifest_at_call: Vec<String>,
        scripts_present: Vec<bool>,
    }

    impl SetupRunner for FakeRunner {
        fn available(&self, _program: &str) -> bool {
            true
        }

        fn run(&mut self, root: &Path, _program: &str, args: &[String]) -> std::io::Result<Option<i32>> {
            self.calls.push(args.to_vec());
            self.env_present.push(root.join(".env").exists());
            self.manifest_at_call
                .push(std::fs::read_to_string(root.join("pyproject.toml")).unwrap_or_default());
            self.scripts_present.push(root.join("setup.sh").exists());
            Ok(Some(0))
        }
    }

    fn quiet() -> Options {
        Options {
            quiet: true,
            ..Options::default()
        }
    }

    fn template(dir: &TempDir, name: &str) -> PathBuf {
        let root = dir.path().join(name);
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join(".env.example"), "KEY=1").unwrap();
        std::fs::write(root.join("pyproject.toml"), PYPROJECT).unwrap();
        std::fs::write(root.join("setup.sh"), "#!/bin/sh\nkickstart\n").unwrap();
        std::fs::write(root.join("setup.ps1"), "kickstart\r\n").unwrap();
        root
    }

    #[test]
    fn full_run_in_my_app() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "my-app");
        let mut runner = FakeRunner::default();

        let report = run(&root, &mut runner, quiet()).unwrap();

        assert_eq!(report.project_name, "my-app");
        assert_eq!(std::fs::read_to_string(root.join(".env")).unwrap(), "KEY=1");
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            PYPROJECT.replace("old-name", "my-app")
        );
        assert!(!root.join("setup.sh").exists());
        assert!(!root.join("setup.ps1").exists());
        assert_eq!(report.env, EnvOutcome::Created);
        assert_eq!(
            report.manifest,
            ManifestOutcome::Renamed {
                from: "old-name".into()
            }
        );
        assert_eq!(runner.calls, vec![vec!["venv"], vec!["sync"]]);
    }

    #[test]
    fn steps_run_in_order() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "ordered");
        let mut runner = FakeRunner::default();

        run(&root, &mut runner, quiet()).unwrap();

        assert_eq!(runner.env_present, vec![true, true]);
        assert!(runner
            .manifest_at_call
            .iter()
            .all(|m| m.contains("name = \"ordered\"")));
        assert_eq!(runner.scripts_present, vec![true, true]);
    }

    #[test]
    fn second_run_keeps_env() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "twice");
        run(&root, &mut FakeRunner::default(), quiet()).unwrap();
        std::fs::write(root.join(".env"), "KEY=edited").unwrap();
        std::fs::write(root.join(".env.example"), "KEY=2").unwrap();

        let report = run(&root, &mut FakeRunner::default(), quiet()).unwrap();

        assert_eq!(report.env, EnvOutcome::Exists);
        assert_eq!(report.manifest, ManifestOutcome::Unchanged);
        assert_eq!(
            std::fs::read_to_string(root.join(".env")).unwrap(),
            "KEY=edited"
        );
        let CleanupOutcome::Done(cleanup) = report.cleanup else {
            panic!("expected cleanup to run");
        };
        assert!(cleanup.removed.is_empty());
        assert!(cleanup.failed.is_empty());
    }

    #[test]
    fn missing_inputs_are_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("bare");
        std::fs::create_dir(&root).unwrap();
        let mut runner = FakeRunner::default();

        let report = run(&root, &mut runner, quiet()).unwrap();

        assert_eq!(report.env, EnvOutcome::NoExample);
        assert_eq!(report.manifest, ManifestOutcome::Missing);
        assert!(!root.join(".env").exists());
        assert_eq!(runner.calls.len(), 2);
    }

    #[test]
    fn flags_skip_provision_and_cleanup() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "flags");
        let mut runner = FakeRunner::default();
        let opts = Options {
            skip_provision: true,
            keep_self: true,
            quiet: true,
        };

        let report = run(&root, &mut runner, opts).unwrap();

        assert!(runner.calls.is_empty());
        assert_eq!(report.provision, ProvisionOutcome::Skipped);
        assert_eq!(report.cleanup, CleanupOutcome::Skipped);
        assert!(root.join("setup.sh").exists());
    }

    #[test]
    fn config_file_is_honored_and_removed() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "custom");
        std::fs::write(root.join("secrets.sample"), "TOKEN=x").unwrap();
        std::fs::write(
            root.join(".kickstart.yaml"),
            "env_example: secrets.sample\nprovision:\n  program: pdm\n  steps:\n    - [install]\ncleanup: [setup.sh]\n",
        )
        .unwrap();
        let mut runner = FakeRunner::default();

        let report = run(&root, &mut runner, quiet()).unwrap();

        assert_eq!(std::fs::read_to_string(root.join(".env")).unwrap(), "TOKEN=x");
        assert_eq!(runner.calls, vec![vec!["install"]]);
        assert!(!root.join(".kickstart.yaml").exists());
        assert!(!root.join("setup.sh").exists());
        assert!(root.join("setup.ps1").exists());
        let ProvisionOutcome::Ran { program, .. } = report.provision else {
            panic!("expected provisioning to run");
        };
        assert_eq!(program, "pdm");
    }

    #[test]
    fn unexpected_error_halts_remaining_steps() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("broken");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(root.join(".env.example")).unwrap();
        std::fs::write(root.join("pyproject.toml"), PYPROJECT).unwrap();
        std::fs::write(root.join("setup.sh"), "").unwrap();
        let mut runner = FakeRunner::default();

        let err = run(&root, &mut runner, quiet()).unwrap_err();

        assert!(format!("{err:#}").contains("failed to seed"));
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            PYPROJECT
        );
        assert!(runner.calls.is_empty());
        assert!(root.join("setup.sh").exists());
    }

    #[test]
    fn malformed_config_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "badcfg");
        std::fs::write(root.join(".kickstart.yaml"), "provision: [nope\n").unwrap();

        assert!(run(&root, &mut FakeRunner::default(), quiet()).is_err());
        assert!(!root.join(".env").exists());
        assert!(root.join("setup.sh").exists());
    }

    #[test]
    fn report_serializes_with_status_tags() {
        let dir = TempDir::new().unwrap();
        let root = template(&dir, "json");
        let report = run(&root, &mut FakeRunner::default(), quiet()).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["project_name"], "json");
        assert_eq!(value["env"], "created");
        assert_eq!(value["manifest"]["status"], "renamed");
        assert_eq!(value["manifest"]["from"], "old-name");
        assert_eq!(value["provision"]["status"], "ran");
        assert_eq!(value["provision"]["steps"][1]["args"][0], "sync");
        assert_eq!(value["cleanup"]["status"], "done");
    }
}
