//! Git materialization, shelled out to the system `git` binary via the
//! Process Spawner — never a vendored git implementation (§4.5).

use cforge_errors::{Error, ResolverError};
use cforge_process::{ProcessSpawn, Spawn};
use cforge_types::manifest::GitRef;
use std::path::Path;

async fn run_git(
    spawner: &dyn ProcessSpawn,
    name: &str,
    args: Vec<String>,
    cwd: Option<&Path>,
) -> Result<cforge_process::ProcessOutput, Error> {
    let mut spawn = Spawn::new("git").args(args);
    if let Some(cwd) = cwd {
        spawn = spawn.cwd(cwd);
    }
    let out = cforge_process::run(spawner, spawn).await?;
    if !out.success() {
        return Err(ResolverError::FetchFailed {
            name: name.to_string(),
            message: out.combined_output(),
        }
        .into());
    }
    Ok(out)
}

/// Clone `url` into `dest`, optionally shallow (`--depth 1`).
///
/// Clones into a sibling temporary directory first and renames it into
/// `dest` only once `git clone` has succeeded, so a failed or interrupted
/// clone never leaves a partial materialization at `dest` (§4.5).
pub async fn clone(
    spawner: &dyn ProcessSpawn,
    name: &str,
    url: &str,
    dest: &Path,
    shallow: bool,
) -> Result<(), Error> {
    let parent = dest.parent().ok_or_else(|| ResolverError::FetchFailed {
        name: name.to_string(),
        message: format!("invalid destination path: {}", dest.display()),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| ResolverError::FetchFailed {
        name: name.to_string(),
        message: format!("failed to create dependencies directory: {e}"),
    })?;
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{name}-clone-"))
        .tempdir_in(parent)
        .map_err(|e| ResolverError::FetchFailed {
            name: name.to_string(),
            message: format!("failed to create staging directory: {e}"),
        })?;
    // `git clone` refuses to clone into a directory that already exists
    // and is non-empty; the tempdir itself is empty, so point git at a
    // path inside it rather than the tempdir's own path.
    let staging_dest = staging.path().join("checkout");

    let mut args = vec!["clone".to_string()];
    if shallow {
        args.push("--depth".to_string());
        args.push("1".to_string());
    }
    args.push(url.to_string());
    args.push(staging_dest.display().to_string());
    run_git(spawner, name, args, None).await?;

    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|e| ResolverError::FetchFailed {
            name: name.to_string(),
            message: format!("failed to remove stale materialization: {e}"),
        })?;
    }
    std::fs::rename(&staging_dest, dest).map_err(|e| ResolverError::FetchFailed {
        name: name.to_string(),
        message: format!("failed to finalize materialization: {e}"),
    })?;
    Ok(())
}

/// Fetch all tags into an existing clone.
pub async fn fetch_tags(spawner: &dyn ProcessSpawn, name: &str, dest: &Path) -> Result<(), Error> {
    run_git(
        spawner,
        name,
        vec!["fetch".to_string(), "--tags".to_string()],
        Some(dest),
    )
    .await?;
    Ok(())
}

/// Check out the resolved ref (commit, tag, or branch) inside `dest`.
pub async fn checkout(
    spawner: &dyn ProcessSpawn,
    name: &str,
    dest: &Path,
    git_ref: &GitRef,
) -> Result<(), Error> {
    let target = match git_ref {
        GitRef::Commit(c) => c.clone(),
        GitRef::Tag(t) => t.clone(),
        GitRef::Branch(b) => b.clone(),
    };
    run_git(
        spawner,
        name,
        vec!["checkout".to_string(), target],
        Some(dest),
    )
    .await?;
    Ok(())
}

/// Resolve the checked-out commit SHA.
pub async fn rev_parse_head(
    spawner: &dyn ProcessSpawn,
    name: &str,
    dest: &Path,
) -> Result<String, Error> {
    let out = run_git(
        spawner,
        name,
        vec!["rev-parse".to_string(), "HEAD".to_string()],
        Some(dest),
    )
    .await?;
    Ok(out.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforge_process::Spawner;

    async fn make_source_repo(dir: &Path) {
        let spawner = Spawner;
        run_git(&spawner, "src", vec!["init".to_string()], Some(dir))
            .await
            .unwrap();
        run_git(
            &spawner,
            "src",
            vec!["config".to_string(), "user.email".to_string(), "t@example.com".to_string()],
            Some(dir),
        )
        .await
        .unwrap();
        run_git(
            &spawner,
            "src",
            vec!["config".to_string(), "user.name".to_string(), "t".to_string()],
            Some(dir),
        )
        .await
        .unwrap();
        std::fs::write(dir.join("a.txt"), "hello").unwrap();
        run_git(&spawner, "src", vec!["add".to_string(), ".".to_string()], Some(dir))
            .await
            .unwrap();
        run_git(
            &spawner,
            "src",
            vec!["commit".to_string(), "-m".to_string(), "init".to_string()],
            Some(dir),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn clone_populates_dest_and_no_staging_directory_is_left_behind() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        make_source_repo(&src).await;

        let spawner = Spawner;
        let dest = root.path().join("deps").join("fmt");
        clone(&spawner, "fmt", &src.display().to_string(), &dest, false)
            .await
            .unwrap();

        assert!(dest.join(".git").exists());
        assert!(dest.join("a.txt").exists());
        let leftovers: Vec<_> = std::fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains("-clone-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn failed_clone_leaves_no_partial_directory_at_dest() {
        let root = tempfile::tempdir().unwrap();
        let spawner = Spawner;
        let dest = root.path().join("deps").join("fmt");
        let err = clone(
            &spawner,
            "fmt",
            "/nonexistent/does-not-exist.git",
            &dest,
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolver(ResolverError::FetchFailed { .. })
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn reclone_replaces_stale_materialization_atomically() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        make_source_repo(&src).await;

        let spawner = Spawner;
        let dest = root.path().join("deps").join("fmt");
        clone(&spawner, "fmt", &src.display().to_string(), &dest, false)
            .await
            .unwrap();
        let first_sha = rev_parse_head(&spawner, "fmt", &dest).await.unwrap();

        // A second clone over an existing materialization (e.g. a retried
        // resolve) replaces it cleanly rather than erroring or merging.
        clone(&spawner, "fmt", &src.display().to_string(), &dest, false)
            .await
            .unwrap();
        let second_sha = rev_parse_head(&spawner, "fmt", &dest).await.unwrap();
        assert_eq!(first_sha, second_sha);
    }
}
