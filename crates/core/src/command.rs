use anyhow::Result;
use std::path::Path;

/// Execute a task command in the given directory with extra environment
/// variables.
pub async fn run_task_command<'a, I>(command: &str, working_dir: &Path, envs: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = tokio::process::Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = tokio::process::Command::new("sh");
        c.arg("-c").arg(command);
        c
    };
    cmd.current_dir(working_dir).envs(envs);
    let output = cmd.output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(code) => anyhow::bail!("`{command}` exited with {code}: {}", stderr.trim()),
            None => anyhow::bail!("`{command}` was terminated: {}", stderr.trim()),
        }
    }
    Ok(())
}
