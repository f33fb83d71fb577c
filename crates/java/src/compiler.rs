use buildplan_core::config::JavaConfig;

/// `javac` arguments: the `-Xlint` categories and the `--release` level.
#[must_use]
pub fn javac_args(java: &JavaConfig) -> Vec<String> {
    let mut args = Vec::with_capacity(3);
    if !java.lint.is_empty() {
        args.push(format!("-Xlint:{}", java.lint.join(",")));
    }
    args.push("--release".to_string());
    args.push(java.release.to_string());
    args
}
