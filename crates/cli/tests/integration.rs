use serial_test::serial;
use std::path::Path;
use tempfile::TempDir;

fn write_config(path: &Path, config: &serde_json::Value) {
    std::fs::create_dir_all(path.join(".buildplan")).unwrap();
    std::fs::write(
        path.join(".buildplan/config.json"),
        serde_json::to_string_pretty(config).unwrap(),
    )
    .unwrap();
}

fn jpx_config(version: &str, tasks: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "project": {
            "id": "jpx",
            "name": "jpx",
            "group": "io.jenetics",
            "version": version,
            "author": "Franz Wilhelmstötter",
            "email": "franz.wilhelmstoetter@gmail.com",
            "url": "https://github.com/jenetics/jpx",
            "inceptionYear": 2016
        },
        "modules": [
            {
                "name": "jpx",
                "path": ".",
                "publishable": true,
                "moduleName": "io.jenetics.jpx"
            }
        ],
        "tasks": tasks
    })
}

fn write_source(path: &Path, relative: &str) {
    let file = path.join("src/main/java").join(relative);
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(
        file,
        "/* @__identifier__@ */\npublic class Point {}\n",
    )
    .unwrap();
}

async fn run_in(path: &Path, args: &[&str]) -> anyhow::Result<()> {
    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(path).unwrap();

    let args: Vec<String> = std::iter::once("buildplan")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect();
    let result = buildplan_cli::main(&args).await;

    std::env::set_current_dir(&original_dir).unwrap();
    result
}

#[tokio::test]
#[serial]
async fn test_cli_init_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let result = run_in(temp_path, &["init", "--dry-run"]).await;

    assert!(result.is_ok());
    assert!(!temp_path.join(".buildplan/config.json").exists());
}

#[tokio::test]
#[serial]
async fn test_cli_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let result = run_in(temp_path, &["init"]).await;
    assert!(result.is_ok());
    assert!(temp_path.join(".buildplan/config.json").exists());

    let config: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_path.join(".buildplan/config.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(config["project"]["version"], "0.1.0-SNAPSHOT");
    assert_eq!(config["tasks"]["test"], "./gradlew test");

    let err = run_in(temp_path, &["init"]).await.unwrap_err();
    assert!(err.to_string().contains("already initialized"));
}

#[tokio::test]
#[serial]
async fn test_cli_config_without_init_fails() {
    let temp_dir = TempDir::new().unwrap();

    let err = run_in(temp_dir.path(), &["config"]).await.unwrap_err();
    assert!(err.to_string().contains("config.json"));
}

#[tokio::test]
#[serial]
async fn test_cli_inspection_commands() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(temp_path, &jpx_config("3.2.0", serde_json::json!({})));

    assert!(run_in(temp_path, &["config"]).await.is_ok());
    assert!(run_in(temp_path, &["env", "--format", "json"]).await.is_ok());
    assert!(run_in(temp_path, &["plan"]).await.is_ok());
    assert!(run_in(temp_path, &["plan", "--target", "test", "--format", "json"])
        .await
        .is_ok());
    assert!(run_in(temp_path, &["attributes", "-m", "jpx"]).await.is_ok());
    assert!(run_in(temp_path, &["descriptor"]).await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_cli_env_outside_project() {
    let temp_dir = TempDir::new().unwrap();

    assert!(run_in(temp_dir.path(), &["env"]).await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_cli_unknown_module() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(temp_path, &jpx_config("3.2.0", serde_json::json!({})));

    let err = run_in(temp_path, &["compile", "--module", "jpx.jdbc"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("jpx.jdbc"));
}

#[tokio::test]
#[serial]
async fn test_cli_incomplete_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    let mut config = jpx_config("3.2.0", serde_json::json!({}));
    config["project"]["group"] = serde_json::json!("");
    write_config(temp_path, &config);

    let err = run_in(temp_path, &["compile"]).await.unwrap_err();
    assert!(err.to_string().contains("group"));
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_compile_runs_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "compile": "echo \"$BUILDPLAN_JAVAC_ARGS\" > compiled.txt"
            }),
        ),
    );

    let result = run_in(temp_path, &["compile"]).await;

    assert!(result.is_ok());
    let compiled = std::fs::read_to_string(temp_path.join("compiled.txt")).unwrap();
    assert!(compiled.contains("--release 11"));
    assert!(compiled.contains("-Xlint:cast"));
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_dry_run_executes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "compile": "touch compiled.txt",
                "packageJar": "touch packaged.txt"
            }),
        ),
    );

    let result = run_in(temp_path, &["package-jar", "--dry-run"]).await;

    assert!(result.is_ok());
    assert!(!temp_path.join("compiled.txt").exists());
    assert!(!temp_path.join("packaged.txt").exists());
    assert!(!temp_path.join("build").exists());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_failed_test_still_runs_coverage_report() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "test": "exit 1",
                "coverageReport": "touch coverage.txt",
                "packageJar": "touch packaged.txt"
            }),
        ),
    );

    let err = run_in(temp_path, &["package-jar"]).await.unwrap_err();

    assert!(err.to_string().contains("packageJar failed"));
    assert!(temp_path.join("coverage.txt").exists());
    assert!(!temp_path.join("packaged.txt").exists());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_package_jar_writes_manifest_and_filtered_sources() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "packageJar": "test -f \"$BUILDPLAN_MANIFEST\" && test -d \"$BUILDPLAN_FILTERED_SOURCES\""
            }),
        ),
    );
    write_source(temp_path, "io/jenetics/jpx/Point.java");

    let result = run_in(temp_path, &["package-jar"]).await;
    assert!(result.is_ok());

    let manifest = std::fs::read_to_string(temp_path.join("build/jpx/MANIFEST.MF")).unwrap();
    assert!(manifest.starts_with("Manifest-Version: 1.0\n"));
    assert!(manifest.contains("Implementation-Title: "));
    assert!(manifest.contains("Implementation-Version: 3.2.0\n"));
    assert!(manifest.contains("Automatic-Module-Name: io.jenetics.jpx\n"));

    let filtered =
        std::fs::read_to_string(temp_path.join("build/jpx/sources/io/jenetics/jpx/Point.java"))
            .unwrap();
    assert!(filtered.starts_with("/* jpx-3.2.0 */"));
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_document_excludes_internal_sources() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "document": "echo \"$BUILDPLAN_JAVADOC_ARGS\" > javadoc.txt",
                "sourceToHtml": "touch html.txt"
            }),
        ),
    );
    write_source(temp_path, "io/jenetics/jpx/Point.java");
    write_source(temp_path, "io/jenetics/jpx/internal/Util.java");

    let result = run_in(temp_path, &["document"]).await;
    assert!(result.is_ok());

    let sources =
        std::fs::read_to_string(temp_path.join("build/jpx/javadoc-sources.txt")).unwrap();
    assert!(sources.contains("Point.java"));
    assert!(!sources.contains("internal"));

    let options = std::fs::read_to_string(temp_path.join("build/jpx/javadoc.options")).unwrap();
    assert!(options.contains("JPX 3.2.0"));

    let javadoc = std::fs::read_to_string(temp_path.join("javadoc.txt")).unwrap();
    assert!(javadoc.trim().starts_with('@'));
    assert!(javadoc.trim().ends_with("javadoc.options"));
    assert!(temp_path.join("html.txt").exists());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_document_lists_sources_relative_to_module() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path().join("internal").join("jpx");
    write_config(
        &temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "document": "xargs cat < \"$BUILDPLAN_BUILD_DIR/javadoc-sources.txt\" > /dev/null"
            }),
        ),
    );
    write_source(&temp_path, "io/jenetics/jpx/Point.java");

    let result = run_in(&temp_path, &["document"]).await;
    assert!(result.is_ok());

    let sources =
        std::fs::read_to_string(temp_path.join("build/jpx/javadoc-sources.txt")).unwrap();
    assert_eq!(sources, "src/main/java/io/jenetics/jpx/Point.java\n");
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_document_copies_doc_files() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "document": "test -f \"$BUILDPLAN_DOC_FILES/io/jenetics/jpx/doc-files/track.svg\" && touch documented.txt"
            }),
        ),
    );
    write_source(temp_path, "io/jenetics/jpx/Point.java");
    let doc_files = temp_path.join("src/main/java/io/jenetics/jpx/doc-files");
    std::fs::create_dir_all(&doc_files).unwrap();
    std::fs::write(doc_files.join("track.svg"), "<svg/>").unwrap();
    let internal = temp_path.join("src/main/java/io/jenetics/jpx/internal/doc-files");
    std::fs::create_dir_all(&internal).unwrap();
    std::fs::write(internal.join("hidden.svg"), "<svg/>").unwrap();

    let result = run_in(temp_path, &["document"]).await;
    assert!(result.is_ok());
    assert!(temp_path.join("documented.txt").exists());

    let copied = temp_path.join("build/jpx/doc-files/io/jenetics/jpx/doc-files/track.svg");
    assert_eq!(std::fs::read_to_string(copied).unwrap(), "<svg/>");
    assert!(
        !temp_path
            .join("build/jpx/doc-files/io/jenetics/jpx/internal")
            .exists()
    );
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_publish_filters_javadoc_tokens() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "document": "mkdir -p build/docs/javadoc && echo '<title>@__identifier__@</title>' > build/docs/javadoc/index.html",
                "publish": "grep -q 'jpx-3.2.0' \"$BUILDPLAN_FILTERED_JAVADOC/index.html\" && test -d \"$BUILDPLAN_FILTERED_SOURCES\" && touch published.txt"
            }),
        ),
    );
    write_source(temp_path, "io/jenetics/jpx/Point.java");

    let result = run_in(
        temp_path,
        &[
            "publish",
            "--yes",
            "-P",
            "nexus_username=franz",
            "-P",
            "nexus_password=s3cret",
        ],
    )
    .await;

    assert!(result.is_ok());
    assert!(temp_path.join("published.txt").exists());
    let filtered =
        std::fs::read_to_string(temp_path.join("build/jpx/javadoc/index.html")).unwrap();
    assert_eq!(filtered, "<title>jpx-3.2.0</title>\n");
    let generated =
        std::fs::read_to_string(temp_path.join("build/docs/javadoc/index.html")).unwrap();
    assert!(generated.contains("@__identifier__@"));
}

#[cfg(unix)]
#[tokio::test]
#[serial]
async fn test_cli_plan_ignores_non_utf8_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(temp_path, &jpx_config("3.2.0", serde_json::json!({})));

    let value = OsStr::from_bytes(&[b'a', 0xff, b'b']);
    // SAFETY: serialized with every other test touching the process environment.
    unsafe {
        std::env::set_var("BUILDPLAN_PROP_broken", value);
        std::env::set_var("BUILDPLAN_TEST_LATIN1", value);
    }
    let result = run_in(temp_path, &["plan"]).await;
    unsafe {
        std::env::remove_var("BUILDPLAN_PROP_broken");
        std::env::remove_var("BUILDPLAN_TEST_LATIN1");
    }

    assert!(result.is_ok());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_publish_without_credentials_fails() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.2.0",
            serde_json::json!({
                "publish": "touch published.txt"
            }),
        ),
    );

    let err = run_in(temp_path, &["publish", "--yes"]).await.unwrap_err();

    assert!(err.to_string().contains("publish failed"));
    assert!(!temp_path.join("published.txt").exists());
}

#[cfg(not(target_os = "windows"))]
#[tokio::test]
#[serial]
async fn test_cli_publish_snapshot_with_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(
        temp_path,
        &jpx_config(
            "3.3.0-SNAPSHOT",
            serde_json::json!({
                "publish": "test \"$BUILDPLAN_REPOSITORY_URL\" = \"https://oss.sonatype.org/content/repositories/snapshots/\" && test \"$BUILDPLAN_REPOSITORY_PASSWORD\" = s3cret && touch published.txt"
            }),
        ),
    );

    let result = run_in(
        temp_path,
        &[
            "publish",
            "--yes",
            "-P",
            "nexus_username=franz",
            "-P",
            "nexus_password=s3cret",
        ],
    )
    .await;

    assert!(result.is_ok());
    assert!(temp_path.join("published.txt").exists());

    let publication =
        std::fs::read_to_string(temp_path.join("build/jpx/publication.json")).unwrap();
    assert!(publication.contains("\"artifactId\": \"jpx\""));
    assert!(publication.contains("***"));
    assert!(!publication.contains("s3cret"));

    let pom = std::fs::read_to_string(temp_path.join("build/jpx/pom.xml")).unwrap();
    assert!(pom.contains("<groupId>io.jenetics</groupId>"));
    assert!(pom.contains("<version>3.3.0-SNAPSHOT</version>"));
}

#[tokio::test]
#[serial]
async fn test_cli_publish_dry_run_skips_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    write_config(temp_path, &jpx_config("3.2.0", serde_json::json!({})));

    let result = run_in(temp_path, &["publish", "--dry-run", "--format", "json"]).await;

    assert!(result.is_ok());
    assert!(!temp_path.join("build").exists());
}
