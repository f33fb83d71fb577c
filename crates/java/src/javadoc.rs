use std::path::{Path, PathBuf};

use buildplan_core::config::{JavadocConfig, OfflineLink};
use buildplan_core::document::INTERNAL_EXCLUDE_PATTERN;
use buildplan_core::{EnvironmentSnapshot, ProjectMetadata};

/// Custom block tags understood by the documentation tool.
pub const CUSTOM_TAGS: [&str; 3] = [
    "apiNote:a:API Note:",
    "implSpec:a:Implementation Requirements:",
    "implNote:a:Implementation Note:",
];

/// Options of one `javadoc` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavadocOptions {
    title: String,
    version: String,
    copyright: String,
    author: String,
    build_date: String,
    links_offline: Vec<OfflineLink>,
    stylesheet: Option<PathBuf>,
    source_list: Option<PathBuf>,
}

impl JavadocOptions {
    /// Relative paths in `config` are resolved against `root`.
    #[must_use]
    pub fn new(
        metadata: &ProjectMetadata,
        snapshot: &EnvironmentSnapshot,
        config: &JavadocConfig,
        root: &Path,
    ) -> Self {
        Self {
            title: metadata.name.to_uppercase(),
            version: metadata.version.clone(),
            copyright: snapshot.copyright_year().to_string(),
            author: metadata.author.clone(),
            build_date: snapshot.build_date().to_string(),
            links_offline: config
                .links_offline
                .iter()
                .map(|link| OfflineLink {
                    url: link.url.clone(),
                    location: root.join(&link.location),
                })
                .collect(),
            stylesheet: config.stylesheet.as_ref().map(|path| root.join(path)),
            source_list: None,
        }
    }

    /// File listing the sources to document, one per line.
    #[must_use]
    pub fn with_source_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_list = Some(path.into());
        self
    }

    #[must_use]
    pub fn window_title(&self) -> String {
        format!("{} {}", self.title, self.version)
    }

    #[must_use]
    pub fn doc_title(&self) -> String {
        format!("<h1>{} {}</h1>", self.title, self.version)
    }

    #[must_use]
    pub fn bottom(&self) -> String {
        format!(
            "&copy; {} {} &nbsp;<i>({})</i>",
            self.copyright, self.author, self.build_date
        )
    }

    /// Pattern of sources left out of the documentation.
    #[must_use]
    pub const fn exclude_pattern(&self) -> &'static str {
        INTERNAL_EXCLUDE_PATTERN
    }

    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-protected",
            "-version",
            "-docencoding",
            "UTF-8",
            "-charset",
            "UTF-8",
            "-linksource",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        args.extend(["-windowtitle".to_string(), self.window_title()]);
        args.extend(["-doctitle".to_string(), self.doc_title()]);
        args.extend(["-bottom".to_string(), self.bottom()]);
        for tag in CUSTOM_TAGS {
            args.extend(["-tag".to_string(), tag.to_string()]);
        }
        for link in &self.links_offline {
            args.extend([
                "-linkoffline".to_string(),
                link.url.clone(),
                link.location.to_string_lossy().into_owned(),
            ]);
        }
        if let Some(stylesheet) = &self.stylesheet {
            args.extend([
                "-stylesheetfile".to_string(),
                stylesheet.to_string_lossy().into_owned(),
            ]);
        }
        if let Some(source_list) = &self.source_list {
            args.push(format!("@{}", source_list.display()));
        }
        args
    }

    /// Contents of an `@argfile`, one quoted argument per line.
    #[must_use]
    pub fn to_argfile(&self) -> String {
        let mut out = String::new();
        for arg in self.to_args() {
            out.push_str(&quote_arg(&arg));
            out.push('\n');
        }
        out
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.starts_with('@') {
        return arg.to_string();
    }
    let needs_quotes = arg.is_empty()
        || arg.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if needs_quotes {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
