//! Single-file repository dump.
//!
//! Layout, in order: metadata header, optional diff, tracked file list, one
//! section per tracked file, summary counters. Output is fully determined by
//! the repository state and the [`DumpConfig`].

use crate::domain::{DumpConfig, DumpStats, FileClass, TrackedFile};
use crate::fetch::RepoSource;
use crate::utils::{classify_content, decode_text, sha256_file, ExclusionRules};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TRUNCATION_MARKER: &str = "\n\n... (TRUNCATED) ...\n\n";

/// Header fields and the git queries that fill them.
const HEADER_QUERIES: &[(&str, &[&str])] = &[
    ("git_remote_v", &["remote", "-v"]),
    ("git_status_sb", &["status", "-sb"]),
    ("git_head", &["rev-parse", "HEAD"]),
    ("git_status_porcelain", &["status", "--porcelain"]),
];

/// Result of writing a dump to disk.
#[derive(Debug, Clone)]
pub struct DumpOutcome {
    pub path: PathBuf,
    pub bytes: u64,
    pub stats: DumpStats,
}

/// Everything gathered from the repository before any output is written.
pub struct DumpPlan {
    root: PathBuf,
    max_bytes: u64,
    rules: ExclusionRules,
    files: Vec<TrackedFile>,
    header: Vec<(&'static str, String)>,
    diff: Option<String>,
}

impl DumpPlan {
    /// Run every repository query up front.
    ///
    /// Fails on invalid exclusion globs or when the tracked files cannot be
    /// listed. Metadata queries never fail; their output is kept verbatim.
    pub fn prepare(source: &dyn RepoSource, config: &DumpConfig) -> Result<Self> {
        let rules = ExclusionRules::new(&config.exclude_dirs, &config.exclude_globs)?;
        let files = source.tracked_files()?;
        tracing::debug!("{} tracked files under {}", files.len(), source.root().display());

        let header = HEADER_QUERIES
            .iter()
            .map(|(label, args)| (*label, source.query(args).text))
            .collect();
        let diff = config.include_diff.then(|| source.query(&["diff"]).text);

        Ok(Self {
            root: source.root().to_path_buf(),
            max_bytes: config.max_bytes,
            rules,
            files,
            header,
            diff,
        })
    }

    /// Stream the dump into `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<DumpStats> {
        let mut stats = DumpStats::default();

        writeln!(out, "# REPO DUMP (for LLM review)")?;
        writeln!(out, "repo_root: {}", self.root.display())?;
        for (label, text) in &self.header {
            writeln!(out, "{}:\n{}", label, normalize_newlines(text))?;
        }
        if let Some(diff) = &self.diff {
            let body = if diff.is_empty() { "(no diff)" } else { diff.as_str() };
            write_section(out, "git diff", body)?;
        }

        let listing: Vec<&str> = self.files.iter().map(|f| f.relative_path.as_str()).collect();
        write_section(out, "file list (tracked)", &listing.join("\n"))?;

        for file in &self.files {
            let class = self.classify(file);
            tracing::debug!("{} -> {}", file.relative_path, class.as_str());

            let rendered = match class {
                FileClass::Excluded | FileClass::Missing => Rendered::Skipped,
                FileClass::BinaryByExtension | FileClass::BinaryByContent => {
                    write_omitted(out, file, "BINARY OMITTED")?
                }
                FileClass::Undecodable => write_omitted(out, file, "UNDECODABLE OMITTED")?,
                FileClass::Text => self.write_text(out, file)?,
            };
            match rendered {
                Rendered::Text => stats.text_files += 1,
                Rendered::Omitted => stats.binary_or_omitted_files += 1,
                Rendered::Skipped => stats.skipped_files += 1,
            }
        }

        write!(
            out,
            "\n# SUMMARY\ntext_files: {}\nbinary_or_omitted_files: {}\nskipped_files: {}\n",
            stats.text_files, stats.binary_or_omitted_files, stats.skipped_files
        )?;

        Ok(stats)
    }

    fn classify(&self, file: &TrackedFile) -> FileClass {
        if self.rules.is_excluded(&file.relative_path) {
            FileClass::Excluded
        } else if !file.path.is_file() {
            FileClass::Missing
        } else {
            classify_content(&file.path)
        }
    }

    /// Write a text section, falling back to an omitted section when the
    /// full content does not decode.
    fn write_text<W: Write>(&self, out: &mut W, file: &TrackedFile) -> io::Result<Rendered> {
        let data = match fs::read(&file.path) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("Skipping unreadable file {}: {}", file.relative_path, err);
                return Ok(Rendered::Skipped);
            }
        };

        let Some(decoded) = decode_text(&data) else {
            return write_omitted(out, file, "UNDECODABLE OMITTED");
        };

        let body = if self.max_bytes > 0 && data.len() as u64 > self.max_bytes {
            let half = usize::try_from(self.max_bytes / 2).unwrap_or(usize::MAX).min(data.len());
            let head = decoded.encoding.decode_lossy(&data[..half]);
            let tail = decoded.encoding.decode_lossy(&data[data.len() - half..]);
            tracing::debug!(
                "Truncating {} ({} bytes, {})",
                file.relative_path,
                data.len(),
                decoded.encoding.label()
            );
            format!("{head}{TRUNCATION_MARKER}{tail}")
        } else {
            decoded.text
        };

        let rel = &file.relative_path;
        writeln!(out, "\n===== BEGIN FILE: {rel} =====")?;
        writeln!(out, "{}", normalize_newlines(&body).trim_end())?;
        writeln!(out, "===== END FILE: {rel} =====")?;
        Ok(Rendered::Text)
    }
}

/// Which counter a file section lands in.
enum Rendered {
    Text,
    Omitted,
    Skipped,
}

/// Prepare and write a dump into any writer.
pub fn write_dump<W: Write>(
    source: &dyn RepoSource,
    config: &DumpConfig,
    out: &mut W,
) -> Result<DumpStats> {
    let plan = DumpPlan::prepare(source, config)?;
    plan.write(out).context("Failed writing dump")
}

/// Write the dump to `config.output_path`.
///
/// Relative output paths resolve against the current directory. The report
/// is written to a temporary file next to the destination and renamed into
/// place only once complete, so a failed run leaves no partial output.
pub fn write_dump_file(source: &dyn RepoSource, config: &DumpConfig) -> Result<DumpOutcome> {
    let plan = DumpPlan::prepare(source, config)?;

    let out_path = if config.output_path.is_absolute() {
        config.output_path.clone()
    } else {
        std::env::current_dir()?.join(&config.output_path)
    };
    let dir = out_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed creating output directory: {}", dir.display()))?;

    let mut builder = tempfile::Builder::new();
    if let Some(permissions) = report_permissions() {
        builder.permissions(permissions);
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .with_context(|| format!("Failed creating temp file in {}", dir.display()))?;
    let stats = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let stats = plan.write(&mut writer).context("Failed writing dump")?;
        writer.flush().context("Failed writing dump")?;
        stats
    };
    tmp.persist(&out_path)
        .with_context(|| format!("Failed writing output file: {}", out_path.display()))?;

    let bytes = fs::metadata(&out_path)?.len();
    Ok(DumpOutcome { path: out_path, bytes, stats })
}

/// Mode for the report: what a plain create would give, after the umask.
#[cfg(unix)]
fn report_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn report_permissions() -> Option<fs::Permissions> {
    None
}

fn write_section<W: Write>(out: &mut W, title: &str, body: &str) -> io::Result<()> {
    write!(out, "\n# {}\n{}\n", title, normalize_newlines(body).trim_end())
}

/// Write size and hash in place of content. A file that cannot be read is
/// skipped and nothing is written.
fn write_omitted<W: Write>(out: &mut W, file: &TrackedFile, label: &str) -> io::Result<Rendered> {
    let size_and_hash = fs::metadata(&file.path)
        .and_then(|meta| Ok((meta.len(), sha256_file(&file.path)?)));
    let (size, hash) = match size_and_hash {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!("Skipping unreadable file {}: {}", file.relative_path, err);
            return Ok(Rendered::Skipped);
        }
    };

    let rel = &file.relative_path;
    writeln!(out, "\n===== BEGIN FILE: {rel} ({label}) =====")?;
    writeln!(out, "bytes: {size}\nsha256: {hash}")?;
    writeln!(out, "===== END FILE: {rel} =====")?;
    Ok(Rendered::Omitted)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
