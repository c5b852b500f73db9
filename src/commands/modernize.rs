//! The `cppmodernize <DIRECTORY>` run.
//!
//! Setup problems (missing target, bad ignore pattern) are errors. Anything
//! that goes wrong with an individual file is recorded in its
//! [`FileOutcome`] and the run carries on.

use crate::config::{FilesConfig, ModernizeConfig};
use crate::core::{Error, FileOutcome, FileStatus, Result, RewriteKind, RewriteStats};
use crate::io::{FileSystem, FileWalker, RealFileSystem};
use crate::progress::{self, ProgressConfig};
use crate::rewrite::{ClassificationPolicy, Modernizer};
use indicatif::{ParallelProgressIterator, ProgressIterator};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Size the global rayon pool. `0` means one thread per core.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        log::debug!("Thread pool already configured: {}", e);
    }
}

/// Everything a run needs, already merged from config file and CLI.
#[derive(Debug, Clone)]
pub struct ModernizeOptions {
    pub target: PathBuf,
    pub dry_run: bool,
    pub parallel: bool,
    pub kinds: Vec<RewriteKind>,
    pub policy: ClassificationPolicy,
    pub files: FilesConfig,
    pub progress: ProgressConfig,
}

impl ModernizeOptions {
    pub fn new(target: PathBuf) -> Self {
        Self::from_config(target, &ModernizeConfig::default())
    }

    pub fn from_config(target: PathBuf, config: &ModernizeConfig) -> Self {
        Self {
            target,
            dry_run: false,
            parallel: true,
            kinds: config.enabled_kinds(),
            policy: config.classification_policy(),
            files: config.files.clone(),
            progress: ProgressConfig::default(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<RewriteKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_policy(mut self, policy: ClassificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }
}

/// Result of a whole run: merged counters plus one outcome per file, in
/// walk order.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RewriteStats,
    pub outcomes: Vec<FileOutcome>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn modified(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_modified())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

pub fn run(options: &ModernizeOptions) -> Result<RunSummary> {
    run_with_fs(&RealFileSystem::new(), options)
}

pub fn run_with_fs<F: FileSystem>(fs: &F, options: &ModernizeOptions) -> Result<RunSummary> {
    if !fs.is_dir(&options.target) {
        return Err(Error::MissingTarget(options.target.clone()));
    }

    let files = FileWalker::new(options.target.clone())
        .with_extensions(options.files.extensions.clone())
        .with_skip_dirs(options.files.skip_dirs.clone())
        .with_ignore_patterns(options.files.ignore.clone())
        .respect_gitignore(options.files.respect_gitignore)
        .walk()?;

    let modernizer = Modernizer::with_kinds(&options.kinds, options.policy.clone());
    log::info!(
        "Processing {} files under {} ({:?})",
        files.len(),
        options.target.display(),
        modernizer.kinds()
    );

    let bar = progress::create_file_bar(files.len() as u64, &options.progress);
    let process = |path: &PathBuf| process_file(fs, &modernizer, path, options.dry_run);
    let outcomes: Vec<FileOutcome> = if options.parallel {
        files
            .par_iter()
            .progress_with(bar.clone())
            .map(process)
            .collect()
    } else {
        files
            .iter()
            .progress_with(bar.clone())
            .map(process)
            .collect()
    };
    bar.finish_and_clear();

    let stats = outcomes
        .iter()
        .fold(RewriteStats::default(), |acc, outcome| acc.merge(outcome.stats.clone()));

    Ok(RunSummary {
        stats,
        outcomes,
        dry_run: options.dry_run,
    })
}

/// Read, transform and (unless `dry_run`) write back one file.
pub fn process_file<F: FileSystem + ?Sized>(
    fs: &F,
    modernizer: &Modernizer,
    path: &Path,
    dry_run: bool,
) -> FileOutcome {
    let original = match fs.read_to_string(path) {
        Ok(text) => text,
        Err(e) => return failed(path, e),
    };

    let output = modernizer.apply(&original);
    let mut stats = RewriteStats {
        files_scanned: 1,
        ..Default::default()
    }
    .merge(output.stats.clone());

    if !output.changed(&original) {
        return FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Unchanged,
            stats,
        };
    }

    if dry_run {
        log::info!("Would modernise {}", path.display());
    } else {
        if let Err(e) = fs.write(path, &output.text) {
            return failed(path, e);
        }
        log::info!("Modernised {}", path.display());
    }

    stats.files_modified = 1;
    FileOutcome {
        path: path.to_path_buf(),
        status: FileStatus::Modified,
        stats,
    }
}

fn failed(path: &Path, error: Error) -> FileOutcome {
    log::error!("Skipping file: {}", error);
    FileOutcome {
        path: path.to_path_buf(),
        status: FileStatus::Failed(error.to_string()),
        stats: RewriteStats {
            files_scanned: 1,
            files_failed: 1,
            ..Default::default()
        },
    }
}
