//! Import coordination
//!
//! The coordinator drives the whole run: startup validation, the bounded
//! producer/consumer pipeline for the core import, the optional interaction
//! merge, finalization, and the failure path. The loader is the only reader
//! of the source, the writer the only owner of the store; the two meet in a
//! bounded channel so the loader can never race arbitrarily far ahead of
//! the writer.

pub mod progress;
pub mod run;

pub use progress::{ProgressMode, ProgressReporter};
pub use run::{Counters, ImportRun};

use crate::error::{ImportError, ImportResult};
use crate::interactions::{download_interactions, merge_file};
use crate::persistence::TargetStore;
use crate::schema;
use crate::source::{EntityLoader, PathwaySource};
use crate::writer::{GraphWriter, DEFAULT_BATCH_SIZE};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Objects in flight between the loader and the writer.
const CHANNEL_CAPACITY: usize = 256;

/// External abort signal. Raising it stops the producer from accepting new
/// source records; completed batches are still flushed where that cannot
/// violate node-before-edge ordering.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run phases, in order. `Failed` is reachable from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    LoadingCore,
    WritingCore,
    MergingInteractions,
    Finalizing,
    Done,
    Failed,
}

/// Run configuration beyond the two connections.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Merge interaction data after the core import
    pub include_interactions: bool,
    /// Local interaction file; supplying one implies `include_interactions`
    pub intact_file: Option<PathBuf>,
    /// Log lines instead of a live bar
    pub quiet: bool,
    pub batch_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            include_interactions: false,
            intact_file: None,
            quiet: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// What a finished run reports back.
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub phase: Phase,
    pub counters: Counters,
}

/// Drives one import run end to end.
pub struct ImportCoordinator<S, T: TargetStore> {
    source: Arc<S>,
    writer: GraphWriter<T>,
    options: ImportOptions,
    run: ImportRun,
    progress: ProgressReporter,
    phase: Phase,
    abort: AbortFlag,
}

impl<S: PathwaySource + 'static, T: TargetStore> ImportCoordinator<S, T> {
    pub fn new(source: S, store: T, options: ImportOptions) -> Self {
        let mode = if options.quiet {
            ProgressMode::Log
        } else {
            ProgressMode::Bar
        };
        let writer = GraphWriter::new(store, options.batch_size);
        Self {
            source: Arc::new(source),
            writer,
            options,
            run: ImportRun::new(),
            progress: ProgressReporter::new(mode),
            phase: Phase::Init,
            abort: AbortFlag::new(),
        }
    }

    /// Handle for signalling an external abort.
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the import to completion.
    ///
    /// On failure the summary counters and the cause are logged, the abort
    /// flag is raised so the producer stops, and the single underlying
    /// error propagates. Connections go down with the coordinator either
    /// way.
    pub async fn import_all(mut self) -> ImportResult<ImportSummary> {
        info!("Starting import");
        match self.run_pipeline().await {
            Ok(()) => {
                self.phase = Phase::Done;
                self.progress.finish_run();
                info!(counters = %self.run.counters, "import finished");
                Ok(ImportSummary {
                    phase: self.phase,
                    counters: self.run.counters,
                })
            }
            Err(e) => {
                self.phase = Phase::Failed;
                self.abort.trigger();
                self.progress.abandon("import failed");
                error!(cause = %e, counters = %self.run.counters, "import failed");
                Err(e)
            }
        }
    }

    async fn run_pipeline(&mut self) -> ImportResult<()> {
        // Configuration errors surface before anything is written.
        if let Some(path) = &self.options.intact_file {
            if !path.is_file() {
                return Err(ImportError::config(format!(
                    "{} does not exist or is a directory",
                    path.display()
                )));
            }
        }
        let classes = self.source.distinct_classes().await?;
        let unknown = schema::unknown_classes(&classes);
        if !unknown.is_empty() {
            return Err(ImportError::config(format!(
                "unmapped domain classes in source: {}",
                unknown.join(", ")
            )));
        }

        let total_objects = self.source.object_count().await?;
        info!(total_objects, "source validated");

        self.load_and_write_nodes(total_objects).await?;
        self.write_relationships()?;

        if self.options.include_interactions || self.options.intact_file.is_some() {
            self.merge_interactions().await?;
        }

        self.phase = Phase::Finalizing;
        self.writer.finish()?;
        Ok(())
    }

    /// First core phase: stream objects out of the source, write their
    /// nodes, collect their relationships and cross-references.
    async fn load_and_write_nodes(&mut self, total_objects: u64) -> ImportResult<()> {
        self.phase = Phase::LoadingCore;
        self.progress.start_stage("nodes", total_objects);

        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let loader = EntityLoader::new(Arc::clone(&self.source));
        let abort = self.abort.clone();
        let producer = tokio::spawn(async move { loader.load_all(tx, abort).await });

        while let Some(obj) = rx.recv().await {
            if let Some(identifier) = &obj.identifier {
                self.run.record_xref(identifier, obj.db_id);
            }
            let (node, rels) = schema::map_object(&obj);
            if self.writer.write_node(node)? {
                self.run.counters.nodes_written += 1;
            }
            self.run.pending_relationships.extend(rels);
            self.progress.advance(1);
        }

        let stats = producer
            .await
            .map_err(|e| ImportError::Pipeline(e.to_string()))??;
        self.run.counters.records_skipped += stats.skipped;

        if self.abort.is_set() {
            self.writer.flush()?;
            return Err(ImportError::Aborted);
        }

        self.progress.finish_stage();
        Ok(())
    }

    /// Second core phase: every node is accepted, so the held-back
    /// relationships can be written without dangling endpoints.
    fn write_relationships(&mut self) -> ImportResult<()> {
        self.phase = Phase::WritingCore;
        let rels = std::mem::take(&mut self.run.pending_relationships);
        self.progress.start_stage("relationships", rels.len() as u64);

        for rel in rels {
            if self.abort.is_set() {
                self.writer.flush()?;
                return Err(ImportError::Aborted);
            }
            if self.writer.write_relationship(rel)? {
                self.run.counters.relationships_written += 1;
            }
            self.progress.advance(1);
        }

        self.progress.finish_stage();
        Ok(())
    }

    async fn merge_interactions(&mut self) -> ImportResult<()> {
        self.phase = Phase::MergingInteractions;

        let path = match &self.options.intact_file {
            Some(path) => path.clone(),
            None => download_interactions(&std::env::temp_dir()).await?,
        };

        self.progress.start_stage("interactions", 0);
        let stats = merge_file(&path, &self.run.xrefs, &mut self.writer, &mut self.progress)?;
        self.run.counters.interactions_merged += stats.merged;
        self.run.counters.interactions_skipped += stats.skipped_unresolved;
        self.run.counters.records_skipped += stats.malformed;
        self.progress.finish_stage();
        Ok(())
    }
}
