//! Six-stage question answering pipeline
//!
//! Each stage takes the [`PipelineContext`] and hands it back, possibly with
//! a terminal error set. Stages after an error do nothing, and the model
//! stages are skipped on a cache hit.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::domain::pipeline::{PipelineConfig, PipelineContext, PipelineError, PipelineOutcome, PipelineStage};
use crate::domain::query::{GenerationRequest, QueryGenerator, ResponseSynthesizer};
use crate::domain::template::TemplateRenderer;
use crate::domain::{DomainError, GraphStore};
use crate::infrastructure::observability::{record_pipeline_outcome, record_render_incomplete};
use crate::infrastructure::services::{CacheLookup, SemanticQueryCache};

#[derive(Debug)]
pub struct QueryPipeline {
    cache: Arc<SemanticQueryCache>,
    graph: Arc<dyn GraphStore>,
    generator: Arc<dyn QueryGenerator>,
    synthesizer: Arc<dyn ResponseSynthesizer>,
    renderer: TemplateRenderer,
    config: PipelineConfig,
}

impl QueryPipeline {
    pub fn new(
        cache: Arc<SemanticQueryCache>,
        graph: Arc<dyn GraphStore>,
        generator: Arc<dyn QueryGenerator>,
        synthesizer: Arc<dyn ResponseSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            cache,
            graph,
            generator,
            synthesizer,
            renderer: TemplateRenderer::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Answer one question
    #[instrument(skip(self, cancel), fields(cached = tracing::field::Empty))]
    pub async fn run(&self, question: &str, cancel: &CancellationToken) -> PipelineOutcome {
        let started = Instant::now();
        let ctx = PipelineContext::new(question);

        let ctx = self.lookup(ctx, cancel).await;
        let ctx = self.generate(ctx, cancel).await;
        let ctx = self.validate_and_execute(ctx, cancel).await;
        let ctx = self.synthesize(ctx, cancel).await;
        let ctx = self.cache_write(ctx, cancel).await;
        let ctx = self.render(ctx);

        let outcome = ctx.finish();
        tracing::Span::current().record("cached", outcome.cached);

        let elapsed = started.elapsed();
        record_pipeline_outcome(outcome.label(), elapsed);

        match outcome.error() {
            None => info!(
                cached = outcome.cached,
                score = ?outcome.score,
                elapsed_ms = elapsed.as_millis() as u64,
                "Question answered"
            ),
            Some(error) => info!(
                code = error.code(),
                cached = outcome.cached,
                elapsed_ms = elapsed.as_millis() as u64,
                "Question ended without an answer"
            ),
        }

        outcome
    }

    /// Run one external call under the stage timeout, giving up early when
    /// the request is cancelled
    async fn guarded<T, F>(
        &self,
        stage: PipelineStage,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<Result<T, DomainError>, PipelineError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%stage, "Stage cancelled");
                Err(PipelineError::Cancelled { stage })
            }
            result = tokio::time::timeout(self.config.stage_timeout(), call) => {
                result.map_err(|_| {
                    warn!(%stage, timeout_ms = self.config.stage_timeout_ms, "Stage timed out");
                    PipelineError::Timeout { stage }
                })
            }
        }
    }

    async fn lookup(&self, mut ctx: PipelineContext, cancel: &CancellationToken) -> PipelineContext {
        if ctx.is_errored() {
            return ctx;
        }

        let stage = PipelineStage::Lookup;
        let result = self.guarded(stage, cancel, self.cache.lookup(ctx.question())).await;

        match result {
            Err(error) => ctx.fail(error),
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Semantic cache lookup failed");
                ctx.fail(PipelineError::CacheUnavailable);
            }
            Ok(Ok(CacheLookup::Hit { entry, score })) => {
                info!(score, entry = entry.id(), "Reusing cached query");
                ctx.mark_hit(&entry, score);
            }
            Ok(Ok(CacheLookup::Miss { best_score })) => {
                info!(best_score = ?best_score, "No cached query, generating");
                ctx.mark_miss(best_score);
            }
        }

        ctx
    }

    async fn generate(&self, mut ctx: PipelineContext, cancel: &CancellationToken) -> PipelineContext {
        if ctx.is_errored() || ctx.is_cached() {
            return ctx;
        }

        let stage = PipelineStage::Generate;
        let schema = self.guarded(stage, cancel, self.graph.schema()).await;

        let schema = match schema {
            Err(error) => {
                ctx.fail(error);
                return ctx;
            }
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Schema introspection failed");
                ctx.fail(PipelineError::GenerationFailed);
                return ctx;
            }
            Ok(Ok(schema)) => schema,
        };

        let request = GenerationRequest::new(ctx.question(), schema);
        let result = self.guarded(stage, cancel, self.generator.generate(request)).await;

        match result {
            Err(error) => ctx.fail(error),
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Query generation failed");
                ctx.fail(PipelineError::GenerationFailed);
            }
            Ok(Ok(query)) => {
                debug!(%query, "Query generated");
                ctx.set_generator_query(query);
            }
        }

        ctx
    }

    async fn validate_and_execute(
        &self,
        mut ctx: PipelineContext,
        cancel: &CancellationToken,
    ) -> PipelineContext {
        if ctx.is_errored() {
            return ctx;
        }

        let Some(query) = ctx.generator_query().map(str::to_string) else {
            ctx.fail(PipelineError::GenerationFailed);
            return ctx;
        };

        // Cached queries already passed validation when they were stored
        if !ctx.is_cached() {
            let stage = PipelineStage::Validate;
            let validation = self
                .guarded(stage, cancel, async {
                    Ok::<_, DomainError>(self.graph.validate(&query).await)
                })
                .await;

            match validation {
                Err(error) => {
                    ctx.fail(error);
                    return ctx;
                }
                Ok(Ok(true)) => debug!("Query passed dry-run"),
                Ok(_) => {
                    warn!(%query, "Generated query failed dry-run");
                    ctx.fail(PipelineError::GenerationInvalid);
                    return ctx;
                }
            }
        }

        let stage = PipelineStage::Execute;
        let result = self.guarded(stage, cancel, self.graph.execute(&query)).await;

        match result {
            Err(error) => ctx.fail(error),
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Query execution failed");
                ctx.fail(PipelineError::ExecutionFailed);
            }
            Ok(Ok(rows)) if rows.is_empty() => {
                debug!("Query returned no rows");
                ctx.fail(PipelineError::EmptyResult);
            }
            Ok(Ok(rows)) => {
                debug!(rows = rows.len(), "Query executed");
                ctx.set_result_rows(rows);
            }
        }

        ctx
    }

    async fn synthesize(&self, mut ctx: PipelineContext, cancel: &CancellationToken) -> PipelineContext {
        if ctx.is_errored() || ctx.is_cached() {
            return ctx;
        }

        let Some(sample) = ctx.result_rows().first().cloned() else {
            ctx.fail(PipelineError::EmptyResult);
            return ctx;
        };

        let stage = PipelineStage::Synthesize;
        let result = self
            .guarded(stage, cancel, self.synthesizer.synthesize(ctx.question(), &sample))
            .await;

        match result {
            Err(error) => ctx.fail(error),
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Answer synthesis failed");
                ctx.fail(PipelineError::SynthesisFailed);
            }
            Ok(Ok(template)) => {
                debug!(%template, "Answer template synthesized");
                ctx.set_answer_template(template);
            }
        }

        ctx
    }

    async fn cache_write(&self, mut ctx: PipelineContext, cancel: &CancellationToken) -> PipelineContext {
        if ctx.is_errored() || ctx.is_cached() {
            return ctx;
        }

        let (Some(template), Some(query)) = (ctx.answer_template(), ctx.generator_query()) else {
            return ctx;
        };

        let stage = PipelineStage::CacheWrite;
        let result = self
            .guarded(stage, cancel, self.cache.add(ctx.question(), template, query))
            .await;

        match result {
            Err(error) => ctx.fail(error),
            Ok(Err(e)) => {
                warn!(%stage, error = %e, "Semantic cache write failed");
                ctx.fail(PipelineError::CacheUnavailable);
            }
            Ok(Ok(entry)) => debug!(entry = entry.id(), "Question cached"),
        }

        ctx
    }

    fn render(&self, mut ctx: PipelineContext) -> PipelineContext {
        if ctx.is_errored() {
            return ctx;
        }

        let template = ctx.answer_template().unwrap_or_default();
        let output = self.renderer.render(template, ctx.result_rows());

        if !output.is_complete() {
            warn!(missing = ?output.missing_fields, "Answer template has unfilled placeholders");
            record_render_incomplete();
        }

        ctx.set_answer(output.text, output.missing_fields);
        ctx
    }
}
