pub mod cli;
pub mod db;
pub mod evaluation;
pub mod metrics;
pub mod report;
pub mod segmentation;
pub mod settings;
pub mod similarity;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use cli::{Cli, Commands, EvaluateArgs, SearchArgs};
use db::{ClipDatabase, EvalDataset};
use evaluation::{EvalSource, Evaluator};
use report::{render_text, EvaluationReport};
use settings::{EvalSettings, ScorerKind};
use similarity::{
    search::top_k, EmbeddingScorer, EmbeddingStore, Glossary, LexicalScorer, Passthrough,
    SimilarityScorer, Translator,
};

fn build_translator(glossary: Option<&Path>) -> Result<Box<dyn Translator>> {
    match glossary {
        Some(path) => {
            let glossary = Glossary::load(path)?;
            info!("Translating queries with {} glossary entries", glossary.len());
            Ok(Box::new(glossary))
        }
        None => Ok(Box::new(Passthrough)),
    }
}

fn build_scorer(settings: &EvalSettings) -> Result<Box<dyn SimilarityScorer>> {
    let translator = build_translator(settings.glossary.as_deref())?;
    match settings.scorer {
        ScorerKind::Lexical => Ok(Box::new(LexicalScorer::new(translator))),
        ScorerKind::Embedding => {
            // Captions may carry inline vectors, but queries need the cache.
            let Some(path) = settings.query_embeddings.as_deref() else {
                bail!("embedding scorer needs --query-embeddings (or use --lexical)");
            };
            let store = EmbeddingStore::load(path)?;
            Ok(Box::new(EmbeddingScorer::new(store, translator)))
        }
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let settings = EvalSettings::load(&args.config)?;
    let settings = args.apply(settings);
    let detection = settings.detection()?;

    let dataset = EvalDataset::load(&settings.dataset)?;
    let scorer = build_scorer(&settings)?;

    let sources = settings
        .sources
        .iter()
        .map(|source| {
            let db = ClipDatabase::load(&source.path)?;
            Ok(EvalSource::new(db, source.kind))
        })
        .collect::<Result<Vec<_>>>()?;

    let evaluator = Evaluator::new(scorer.as_ref(), detection);
    let summaries = evaluator.compare(&sources, &dataset)?;

    println!("{}", render_text(&summaries));

    if let Some(output) = &settings.output {
        EvaluationReport::new(settings.dataset.clone(), detection.threshold, summaries)
            .write_json(output)?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}

fn search(args: SearchArgs) -> Result<()> {
    let db = ClipDatabase::load(&args.db)?;
    let store = EmbeddingStore::load(&args.query_embeddings)?;
    let translator = build_translator(args.glossary.as_deref())?;
    let scorer = EmbeddingScorer::new(store, translator);

    let hits = top_k(&db, &scorer, &args.query, args.top_k)?;
    let rendered = serde_json::to_string_pretty(&hits).context("failed to render hits")?;
    println!("{rendered}");
    Ok(())
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate(args) => evaluate(args),
        Commands::Search(args) => search(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::Clip;
    use std::fs;

    fn clip(caption: &str, embedding: Option<Vec<f32>>) -> Clip {
        Clip {
            video_id: Some("abc".into()),
            video_path: None,
            clip_id: None,
            caption: caption.into(),
            start_time: 0.0,
            end_time: None,
            embedding,
        }
    }

    #[test]
    fn lexical_scorer_needs_no_embeddings() {
        let settings = EvalSettings {
            scorer: ScorerKind::Lexical,
            query_embeddings: None,
            ..EvalSettings::default()
        };
        let scorer = build_scorer(&settings).unwrap();
        let score = scorer.score("A dog runs", &clip("a dog runs", None)).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn embedding_scorer_without_cache_is_rejected() {
        let settings = EvalSettings {
            scorer: ScorerKind::Embedding,
            query_embeddings: None,
            ..EvalSettings::default()
        };
        let err = build_scorer(&settings).err().unwrap();
        assert!(err.to_string().contains("--query-embeddings"));
    }

    #[test]
    fn embedding_scorer_loads_cache_and_glossary() {
        let dir = tempfile::tempdir().unwrap();
        let embeddings = dir.path().join("queries.json");
        let glossary = dir.path().join("glossary.json");
        fs::write(&embeddings, r#"{"a man cooking": [1.0, 0.0]}"#).unwrap();
        fs::write(&glossary, r#"{"요리하는 남자": "a man cooking"}"#).unwrap();

        let settings = EvalSettings {
            scorer: ScorerKind::Embedding,
            query_embeddings: Some(embeddings),
            glossary: Some(glossary),
            ..EvalSettings::default()
        };
        let scorer = build_scorer(&settings).unwrap();
        let score = scorer
            .score("요리하는 남자", &clip("stirring", Some(vec![1.0, 0.0])))
            .unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unreadable_glossary_fails_before_scoring() {
        let settings = EvalSettings {
            scorer: ScorerKind::Lexical,
            glossary: Some("/nonexistent/glossary.json".into()),
            ..EvalSettings::default()
        };
        assert!(build_scorer(&settings).is_err());
    }
}
