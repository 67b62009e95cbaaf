//! Shared index construction for `serve` and `index`: load, classify, summarize.

use std::path::Path;
use std::sync::Arc;

use tagsearch_core::{
    load_image_list, BatchEvent, BatchOutcome, ClarifaiClassifier, Classifier, Config,
    IndexOptions, IndexReport, IndexStats, Indexer,
};

/// Load the image list and build the index with the configured classifier.
///
/// `images_override` replaces `input.images_file` from the config.
pub async fn build_index(
    config: &Config,
    images_override: Option<&Path>,
) -> anyhow::Result<IndexReport> {
    let images_path = match images_override {
        Some(path) => path.to_path_buf(),
        None => config.images_file(),
    };
    let images = load_image_list(&images_path)?;
    tracing::info!("Loaded {} image(s) from {:?}", images.len(), images_path);

    let classifier: Arc<dyn Classifier> =
        Arc::new(ClarifaiClassifier::from_config(&config.classifier)?);
    run_indexer(classifier, IndexOptions::from_config(config), &images).await
}

/// Run the indexer with a progress bar and print the summary.
pub async fn run_indexer(
    classifier: Arc<dyn Classifier>,
    options: IndexOptions,
    images: &[String],
) -> anyhow::Result<IndexReport> {
    let indexer = Indexer::new(classifier, options);
    let total = tagsearch_core::pipeline::batch_count(images.len(), indexer.batch_size());
    let progress = create_progress_bar(total as u64);

    let result = indexer
        .build_index_with_progress(images, |event| report_batch(&progress, event))
        .await;
    progress.finish_and_clear();

    let report = result?;
    print_summary(&report.stats);
    Ok(report)
}

fn report_batch(progress: &indicatif::ProgressBar, event: &BatchEvent) {
    progress.inc(1);
    match &event.outcome {
        BatchOutcome::Indexed { images, .. } => {
            progress.set_message(format!("{images}/{} images tagged", event.size));
        }
        BatchOutcome::Failed(_) => {
            progress.set_message(format!("batch {} failed", event.batch));
        }
    }
}

fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after indexing.
fn print_summary(stats: &IndexStats) {
    let rate = if stats.total_seconds > 0.0 {
        stats.images_submitted as f64 / stats.total_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", stats.images_submitted);
    eprintln!("    Tagged:       {:>8}", stats.images_indexed);
    eprintln!("    Batches:      {:>8}", stats.batches_total);
    if stats.batches_failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.batches_failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Labels:       {:>8}", stats.labels);
    eprintln!("    Hits:         {:>8}", stats.hits);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tagsearch_core::{ClassifyError, Concept, PerImageLabels};

    /// Tags every image "photo" without touching the network.
    struct StaticClassifier;

    #[async_trait]
    impl Classifier for StaticClassifier {
        fn name(&self) -> &str {
            "static"
        }

        fn max_batch_size(&self) -> usize {
            2
        }

        async fn classify(&self, batch: &[String]) -> Result<Vec<PerImageLabels>, ClassifyError> {
            Ok(batch
                .iter()
                .map(|image| PerImageLabels {
                    image: image.clone(),
                    labels: vec![Concept::new("photo", 0.5)],
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_run_indexer_reports_stats() {
        let images: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let report = run_indexer(Arc::new(StaticClassifier), IndexOptions::default(), &images)
            .await
            .unwrap();
        assert_eq!(report.stats.batches_total, 2);
        assert_eq!(report.index.lookup("photo", 10), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_build_index_missing_image_list_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("images.txt");
        let err = build_index(&Config::default(), Some(&missing))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("images.txt"));
    }
}
