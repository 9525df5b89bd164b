use std::env;
use std::path::PathBuf;
use std::time::Instant;

use reqwest::Client;
use tracing_subscriber::FmtSubscriber;

use faqsmith::embedding::{EmbeddingProvider, TokenAveragingProvider, augment};
use faqsmith::ingestion::{PageCache, fetch_page, sources};
use faqsmith::types::HarvestError;
use faqsmith::{FailurePolicy, assemble, export};

#[tokio::main]
async fn main() -> Result<(), HarvestError> {
    init_tracing();

    let cache_dir = PathBuf::from(env::var("FAQSMITH_CACHE").unwrap_or_else(|_| "./raw_html".into()));
    let out_dir = PathBuf::from(env::var("FAQSMITH_OUT").unwrap_or_else(|_| "./qa_pairs".into()));
    let policy = match env::var("FAQSMITH_POLICY").as_deref() {
        Ok("fail-fast") => FailurePolicy::FailFast,
        _ => FailurePolicy::CollectAndContinue,
    };
    let limit = env::var("FAQSMITH_LIMIT")
        .ok()
        .and_then(|value| value.parse::<usize>().ok());

    tokio::fs::create_dir_all(&cache_dir).await?;
    tokio::fs::create_dir_all(&out_dir).await?;
    let cache = PageCache::new(cache_dir.clone());

    let client = Client::builder()
        .user_agent("faqsmith/0.1 (Mozilla/5.0 compatible)")
        .use_rustls_tls()
        .build()?;

    let mut pages = sources::all_pages();
    if let Some(limit) = limit {
        pages.truncate(limit);
    }
    println!("Fetching {} FAQ pages", pages.len());

    let start = Instant::now();
    let mut bytes_downloaded = 0usize;
    let mut cache_hits = 0usize;
    let mut inputs = Vec::new();

    for (page, url) in pages {
        let fetch = fetch_page(&client, &page, url, Some(&cache)).await?;
        if fetch.from_cache {
            cache_hits += 1;
            println!("   {} from cache ({:.1} KB)", page, fetch.bytes as f64 / 1024.0);
        } else {
            bytes_downloaded += fetch.bytes;
            println!("   {} downloaded ({:.1} KB)", page, fetch.bytes as f64 / 1024.0);
        }
        inputs.push((fetch.page, fetch.content));
    }

    let assembly = assemble(inputs, policy)?;
    for failure in assembly.failures() {
        println!("   skipped {}: {}", failure.page, failure.error);
    }

    let provider = load_provider().await?;
    let mut collections = assembly.into_collections();
    if let Some(provider) = &provider {
        for records in collections.values_mut() {
            augment(records, provider.as_ref()).await?;
        }
    }

    let mut total = 0usize;
    for ((category, language), records) in &collections {
        let dir = out_dir.join(language.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        export::write_json(dir.join(format!("{category}.json")), records).await?;
        export::write_csv(dir.join(format!("{category}.csv")), records).await?;
        println!("   {}/{}: {} records", language, category, records.len());
        total += records.len();
    }

    println!("\nDone.");
    println!("  records         : {}", total);
    println!("  cache hits      : {}", cache_hits);
    println!(
        "  bytes downloaded: {:.1} KB",
        bytes_downloaded as f64 / 1024.0
    );
    println!(
        "  embeddings      : {}",
        provider
            .as_ref()
            .map(|p| format!("{} ({} dims)", p.name(), p.dimensions()))
            .unwrap_or_else(|| "skipped (set FAQSMITH_VECTORS)".to_string())
    );
    println!("  output directory: {}", out_dir.display());
    println!("  elapsed         : {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Builds the token-averaging provider when a vector table is configured;
/// without one the corpus is exported without embeddings.
async fn load_provider() -> Result<Option<Box<dyn EmbeddingProvider>>, HarvestError> {
    let Ok(vectors_path) = env::var("FAQSMITH_VECTORS") else {
        return Ok(None);
    };

    let table = tokio::fs::read_to_string(&vectors_path).await?;
    let mut provider = TokenAveragingProvider::from_plain_text(&table)?;

    if let Ok(stop_words_path) = env::var("FAQSMITH_STOP_WORDS") {
        let words = tokio::fs::read_to_string(&stop_words_path).await?;
        provider = provider.with_stop_words(
            words
                .lines()
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(str::to_string),
        );
    }

    tracing::info!(path = %vectors_path, dims = provider.dimensions(), "vector table loaded");
    Ok(Some(Box::new(provider)))
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faqsmith=info".into()),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
