//! Parallel batch generation.
//!
//! One producer is shared by reference across the rayon pool; each worker
//! owns its canvas and output file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use scrawl::Producer;
use serde::{Deserialize, Serialize};

/// Manifest file written next to the images
pub const MANIFEST_FILE: &str = "manifest.json";

/// One generated challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Image file name, relative to the output directory
    pub file: String,
    /// The expected answer
    pub text: String,
    /// Unix timestamp when generated
    pub generated_at: i64,
}

/// Image file name for challenge `index`
pub fn file_name(index: usize, extension: &str) -> String {
    format!("challenge_{index:05}.{extension}")
}

/// Generate `count` challenges into `out_dir` on `threads` workers (0 = all cores)
pub fn run(producer: &Producer, count: usize, out_dir: &Path, threads: usize) -> Result<Vec<ManifestEntry>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build thread pool")?;

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let started = Instant::now();
    let entries = pool.install(|| {
        (0..count)
            .into_par_iter()
            .progress_with(pb.clone())
            .map(|index| generate_one(producer, out_dir, index))
            .collect::<Result<Vec<_>>>()
    })?;
    pb.finish_and_clear();

    write_manifest(out_dir, &entries)?;

    tracing::info!(
        count,
        out_dir = %out_dir.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Batch complete"
    );

    Ok(entries)
}

fn generate_one(producer: &Producer, out_dir: &Path, index: usize) -> Result<ManifestEntry> {
    let file = file_name(index, producer.extension());
    let path: PathBuf = out_dir.join(&file);
    let text = producer.create_text();

    let mut sink = BufWriter::new(
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    producer
        .create_image(&mut sink, &text)
        .with_context(|| format!("Failed to generate {}", path.display()))?;

    Ok(ManifestEntry {
        file,
        text,
        generated_at: chrono::Utc::now().timestamp(),
    })
}

fn write_manifest(out_dir: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let path = out_dir.join(MANIFEST_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries).context("Failed to write manifest")?;
    writer.flush().context("Failed to write manifest")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(7, "jpg"), "challenge_00007.jpg");
        assert_eq!(file_name(123_456, "png"), "challenge_123456.png");
    }

    #[test]
    fn test_manifest_entry_json() {
        let entry = ManifestEntry {
            file: "challenge_00000.jpg".to_string(),
            text: "ab3k".to_string(),
            generated_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["text"], "ab3k");
        assert_eq!(json["generated_at"], 1_700_000_000);
    }

    #[test]
    fn test_write_manifest_reads_back() {
        let out_dir = std::env::temp_dir().join(format!("scrawl-manifest-{}", std::process::id()));
        std::fs::create_dir_all(&out_dir).unwrap();

        let entries: Vec<ManifestEntry> = (0..3)
            .map(|index| ManifestEntry {
                file: file_name(index, "png"),
                text: format!("ab{index}k"),
                generated_at: 1_700_000_000 + index as i64,
            })
            .collect();
        write_manifest(&out_dir, &entries).unwrap();

        let file = File::open(out_dir.join(MANIFEST_FILE)).unwrap();
        let read: Vec<ManifestEntry> = serde_json::from_reader(file).unwrap();
        std::fs::remove_dir_all(&out_dir).unwrap();

        assert_eq!(read.len(), 3);
        for (written, read) in entries.iter().zip(&read) {
            assert_eq!(written.file, read.file);
            assert_eq!(written.text, read.text);
            assert_eq!(written.generated_at, read.generated_at);
        }
    }
}
