use anyhow::{Context, Result};
use playdex_core::{CorpusStats, InvertedIndex, Tokenizer};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct Summary<'a> {
    created_at: String,
    num_terms: usize,
    #[serde(flatten)]
    stats: &'a CorpusStats,
}

/// Writes the query battery into `out_dir`, one result per line per file.
pub fn write_report(index: &InvertedIndex, tokenizer: &Tokenizer, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let terms = |s: &str| tokenizer.terms(s);

    // Scenes where "thee" or "thou" is used more than "you".
    let old_forms = terms("thee thou");
    let you = tokenizer.single_term("you")?;
    write_lines(out_dir, "terms0.txt", &index.documents_where_more_frequent(&old_forms, &you))?;

    let series = index
        .frequency_series(&[old_forms.as_slice(), std::slice::from_ref(&you)].concat())
        .into_iter()
        .enumerate()
        .map(|(i, (_, counts))| format!("{},{},{}", i, counts[0] + counts[1], counts[2]))
        .collect::<Vec<_>>();
    write_lines(out_dir, "graph.txt", &series)?;

    write_lines(out_dir, "terms1.txt", &index.search_any(terms("venice rome denmark")))?;
    write_lines(out_dir, "terms2.txt", &index.search_group(&tokenizer.single_term("goneril")?)?)?;
    write_lines(out_dir, "terms3.txt", &index.search_group(&tokenizer.single_term("soldier")?)?)?;
    write_lines(out_dir, "phrase0.txt", &index.search_phrase(&terms("poor yorick"))?)?;
    write_lines(out_dir, "phrase1.txt", &index.search_phrase(&terms("wherefore art thou romeo"))?)?;
    write_lines(out_dir, "phrase2.txt", &index.search_phrase(&terms("let slip"))?)?;

    let stats = CorpusStats::compute(index.documents())?;
    let summary = Summary {
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        num_terms: index.num_terms(),
        stats: &stats,
    };
    fs::write(out_dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;

    tracing::info!(output = %out_dir.display(), "report complete");
    Ok(())
}

fn write_lines(dir: &Path, name: &str, lines: &[String]) -> Result<()> {
    let path = dir.join(name);
    let mut w = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
    for line in lines {
        writeln!(w, "{line}")?;
    }
    w.flush()?;
    tracing::debug!(file = name, lines = lines.len(), "wrote results");
    Ok(())
}
