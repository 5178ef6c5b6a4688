//! Batch run over (ranking, language) combinations
//!
//! Combinations run strictly one after another, languages outer:
//! `monthly/en, total/en, ..., region/zh`. A failed combination is recorded
//! and the batch moves on; only the final summary tells the caller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use airank_core::{ProgressContext, Transport, fmt_num};
use airank_store::ResultWriter;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::config::Config;
use crate::paginator::Paginator;
use crate::ranking::{Language, RankingType};

/// One unit of work in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination {
    pub ranking: RankingType,
    pub language: Language,
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.ranking, self.language)
    }
}

/// Cartesian product, languages outer
pub fn combinations(rankings: &[RankingType], languages: &[Language]) -> Vec<Combination> {
    languages
        .iter()
        .flat_map(|&language| {
            rankings
                .iter()
                .map(move |&ranking| Combination { ranking, language })
        })
        .collect()
}

#[derive(Debug)]
pub enum Outcome {
    Saved {
        path: PathBuf,
        records: usize,
        pages_fetched: u32,
        pages_skipped: u32,
    },
    Failed {
        reason: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

#[derive(Debug)]
pub struct CombinationReport {
    pub combination: Combination,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

/// Per-combination outcomes of one batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<CombinationReport>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn total_records(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                Outcome::Saved { records, .. } => records,
                Outcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Format summary table as a string.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Ranking")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Lang").fg(Color::Cyan),
                Cell::new("Status").fg(Color::Cyan),
                Cell::new("Records").fg(Color::Cyan),
                Cell::new("Pages").fg(Color::Cyan),
                Cell::new("Time").fg(Color::Cyan),
                Cell::new("Output").fg(Color::Cyan),
            ]);

        for report in &self.reports {
            let c = report.combination;
            let took = format!("{:.1}s", report.elapsed.as_secs_f64());
            let row = match &report.outcome {
                Outcome::Saved {
                    path,
                    records,
                    pages_fetched,
                    pages_skipped,
                } => vec![
                    Cell::new(c.ranking.name()),
                    Cell::new(c.language.code()),
                    Cell::new("ok").fg(Color::Green),
                    Cell::new(fmt_num(*records)),
                    Cell::new(if *pages_skipped > 0 {
                        format!("{pages_fetched} ({pages_skipped} skipped)")
                    } else {
                        pages_fetched.to_string()
                    }),
                    Cell::new(took),
                    Cell::new(path.display()),
                ],
                Outcome::Failed { reason } => vec![
                    Cell::new(c.ranking.name()),
                    Cell::new(c.language.code()),
                    Cell::new("failed").fg(Color::Red),
                    Cell::new("0"),
                    Cell::new(""),
                    Cell::new(took),
                    Cell::new(reason),
                ],
            };
            table.add_row(row);
        }

        format!(
            "\n{table}\n{}/{} succeeded, {} records in {:.1}s",
            self.succeeded(),
            self.reports.len(),
            fmt_num(self.total_records()),
            self.elapsed.as_secs_f64()
        )
    }

    /// Log one line per combination (non-TTY mode).
    pub fn log(&self) {
        for report in &self.reports {
            match &report.outcome {
                Outcome::Saved { records, path, .. } => log::info!(
                    "{}: ok, {} records -> {} [{:.1}s]",
                    report.combination,
                    fmt_num(*records),
                    path.display(),
                    report.elapsed.as_secs_f64()
                ),
                Outcome::Failed { reason } => log::error!(
                    "{}: failed: {reason} [{:.1}s]",
                    report.combination,
                    report.elapsed.as_secs_f64()
                ),
            }
        }
        log::info!(
            "Batch complete: {}/{} succeeded in {:.1}s",
            self.succeeded(),
            self.reports.len(),
            self.elapsed.as_secs_f64()
        );
    }
}

/// Fetch, normalize and save every combination in `config`.
///
/// Never aborts early: each combination ends as [`Outcome::Saved`] or
/// [`Outcome::Failed`], and the pacing delay separates consecutive ones.
pub fn run<T: Transport>(
    config: &Config,
    transport: T,
    writer: &ResultWriter,
    progress: &ProgressContext,
) -> BatchSummary {
    let start = Instant::now();
    let paginator = Paginator::new(transport)
        .with_base_url(config.base_url.clone())
        .with_retry(config.retry_policy())
        .with_page_delay(config.pacing.page);

    let work = combinations(&config.rankings, &config.languages);
    let total = work.len();
    let mut summary = BatchSummary::default();

    for (i, combination) in work.into_iter().enumerate() {
        log::info!("[{}/{total}] {combination}", i + 1);
        let combo_start = Instant::now();
        let pb = progress.ranking_line(&combination.to_string());

        let outcome = run_one(&paginator, config, writer, combination, &pb);
        match &outcome {
            Outcome::Saved { records, .. } => {
                pb.finish_with_message(format!("{} records", fmt_num(*records)))
            }
            Outcome::Failed { reason } => pb.abandon_with_message(format!("failed: {reason}")),
        }

        summary.reports.push(CombinationReport {
            combination,
            outcome,
            elapsed: combo_start.elapsed(),
        });

        if i + 1 < total {
            let delay = config.pacing.combination.pause();
            log::debug!("waited {:.2}s before next combination", delay.as_secs_f64());
        }
    }

    summary.elapsed = start.elapsed();
    summary
}

fn run_one<T: Transport>(
    paginator: &Paginator<T>,
    config: &Config,
    writer: &ResultWriter,
    combination: Combination,
    pb: &indicatif::ProgressBar,
) -> Outcome {
    let Combination { ranking, language } = combination;
    let fetch = paginator.fetch_ranking(ranking, language, config.max_pages, pb);

    if fetch.records.is_empty() {
        log::error!("{combination}: no records fetched, nothing written");
        return Outcome::Failed {
            reason: "no records".to_string(),
        };
    }

    match writer.save(&fetch.records, ranking.name(), language.code(), config.encrypt) {
        Ok(path) => Outcome::Saved {
            path,
            records: fetch.records.len(),
            pages_fetched: fetch.pages_fetched,
            pages_skipped: fetch.pages_skipped,
        },
        Err(e) => {
            log::error!("{combination}: save failed: {e:#}");
            Outcome::Failed {
                reason: format!("{e:#}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell as CallCount;

    use airank_core::FetchError;
    use serde_json::{Value, json};

    use super::*;
    use crate::config::{FetchArgs, Pacing};

    /// One page of one item for every endpoint except `failing_path`.
    struct StubTransport {
        failing_path: &'static str,
        calls: CallCount<usize>,
    }

    impl Transport for StubTransport {
        fn get_json(
            &self,
            url: &str,
            params: &[(&str, String)],
            _headers: &[(&str, &str)],
        ) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if url.ends_with(self.failing_path) {
                return Err(FetchError::Http {
                    status: Some(500),
                    message: "boom".to_string(),
                });
            }
            let page = &params[0].1;
            if page == "1" {
                Ok(json!({"data": {"data": [{"name": "tool", "id": 1}]}}))
            } else {
                Ok(json!({"data": {"data": []}}))
            }
        }
    }

    fn config(ranking: &str, language: &str) -> Config {
        let mut config = Config::try_from(FetchArgs {
            ranking: ranking.to_string(),
            language: language.to_string(),
            max_pages: 3,
            encrypt: false,
        })
        .unwrap();
        config.max_attempts = 2;
        config.pacing = Pacing::none();
        config
    }

    #[test]
    fn combinations_language_outer() {
        let combos = combinations(&RankingType::ALL, &Language::ALL);
        assert_eq!(combos.len(), 8);
        assert_eq!(
            combos[0],
            Combination {
                ranking: RankingType::Monthly,
                language: Language::En
            }
        );
        assert_eq!(
            combos[3],
            Combination {
                ranking: RankingType::Region,
                language: Language::En
            }
        );
        assert_eq!(combos[4].language, Language::Zh);
        assert_eq!(combos[4].ranking, RankingType::Monthly);
    }

    #[test]
    fn failure_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let transport = StubTransport {
            failing_path: "high-revenue",
            calls: CallCount::new(0),
        };
        let summary = run(
            &config("all", "all"),
            &transport,
            &ResultWriter::new(dir.path()),
            &ProgressContext::hidden(),
        );

        assert_eq!(summary.reports.len(), 8);
        assert_eq!(summary.succeeded(), 6);
        assert_eq!(summary.failed(), 2);
        assert!(!summary.is_success());
        assert_eq!(summary.total_records(), 6);

        assert!(dir.path().join("en/monthly_rank.json").exists());
        assert!(dir.path().join("zh/region_rank.json").exists());
        // zero records: nothing written
        assert!(!dir.path().join("en/income_rank.json").exists());
        assert!(!dir.path().join("zh/income_rank.json").exists());

        let failed: Vec<_> = summary
            .reports
            .iter()
            .filter(|r| !r.outcome.is_success())
            .map(|r| r.combination.to_string())
            .collect();
        assert_eq!(failed, vec!["income_rank - en", "income_rank - zh"]);
    }

    #[test]
    fn write_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the data directory should be
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"").unwrap();

        let transport = StubTransport {
            failing_path: "never-matches",
            calls: CallCount::new(0),
        };
        let summary = run(
            &config("all", "en"),
            &transport,
            &ResultWriter::new(&blocker),
            &ProgressContext::hidden(),
        );

        assert_eq!(summary.reports.len(), 4);
        assert_eq!(summary.failed(), 4);
        // every combination still fetched: page 1 plus the empty page 2
        assert_eq!(transport.calls.get(), 8);
    }

    #[test]
    fn saved_outcome_reports_pages() {
        let dir = tempfile::tempdir().unwrap();
        let transport = StubTransport {
            failing_path: "never-matches",
            calls: CallCount::new(0),
        };
        let summary = run(
            &config("total_rank", "zh"),
            &transport,
            &ResultWriter::new(dir.path()),
            &ProgressContext::hidden(),
        );

        match &summary.reports[0].outcome {
            Outcome::Saved {
                path,
                records,
                pages_fetched,
                pages_skipped,
            } => {
                assert_eq!(path, &dir.path().join("zh/total_rank.json"));
                assert_eq!(*records, 1);
                assert_eq!(*pages_fetched, 2);
                assert_eq!(*pages_skipped, 0);
            }
            other => panic!("expected saved outcome, got {other:?}"),
        }
        assert!(summary.is_success());
    }

    #[test]
    fn table_lists_every_combination() {
        let summary = BatchSummary {
            reports: vec![
                CombinationReport {
                    combination: Combination {
                        ranking: RankingType::Total,
                        language: Language::En,
                    },
                    outcome: Outcome::Saved {
                        path: PathBuf::from("data/en/total_rank.json"),
                        records: 1234,
                        pages_fetched: 10,
                        pages_skipped: 1,
                    },
                    elapsed: Duration::from_secs(3),
                },
                CombinationReport {
                    combination: Combination {
                        ranking: RankingType::Income,
                        language: Language::Zh,
                    },
                    outcome: Outcome::Failed {
                        reason: "no records".to_string(),
                    },
                    elapsed: Duration::from_secs(1),
                },
            ],
            elapsed: Duration::from_secs(4),
        };

        let table = summary.format_table();
        assert!(table.contains("total_rank"));
        assert!(table.contains("1,234"));
        assert!(table.contains("10 (1 skipped)"));
        assert!(table.contains("3.0s"));
        assert!(table.contains("no records"));
        assert!(table.contains("1/2 succeeded"));
    }
}
