use clap::Parser;
use pushshift_search::application::authors::daily_path;
use pushshift_search::application::word_frequency::WordFrequency;
use pushshift_search::cli::commands::{Cli, Commands, FilterArgs, SearchArgs};
use pushshift_search::domain::entities::record::Record;
use pushshift_search::domain::entities::search_spec::SearchSpec;
use pushshift_search::domain::values::predicate::{IntRange, Predicate};
use pushshift_search::domain::values::resource_kind::ResourceKind;
use pushshift_search::domain::values::sort::{SortDirection, SortSpec};
use pushshift_search::domain::values::time_window::{PartialWindow, TimeWindow};
use pushshift_search::infrastructure::storage::jsonl;
use pushshift_search::PushshiftSearch;
use std::io::Write;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ps = match PushshiftSearch::new() {
        Ok(ps) => ps,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    if let Err(e) = run_command(&ps, cli.command, &cancel).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    ps: &PushshiftSearch,
    cmd: Commands,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Submissions(args) => {
            run_search(ps, ResourceKind::Submissions, args, cancel).await?;
        }
        Commands::Comments(args) => {
            run_search(ps, ResourceKind::Comments, args, cancel).await?;
        }
        Commands::Count { kind, filters } => {
            let kind: ResourceKind = kind.parse().map_err(|e: String| e)?;
            let predicate = build_predicate(&filters)?;
            let window = build_window(&filters)?;
            let estimate = ps.count(kind, &predicate, &window, cancel).await?;
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
        Commands::Sample {
            kind,
            count,
            seed,
            filters,
            fields,
            out,
        } => {
            let kind: ResourceKind = kind.parse().map_err(|e: String| e)?;
            let spec = SearchSpec {
                predicate: build_predicate(&filters)?,
                window: build_window(&filters)?,
                count: None,
                fields,
                sort: None,
            };
            let outcome = ps.sample(kind, &spec, count, seed, cancel).await?;
            if outcome.partial {
                tracing::warn!(records = outcome.len(), "sample interrupted, output is partial");
            }
            warn_degraded(outcome.degraded_windows);
            emit(&outcome.records, out.as_deref())?;
        }
        Commands::Authors {
            subreddit,
            from,
            to,
            out_dir,
            overwrite,
        } => {
            let first = parse_day(&from)?;
            let last = match to {
                Some(to) => parse_day(&to)?,
                None => chrono::Utc::now().date_naive(),
            };
            for day in first.iter_days().take_while(|d| *d < last) {
                if cancel.is_cancelled() {
                    break;
                }
                let path = daily_path(&out_dir, &subreddit, day);
                if !overwrite && path.is_file() {
                    continue;
                }
                let start = day
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| format!("invalid day {day}"))?
                    .and_utc();
                let window = TimeWindow::new(start, start + chrono::Duration::days(1))?;
                let set = ps.distinct_authors(&subreddit, window, cancel).await?;
                if set.partial {
                    tracing::warn!(%day, "interrupted, not saving partial author list");
                    break;
                }
                warn_degraded(set.degraded_windows);
                jsonl::write_lines(&path, &set.authors)?;
                tracing::info!(%day, authors = set.authors.len(), path = %path.display(), "saved");
            }
        }
        Commands::Words {
            filters,
            count,
            top,
            field,
        } => {
            let spec = SearchSpec {
                predicate: build_predicate(&filters)?,
                window: build_window(&filters)?,
                count: Some(count),
                fields: vec![field.clone()],
                sort: None,
            };
            let outcome = ps.search(ResourceKind::Comments, &spec, cancel).await?;
            let freq = WordFrequency::from_records(&outcome.records, &field);
            println!("{} records", outcome.len());
            for (word, n) in freq.top(top) {
                println!("{word} => {n}");
            }
        }
    }
    Ok(())
}

async fn run_search(
    ps: &PushshiftSearch,
    kind: ResourceKind,
    args: SearchArgs,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = SearchSpec {
        predicate: build_predicate(&args.filters)?,
        window: build_window(&args.filters)?,
        count: args.count,
        fields: args.fields,
        sort: args.sort.map(|attr| {
            let direction = if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            SortSpec::new(attr, direction)
        }),
    };
    let outcome = ps.search(kind, &spec, cancel).await?;
    if outcome.partial {
        tracing::warn!(records = outcome.len(), "search interrupted, output is partial");
    }
    warn_degraded(outcome.degraded_windows);
    emit(&outcome.records, args.out.as_deref())
}

fn warn_degraded(windows: usize) {
    if windows > 0 {
        tracing::warn!(windows, "match counts unavailable, results may be incomplete");
    }
}

fn emit(records: &[Record], out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match out {
        Some(path) => jsonl::write_records(path, records)?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            for record in records {
                serde_json::to_writer(&mut lock, record)?;
                lock.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn build_predicate(f: &FilterArgs) -> Result<Predicate, String> {
    let mut predicate = Predicate::new()
        .ids(f.ids.iter().cloned())
        .authors(f.authors.iter().cloned())
        .subreddits(f.subreddits.iter().cloned())
        .score(IntRange::new(f.min_score, f.max_score)?)
        .num_comments(IntRange::new(f.min_comments, f.max_comments)?);
    if let Some(q) = &f.query {
        predicate = predicate.query(q.as_str());
    }
    if let Some(t) = &f.title {
        predicate = predicate.title(t.as_str());
    }
    if let Some(s) = &f.selftext {
        predicate = predicate.selftext(s.as_str());
    }
    Ok(predicate)
}

fn build_window(f: &FilterArgs) -> Result<PartialWindow, String> {
    Ok(PartialWindow::new(
        parse_date(&f.after)?,
        parse_date(&f.before)?,
    ))
}

fn parse_day(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {s}. Use YYYY-MM-DD"))
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::DateTime<chrono::Utc>>, String> {
    match s {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&chrono::Utc)));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return Ok(Some(dt.and_utc()));
                }
            }
            Err(format!(
                "Invalid date format: {s}. Use YYYY-MM-DD or RFC3339"
            ))
        }
    }
}
