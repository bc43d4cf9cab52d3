use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pushshift-search", about = "Unbounded search over the Pushshift Reddit archive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Record filters shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Free-text query
    #[arg(long, short)]
    pub query: Option<String>,
    /// Title query (submissions only)
    #[arg(long)]
    pub title: Option<String>,
    /// Selftext query (submissions only)
    #[arg(long)]
    pub selftext: Option<String>,
    /// Record ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,
    /// Authors, comma separated or repeated
    #[arg(long = "author", value_delimiter = ',')]
    pub authors: Vec<String>,
    /// Subreddits, comma separated or repeated
    #[arg(long = "subreddit", short = 'r', value_delimiter = ',')]
    pub subreddits: Vec<String>,
    #[arg(long)]
    pub min_score: Option<i64>,
    #[arg(long)]
    pub max_score: Option<i64>,
    /// Minimum comment count (submissions only)
    #[arg(long)]
    pub min_comments: Option<i64>,
    /// Maximum comment count (submissions only)
    #[arg(long)]
    pub max_comments: Option<i64>,
    /// Start of the time window (YYYY-MM-DD or RFC3339); defaults to the archive start
    #[arg(long)]
    pub after: Option<String>,
    /// End of the time window (YYYY-MM-DD or RFC3339); defaults to now
    #[arg(long)]
    pub before: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Number of records to fetch; omit for as many as allowed
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
    /// Field projection, comma separated
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
    /// Sort attribute (e.g. created_utc, score)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Write JSON lines here instead of stdout
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search submissions
    Submissions(SearchArgs),
    /// Search comments
    Comments(SearchArgs),
    /// Approximate number of matches
    Count {
        /// Resource kind (submissions, comments)
        kind: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Sample records uniformly over the days from the first to the last with data
    Sample {
        /// Resource kind (submissions, comments)
        kind: String,
        #[arg(long, short = 'n', default_value = "1000")]
        count: usize,
        /// Seed for a reproducible day order
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Distinct authors of a subreddit, one file per day
    Authors {
        subreddit: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, exclusive (YYYY-MM-DD); defaults to today
        #[arg(long)]
        to: Option<String>,
        /// Directory receiving `<subreddit>/<day>.txt`
        #[arg(long, default_value = "usernames")]
        out_dir: PathBuf,
        /// Re-fetch days that already have a file
        #[arg(long)]
        overwrite: bool,
    },
    /// Most frequent words in matching comments
    Words {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, short = 'n', default_value = "2000")]
        count: usize,
        #[arg(long, default_value = "100")]
        top: usize,
        /// Text field to count
        #[arg(long, default_value = "body")]
        field: String,
    },
}
