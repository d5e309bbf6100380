use std::path::PathBuf;

use clap::Args;

/// Default `--output`: a table with the most useful columns
pub const DEFAULT_OUTPUT: &str = "table=file,beginning,modified,tags";

/// Arguments for the ls command.
#[derive(Args, Debug, Default)]
#[command(after_help = "Examples:
  noteo ls --grep regex
  noteo ls --created-after 2020-08-30
  noteo ls -t task -t link
  noteo ls --tag-greater priority:1
  noteo ls --tag-after deadline:2020-08-30 --sort-by-tag-date deadline
  noteo ls -o table=file,tags")]
pub struct LsArgs {
    /// Directory to list, relative to the current one
    pub dir: Option<PathBuf>,

    /// Show only file names
    #[arg(long, short)]
    pub quiet: bool,

    /// Output format: table=<columns>, wide, json or yaml
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Date format in tables: relative (default), iso8601 or rfc2822
    #[arg(long)]
    pub date: Option<String>,

    /// Filter notes having tag (repeatable)
    #[arg(long, short, value_name = "NAME", help_heading = "Filtering")]
    pub tag: Vec<String>,

    /// Filter notes not having tag (repeatable)
    #[arg(long, value_name = "NAME", help_heading = "Filtering")]
    pub no_tag: Vec<String>,

    /// Filter notes having a tag matching the regular expression (repeatable)
    #[arg(long, value_name = "REGEX", help_heading = "Filtering")]
    pub tag_grep: Vec<String>,

    /// Filter notes having a numeric tag greater than given, e.g. "foo:2" (repeatable)
    #[arg(long, value_name = "NAME:NUMBER", help_heading = "Filtering")]
    pub tag_greater: Vec<String>,

    /// Filter notes having a numeric tag lower than given, e.g. "foo:2" (repeatable)
    #[arg(long, value_name = "NAME:NUMBER", help_heading = "Filtering")]
    pub tag_lower: Vec<String>,

    /// Filter notes having a date tag after given, e.g. "foo:2010-08-01" (repeatable)
    #[arg(long, value_name = "NAME:DATE", help_heading = "Filtering")]
    pub tag_after: Vec<String>,

    /// Filter notes having a date tag before given, e.g. "foo:2010-08-01" (repeatable)
    #[arg(long, value_name = "NAME:DATE", help_heading = "Filtering")]
    pub tag_before: Vec<String>,

    /// Filter notes without any tags
    #[arg(long, help_heading = "Filtering")]
    pub no_tags: bool,

    /// Filter notes modified after given date
    #[arg(long, value_name = "DATE", help_heading = "Filtering")]
    pub modified_after: Option<String>,

    /// Filter notes modified before given date
    #[arg(long, value_name = "DATE", help_heading = "Filtering")]
    pub modified_before: Option<String>,

    /// Filter notes created after given date
    #[arg(long, value_name = "DATE", help_heading = "Filtering")]
    pub created_after: Option<String>,

    /// Filter notes created before given date
    #[arg(long, value_name = "DATE", help_heading = "Filtering")]
    pub created_before: Option<String>,

    /// Filter notes whose text matches the regular expression
    #[arg(long, value_name = "REGEX", help_heading = "Filtering")]
    pub grep: Option<String>,

    /// Limit the number of notes returned
    #[arg(long, short, help_heading = "Sorting and limiting")]
    pub limit: Option<usize>,

    /// Sort by created date, descending
    #[arg(long, help_heading = "Sorting and limiting")]
    pub sort_by_created: bool,

    /// Sort by the date in the named tag, descending
    #[arg(long, value_name = "NAME", help_heading = "Sorting and limiting")]
    pub sort_by_tag_date: Option<String>,

    /// Sort by the number in the named tag, descending
    #[arg(long, value_name = "NAME", help_heading = "Sorting and limiting")]
    pub sort_by_tag_number: Option<String>,

    /// Make sorting ascending
    #[arg(long, help_heading = "Sorting and limiting")]
    pub reverse: bool,
}
