//! `noteo ls` command - list notes through the walk, filter and top stages
//!
//! Filters are combined with AND, in flag order. Without a sort flag notes are
//! listed most recently modified first; `--reverse` turns any order ascending.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::LsArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::{finish_errors, print_errors};
use crate::output;
use noteo_core::date::DateFormat;
use noteo_core::error::Result;
use noteo_core::notes::{filter, top, Less, Predicate};
use noteo_core::repository::Repository;
use noteo_core::tag::Tag;

/// Execute the ls command
pub async fn execute(ctx: &CommandContext<'_>, args: &LsArgs) -> Result<()> {
    // validate every flag before touching the repository
    let predicates = predicates(args)?;
    let less = sort(args);
    let date_format = match args.date.as_deref() {
        Some(date) if !date.is_empty() => date.parse()?,
        _ => DateFormat::default(),
    };
    let mut out = output::formatter(&args.output, args.quiet, date_format)?;

    let repo = Repository::for_work_dir(&ctx.dir_arg(args.dir.as_ref()))?;
    let cancel = CancellationToken::new();
    let (notes, walk_errors) = repo.notes(cancel.clone());
    let (filtered, filter_errors) = filter::filter(cancel.clone(), notes, predicates);
    let (mut sorted, top_errors) =
        top::top(cancel, args.limit.unwrap_or(usize::MAX), filtered, less);
    let printers = print_errors(vec![walk_errors, filter_errors, top_errors]);

    print!("{}", out.header());
    let mut listed = 0usize;
    while let Some(note) = sorted.recv().await {
        print!("{}", out.note(&note));
        listed += 1;
    }
    print!("{}", out.footer());

    finish_errors(printers).await;
    debug!(listed, elapsed = ?ctx.start.elapsed(), "ls");
    Ok(())
}

/// Predicates for every filtering flag, in a fixed order
fn predicates(args: &LsArgs) -> Result<Vec<Predicate>> {
    let mut predicates = Vec::new();
    for tag in &args.tag {
        predicates.push(filter::tag(Tag::new(tag.as_str())?));
    }
    for tag in &args.no_tag {
        predicates.push(filter::no_tag(Tag::new(tag.as_str())?));
    }
    for pattern in &args.tag_grep {
        predicates.push(filter::tag_grep(pattern)?);
    }
    for value in &args.tag_greater {
        predicates.push(filter::tag_greater(value)?);
    }
    for value in &args.tag_lower {
        predicates.push(filter::tag_lower(value)?);
    }
    for value in &args.tag_after {
        predicates.push(filter::tag_after(value)?);
    }
    for value in &args.tag_before {
        predicates.push(filter::tag_before(value)?);
    }
    if args.no_tags {
        predicates.push(filter::no_tags());
    }

    let dated: [(&Option<String>, fn(&str) -> Result<Predicate>); 4] = [
        (&args.modified_after, filter::modified_after),
        (&args.modified_before, filter::modified_before),
        (&args.created_after, filter::created_after),
        (&args.created_before, filter::created_before),
    ];
    for (value, predicate) in dated {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            predicates.push(predicate(value)?);
        }
    }

    if let Some(pattern) = args.grep.as_deref().filter(|p| !p.is_empty()) {
        predicates.push(filter::grep(pattern)?);
    }
    Ok(predicates)
}

fn sort(args: &LsArgs) -> Less {
    let tag_date = args.sort_by_tag_date.as_deref().filter(|n| !n.is_empty());
    let tag_number = args.sort_by_tag_number.as_deref().filter(|n| !n.is_empty());
    match (args.reverse, args.sort_by_created, tag_date, tag_number) {
        (false, true, _, _) => top::created_desc(),
        (true, true, _, _) => top::created_asc(),
        (false, false, Some(name), _) => top::tag_date_desc(name),
        (true, false, Some(name), _) => top::tag_date_asc(name),
        (false, false, None, Some(name)) => top::tag_number_desc(name),
        (true, false, None, Some(name)) => top::tag_number_asc(name),
        (false, false, None, None) => top::modified_desc(),
        (true, false, None, None) => top::modified_asc(),
    }
}
